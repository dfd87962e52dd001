//! Domain model for the SecureNote store.
//!
//! # Responsibility
//! - Define the canonical persisted shapes: identity record, note record,
//!   attachment metadata.
//! - Provide lifecycle helpers (draft construction, partial-update merge)
//!   and write-path validation.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` that is never reused.
//! - `user_id` is fixed at creation time and immutable afterwards.
//! - Serialized field names match the persisted JSON layout exactly.

pub mod identity;
pub mod note;
