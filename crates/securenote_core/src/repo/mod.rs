//! Repository layer abstractions and the key-value-backed implementation.
//!
//! # Responsibility
//! - Define the identity-scoped note CRUD contract.
//! - Isolate collection load/replace mechanics from use-case orchestration.
//!
//! # Invariants
//! - Write paths must validate notes before persistence.
//! - Every operation fails closed when no identity is active.
//! - Each mutation performs exactly one adapter write with a fully computed
//!   next collection value.

pub mod note_repo;
