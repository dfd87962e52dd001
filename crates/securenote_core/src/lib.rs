//! Storage core for SecureNote: username-only identity, user-scoped note
//! CRUD, and optional single-file attachments over a key-value persistence
//! adapter.
//!
//! All durability flows through [`storage::KvStore`], which wraps a
//! synchronous string-keyed storage medium. The full note collection is one
//! JSON blob under one key; the identity record lives under another. This
//! crate is the single source of truth for the ownership and merge
//! invariants; UI, routing and the upload transport are external
//! collaborators.

pub mod attachment;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod storage;

pub use attachment::{
    image_attachment, linked_attachment, metadata_attachment, text_attachment, AttachmentError,
    UploadOutcome, ALLOWED_MIME_TYPES, MAX_ATTACHMENT_BYTES,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::identity::{Identity, IdentityState};
pub use model::note::{
    AttachmentPatch, Note, NoteDraft, NoteFile, NoteId, NoteUpdate, NoteValidationError,
    NOTE_TITLE_MAX_CHARS,
};
pub use repo::note_repo::{
    KvNoteRepository, NoteRepoError, NoteRepoResult, NoteRepository, NOTES_KEY,
};
pub use service::note_service::{NoteService, NoteServiceError};
pub use session::{SessionStore, IDENTITY_KEY};
pub use storage::{
    open_store, open_store_in_memory, KvStore, MemoryMedium, SqliteMedium, StorageError,
    StorageMedium, StorageResult, StoreError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
