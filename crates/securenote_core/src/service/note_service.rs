//! Note use-case service.
//!
//! # Responsibility
//! - Wrap the repository with attachment intake: a file selected by the
//!   caller is validated and shaped into its conventional carrier before the
//!   note is created.
//! - Provide the conventional presentation ordering (newest first).
//!
//! # Invariants
//! - Intake rejection happens before any repository mutation.
//! - Ordering is stable: timestamp descending, id ascending as tiebreak.

use crate::attachment::{
    image_attachment, metadata_attachment, text_attachment, AttachmentError,
};
use crate::model::note::{Note, NoteDraft, NoteId, NoteUpdate};
use crate::repo::note_repo::{NoteRepoError, NoteRepoResult, NoteRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// The candidate attachment was rejected at intake.
    Attachment(AttachmentError),
    /// Repository-level failure.
    Repo(NoteRepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attachment(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Attachment(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<AttachmentError> for NoteServiceError {
    fn from(value: AttachmentError) -> Self {
        Self::Attachment(value)
    }
}

impl From<NoteRepoError> for NoteServiceError {
    fn from(value: NoteRepoError) -> Self {
        Self::Repo(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note without attachment intake.
    pub fn create_note(&self, draft: NoteDraft) -> NoteRepoResult<Note> {
        self.repo.create_note(draft)
    }

    /// Creates a note from title/content plus a raw selected file.
    ///
    /// The file is validated and shaped by MIME type: `text/plain` payloads
    /// are inlined, images become data URIs, other accepted types keep
    /// metadata only.
    pub fn create_note_with_file(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        file_name: &str,
        file_kind: &str,
        file_bytes: &[u8],
    ) -> Result<Note, NoteServiceError> {
        let attachment = match file_kind {
            "text/plain" => {
                text_attachment(file_name, String::from_utf8_lossy(file_bytes).into_owned())?
            }
            kind if kind.starts_with("image/") => image_attachment(file_name, kind, file_bytes)?,
            kind => metadata_attachment(file_name, kind)?,
        };
        let draft = NoteDraft::new(title, content).with_attachment(attachment);
        Ok(self.repo.create_note(draft)?)
    }

    pub fn get_note(&self, id: NoteId) -> NoteRepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    pub fn update_note(&self, id: NoteId, update: NoteUpdate) -> NoteRepoResult<Note> {
        self.repo.update_note(id, update)
    }

    pub fn delete_note(&self, id: NoteId) -> NoteRepoResult<()> {
        self.repo.delete_note(id)
    }

    /// Lists the acting identity's notes in presentation order.
    pub fn list_notes_newest_first(&self) -> NoteRepoResult<Vec<Note>> {
        let mut notes = self.repo.list_notes()?;
        notes.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(notes)
    }
}
