//! Note domain model.
//!
//! # Responsibility
//! - Define the note record and its optional attachment metadata.
//! - Provide draft construction and partial-update merge semantics.
//! - Validate notes before they reach the write path.
//!
//! # Invariants
//! - `id` is stable and globally unique across all users' notes.
//! - `user_id` equals the creating identity's username and never changes.
//! - `timestamp` doubles as created-at and last-modified: set on creation,
//!   refreshed on every merge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum accepted title length in characters.
pub const NOTE_TITLE_MAX_CHARS: usize = 100;

/// Stable identifier for a note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Metadata and payload for a single file associated with a note.
///
/// `url` and `content` are mutually-exclusive-by-convention payload carriers:
/// images travel as a `url` (data URI or server path), plain text travels as
/// literal `content`, and other allowed types keep metadata only. The store
/// does not enforce the convention with a schema constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFile {
    /// Original file name as selected by the user.
    pub name: String,
    /// MIME type. Serialized as `type` to match the persisted layout.
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload reference for image-like attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Literal payload for text attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Canonical persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable global ID.
    pub id: NoteId,
    /// Display title, 1..=100 characters.
    pub title: String,
    /// Note body, non-empty.
    pub content: String,
    /// Creation/last-modified instant (one field by design).
    pub timestamp: DateTime<Utc>,
    /// At most one attachment per note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<NoteFile>,
    /// Owning identity's username. Serialized as `userId`.
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Caller-supplied fields for note creation.
///
/// Identity, id and timestamp are stamped by the repository, never by the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub attachment: Option<NoteFile>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: NoteFile) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Attachment directive for a partial update.
///
/// A plain `Option<NoteFile>` cannot distinguish "leave as is" from "clear",
/// so the three cases are spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttachmentPatch {
    /// Preserve whatever attachment the note currently has.
    #[default]
    Keep,
    /// Drop the current attachment.
    Remove,
    /// Replace the current attachment with this file.
    Set(NoteFile),
}

/// Partial update over an existing note.
///
/// Fields left as `None`/`Keep` are preserved from the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub attachment: AttachmentPatch,
}

/// Validation failure for note write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    TitleTooLong { length: usize },
    EmptyContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::TitleTooLong { length } => write!(
                f,
                "note title has {length} characters, maximum is {NOTE_TITLE_MAX_CHARS}"
            ),
            Self::EmptyContent => write!(f, "note content must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Builds a fresh note from a draft, stamping id, timestamp and owner.
    pub fn from_draft(draft: NoteDraft, user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            timestamp: Utc::now(),
            attachment: draft.attachment,
            user_id: user_id.into(),
        }
    }

    /// Merges a partial update over this note and refreshes the timestamp.
    ///
    /// `id` and `user_id` are deliberately untouchable through this path.
    pub fn apply_update(&mut self, update: NoteUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        match update.attachment {
            AttachmentPatch::Keep => {}
            AttachmentPatch::Remove => self.attachment = None,
            AttachmentPatch::Set(file) => self.attachment = Some(file),
        }
        self.timestamp = Utc::now();
    }

    /// Returns whether this note belongs to the given username.
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.user_id == username
    }

    /// Checks title and content bounds.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        let length = self.title.chars().count();
        if length > NOTE_TITLE_MAX_CHARS {
            return Err(NoteValidationError::TitleTooLong { length });
        }
        if self.content.is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AttachmentPatch, Note, NoteDraft, NoteFile, NoteUpdate, NoteValidationError};

    fn sample_note() -> Note {
        Note::from_draft(NoteDraft::new("groceries", "milk, eggs"), "alice")
    }

    #[test]
    fn from_draft_stamps_owner_and_fresh_id() {
        let a = sample_note();
        let b = sample_note();
        assert_eq!(a.user_id, "alice");
        assert_ne!(a.id, b.id);
        assert!(a.attachment.is_none());
    }

    #[test]
    fn apply_update_preserves_unsupplied_fields() {
        let mut note = sample_note();
        let before = note.timestamp;
        note.apply_update(NoteUpdate {
            title: Some("shopping".to_string()),
            ..NoteUpdate::default()
        });
        assert_eq!(note.title, "shopping");
        assert_eq!(note.content, "milk, eggs");
        assert!(note.timestamp >= before);
    }

    #[test]
    fn attachment_patch_can_remove_and_replace() {
        let file = NoteFile {
            name: "memo.txt".to_string(),
            kind: "text/plain".to_string(),
            url: None,
            content: Some("hello".to_string()),
        };
        let mut note = sample_note();

        note.apply_update(NoteUpdate {
            attachment: AttachmentPatch::Set(file.clone()),
            ..NoteUpdate::default()
        });
        assert_eq!(note.attachment.as_ref(), Some(&file));

        note.apply_update(NoteUpdate {
            attachment: AttachmentPatch::Remove,
            ..NoteUpdate::default()
        });
        assert!(note.attachment.is_none());
    }

    #[test]
    fn validate_enforces_title_and_content_bounds() {
        let mut note = sample_note();
        note.title = String::new();
        assert_eq!(note.validate(), Err(NoteValidationError::EmptyTitle));

        note.title = "x".repeat(101);
        assert_eq!(
            note.validate(),
            Err(NoteValidationError::TitleTooLong { length: 101 })
        );

        note.title = "x".repeat(100);
        note.content = String::new();
        assert_eq!(note.validate(), Err(NoteValidationError::EmptyContent));

        note.content = "body".to_string();
        assert_eq!(note.validate(), Ok(()));
    }

    #[test]
    fn note_serializes_with_persisted_field_names() {
        let mut note = sample_note();
        note.attachment = Some(NoteFile {
            name: "memo.txt".to_string(),
            kind: "text/plain".to_string(),
            url: None,
            content: Some("hello".to_string()),
        });

        let json = serde_json::to_value(&note).expect("note serializes");
        assert!(json.get("userId").is_some());
        assert_eq!(json["attachment"]["type"], "text/plain");
        // Absent carriers are omitted, not serialized as null.
        assert!(json["attachment"].get("url").is_none());
    }
}
