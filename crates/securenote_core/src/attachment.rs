//! Attachment intake and payload helpers.
//!
//! # Responsibility
//! - Enforce the MIME allowlist and size ceiling before an attachment ever
//!   reaches the repository.
//! - Build [`NoteFile`] values with the conventional payload carrier for
//!   each type: data-URI `url` for images, literal `content` for plain text,
//!   metadata only for everything else.
//! - Deserialize the upload collaborator's response shape.
//!
//! # Invariants
//! - The repository trusts this layer; it never re-validates attachments.
//! - `url` and `content` are never both populated by these constructors.

use crate::model::note::NoteFile;
use base64ct::{Base64, Encoding};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Size ceiling for any attachment payload: 5 MiB.
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for attachments.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "text/plain",
    "application/pdf",
];

/// Intake rejection for a candidate attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    TooLarge { size: usize },
    UnsupportedType(String),
}

impl Display for AttachmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge { size } => write!(
                f,
                "attachment is {size} bytes, maximum is {MAX_ATTACHMENT_BYTES}"
            ),
            Self::UnsupportedType(kind) => write!(f, "unsupported attachment type `{kind}`"),
        }
    }
}

impl Error for AttachmentError {}

fn ensure_accepted(kind: &str, size: usize) -> Result<(), AttachmentError> {
    if !ALLOWED_MIME_TYPES.contains(&kind) {
        return Err(AttachmentError::UnsupportedType(kind.to_string()));
    }
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge { size });
    }
    Ok(())
}

/// Builds a `text/plain` attachment carrying its payload inline.
pub fn text_attachment(
    name: impl Into<String>,
    content: impl Into<String>,
) -> Result<NoteFile, AttachmentError> {
    let content = content.into();
    ensure_accepted("text/plain", content.len())?;
    Ok(NoteFile {
        name: name.into(),
        kind: "text/plain".to_string(),
        url: None,
        content: Some(content),
    })
}

/// Builds an image attachment carrying its payload as a base64 data URI.
pub fn image_attachment(
    name: impl Into<String>,
    kind: impl Into<String>,
    bytes: &[u8],
) -> Result<NoteFile, AttachmentError> {
    let kind = kind.into();
    if !kind.starts_with("image/") {
        return Err(AttachmentError::UnsupportedType(kind));
    }
    ensure_accepted(&kind, bytes.len())?;
    let url = format!("data:{kind};base64,{}", Base64::encode_string(bytes));
    Ok(NoteFile {
        name: name.into(),
        kind,
        url: Some(url),
        content: None,
    })
}

/// Builds an attachment referencing an already-uploaded file by URL
/// (server-assisted mode).
pub fn linked_attachment(
    name: impl Into<String>,
    kind: impl Into<String>,
    url: impl Into<String>,
) -> Result<NoteFile, AttachmentError> {
    let kind = kind.into();
    ensure_accepted(&kind, 0)?;
    Ok(NoteFile {
        name: name.into(),
        kind,
        url: Some(url.into()),
        content: None,
    })
}

/// Builds a metadata-only attachment. No payload round-trips through the
/// store for these types (e.g. PDF).
pub fn metadata_attachment(
    name: impl Into<String>,
    kind: impl Into<String>,
) -> Result<NoteFile, AttachmentError> {
    let kind = kind.into();
    ensure_accepted(&kind, 0)?;
    Ok(NoteFile {
        name: name.into(),
        kind,
        url: None,
        content: None,
    })
}

/// Success response of the external upload collaborator.
///
/// The transport itself is out of scope here; only the resulting shape is
/// consumed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadOutcome {
    pub success: bool,
    pub url: String,
    pub filename: String,
    pub filetype: String,
}

impl UploadOutcome {
    /// Converts the collaborator's response into the attachment shape,
    /// re-checking the allowlist locally.
    pub fn into_note_file(self) -> Result<NoteFile, AttachmentError> {
        linked_attachment(self.filename, self.filetype, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        image_attachment, metadata_attachment, text_attachment, AttachmentError, UploadOutcome,
        MAX_ATTACHMENT_BYTES,
    };
    use base64ct::{Base64, Encoding};

    #[test]
    fn text_attachment_carries_inline_content() {
        let file = text_attachment("memo.txt", "hello").unwrap();
        assert_eq!(file.kind, "text/plain");
        assert_eq!(file.content.as_deref(), Some("hello"));
        assert!(file.url.is_none());
    }

    #[test]
    fn image_attachment_builds_decodable_data_uri() {
        let bytes = [0x89u8, 0x50, 0x4e, 0x47];
        let file = image_attachment("pic.png", "image/png", &bytes).unwrap();
        let url = file.url.expect("image payload travels as url");
        let payload = url
            .strip_prefix("data:image/png;base64,")
            .expect("data uri prefix");
        assert_eq!(Base64::decode_vec(payload).unwrap(), bytes);
        assert!(file.content.is_none());
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let bytes = vec![0u8; MAX_ATTACHMENT_BYTES + 1];
        let err = image_attachment("big.png", "image/png", &bytes).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { .. }));
    }

    #[test]
    fn disallowed_type_is_rejected() {
        let err = metadata_attachment("x.zip", "application/zip").unwrap_err();
        assert_eq!(
            err,
            AttachmentError::UnsupportedType("application/zip".to_string())
        );
        // image_attachment also refuses non-image MIME types outright.
        let err = image_attachment("x.txt", "text/plain", b"hi").unwrap_err();
        assert_eq!(err, AttachmentError::UnsupportedType("text/plain".to_string()));
    }

    #[test]
    fn upload_outcome_deserializes_and_converts() {
        let outcome: UploadOutcome = serde_json::from_str(
            r#"{"success":true,"url":"/uploads/abc.png","filename":"pic.png","filetype":"image/png"}"#,
        )
        .unwrap();
        assert!(outcome.success);
        let file = outcome.into_note_file().unwrap();
        assert_eq!(file.url.as_deref(), Some("/uploads/abc.png"));
        assert_eq!(file.kind, "image/png");
    }
}
