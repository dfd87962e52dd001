//! Note repository contract and key-value-backed implementation.
//!
//! # Responsibility
//! - Provide CRUD over the single flat note collection, scoped to the
//!   acting identity.
//! - Keep adapter key layout and collection (de)serialization details inside
//!   the persistence boundary.
//!
//! # Invariants
//! - All notes (all users) live in one ordered sequence under one key;
//!   per-user views are computed by filtering, never stored separately.
//! - A note owned by someone else is indistinguishable from a missing note.
//! - `user_id` is stamped from the acting identity and never merged from
//!   caller input.

use crate::model::note::{Note, NoteDraft, NoteId, NoteUpdate, NoteValidationError};
use crate::session::SessionStore;
use crate::storage::{KvStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed adapter key holding the serialized full note collection.
pub const NOTES_KEY: &str = "securenote-notes";

pub type NoteRepoResult<T> = Result<T, NoteRepoError>;

/// Failure raised by note repository operations.
#[derive(Debug)]
pub enum NoteRepoError {
    /// No identity is active; every operation fails closed.
    NotAuthenticated,
    /// Target id does not exist or is owned by another identity. The two
    /// cases are deliberately collapsed into one outcome.
    NotFound(NoteId),
    Validation(NoteValidationError),
    Storage(StoreError),
}

impl Display for NoteRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "no identity is active"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for NoteRepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for NoteRepoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Identity-scoped CRUD contract over the note collection.
pub trait NoteRepository {
    /// Lists the acting identity's notes in stored (insertion) order.
    /// Presentation ordering is the caller's concern.
    fn list_notes(&self) -> NoteRepoResult<Vec<Note>>;

    /// Gets one note by id, constrained to the acting identity.
    fn get_note(&self, id: NoteId) -> NoteRepoResult<Option<Note>>;

    /// Creates a note from a draft, stamping id, timestamp and owner.
    fn create_note(&self, draft: NoteDraft) -> NoteRepoResult<Note>;

    /// Merges a partial update into an owned note and refreshes its
    /// timestamp. A missing or foreign target leaves the collection
    /// untouched and reports [`NoteRepoError::NotFound`].
    fn update_note(&self, id: NoteId, update: NoteUpdate) -> NoteRepoResult<Note>;

    /// Removes an owned note. A missing or foreign target leaves the
    /// collection untouched and reports [`NoteRepoError::NotFound`].
    fn delete_note(&self, id: NoteId) -> NoteRepoResult<()>;
}

/// Repository over the key-value persistence adapter.
pub struct KvNoteRepository<'s> {
    store: &'s KvStore,
    session: &'s SessionStore<'s>,
}

impl<'s> KvNoteRepository<'s> {
    pub fn new(store: &'s KvStore, session: &'s SessionStore<'s>) -> Self {
        Self { store, session }
    }

    fn current_username(&self) -> NoteRepoResult<String> {
        self.session
            .current_identity()
            .map(|identity| identity.username)
            .ok_or(NoteRepoError::NotAuthenticated)
    }

    fn load_collection(&self) -> Vec<Note> {
        self.store.read(NOTES_KEY, Vec::new())
    }

    fn replace_collection(&self, notes: &[Note]) -> NoteRepoResult<()> {
        self.store.write(NOTES_KEY, &notes)?;
        Ok(())
    }
}

impl NoteRepository for KvNoteRepository<'_> {
    fn list_notes(&self) -> NoteRepoResult<Vec<Note>> {
        let username = self.current_username()?;
        Ok(self
            .load_collection()
            .into_iter()
            .filter(|note| note.is_owned_by(&username))
            .collect())
    }

    fn get_note(&self, id: NoteId) -> NoteRepoResult<Option<Note>> {
        let username = self.current_username()?;
        Ok(self
            .load_collection()
            .into_iter()
            .find(|note| note.id == id && note.is_owned_by(&username)))
    }

    fn create_note(&self, draft: NoteDraft) -> NoteRepoResult<Note> {
        let username = self.current_username()?;
        let note = Note::from_draft(draft, &username);
        note.validate()?;

        let mut notes = self.load_collection();
        notes.push(note.clone());
        self.replace_collection(&notes)?;

        info!(
            "event=note_create module=repo status=ok id={} user={username}",
            note.id
        );
        Ok(note)
    }

    fn update_note(&self, id: NoteId, update: NoteUpdate) -> NoteRepoResult<Note> {
        let username = self.current_username()?;
        let mut notes = self.load_collection();
        let position = notes
            .iter()
            .position(|note| note.id == id && note.is_owned_by(&username))
            .ok_or(NoteRepoError::NotFound(id))?;

        // Merge and validate on a copy so a rejected update leaves the
        // stored collection untouched.
        let mut merged = notes[position].clone();
        merged.apply_update(update);
        merged.validate()?;

        notes[position] = merged.clone();
        self.replace_collection(&notes)?;

        info!("event=note_update module=repo status=ok id={id} user={username}");
        Ok(merged)
    }

    fn delete_note(&self, id: NoteId) -> NoteRepoResult<()> {
        let username = self.current_username()?;
        let mut notes = self.load_collection();
        let position = notes
            .iter()
            .position(|note| note.id == id && note.is_owned_by(&username))
            .ok_or(NoteRepoError::NotFound(id))?;

        notes.remove(position);
        self.replace_collection(&notes)?;

        info!("event=note_delete module=repo status=ok id={id} user={username}");
        Ok(())
    }
}
