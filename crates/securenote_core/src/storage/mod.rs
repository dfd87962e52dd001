//! Storage medium abstraction and persistence adapter.
//!
//! # Responsibility
//! - Define the synchronous, string-keyed, string-valued medium contract all
//!   durability goes through.
//! - Keep backend details (SQLite bootstrap, schema migrations) behind the
//!   medium boundary.
//!
//! # Invariants
//! - Media store raw strings only; serialization lives in the adapter.
//! - A medium failure must never panic the caller; it surfaces as a
//!   `StorageError` value.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod adapter;
pub mod memory;
pub mod migrations;
mod sqlite;

pub use adapter::{KvStore, StoreError};
pub use memory::MemoryMedium;
pub use sqlite::{open_store, open_store_in_memory, SqliteMedium};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by a storage medium.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Non-SQLite backend failure (quota, I/O, unavailable medium).
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "storage schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Synchronous string-keyed, string-valued storage medium.
///
/// The durable analog of a browser's local storage: no typing, no
/// transactions across keys, no concurrent writers.
pub trait StorageMedium {
    /// Returns the raw value stored at `key`, if any.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` at `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
}
