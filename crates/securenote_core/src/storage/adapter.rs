//! Typed key-value persistence adapter.
//!
//! # Responsibility
//! - Provide typed JSON read/write over a raw [`StorageMedium`].
//! - Contain read-path failures: a corrupt or unreadable value falls back to
//!   the caller's initial value, logged as a warning, never an error.
//! - Keep an in-memory mirror so the running session stays consistent even
//!   when the medium rejects a write or is absent entirely.
//!
//! # Invariants
//! - `read` never fails.
//! - A failed or detached `write` still updates the mirror before returning.
//! - The mirror holds the latest in-session value for every written key and
//!   takes precedence over the medium on read.

use super::{StorageError, StorageMedium};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure raised by the adapter's write path.
#[derive(Debug)]
pub enum StoreError {
    /// The value could not be serialized; nothing was stored.
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    /// The medium rejected the write; the mirror kept the new value, so the
    /// session stays consistent but the value will not survive a restart.
    Write { key: String, source: StorageError },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize { key, source } => {
                write!(f, "failed to serialize value for key `{key}`: {source}")
            }
            Self::Write { key, source } => {
                write!(f, "failed to persist key `{key}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
        }
    }
}

/// Persistence adapter over an optional storage medium.
///
/// Single-threaded by design: interior mutability is plain `RefCell`, no
/// locking, no transactions across keys.
pub struct KvStore {
    medium: Option<RefCell<Box<dyn StorageMedium>>>,
    mirror: RefCell<HashMap<String, String>>,
}

impl KvStore {
    /// Builds an adapter over a durable medium.
    pub fn new(medium: Box<dyn StorageMedium>) -> Self {
        Self {
            medium: Some(RefCell::new(medium)),
            mirror: RefCell::new(HashMap::new()),
        }
    }

    /// Builds an adapter with no medium attached.
    ///
    /// Reads serve mirror-or-initial values and writes update only the
    /// mirror. Mirrors the pre-mount state of a server-rendered client where
    /// the storage medium is not available yet.
    pub fn detached() -> Self {
        Self {
            medium: None,
            mirror: RefCell::new(HashMap::new()),
        }
    }

    pub fn is_detached(&self) -> bool {
        self.medium.is_none()
    }

    /// Reads the value at `key`, falling back to `initial`.
    ///
    /// Fallback cases: key absent, medium absent, medium read failure,
    /// deserialization failure. Failures are logged as warnings and contained
    /// here; this method has no error path.
    pub fn read<T: DeserializeOwned>(&self, key: &str, initial: T) -> T {
        if let Some(raw) = self.mirror.borrow().get(key) {
            match serde_json::from_str(raw) {
                Ok(value) => return value,
                Err(err) => {
                    warn!("event=kv_read module=storage status=fallback key={key} source=mirror error={err}");
                    return initial;
                }
            }
        }

        let Some(medium) = &self.medium else {
            return initial;
        };

        match medium.borrow().get_item(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!("event=kv_read module=storage status=fallback key={key} source=medium error={err}");
                    initial
                }
            },
            Ok(None) => initial,
            Err(err) => {
                warn!("event=kv_read module=storage status=fallback key={key} source=medium error={err}");
                initial
            }
        }
    }

    /// Serializes `value` and stores it at `key`.
    ///
    /// The mirror is updated before the medium is touched, so a rejected
    /// write leaves the running session on the new value. Callers may
    /// surface the returned error or swallow it.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.mirror.borrow_mut().insert(key.to_string(), raw.clone());

        let Some(medium) = &self.medium else {
            warn!("event=kv_write module=storage status=detached key={key} detail=value_kept_in_memory_only");
            return Ok(());
        };

        medium.borrow_mut().set_item(key, &raw).map_err(|source| {
            warn!("event=kv_write module=storage status=error key={key} error={source} detail=value_kept_in_memory_only");
            StoreError::Write {
                key: key.to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{KvStore, StoreError};
    use crate::storage::{MemoryMedium, StorageError, StorageMedium, StorageResult};

    struct RejectingMedium;

    impl StorageMedium for RejectingMedium {
        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }
    }

    #[test]
    fn read_missing_key_returns_initial() {
        let store = KvStore::new(Box::new(MemoryMedium::new()));
        assert_eq!(store.read::<u32>("counter", 7), 7);
    }

    #[test]
    fn read_corrupt_value_returns_initial() {
        let mut medium = MemoryMedium::new();
        medium.set_item("counter", "{not json").unwrap();
        let store = KvStore::new(Box::new(medium));
        assert_eq!(store.read::<u32>("counter", 7), 7);
    }

    #[test]
    fn write_then_read_roundtrips() {
        let store = KvStore::new(Box::new(MemoryMedium::new()));
        store.write("names", &vec!["a".to_string()]).unwrap();
        assert_eq!(
            store.read::<Vec<String>>("names", Vec::new()),
            vec!["a".to_string()]
        );
    }

    #[test]
    fn rejected_write_keeps_value_in_mirror() {
        let store = KvStore::new(Box::new(RejectingMedium));
        let err = store.write("counter", &42u32).unwrap_err();
        assert!(matches!(err, StoreError::Write { ref key, .. } if key == "counter"));
        // The session still observes the new value.
        assert_eq!(store.read::<u32>("counter", 0), 42);
    }

    #[test]
    fn detached_write_succeeds_in_memory_only() {
        let store = KvStore::detached();
        assert!(store.is_detached());
        store.write("counter", &1u32).unwrap();
        assert_eq!(store.read::<u32>("counter", 0), 1);
    }
}
