//! Session/identity store.
//!
//! # Responsibility
//! - Hold the current logged-in identity, backed by the persistence adapter
//!   under a fixed key.
//! - Expose login/logout mutations and the three-valued resolution state.
//!
//! # Invariants
//! - `IdentityState::Unknown` is only observable before the first read.
//! - Login/logout update the in-memory state even when persistence fails;
//!   the failure is recoverable and only costs durability across restarts.
//! - Logging out never touches the note collection.

use crate::model::identity::{Identity, IdentityState};
use crate::storage::{KvStore, StoreError};
use log::info;
use std::cell::RefCell;

/// Fixed adapter key holding the serialized identity record.
pub const IDENTITY_KEY: &str = "securenote-user";

/// Store for the locally-asserted acting user.
pub struct SessionStore<'s> {
    store: &'s KvStore,
    state: RefCell<IdentityState>,
}

impl<'s> SessionStore<'s> {
    /// Creates a session store over the given adapter. The persisted identity
    /// is not consulted until the first [`current`](Self::current) call.
    pub fn new(store: &'s KvStore) -> Self {
        Self {
            store,
            state: RefCell::new(IdentityState::Unknown),
        }
    }

    /// Returns the current identity state, resolving it from storage on the
    /// first call.
    pub fn current(&self) -> IdentityState {
        if !self.state.borrow().is_resolved() {
            let resolved = match self.store.read::<Option<Identity>>(IDENTITY_KEY, None) {
                Some(identity) => IdentityState::Present(identity),
                None => IdentityState::Absent,
            };
            *self.state.borrow_mut() = resolved;
        }
        self.state.borrow().clone()
    }

    /// Convenience accessor for the resolved identity.
    pub fn current_identity(&self) -> Option<Identity> {
        self.current().identity().cloned()
    }

    /// Returns whether the identity is still unresolved. True only before
    /// the first read completes.
    pub fn is_loading(&self) -> bool {
        !self.state.borrow().is_resolved()
    }

    /// Asserts `username` as the acting identity and persists it.
    ///
    /// The in-memory state is updated first; a persistence failure is
    /// returned for optional surfacing but leaves the login effective for
    /// this session.
    pub fn login(&self, username: impl Into<String>) -> Result<(), StoreError> {
        let identity = Identity::new(username);
        info!(
            "event=session_login module=session status=ok username={}",
            identity.username
        );
        *self.state.borrow_mut() = IdentityState::Present(identity.clone());
        self.store.write(IDENTITY_KEY, &Some(identity))
    }

    /// Clears the acting identity and persists the absence.
    ///
    /// Same failure semantics as [`login`](Self::login).
    pub fn logout(&self) -> Result<(), StoreError> {
        info!("event=session_logout module=session status=ok");
        *self.state.borrow_mut() = IdentityState::Absent;
        self.store.write(IDENTITY_KEY, &None::<Identity>)
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionStore, IDENTITY_KEY};
    use crate::model::identity::IdentityState;
    use crate::storage::{KvStore, MemoryMedium};

    #[test]
    fn state_is_unknown_until_first_read() {
        let store = KvStore::new(Box::new(MemoryMedium::new()));
        let session = SessionStore::new(&store);

        assert!(session.is_loading());
        assert_eq!(session.current(), IdentityState::Absent);
        assert!(!session.is_loading());
    }

    #[test]
    fn login_writes_identity_under_fixed_key() {
        let store = KvStore::new(Box::new(MemoryMedium::new()));
        let session = SessionStore::new(&store);

        session.login("alice").unwrap();
        assert_eq!(
            session.current_identity().map(|id| id.username),
            Some("alice".to_string())
        );

        // A fresh session over the same adapter resolves the persisted record.
        let other = SessionStore::new(&store);
        assert_eq!(
            other.current_identity().map(|id| id.username),
            Some("alice".to_string())
        );
        assert_eq!(store.read::<serde_json::Value>(IDENTITY_KEY, serde_json::Value::Null)["username"], "alice");
    }

    #[test]
    fn logout_resolves_to_absent() {
        let store = KvStore::new(Box::new(MemoryMedium::new()));
        let session = SessionStore::new(&store);

        session.login("alice").unwrap();
        session.logout().unwrap();
        assert_eq!(session.current(), IdentityState::Absent);

        let other = SessionStore::new(&store);
        assert_eq!(other.current(), IdentityState::Absent);
    }
}
