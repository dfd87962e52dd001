//! Identity domain model.
//!
//! # Responsibility
//! - Define the locally-asserted acting user.
//! - Model the three-valued resolution state of the persisted identity record.
//!
//! # Invariants
//! - An identity carries a username only; there is no credential material.
//! - `IdentityState::Unknown` is only observable before the first storage
//!   read resolves.

use serde::{Deserialize, Serialize};

/// Locally-asserted acting user.
///
/// "Login" is the local assignment of a username; there is no server-side
/// validation and no password. Length rules (>= 3 chars) are enforced by the
/// calling layer before this record is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Resolution state of the persisted identity record.
///
/// Distinguishes "storage not consulted yet" from "consulted, nobody logged
/// in" so callers never have to overload a sentinel value for both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    /// Storage has not been consulted yet.
    Unknown,
    /// Storage was consulted and holds no identity.
    Absent,
    /// Storage was consulted and holds this identity.
    Present(Identity),
}

impl IdentityState {
    /// Returns the resolved identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Present(identity) => Some(identity),
            _ => None,
        }
    }

    /// Returns whether storage has been consulted at least once.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::{Identity, IdentityState};

    #[test]
    fn present_state_exposes_identity() {
        let state = IdentityState::Present(Identity::new("alice"));
        assert_eq!(state.identity().map(|id| id.username.as_str()), Some("alice"));
        assert!(state.is_resolved());
    }

    #[test]
    fn unknown_state_is_unresolved() {
        assert!(!IdentityState::Unknown.is_resolved());
        assert!(IdentityState::Unknown.identity().is_none());
        assert!(IdentityState::Absent.is_resolved());
    }
}
