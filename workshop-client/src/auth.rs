//! Persisted debug identity.
//!
//! The store is a small JSON file with two string entries: `userId` and
//! `userRoles`, the latter holding a JSON-encoded array of role names. It is
//! read once at startup and turned into the client's debug identity. A broken
//! roles entry never fails startup, it just yields no roles.

use crate::error::AuthStoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_AUTH_FILE: &str = ".workshop_auth";

pub mod roles {
    pub const GUEST: &str = "GUEST";
    pub const USER: &str = "USER";
    pub const IMPERSONATOR: &str = "IMPERSONATOR";
    pub const POST_MODERATOR: &str = "POST_MODERATOR";
    pub const POST_CREATOR: &str = "POST_CREATOR";
}

/// Acting user and roles sent through the trusted debug headers. Only honored
/// by servers running with debug auth enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugIdentity {
    pub user_id: String,
    pub roles: Vec<String>,
}

impl DebugIdentity {
    pub fn new(user_id: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            roles,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user_id: String,
    pub user_roles: Vec<String>,
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        !self.user_id.is_empty()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.user_roles.iter().any(|r| r == role)
    }

    pub fn debug_identity(&self) -> Option<DebugIdentity> {
        self.is_logged_in()
            .then(|| DebugIdentity::new(self.user_id.clone(), self.user_roles.clone()))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredAuth {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(rename = "userRoles", default, skip_serializing_if = "Option::is_none")]
    user_roles: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthStore {
    path: PathBuf,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_FILE)
    }
}

impl AuthStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> AuthState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return AuthState::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read auth store");
                return AuthState::default();
            }
        };

        let stored: StoredAuth = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed auth store, ignoring");
                return AuthState::default();
            }
        };

        let user_roles: Vec<String> = match stored.user_roles.as_deref() {
            None => Vec::new(),
            Some(encoded) => serde_json::from_str(encoded).unwrap_or_else(|e| {
                warn!(error = %e, "malformed stored roles, resetting to none");
                Vec::new()
            }),
        };

        AuthState {
            user_id: stored.user_id.unwrap_or_default(),
            user_roles,
        }
    }

    pub fn save(&self, user_id: &str, roles: &[String]) -> Result<AuthState, AuthStoreError> {
        let stored = StoredAuth {
            user_id: Some(user_id.to_string()),
            user_roles: Some(serde_json::to_string(roles)?),
        };
        fs::write(&self.path, serde_json::to_string(&stored)?)?;

        Ok(AuthState {
            user_id: user_id.to_string(),
            user_roles: roles.to_vec(),
        })
    }

    pub fn clear(&self) -> Result<(), AuthStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> AuthStore {
        AuthStore::new(dir.path().join("auth.json"))
    }

    #[test]
    fn missing_file_is_logged_out() {
        let dir = TempDir::new().unwrap();
        let state = store(&dir).load();
        assert!(!state.is_logged_in());
        assert!(state.debug_identity().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let granted = vec![roles::USER.to_string(), roles::POST_MODERATOR.to_string()];
        store.save("u1", &granted).unwrap();

        let state = store.load();
        assert_eq!(state.user_id, "u1");
        assert!(state.has_role(roles::POST_MODERATOR));
        assert_eq!(
            state.debug_identity(),
            Some(DebugIdentity::new("u1", granted))
        );
    }

    #[test]
    fn malformed_roles_reset_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), r#"{"userId":"u1","userRoles":"[USER"}"#).unwrap();

        let state = store.load();
        assert_eq!(state.user_id, "u1");
        assert!(state.user_roles.is_empty());
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), "not json").unwrap();
        assert_eq!(store.load(), AuthState::default());
    }

    #[test]
    fn clear_removes_identity_and_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save("u1", &[]).unwrap();
        store.clear().unwrap();
        assert!(!store.load().is_logged_in());
        store.clear().unwrap();
    }
}
