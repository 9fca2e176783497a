use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::backend::PrefsBackend;

/// Persisted record for the `login_prefs` namespace.
///
/// Field names double as the storage keys, so the on-disk schema is exactly
/// `logged_in` and `username`; an absent key reads as its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPrefs {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub username: String,
}

/// Durable login state: a logged-in flag and the display name to greet.
///
/// Writers normally go through `login`/`logout` so the flag and username
/// stay paired (a logged-out store never carries a stale name); the
/// individual setters exist for callers that need finer control. Every
/// write goes straight to the backend, so state survives restarts.
pub struct SessionStore {
    backend: Box<dyn PrefsBackend>,
    prefs: LoginPrefs,
}

impl SessionStore {
    /// Create a store over the given backend, reading any persisted state.
    /// An unreadable record reads as never-set rather than failing startup.
    pub fn new(backend: Box<dyn PrefsBackend>) -> Self {
        let prefs = match backend.load() {
            Ok(Some(prefs)) => prefs,
            Ok(None) => LoginPrefs::default(),
            Err(err) => {
                warn!(error = %err, "Failed to load login prefs, starting logged out");
                LoginPrefs::default()
            }
        };

        Self { backend, prefs }
    }

    pub fn is_logged_in(&self) -> bool {
        self.prefs.logged_in
    }

    pub fn username(&self) -> &str {
        &self.prefs.username
    }

    pub fn set_logged_in(&mut self, value: bool) -> Result<()> {
        self.prefs.logged_in = value;
        self.backend.store(&self.prefs)
    }

    pub fn set_username(&mut self, value: &str) -> Result<()> {
        self.prefs.username = value.to_string();
        self.backend.store(&self.prefs)
    }

    /// Record a successful login for `username`
    pub fn login(&mut self, username: &str) -> Result<()> {
        self.prefs.logged_in = true;
        self.prefs.username = username.to_string();
        debug!(username, "Session stored");
        self.backend.store(&self.prefs)
    }

    /// Clear the session, resetting the username along with the flag
    pub fn logout(&mut self) -> Result<()> {
        self.prefs = LoginPrefs::default();
        debug!("Session cleared");
        self.backend.store(&self.prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::backend::MemoryPrefs;

    fn memory_store() -> SessionStore {
        SessionStore::new(Box::new(MemoryPrefs::default()))
    }

    #[test]
    fn test_defaults_when_never_set() {
        let store = memory_store();
        assert!(!store.is_logged_in());
        assert_eq!(store.username(), "");
    }

    #[test]
    fn test_login_sets_flag_and_username() {
        let mut store = memory_store();
        store.login("alice").expect("login");
        assert!(store.is_logged_in());
        assert_eq!(store.username(), "alice");
    }

    #[test]
    fn test_logout_clears_both_fields() {
        let mut store = memory_store();
        store.login("alice").expect("login");
        store.logout().expect("logout");
        assert!(!store.is_logged_in());
        assert_eq!(store.username(), "");
    }

    #[test]
    fn test_individual_setters() {
        let mut store = memory_store();
        store.set_logged_in(true).expect("set flag");
        store.set_username("bob").expect("set username");
        assert!(store.is_logged_in());
        assert_eq!(store.username(), "bob");
    }

    #[test]
    fn test_missing_keys_read_as_defaults() {
        let prefs: LoginPrefs = serde_json::from_str("{}").expect("parse empty record");
        assert!(!prefs.logged_in);
        assert_eq!(prefs.username, "");

        let prefs: LoginPrefs =
            serde_json::from_str(r#"{"logged_in": true}"#).expect("parse partial record");
        assert!(prefs.logged_in);
        assert_eq!(prefs.username, "");
    }
}
