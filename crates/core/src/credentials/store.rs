//! Credential persistence and lock/unlock semantics.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::{debug, warn};

use super::context::AuthContext;
use super::types::{Credentials, SessionType};

#[derive(Debug, Error)]
pub enum CredentialError {
    /// A required field was empty on save.
    #[error("credential field must not be empty: {0}")]
    EmptyField(&'static str),

    /// Save attempted while a credential set is already locked in.
    #[error("credentials are locked; logout before saving new values")]
    Locked,

    /// Persisting or removing the on-disk record failed.
    #[error("failed to persist credentials: {0}")]
    Persist(#[from] std::io::Error),
}

/// Holds the operator credential triple and gates the rest of the workflow.
///
/// The store is locked while credentials are present; every change to the
/// API key is mirrored into the shared [`AuthContext`] synchronously.
pub struct CredentialStore {
    path: PathBuf,
    auth: AuthContext,
    inner: RwLock<Option<Credentials>>,
}

impl CredentialStore {
    /// Create a store backed by `path`, restoring a previously persisted
    /// record if one is present and well-formed. Corrupt or incomplete
    /// records are treated as absent.
    pub fn new(path: impl Into<PathBuf>, auth: AuthContext) -> Self {
        let path = path.into();
        let restored = load_persisted(&path);

        if let Some(creds) = &restored {
            auth.set(&creds.api_key);
            debug!(terminal_code = %creds.terminal_code, "Restored persisted credentials");
        }

        Self {
            path,
            auth,
            inner: RwLock::new(restored),
        }
    }

    /// Whether a credential set is locked in.
    pub fn locked(&self) -> bool {
        self.inner.read().expect("credential lock poisoned").is_some()
    }

    /// Snapshot of the current credentials, if locked.
    pub fn credentials(&self) -> Option<Credentials> {
        self.inner.read().expect("credential lock poisoned").clone()
    }

    /// Save and lock a credential triple.
    ///
    /// Rejects empty fields and saves-while-locked without touching state.
    pub fn save(
        &self,
        api_key: &str,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<(), CredentialError> {
        if api_key.is_empty() {
            return Err(CredentialError::EmptyField("api_key"));
        }
        if terminal_code.is_empty() {
            return Err(CredentialError::EmptyField("terminal_code"));
        }

        let mut inner = self.inner.write().expect("credential lock poisoned");
        if inner.is_some() {
            return Err(CredentialError::Locked);
        }

        let creds = Credentials {
            api_key: api_key.to_string(),
            terminal_code: terminal_code.to_string(),
            session_type,
        };

        persist(&self.path, &creds)?;
        self.auth.set(&creds.api_key);
        *inner = Some(creds);

        Ok(())
    }

    /// Clear the credential set, unlock, and remove the persisted record.
    pub fn logout(&self) {
        let mut inner = self.inner.write().expect("credential lock poisoned");
        *inner = None;
        self.auth.clear();

        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed persisted credentials"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove credential file"),
        }
    }
}

fn load_persisted(path: &Path) -> Option<Credentials> {
    let raw = fs::read_to_string(path).ok()?;
    let creds: Credentials = match serde_json::from_str(&raw) {
        Ok(creds) => creds,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Ignoring malformed credential record");
            return None;
        }
    };

    if creds.api_key.is_empty() || creds.terminal_code.is_empty() {
        return None;
    }

    Some(creds)
}

fn persist(path: &Path, creds: &Credentials) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(creds).expect("credentials serialize");
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> (CredentialStore, AuthContext) {
        let auth = AuthContext::new();
        let store = CredentialStore::new(dir.path().join("credentials.json"), auth.clone());
        (store, auth)
    }

    #[test]
    fn test_starts_unlocked_without_record() {
        let dir = TempDir::new().unwrap();
        let (store, auth) = store_in(&dir);
        assert!(!store.locked());
        assert_eq!(auth.api_key(), None);
    }

    #[test]
    fn test_save_locks_and_sets_auth_header() {
        let dir = TempDir::new().unwrap();
        let (store, auth) = store_in(&dir);

        store.save("k1", "T1", SessionType::Stateless).unwrap();

        assert!(store.locked());
        assert_eq!(auth.api_key(), Some("k1".to_string()));
        let creds = store.credentials().unwrap();
        assert_eq!(creds.terminal_code, "T1");
    }

    #[test]
    fn test_save_rejects_empty_fields_without_state_change() {
        let dir = TempDir::new().unwrap();
        let (store, auth) = store_in(&dir);

        assert!(matches!(
            store.save("", "T1", SessionType::Stateless),
            Err(CredentialError::EmptyField("api_key"))
        ));
        assert!(matches!(
            store.save("k1", "", SessionType::Stateless),
            Err(CredentialError::EmptyField("terminal_code"))
        ));
        assert!(!store.locked());
        assert_eq!(auth.api_key(), None);
    }

    #[test]
    fn test_save_rejected_while_locked() {
        let dir = TempDir::new().unwrap();
        let (store, _auth) = store_in(&dir);

        store.save("k1", "T1", SessionType::Stateless).unwrap();
        let result = store.save("k2", "T2", SessionType::Stateful);

        assert!(matches!(result, Err(CredentialError::Locked)));
        assert_eq!(store.credentials().unwrap().api_key, "k1");
    }

    #[test]
    fn test_logout_clears_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let auth = AuthContext::new();
        let store = CredentialStore::new(&path, auth.clone());

        store.save("k1", "T1", SessionType::Stateful).unwrap();
        assert!(path.exists());

        store.logout();

        assert!(!store.locked());
        assert_eq!(auth.api_key(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_persisted_record_restores_locked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        {
            let store = CredentialStore::new(&path, AuthContext::new());
            store.save("k1", "T1", SessionType::Stateful).unwrap();
        }

        let auth = AuthContext::new();
        let store = CredentialStore::new(&path, auth.clone());
        assert!(store.locked());
        let creds = store.credentials().unwrap();
        assert_eq!(creds.api_key, "k1");
        assert_eq!(creds.session_type, SessionType::Stateful);
        assert_eq!(auth.api_key(), Some("k1".to_string()));
    }

    #[test]
    fn test_legacy_record_defaults_session_type() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"api_key":"k1","terminal_code":"T1"}"#).unwrap();

        let store = CredentialStore::new(&path, AuthContext::new());
        assert!(store.locked());
        assert_eq!(
            store.credentials().unwrap().session_type,
            SessionType::Stateless
        );
    }

    #[test]
    fn test_malformed_record_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = CredentialStore::new(&path, AuthContext::new());
        assert!(!store.locked());
    }

    #[test]
    fn test_record_with_empty_fields_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"api_key":"","terminal_code":"T1"}"#).unwrap();

        let store = CredentialStore::new(&path, AuthContext::new());
        assert!(!store.locked());
    }
}
