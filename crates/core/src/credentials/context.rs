use std::sync::{Arc, RwLock};

/// Shared outbound-request authentication state.
///
/// The API key carried by every outgoing request. Only the
/// [`CredentialStore`](super::CredentialStore) writes it; the HTTP client
/// reads it when building a request. Modeled as an explicit handle rather
/// than a process global so the client stays testable.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    key: Arc<RwLock<Option<String>>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current API key, if any.
    pub fn api_key(&self) -> Option<String> {
        self.key.read().expect("auth context lock poisoned").clone()
    }

    pub(super) fn set(&self, api_key: &str) {
        let mut key = self.key.write().expect("auth context lock poisoned");
        if api_key.is_empty() {
            *key = None;
        } else {
            *key = Some(api_key.to_string());
        }
    }

    pub(super) fn clear(&self) {
        *self.key.write().expect("auth context lock poisoned") = None;
    }
}
