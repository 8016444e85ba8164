//! Operator credential management.
//!
//! Holds the API key / terminal code / session type triple, persists it as a
//! single JSON record on disk, and mirrors the API key into the shared
//! [`AuthContext`] read by the HTTP client. All other components treat the
//! store as the single writer of outbound authentication state.

mod context;
mod store;
mod types;

pub use context::AuthContext;
pub use store::{CredentialError, CredentialStore};
pub use types::{Credentials, SessionType};
