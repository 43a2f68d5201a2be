use std::sync::Arc;

use anyhow::Result;

use crate::auth::{password::decoy_hash, SessionKeys};
use crate::config::AuthConfig;
use crate::store::Store;

/// Shared handler state: the storage backend and the session signing keys.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: Arc<SessionKeys>,
    /// Stand-in password hash for logins with an unknown email.
    pub decoy_hash: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, auth: &AuthConfig) -> Result<Self> {
        Ok(AppState {
            store,
            sessions: Arc::new(SessionKeys::new(auth)),
            decoy_hash: Arc::from(decoy_hash()?),
        })
    }
}
