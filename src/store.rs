//! Session token store
//!
//! Owns the admin bearer token and its expiry. State lives in an injected
//! [`KeyValueStore`] under four string keys and time comes from an injected
//! [`Clock`], so tests can run against an in-memory backend and a fixed clock.
//!
//! Expiry is checked lazily: [`TokenStore::get_token`] and
//! [`TokenStore::get_user`] clear every persisted key when they find the
//! session expired, so a read can have a write side effect.
//!
//! Only [`TokenStore::set_auth`] reports storage failures. Every read path
//! treats a backend failure as "not authenticated".

use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "authToken";
pub const USERNAME_KEY: &str = "username";
pub const USER_ID_KEY: &str = "userId";
pub const EXPIRY_KEY: &str = "tokenExpiry";

const ALL_KEYS: [&str; 4] = [TOKEN_KEY, USERNAME_KEY, USER_ID_KEY, EXPIRY_KEY];

/// Session lifetime, in milliseconds
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Credential returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

/// Identity of the logged-in admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub username: String,
    pub user_id: i64,
}

/// Token store backed by a key-value store
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl TokenStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(backend, Arc::new(DefaultClock))
    }

    pub fn with_clock(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { backend, clock }
    }

    /// Persist a new session, replacing any previous one in a single write.
    /// The expiry is `now + 24h`.
    pub fn set_auth(&self, credential: &Credential) -> Result<()> {
        let expires_at = self.now_ms() + SESSION_TTL_MS;
        self.backend.set_many(&[
            (TOKEN_KEY, credential.token.clone()),
            (USERNAME_KEY, credential.username.clone()),
            (USER_ID_KEY, credential.user_id.to_string()),
            (EXPIRY_KEY, expires_at.to_string()),
        ])?;
        debug!(username = %credential.username, expires_at, "session stored");
        Ok(())
    }

    /// Stored token, or `None` when absent or expired.
    ///
    /// An expired session is cleared before returning.
    pub fn get_token(&self) -> Option<String> {
        if self.is_token_expired() {
            self.clear_auth();
            return None;
        }
        self.read(TOKEN_KEY)
    }

    /// Stored identity, or `None` when absent, malformed or expired.
    ///
    /// An expired session is cleared before returning.
    pub fn get_user(&self) -> Option<SessionUser> {
        if self.is_token_expired() {
            self.clear_auth();
            return None;
        }
        let username = self.read(USERNAME_KEY)?;
        let user_id = self.read(USER_ID_KEY)?.parse().ok()?;
        Some(SessionUser { username, user_id })
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// True when the stored expiry has passed, or when no expiry is stored
    pub fn is_token_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires_at) => self.now_ms() >= expires_at,
            None => true,
        }
    }

    /// Remove every session key. Never fails.
    pub fn clear_auth(&self) {
        if let Err(e) = self.backend.remove_many(&ALL_KEYS) {
            warn!(error = %e, "failed to clear session storage");
        }
    }

    /// Milliseconds until expiry, floored at zero
    pub fn get_token_remaining_time(&self) -> u64 {
        self.expires_at()
            .map(|expires_at| expires_at.saturating_sub(self.now_ms()).max(0))
            .and_then(|remaining| u64::try_from(remaining).ok())
            .unwrap_or(0)
    }

    /// Slide the expiry to `now + 24h` for a live session. The token itself
    /// is left untouched.
    pub fn refresh_token_expiry(&self) {
        if !self.is_authenticated() {
            return;
        }
        let expires_at = self.now_ms() + SESSION_TTL_MS;
        if let Err(e) = self.backend.set(EXPIRY_KEY, &expires_at.to_string()) {
            warn!(error = %e, "failed to extend session expiry");
        }
    }

    fn expires_at(&self) -> Option<i64> {
        self.read(EXPIRY_KEY)?.parse().ok()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "session storage read failed, treating as logged out");
                None
            }
        }
    }

    fn now_ms(&self) -> i64 {
        self.clock.utc().timestamp_millis()
    }
}
