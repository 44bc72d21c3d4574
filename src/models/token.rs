// SPDX-License-Identifier: MIT

//! Persisted access token record.

use serde::{Deserialize, Serialize};

/// Access token cached on disk between refreshes.
///
/// Overwritten unconditionally on every real login; never deleted, a
/// stale record is simply superseded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Username the token was issued for
    pub username: String,
    /// Bearer token for the agenda API
    pub access_token: String,
    /// Token lifetime in seconds, as announced by the login endpoint
    pub expires_in: i64,
    /// Issuance instant, seconds since epoch
    pub timestamp: i64,
}

impl TokenRecord {
    /// Whether this record can still be used for `username` at instant
    /// `now` (seconds since epoch).
    pub fn is_valid(&self, username: &str, now: i64) -> bool {
        self.username == username && now - self.timestamp < self.expires_in
    }
}
