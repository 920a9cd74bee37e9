use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A pending verification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpEntry {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
}

impl OtpEntry {
    /// Fresh entry expiring `ttl` after `now`. A TTL too large to represent
    /// saturates at the maximum timestamp.
    pub fn new(code: impl Into<String>, ttl: Duration, now: DateTime<Utc>) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            code: code.into(),
            expires_at,
            attempts: 0,
        }
    }

    /// Verifier rule: the entry is dead from `expires_at` onward.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
