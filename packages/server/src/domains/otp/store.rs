//! In-memory store of pending verification codes.
//!
//! One entry per normalized (email, phone) key. Nothing is persisted; the
//! store lives as long as the server process. Expiry is judged by callers
//! (see [`OtpEntry::is_expired_at`]); [`OtpStore::cleanup_expired`] reclaims
//! memory for keys that are never touched again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domains::otp::models::{OtpEntry, OtpKey};

#[derive(Clone, Default)]
pub struct OtpStore {
    entries: Arc<RwLock<HashMap<OtpKey, OtpEntry>>>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a fresh entry, replacing any previous one for the same key.
    pub async fn put(
        &self,
        email: &str,
        phone: &str,
        code: impl Into<String>,
        ttl: Duration,
    ) -> OtpKey {
        let key = OtpKey::new(email, phone);
        self.put_key(&key, code, ttl).await;
        key
    }

    pub async fn put_key(&self, key: &OtpKey, code: impl Into<String>, ttl: Duration) -> OtpEntry {
        let entry = OtpEntry::new(code, ttl, Utc::now());
        let mut entries = self.entries.write().await;
        entries.insert(key.clone(), entry.clone());
        entry
    }

    /// Look up an entry. Expired entries are returned as-is.
    pub async fn get(&self, email: &str, phone: &str) -> Option<OtpEntry> {
        self.get_key(&OtpKey::new(email, phone)).await
    }

    pub async fn get_key(&self, key: &OtpKey) -> Option<OtpEntry> {
        let entries = self.entries.read().await;
        entries.get(key).cloned()
    }

    /// Remove an entry. No-op when absent.
    pub async fn delete(&self, email: &str, phone: &str) {
        self.delete_key(&OtpKey::new(email, phone)).await;
    }

    pub async fn delete_key(&self, key: &OtpKey) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }

    /// Read-modify-write of a single key under the write lock.
    ///
    /// `f` receives the current entry (if any) and returns the entry to keep
    /// (`None` removes it) plus a value handed back to the caller. No other
    /// store operation can interleave with `f`.
    pub async fn update<R, F>(&self, key: &OtpKey, f: F) -> R
    where
        F: FnOnce(Option<OtpEntry>) -> (Option<OtpEntry>, R),
    {
        let mut entries = self.entries.write().await;
        let current = entries.remove(key);
        let (next, result) = f(current);
        if let Some(next) = next {
            entries.insert(key.clone(), next);
        }
        result
    }

    /// Drop every expired entry, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    /// Physically present entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_put_then_get() {
        let store = OtpStore::new();
        store.put("x@y.com", "9999999999", "482913", TTL).await;

        let entry = store.get("x@y.com", "9999999999").await.unwrap();
        assert_eq!(entry.code, "482913");
        assert_eq!(entry.attempts, 0);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = OtpStore::new();
        assert!(store.get("x@y.com", "1").await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_and_resets_attempts() {
        let store = OtpStore::new();
        let key = store.put("x@y.com", "1", "111111", TTL).await;
        store
            .update(&key, |entry| {
                let mut entry = entry.unwrap();
                entry.attempts = 3;
                (Some(entry), ())
            })
            .await;

        store.put("X@Y.COM", " 1 ", "222222", TTL).await;

        let entry = store.get_key(&key).await.unwrap();
        assert_eq!(entry.code, "222222");
        assert_eq!(entry.attempts, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_does_not_apply_expiry() {
        let store = OtpStore::new();
        store.put("x@y.com", "1", "123456", Duration::from_millis(1)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let entry = store.get("x@y.com", "1").await;
        assert!(entry.is_some(), "get must not hide expired entries");
        assert!(entry.unwrap().is_expired_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = OtpStore::new();
        store.put("x@y.com", "1", "123456", TTL).await;

        store.delete("x@y.com", "1").await;
        store.delete("x@y.com", "1").await;

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_can_remove() {
        let store = OtpStore::new();
        let key = store.put("x@y.com", "1", "123456", TTL).await;

        let seen = store.update(&key, |entry| (None, entry.is_some())).await;

        assert!(seen);
        assert!(store.get_key(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_cleanup_expired_only_removes_expired() {
        let store = OtpStore::new();
        store.put("old@y.com", "1", "111111", Duration::from_millis(1)).await;
        store.put("new@y.com", "2", "222222", TTL).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let removed = store.cleanup_expired().await;

        assert_eq!(removed, 1);
        assert!(store.get("old@y.com", "1").await.is_none());
        assert!(store.get("new@y.com", "2").await.is_some());
    }

    #[tokio::test]
    async fn test_independent_instances_do_not_share_state() {
        let a = OtpStore::new();
        let b = OtpStore::new();
        a.put("x@y.com", "1", "123456", TTL).await;

        assert!(b.get("x@y.com", "1").await.is_none());
    }
}
