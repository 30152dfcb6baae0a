//! Debounced, timestamped session snapshots
//!
//! Every value is written as an envelope `{saved_at, data}` under
//! `<prefix>:<name>`. Reads treat snapshots older than the max age, and
//! snapshots that no longer parse, as absent and delete them. Scheduled
//! writes coalesce per key: only the last value scheduled within the
//! debounce window reaches the store.

use super::traits::{SessionStore, StorageResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(450);
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    saved_at: DateTime<Utc>,
    data: T,
}

struct PendingWrite {
    generation: u64,
    data: serde_json::Value,
}

/// Reader/writer for engine configuration snapshots.
///
/// Cloning is cheap and clones share the pending-write table.
#[derive(Clone)]
pub struct SessionPersistence {
    store: Arc<dyn SessionStore>,
    prefix: String,
    debounce: Duration,
    max_age: Duration,
    pending: Arc<Mutex<HashMap<String, PendingWrite>>>,
    generation: Arc<AtomicU64>,
}

impl fmt::Debug for SessionPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPersistence")
            .field("prefix", &self.prefix)
            .field("debounce", &self.debounce)
            .field("max_age", &self.max_age)
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl SessionPersistence {
    pub fn new(store: Arc<dyn SessionStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            debounce: DEFAULT_DEBOUNCE,
            max_age: DEFAULT_MAX_AGE,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full store key for a snapshot name
    pub fn key(&self, name: &str) -> String {
        format!("{}:{}", self.prefix, name)
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Read a snapshot.
    ///
    /// Missing, expired and malformed snapshots all yield `None`; the latter
    /// two are removed from the store.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let key = self.key(name);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read session snapshot");
                return None;
            }
        };

        let envelope: Envelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(key = %key, error = %e, "discarding malformed session snapshot");
                self.discard(&key);
                return None;
            }
        };

        // A timestamp in the future has a negative age and counts as fresh.
        if let Ok(age) = Utc::now().signed_duration_since(envelope.saved_at).to_std() {
            if age > self.max_age {
                debug!(key = %key, age_secs = age.as_secs(), "discarding expired session snapshot");
                self.discard(&key);
                return None;
            }
        }

        Some(envelope.data)
    }

    /// Queue a write. Fire-and-forget: failures are logged, never returned.
    ///
    /// Inside a tokio runtime the write happens after the debounce period,
    /// and only if no newer value was scheduled for the same key meanwhile.
    /// Outside a runtime it is written immediately.
    pub fn schedule<T: Serialize>(&self, name: &str, value: &T) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(e) => {
                warn!(snapshot = name, error = %e, "failed to serialize session snapshot");
                return;
            }
        };
        let key = self.key(name);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending()
            .insert(key.clone(), PendingWrite { generation, data });

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let this = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(this.debounce).await;
                    this.write_if_current(&key, generation);
                });
            }
            Err(_) => self.write_if_current(&key, generation),
        }
    }

    /// Write a snapshot right away, superseding any pending write for it
    pub fn save_now<T: Serialize>(&self, name: &str, value: &T) -> StorageResult<()> {
        let key = self.key(name);
        self.pending().remove(&key);
        let data = serde_json::to_value(value)?;
        self.write(&key, data)
    }

    /// Write every pending snapshot now. Returns how many were written.
    pub fn flush(&self) -> usize {
        let drained: Vec<(String, PendingWrite)> = self.pending().drain().collect();
        let mut written = 0;
        for (key, write) in drained {
            match self.write(&key, write.data) {
                Ok(()) => written += 1,
                Err(e) => warn!(key = %key, error = %e, "failed to write session snapshot"),
            }
        }
        written
    }

    pub fn pending_count(&self) -> usize {
        self.pending().len()
    }

    /// Drop pending writes and remove every key under the prefix.
    /// Returns the number of keys removed.
    pub fn clear(&self) -> StorageResult<usize> {
        self.pending().clear();
        let mut removed = 0;
        for key in self.store.keys(&format!("{}:", self.prefix))? {
            if self.store.remove(&key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn write_if_current(&self, key: &str, generation: u64) {
        let data = {
            let mut pending = self.pending();
            let current = pending
                .get(key)
                .is_some_and(|write| write.generation == generation);
            if current {
                pending.remove(key).map(|write| write.data)
            } else {
                None
            }
        };
        if let Some(data) = data {
            if let Err(e) = self.write(key, data) {
                warn!(key = %key, error = %e, "failed to write session snapshot");
            }
        }
    }

    fn write(&self, key: &str, data: serde_json::Value) -> StorageResult<()> {
        let envelope = Envelope {
            saved_at: Utc::now(),
            data,
        };
        let raw = serde_json::to_string(&envelope)?;
        self.store.set(key, &raw)?;
        debug!(key = %key, "session snapshot written");
        Ok(())
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key = %key, error = %e, "failed to remove session snapshot");
        }
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<String, PendingWrite>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemorySessionStore, StorageError};
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    /// Counts writes on top of a memory store
    #[derive(Default)]
    struct CountingStore {
        inner: MemorySessionStore,
        writes: AtomicUsize,
    }

    impl SessionStore for CountingStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> StorageResult<bool> {
            self.inner.remove(key)
        }
        fn keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
            self.inner.keys(prefix)
        }
    }

    struct FailingStore;

    impl SessionStore for FailingStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        }
        fn remove(&self, _key: &str) -> StorageResult<bool> {
            Ok(false)
        }
        fn keys(&self, _prefix: &str) -> StorageResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn memory() -> (Arc<MemorySessionStore>, SessionPersistence) {
        let store = Arc::new(MemorySessionStore::new());
        let persistence = SessionPersistence::new(store.clone(), "inspector");
        (store, persistence)
    }

    #[test]
    fn save_and_load() {
        let (store, persistence) = memory();
        persistence.save_now("score_column", &"val_score").unwrap();

        assert!(store.get("inspector:score_column").unwrap().is_some());
        assert_eq!(
            persistence.load::<String>("score_column").as_deref(),
            Some("val_score")
        );
        assert_eq!(persistence.load::<String>("missing"), None);
    }

    #[test]
    fn malformed_snapshot_is_discarded() {
        let (store, persistence) = memory();
        store.set("inspector:filters", "{not json").unwrap();
        assert_eq!(persistence.load::<serde_json::Value>("filters"), None);
        assert!(store.get("inspector:filters").unwrap().is_none());

        // Valid JSON with the wrong shape is discarded too
        let envelope = json!({"saved_at": Utc::now(), "data": {"unexpected": true}});
        store
            .set("inspector:score_column", &envelope.to_string())
            .unwrap();
        assert_eq!(persistence.load::<String>("score_column"), None);
        assert!(store.get("inspector:score_column").unwrap().is_none());
    }

    #[test]
    fn expired_snapshot_is_discarded() {
        let (store, persistence) = memory();
        let stale = Utc::now() - chrono::Duration::hours(25);
        let envelope = json!({"saved_at": stale, "data": "cv_score"});
        store
            .set("inspector:score_column", &envelope.to_string())
            .unwrap();

        assert_eq!(persistence.load::<String>("score_column"), None);
        assert!(store.get("inspector:score_column").unwrap().is_none());
    }

    #[test]
    fn max_age_is_configurable() {
        let (store, persistence) = memory();
        let persistence = persistence.with_max_age(Duration::from_secs(60));
        let envelope = json!({"saved_at": Utc::now() - chrono::Duration::minutes(5), "data": 1});
        store.set("inspector:n", &envelope.to_string()).unwrap();
        assert_eq!(persistence.load::<i32>("n"), None);
    }

    #[test]
    fn schedule_without_runtime_writes_immediately() {
        let (_, persistence) = memory();
        persistence.schedule("score_column", &"r2");
        assert_eq!(persistence.pending_count(), 0);
        assert_eq!(persistence.load::<String>("score_column").as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn scheduled_writes_coalesce() {
        let store = Arc::new(CountingStore::default());
        let persistence = SessionPersistence::new(store.clone(), "inspector")
            .with_debounce(Duration::from_millis(20));

        persistence.schedule("score_column", &"a");
        persistence.schedule("score_column", &"b");
        persistence.schedule("score_column", &"c");
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(persistence.load::<String>("score_column").as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn flush_writes_pending_snapshots() {
        let store = Arc::new(CountingStore::default());
        let persistence = SessionPersistence::new(store.clone(), "inspector")
            .with_debounce(Duration::from_secs(60));

        persistence.schedule("filters", &json!({"outlier": "hide"}));
        persistence.schedule("grouping", &json!(null));
        assert_eq!(persistence.pending_count(), 2);

        assert_eq!(persistence.flush(), 2);
        assert_eq!(persistence.pending_count(), 0);
        assert_eq!(store.writes.load(Ordering::SeqCst), 2);
        assert!(persistence.load::<serde_json::Value>("filters").is_some());
    }

    #[test]
    fn write_failures_are_swallowed() {
        let persistence = SessionPersistence::new(Arc::new(FailingStore), "inspector");
        persistence.schedule("filters", &json!({}));
        assert!(persistence.save_now("filters", &json!({})).is_err());
        assert_eq!(persistence.load::<serde_json::Value>("filters"), None);
    }

    #[test]
    fn clear_removes_only_prefixed_keys() {
        let (store, persistence) = memory();
        persistence.save_now("filters", &json!({})).unwrap();
        persistence.save_now("color", &json!({})).unwrap();
        store.set("other:filters", "{}").unwrap();

        assert_eq!(persistence.clear().unwrap(), 2);
        assert!(store.keys("inspector:").unwrap().is_empty());
        assert!(store.get("other:filters").unwrap().is_some());
    }
}
