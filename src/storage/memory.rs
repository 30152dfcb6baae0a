//! In-memory session store

use super::traits::{SessionStore, StorageResult};
use dashmap::DashMap;

/// Session store living for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).map(|r| r.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|r| r.key().starts_with(prefix))
            .map(|r| r.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemorySessionStore::new();
        store.set("inspector:filters", "{}").unwrap();
        assert_eq!(store.get("inspector:filters").unwrap().as_deref(), Some("{}"));

        store.set("inspector:filters", "[]").unwrap();
        assert_eq!(store.get("inspector:filters").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);

        assert!(store.remove("inspector:filters").unwrap());
        assert!(!store.remove("inspector:filters").unwrap());
        assert!(store.get("inspector:filters").unwrap().is_none());
    }

    #[test]
    fn keys_filter_by_prefix() {
        let store = MemorySessionStore::new();
        store.set("inspector:b", "1").unwrap();
        store.set("inspector:a", "1").unwrap();
        store.set("other:a", "1").unwrap();
        assert_eq!(store.keys("inspector:").unwrap(), ["inspector:a", "inspector:b"]);
    }
}
