//! SQLite session store

use super::traits::{OpenStore, SessionStore, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed session store.
///
/// One table of key/value rows. Thread-safe via internal mutex on the
/// connection.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS session_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl OpenStore for SqliteSessionStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.conn();
        let value = conn
            .query_row(
                "SELECT value FROM session_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO session_entries (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let conn = self.conn();
        let removed = conn.execute("DELETE FROM session_entries WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    fn keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT key FROM session_entries ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for key in rows {
            let key = key?;
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_and_get() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        assert!(store.get("inspector:criteria").unwrap().is_none());

        store.set("inspector:criteria", r#"{"limit":5}"#).unwrap();
        assert_eq!(
            store.get("inspector:criteria").unwrap().as_deref(),
            Some(r#"{"limit":5}"#)
        );

        store.set("inspector:criteria", "{}").unwrap();
        assert_eq!(store.get("inspector:criteria").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_remove_and_keys() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        store.set("inspector:grouping", "null").unwrap();
        store.set("inspector:color", "{}").unwrap();
        store.set("elsewhere", "1").unwrap();

        assert_eq!(
            store.keys("inspector:").unwrap(),
            ["inspector:color", "inspector:grouping"]
        );
        assert!(store.remove("inspector:color").unwrap());
        assert!(!store.remove("inspector:color").unwrap());
        assert_eq!(store.keys("inspector:").unwrap(), ["inspector:grouping"]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.db");

        {
            let store = SqliteSessionStore::open(&path).unwrap();
            store.set("inspector:selection", "[]").unwrap();
        }

        let store = SqliteSessionStore::open(&path).unwrap();
        assert_eq!(store.get("inspector:selection").unwrap().as_deref(), Some("[]"));
    }
}
