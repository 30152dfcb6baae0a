//! Session storage
//!
//! The durable session store is a key/value port (`SessionStore`) with an
//! in-memory backend for tests and embedding, and a SQLite backend for the
//! CLI. `SessionPersistence` layers timestamps, expiry and debounced writes
//! on top.

mod memory;
mod persistence;
mod sqlite;
mod traits;

pub use memory::MemorySessionStore;
pub use persistence::SessionPersistence;
pub use sqlite::SqliteSessionStore;
pub use traits::{OpenStore, SessionStore, StorageError, StorageResult};
