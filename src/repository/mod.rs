//! Chain repository port
//!
//! The remote query service that answers "chains matching criteria X".
//! The engine only sees the `ChainRepository` trait; the in-memory and
//! JSON-file implementations serve tests and offline use.

mod file;
mod memory;
mod traits;

pub use file::JsonFileRepository;
pub use memory::InMemoryRepository;
pub use traits::{ChainRepository, QueryCriteria, QueryResponse, RepositoryError, RepositoryResult};
