//! Chain Inspector: analytics state engine for pipeline-chain comparison
//!
//! Holds a set of trained pipeline variants ("chains") fetched from a chain
//! repository and derives everything a comparison view renders from it.
//!
//! # Core Concepts
//!
//! - **Data store**: the authoritative chain set for the current criteria
//! - **Grouping**: five strategies partitioning chains into colored groups
//! - **Filters**: task type, score range, outlier and selection stages
//! - **Selection**: selected and pinned chains, undo/redo, saved selections
//! - **Color**: per-chain color and opacity for four color modes
//! - **Session**: debounced persistence of engine configuration
//!
//! # Example
//!
//! ```
//! use chain_inspector::{
//!     Chain, InMemoryRepository, Inspector, InspectorConfig, MemorySessionStore, TaskType,
//! };
//! use std::sync::Arc;
//!
//! let repository = Arc::new(InMemoryRepository::new(vec![
//!     Chain::new("c1", "wheat", "PLS", TaskType::Regression).with_score("cv_score", 0.9),
//! ]));
//! let inspector = Inspector::new(
//!     repository,
//!     Arc::new(MemorySessionStore::new()),
//!     InspectorConfig::default(),
//! );
//! // Nothing is fetched until criteria are set
//! assert!(inspector.view().chains().is_empty());
//! ```

pub mod chain;
pub mod color;
pub mod config;
pub mod data;
pub mod filter;
pub mod grouping;
pub mod inspector;
pub mod notify;
pub mod repository;
pub mod selection;
pub mod storage;

pub use chain::{Chain, ChainId, ChainSet, TaskType};
pub use color::{ColorConfig, ColorMapper, ColorMode, Rgb};
pub use config::{ConfigError, InspectorConfig};
pub use data::{DataEvent, DataStore, FetchOutcome};
pub use filter::{
    apply_filters, detect_outliers, FilterState, OutlierFilter, SelectionFilter, TaskTypeFilter,
};
pub use grouping::{compute_groups, Group, GroupIndex, GroupMode, GroupingStrategy};
pub use inspector::{Inspector, InspectorError, InspectorResult, InspectorView, RestoreReport};
pub use repository::{
    ChainRepository, InMemoryRepository, JsonFileRepository, QueryCriteria, QueryResponse,
    RepositoryError,
};
pub use selection::{SelectionCommand, SelectionManager, SelectionMode};
pub use storage::{
    MemorySessionStore, OpenStore, SessionPersistence, SessionStore, SqliteSessionStore,
    StorageError, StorageResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
