//! Repository trait and query types

use crate::chain::Chain;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors from a chain repository query
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for repository queries
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Filter criteria sent to the repository.
///
/// Empty sets mean "no constraint". Sets keep the serialized form canonical,
/// which is what `cache_key` relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCriteria {
    #[serde(default)]
    pub datasets: BTreeSet<String>,
    #[serde(default)]
    pub runs: BTreeSet<String>,
    #[serde(default)]
    pub model_classes: BTreeSet<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.datasets.insert(dataset.into());
        self
    }

    pub fn with_run(mut self, run: impl Into<String>) -> Self {
        self.runs.insert(run.into());
        self
    }

    pub fn with_model_class(mut self, model_class: impl Into<String>) -> Self {
        self.model_classes.insert(model_class.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Serialized form used to key in-flight and recent fetches
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }

    /// Check whether a chain satisfies every constraint
    pub fn matches(&self, chain: &Chain) -> bool {
        if !self.datasets.is_empty() && !self.datasets.contains(&chain.dataset_name) {
            return false;
        }
        if !self.model_classes.is_empty() && !self.model_classes.contains(&chain.model_class) {
            return false;
        }
        if !self.runs.is_empty() {
            match &chain.run_id {
                Some(run) if self.runs.contains(run) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Response to a chain query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    pub chains: Vec<Chain>,
    #[serde(default)]
    pub available_metrics: Vec<String>,
    #[serde(default)]
    pub available_models: Vec<String>,
    #[serde(default)]
    pub available_datasets: Vec<String>,
    #[serde(default)]
    pub available_runs: Vec<String>,
    #[serde(default)]
    pub available_preprocessings: Vec<String>,
    /// Matching chains before any limit was applied
    #[serde(default)]
    pub total: usize,
}

/// A source of chain records.
///
/// Implementations must be thread-safe (Send + Sync); the data store may
/// hold several queries in flight at once.
#[async_trait]
pub trait ChainRepository: Send + Sync {
    /// Fetch all chains matching the criteria
    async fn query(&self, criteria: &QueryCriteria) -> RepositoryResult<QueryResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::TaskType;

    #[test]
    fn cache_key_ignores_insertion_order() {
        let a = QueryCriteria::new().with_dataset("corn").with_dataset("wheat");
        let b = QueryCriteria::new().with_dataset("wheat").with_dataset("corn");
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), QueryCriteria::new().cache_key());
    }

    #[test]
    fn matches_applies_every_constraint() {
        let chain = Chain::new("c", "corn", "PLS", TaskType::Regression).with_run("r1");
        assert!(QueryCriteria::new().matches(&chain));
        assert!(QueryCriteria::new().with_dataset("corn").with_run("r1").matches(&chain));
        assert!(!QueryCriteria::new().with_model_class("SVR").matches(&chain));
        assert!(!QueryCriteria::new().with_run("r2").matches(&chain));
    }

    #[test]
    fn run_constraint_excludes_chains_without_run() {
        let chain = Chain::new("c", "corn", "PLS", TaskType::Regression);
        assert!(!QueryCriteria::new().with_run("r1").matches(&chain));
    }
}
