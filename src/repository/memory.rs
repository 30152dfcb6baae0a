//! In-memory chain repository

use super::traits::{ChainRepository, QueryCriteria, QueryResponse, RepositoryResult};
use crate::chain::Chain;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::RwLock;

/// Repository backed by a vector of chains held in memory.
///
/// Useful for tests and for serving an export that has already been loaded.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    chains: RwLock<Vec<Chain>>,
}

impl InMemoryRepository {
    pub fn new(chains: Vec<Chain>) -> Self {
        Self {
            chains: RwLock::new(chains),
        }
    }

    /// Replace the served chains
    pub fn replace(&self, chains: Vec<Chain>) {
        let mut guard = self.chains.write().unwrap_or_else(|e| e.into_inner());
        *guard = chains;
    }
}

#[async_trait]
impl ChainRepository for InMemoryRepository {
    async fn query(&self, criteria: &QueryCriteria) -> RepositoryResult<QueryResponse> {
        let chains = self.chains.read().unwrap_or_else(|e| e.into_inner());
        Ok(respond(&chains, criteria))
    }
}

/// Answer a query against a full chain list.
///
/// The `available_*` lists describe the whole list, not the matches, so
/// selector UIs can offer values the current criteria exclude.
pub(crate) fn respond(all: &[Chain], criteria: &QueryCriteria) -> QueryResponse {
    let mut metrics = BTreeSet::new();
    let mut models = BTreeSet::new();
    let mut datasets = BTreeSet::new();
    let mut runs = BTreeSet::new();
    let mut preprocessings = BTreeSet::new();

    for chain in all {
        metrics.extend(chain.scores.keys().cloned());
        models.insert(chain.model_class.clone());
        datasets.insert(chain.dataset_name.clone());
        if let Some(run) = &chain.run_id {
            runs.insert(run.clone());
        }
        if let Some(pp) = &chain.preprocessings {
            preprocessings.insert(pp.clone());
        }
    }

    let mut chains: Vec<Chain> = all
        .iter()
        .filter(|c| criteria.matches(c))
        .cloned()
        .collect();
    let total = chains.len();
    if let Some(limit) = criteria.limit {
        chains.truncate(limit);
    }

    QueryResponse {
        chains,
        available_metrics: metrics.into_iter().collect(),
        available_models: models.into_iter().collect(),
        available_datasets: datasets.into_iter().collect(),
        available_runs: runs.into_iter().collect(),
        available_preprocessings: preprocessings.into_iter().collect(),
        total,
    }
}
