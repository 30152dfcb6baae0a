//! ChainSet: the immutable, indexed result of one repository fetch

use super::model::{Chain, ChainId};
use std::collections::{BTreeSet, HashMap};

/// An immutable set of chains, indexed by ID.
///
/// Also carries the distinct dataset names, model classes and metric names
/// observed in the set. These lists are sorted once at construction, so a
/// value's position is stable for the lifetime of the set.
#[derive(Debug, Clone, Default)]
pub struct ChainSet {
    chains: Vec<Chain>,
    index: HashMap<ChainId, usize>,
    datasets: Vec<String>,
    model_classes: Vec<String>,
    metrics: Vec<String>,
}

impl ChainSet {
    /// Build a set from fetched chains.
    ///
    /// Chain IDs are unique within a set: a repeated ID keeps its first record.
    pub fn new(chains: Vec<Chain>) -> Self {
        let mut kept = Vec::with_capacity(chains.len());
        let mut index = HashMap::with_capacity(chains.len());
        let mut datasets = BTreeSet::new();
        let mut model_classes = BTreeSet::new();
        let mut metrics = BTreeSet::new();

        for chain in chains {
            if index.contains_key(&chain.chain_id) {
                tracing::debug!(chain_id = %chain.chain_id, "dropping duplicate chain record");
                continue;
            }
            datasets.insert(chain.dataset_name.clone());
            model_classes.insert(chain.model_class.clone());
            metrics.extend(chain.scores.keys().cloned());
            index.insert(chain.chain_id.clone(), kept.len());
            kept.push(chain);
        }

        Self {
            chains: kept,
            index,
            datasets: datasets.into_iter().collect(),
            model_classes: model_classes.into_iter().collect(),
            metrics: metrics.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn get(&self, id: &ChainId) -> Option<&Chain> {
        self.index.get(id).map(|&i| &self.chains[i])
    }

    pub fn contains(&self, id: &ChainId) -> bool {
        self.index.contains_key(id)
    }

    /// Chains in fetch order
    pub fn iter(&self) -> impl Iterator<Item = &Chain> {
        self.chains.iter()
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn ids(&self) -> impl Iterator<Item = &ChainId> {
        self.chains.iter().map(|c| &c.chain_id)
    }

    /// Distinct dataset names, sorted
    pub fn datasets(&self) -> &[String] {
        &self.datasets
    }

    /// Distinct model classes, sorted
    pub fn model_classes(&self) -> &[String] {
        &self.model_classes
    }

    /// Distinct score column names, sorted
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn dataset_index(&self, name: &str) -> Option<usize> {
        self.datasets.binary_search_by(|d| d.as_str().cmp(name)).ok()
    }

    pub fn model_class_index(&self, name: &str) -> Option<usize> {
        self.model_classes
            .binary_search_by(|m| m.as_str().cmp(name))
            .ok()
    }

    /// Min and max of the non-null values of a score column
    pub fn score_range(&self, column: &str) -> Option<(f64, f64)> {
        self.chains
            .iter()
            .filter_map(|c| c.score(column))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
