//! Grouping by branch path

use super::buckets::count_sorted_groups;
use super::types::Group;
use super::NO_BRANCH_LABEL;
use crate::chain::{ChainId, ChainSet};
use crate::color::CategoricalPalette;
use std::collections::HashMap;

pub(super) fn group_by_branch(chains: &ChainSet, palette: CategoricalPalette) -> Vec<Group> {
    let mut buckets: HashMap<String, Vec<ChainId>> = HashMap::new();
    for chain in chains.iter() {
        let label = match chain.branch_path.as_deref() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => NO_BRANCH_LABEL.to_string(),
        };
        buckets.entry(label).or_default().push(chain.chain_id.clone());
    }
    count_sorted_groups("branch", buckets, palette)
}
