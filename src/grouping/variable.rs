//! Grouping by the value of a chain field

use super::buckets::count_sorted_groups;
use super::types::Group;
use super::EMPTY_LABEL;
use crate::chain::{ChainId, ChainSet};
use crate::color::CategoricalPalette;
use std::collections::HashMap;

pub(super) fn group_by_variable(
    chains: &ChainSet,
    field: &str,
    palette: CategoricalPalette,
) -> Vec<Group> {
    let mut buckets: HashMap<String, Vec<ChainId>> = HashMap::new();
    for chain in chains.iter() {
        let label = chain
            .field(field)
            .unwrap_or_else(|| EMPTY_LABEL.to_string());
        buckets.entry(label).or_default().push(chain.chain_id.clone());
    }
    count_sorted_groups("var", buckets, palette)
}
