//! Filter pipeline execution

use super::outlier::detect_outliers;
use super::types::{FilterState, OutlierFilter, SelectionFilter};
use crate::chain::{Chain, ChainId, ChainSet};
use std::collections::HashSet;

/// Apply every stage to the chain set, in fetch order.
///
/// Outliers are detected over the whole chain set for `score_column`, so
/// narrowing by task type or score range never changes which chains count
/// as outliers. The selection stage is a no-op while `selected` is empty.
pub fn apply_filters<'a>(
    chains: &'a ChainSet,
    state: &FilterState,
    score_column: &str,
    selected: &HashSet<ChainId>,
) -> Vec<&'a Chain> {
    let outliers = match state.outlier {
        OutlierFilter::All => HashSet::new(),
        OutlierFilter::Hide | OutlierFilter::Only => detect_outliers(chains, score_column),
    };

    chains
        .iter()
        .filter(|c| state.task_type.accepts(c.task_type))
        .filter(|c| match state.score_range {
            None => true,
            Some(range) => c.score(score_column).is_some_and(|v| range.contains(v)),
        })
        .filter(|c| match state.outlier {
            OutlierFilter::All => true,
            OutlierFilter::Hide => !outliers.contains(&c.chain_id),
            OutlierFilter::Only => outliers.contains(&c.chain_id),
        })
        .filter(|c| {
            if selected.is_empty() {
                return true;
            }
            match state.selection {
                SelectionFilter::All => true,
                SelectionFilter::Selected => selected.contains(&c.chain_id),
                SelectionFilter::Unselected => !selected.contains(&c.chain_id),
            }
        })
        .collect()
}
