//! Equal-width binning over a score column

use super::types::Group;
use crate::chain::{ChainId, ChainSet};
use crate::color::CategoricalPalette;

pub(super) const MIN_BINS: usize = 2;

/// Bin chains with a non-null score into `bins` equal-width ranges.
///
/// The last bin's upper bound is inclusive, so the maximum always lands in
/// a bin. Chains with a null score are left out and empty bins are omitted.
pub(super) fn group_by_range(
    chains: &ChainSet,
    column: &str,
    bins: usize,
    palette: CategoricalPalette,
) -> Vec<Group> {
    let bins = bins.max(MIN_BINS);
    let Some((min, max)) = chains.score_range(column) else {
        return Vec::new();
    };
    let width = (max - min) / bins as f64;

    let mut members: Vec<Vec<ChainId>> = vec![Vec::new(); bins];
    for chain in chains.iter() {
        let Some(value) = chain.score(column) else {
            continue;
        };
        let bin = if width > 0.0 {
            (((value - min) / width).floor() as usize).min(bins - 1)
        } else {
            0
        };
        members[bin].push(chain.chain_id.clone());
    }

    members
        .into_iter()
        .enumerate()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(i, chain_ids)| {
            let lo = min + width * i as f64;
            let (hi, close) = if i == bins - 1 {
                (max, ']')
            } else {
                (min + width * (i + 1) as f64, ')')
            };
            Group {
                id: format!("range:{i}"),
                label: format!("[{lo:.3}, {hi:.3}{close}"),
                color: palette.color_at(i),
                chain_ids,
            }
        })
        .collect()
}
