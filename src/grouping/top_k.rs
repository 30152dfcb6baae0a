//! Top-k grouping by a score column

use super::types::Group;
use super::OTHERS_LABEL;
use crate::chain::{Chain, ChainSet};
use crate::color::CategoricalPalette;

/// Split scored chains into the best `k` and the rest.
///
/// Chains with a null score take part in neither group. Descending order
/// unless `ascending` (for error metrics where lower is better); equal
/// scores are ordered by chain ID.
pub(super) fn group_by_top_k(
    chains: &ChainSet,
    column: &str,
    k: usize,
    ascending: bool,
    palette: CategoricalPalette,
) -> Vec<Group> {
    let mut scored: Vec<(f64, &Chain)> = chains
        .iter()
        .filter_map(|c| c.score(column).map(|s| (s, c)))
        .collect();
    scored.sort_by(|(a, ca), (b, cb)| {
        let by_score = if ascending { a.total_cmp(b) } else { b.total_cmp(a) };
        by_score.then_with(|| ca.chain_id.cmp(&cb.chain_id))
    });

    let split = k.min(scored.len());
    let (top, rest) = scored.split_at(split);

    let mut groups = Vec::with_capacity(2);
    if !top.is_empty() {
        groups.push(Group {
            id: "top_k:top".to_string(),
            label: format!("Top {k}"),
            color: palette.color_at(0),
            chain_ids: top.iter().map(|(_, c)| c.chain_id.clone()).collect(),
        });
    }
    if !rest.is_empty() {
        groups.push(Group {
            id: "top_k:others".to_string(),
            label: OTHERS_LABEL.to_string(),
            color: palette.color_at(1),
            chain_ids: rest.iter().map(|(_, c)| c.chain_id.clone()).collect(),
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainId, TaskType};

    fn twenty_chains() -> ChainSet {
        ChainSet::new(
            (0..20)
                .map(|i| {
                    let chain = Chain::new(format!("c{i:02}"), "d", "m", TaskType::Regression);
                    if i < 3 {
                        chain.with_null_score("cv_score")
                    } else {
                        chain.with_score("cv_score", i as f64)
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn top_five_of_twenty() {
        let set = twenty_chains();
        let groups = group_by_top_k(&set, "cv_score", 5, false, CategoricalPalette::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Top 5");
        assert_eq!(groups[0].len(), 5);
        assert_eq!(groups[0].chain_ids[0], ChainId::new("c19"));
        assert_eq!(groups[1].label, OTHERS_LABEL);
        assert_eq!(groups[1].len(), 17 - 5);
    }

    #[test]
    fn ascending_takes_lowest_scores() {
        let set = twenty_chains();
        let groups = group_by_top_k(&set, "cv_score", 2, true, CategoricalPalette::default());
        assert_eq!(groups[0].chain_ids, [ChainId::new("c03"), ChainId::new("c04")]);
    }

    #[test]
    fn k_larger_than_scored_count_has_no_others() {
        let set = twenty_chains();
        let groups = group_by_top_k(&set, "cv_score", 50, false, CategoricalPalette::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 17);
    }

    #[test]
    fn ties_break_on_chain_id() {
        let set = ChainSet::new(vec![
            Chain::new("b", "d", "m", TaskType::Regression).with_score("s", 1.0),
            Chain::new("a", "d", "m", TaskType::Regression).with_score("s", 1.0),
        ]);
        let groups = group_by_top_k(&set, "s", 1, false, CategoricalPalette::default());
        assert_eq!(groups[0].chain_ids, [ChainId::new("a")]);
    }
}
