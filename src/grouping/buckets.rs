//! Count-ordered buckets shared by variable and branch grouping

use super::types::Group;
use crate::chain::ChainId;
use crate::color::CategoricalPalette;
use std::collections::HashMap;

/// Turn label buckets into groups ordered by size.
///
/// Largest bucket first, so it always takes palette slot 0; equal sizes are
/// ordered by label, ascending. Members keep fetch order.
pub(super) fn count_sorted_groups(
    id_prefix: &str,
    buckets: HashMap<String, Vec<ChainId>>,
    palette: CategoricalPalette,
) -> Vec<Group> {
    let mut buckets: Vec<(String, Vec<ChainId>)> = buckets.into_iter().collect();
    buckets.sort_by(|(label_a, a), (label_b, b)| {
        b.len().cmp(&a.len()).then_with(|| label_a.cmp(label_b))
    });

    buckets
        .into_iter()
        .enumerate()
        .map(|(i, (label, chain_ids))| Group {
            id: format!("{id_prefix}:{label}"),
            label,
            color: palette.color_at(i),
            chain_ids,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ChainId> {
        names.iter().map(|n| ChainId::new(*n)).collect()
    }

    #[test]
    fn larger_buckets_come_first_with_label_tie_break() {
        let mut buckets = HashMap::new();
        buckets.insert("b".to_string(), ids(&["1", "2"]));
        buckets.insert("a".to_string(), ids(&["3", "4"]));
        buckets.insert("z".to_string(), ids(&["5", "6", "7"]));

        let palette = CategoricalPalette::default();
        let groups = count_sorted_groups("var", buckets, palette);
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();

        assert_eq!(labels, ["z", "a", "b"]);
        assert_eq!(groups[0].color, palette.color_at(0));
        assert_eq!(groups[0].id, "var:z");
    }
}
