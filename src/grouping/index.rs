//! Reverse chain → group lookup

use super::types::Group;
use crate::chain::ChainId;
use std::collections::HashMap;

/// Groups plus a reverse index from chain ID to the groups containing it
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    groups: Vec<Group>,
    by_chain: HashMap<ChainId, Vec<usize>>,
}

impl GroupIndex {
    pub fn new(groups: Vec<Group>) -> Self {
        let mut by_chain: HashMap<ChainId, Vec<usize>> = HashMap::new();
        for (i, group) in groups.iter().enumerate() {
            for id in &group.chain_ids {
                by_chain.entry(id.clone()).or_default().push(i);
            }
        }
        Self { groups, by_chain }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// The first group containing the chain
    pub fn group_of(&self, id: &ChainId) -> Option<&Group> {
        self.by_chain
            .get(id)
            .and_then(|idx| idx.first())
            .map(|&i| &self.groups[i])
    }

    /// Every group containing the chain, in group order
    pub fn groups_of(&self, id: &ChainId) -> Vec<&Group> {
        self.by_chain
            .get(id)
            .map(|idx| idx.iter().map(|&i| &self.groups[i]).collect())
            .unwrap_or_default()
    }

    pub fn is_grouped(&self, id: &ChainId) -> bool {
        self.by_chain.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::FALLBACK_GRAY;

    fn group(id: &str, members: &[&str]) -> Group {
        Group {
            id: id.to_string(),
            label: id.to_string(),
            color: FALLBACK_GRAY,
            chain_ids: members.iter().map(|m| ChainId::new(*m)).collect(),
        }
    }

    #[test]
    fn lookup_returns_first_and_all_groups() {
        let index = GroupIndex::new(vec![group("g1", &["a", "b"]), group("g2", &["b"])]);

        assert_eq!(index.group_of(&ChainId::new("a")).unwrap().id, "g1");
        assert_eq!(index.group_of(&ChainId::new("b")).unwrap().id, "g1");
        assert_eq!(index.groups_of(&ChainId::new("b")).len(), 2);
        assert!(index.group_of(&ChainId::new("z")).is_none());
        assert!(!index.is_grouped(&ChainId::new("z")));
    }
}
