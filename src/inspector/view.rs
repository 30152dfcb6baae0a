//! A consistent read snapshot for rendering consumers

use crate::chain::{Chain, ChainId, ChainSet};
use crate::color::{ColorConfig, ColorMapper, HighlightState, Rgb};
use crate::grouping::{Group, GroupIndex};
use std::collections::HashSet;
use std::sync::Arc;

/// Groups, filtered chains and colors, all derived from the same chain set.
///
/// A view never observes a refetch that happens after it was taken.
#[derive(Debug, Clone)]
pub struct InspectorView {
    pub(super) chains: Arc<ChainSet>,
    pub(super) groups: GroupIndex,
    pub(super) filtered: Vec<ChainId>,
    pub(super) selected: HashSet<ChainId>,
    pub(super) pinned: HashSet<ChainId>,
    pub(super) hovered: Option<ChainId>,
    pub(super) color: ColorConfig,
    pub(super) score_column: String,
    pub(super) baseline_opacity: f32,
    pub(super) active_filter_count: usize,
}

impl InspectorView {
    pub fn chains(&self) -> &ChainSet {
        &self.chains
    }

    pub fn groups(&self) -> &[Group] {
        self.groups.groups()
    }

    pub fn group_index(&self) -> &GroupIndex {
        &self.groups
    }

    pub fn group_of(&self, id: &ChainId) -> Option<&Group> {
        self.groups.group_of(id)
    }

    /// IDs passing every filter stage, in fetch order
    pub fn filtered_ids(&self) -> &[ChainId] {
        &self.filtered
    }

    pub fn filtered_chains(&self) -> Vec<&Chain> {
        self.filtered.iter().filter_map(|id| self.chains.get(id)).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn active_filter_count(&self) -> usize {
        self.active_filter_count
    }

    pub fn is_selected(&self, id: &ChainId) -> bool {
        self.selected.contains(id)
    }

    pub fn is_pinned(&self, id: &ChainId) -> bool {
        self.pinned.contains(id)
    }

    pub fn score_column(&self) -> &str {
        &self.score_column
    }

    /// Color mapper over this view's snapshot.
    ///
    /// Build it once per render pass; it precomputes the score range.
    pub fn mapper(&self) -> ColorMapper<'_> {
        ColorMapper::new(
            &self.chains,
            &self.groups,
            &self.color,
            &self.score_column,
            HighlightState {
                hovered: self.hovered.as_ref(),
                selected: &self.selected,
            },
            self.baseline_opacity,
        )
    }

    pub fn color_of(&self, id: &ChainId) -> Rgb {
        self.mapper().color_of(id)
    }

    pub fn opacity_of(&self, id: &ChainId) -> f32 {
        self.mapper().opacity_of(id)
    }
}
