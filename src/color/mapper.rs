//! ColorMapper: per-chain display color and opacity
//!
//! Score colors are normalized against the full, unfiltered chain set, so a
//! chain keeps its color while filters change. Dataset and model-class
//! colors index into the chain set's sorted distinct lists for the same
//! reason.

use super::palette::{CategoricalPalette, ContinuousPalette, Rgb, FALLBACK_GRAY};
use crate::chain::{ChainId, ChainSet};
use crate::grouping::GroupIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What a chain's color encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Group,
    Score,
    Dataset,
    ModelClass,
}

const DEFAULT_UNSELECTED_OPACITY: f32 = 0.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub mode: ColorMode,
    pub continuous_palette: ContinuousPalette,
    pub categorical_palette: CategoricalPalette,
    /// Opacity of unselected chains while a selection exists, in [0, 1]
    pub unselected_opacity: f32,
    pub highlight_hover: bool,
    pub highlight_selection: bool,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            mode: ColorMode::Group,
            continuous_palette: ContinuousPalette::Viridis,
            categorical_palette: CategoricalPalette::Tableau10,
            unselected_opacity: DEFAULT_UNSELECTED_OPACITY,
            highlight_hover: true,
            highlight_selection: true,
        }
    }
}

impl ColorConfig {
    /// Same config with `unselected_opacity` forced into [0, 1].
    ///
    /// A non-finite opacity falls back to the default.
    pub fn normalized(mut self) -> Self {
        self.unselected_opacity = sanitize_opacity(self.unselected_opacity);
        self
    }
}

fn sanitize_opacity(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        DEFAULT_UNSELECTED_OPACITY
    }
}

/// Hover and selection inputs to opacity
#[derive(Debug, Clone, Copy)]
pub struct HighlightState<'a> {
    pub hovered: Option<&'a ChainId>,
    pub selected: &'a HashSet<ChainId>,
}

/// Computes colors for one consistent snapshot of chains, groups and selection
#[derive(Debug, Clone)]
pub struct ColorMapper<'a> {
    chains: &'a ChainSet,
    groups: &'a GroupIndex,
    config: &'a ColorConfig,
    score_column: &'a str,
    score_range: Option<(f64, f64)>,
    highlight: HighlightState<'a>,
    baseline_opacity: f32,
}

impl<'a> ColorMapper<'a> {
    pub fn new(
        chains: &'a ChainSet,
        groups: &'a GroupIndex,
        config: &'a ColorConfig,
        score_column: &'a str,
        highlight: HighlightState<'a>,
        baseline_opacity: f32,
    ) -> Self {
        Self {
            chains,
            groups,
            config,
            score_column,
            score_range: chains.score_range(score_column),
            highlight,
            baseline_opacity,
        }
    }

    pub fn color_of(&self, id: &ChainId) -> Rgb {
        match self.config.mode {
            ColorMode::Group => self
                .groups
                .group_of(id)
                .map(|g| g.color)
                .unwrap_or(FALLBACK_GRAY),
            ColorMode::Score => self.score_color(id),
            ColorMode::Dataset => self
                .chains
                .get(id)
                .and_then(|c| self.chains.dataset_index(&c.dataset_name))
                .map(|i| self.config.categorical_palette.color_at(i))
                .unwrap_or(FALLBACK_GRAY),
            ColorMode::ModelClass => self
                .chains
                .get(id)
                .and_then(|c| self.chains.model_class_index(&c.model_class))
                .map(|i| self.config.categorical_palette.color_at(i))
                .unwrap_or(FALLBACK_GRAY),
        }
    }

    fn score_color(&self, id: &ChainId) -> Rgb {
        let Some(value) = self.chains.get(id).and_then(|c| c.score(self.score_column)) else {
            return FALLBACK_GRAY;
        };
        let Some((min, max)) = self.score_range else {
            return FALLBACK_GRAY;
        };
        let t = if max > min {
            (value - min) / (max - min)
        } else {
            0.5
        };
        self.config.continuous_palette.sample(t)
    }

    /// Opacity in [0, 1].
    ///
    /// The hovered chain is opaque. Otherwise, while a selection exists,
    /// selected chains are opaque and the rest use `unselected_opacity`.
    /// Otherwise the baseline applies.
    pub fn opacity_of(&self, id: &ChainId) -> f32 {
        if self.config.highlight_hover && self.highlight.hovered == Some(id) {
            return 1.0;
        }
        if self.config.highlight_selection && !self.highlight.selected.is_empty() {
            return if self.highlight.selected.contains(id) {
                1.0
            } else {
                sanitize_opacity(self.config.unselected_opacity)
            };
        }
        self.baseline_opacity
    }
}
