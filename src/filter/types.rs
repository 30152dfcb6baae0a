//! Filter state

use crate::chain::TaskType;
use serde::{Deserialize, Serialize};

/// Task-type stage. `Classification` matches both classification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskTypeFilter {
    #[default]
    All,
    Regression,
    BinaryClassification,
    MulticlassClassification,
    Classification,
}

impl TaskTypeFilter {
    pub fn accepts(&self, task_type: TaskType) -> bool {
        match self {
            Self::All => true,
            Self::Classification => task_type.is_classification(),
            Self::Regression => task_type == TaskType::Regression,
            Self::BinaryClassification => task_type == TaskType::BinaryClassification,
            Self::MulticlassClassification => task_type == TaskType::MulticlassClassification,
        }
    }
}

/// Closed score interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    /// Build a range, swapping the bounds if given in reverse
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierFilter {
    #[default]
    All,
    Hide,
    Only,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionFilter {
    #[default]
    All,
    Selected,
    Unselected,
}

/// The four filter stages, combined with AND semantics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub task_type: TaskTypeFilter,
    pub score_range: Option<ScoreRange>,
    pub outlier: OutlierFilter,
    pub selection: SelectionFilter,
}

impl FilterState {
    /// Number of stages not at their default
    pub fn active_filter_count(&self) -> usize {
        [
            self.task_type != TaskTypeFilter::All,
            self.score_range.is_some(),
            self.outlier != OutlierFilter::All,
            self.selection != SelectionFilter::All,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_default(&self) -> bool {
        self.active_filter_count() == 0
    }

    /// Reset every stage
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
