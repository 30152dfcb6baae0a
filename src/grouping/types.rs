//! Group and strategy types

use crate::chain::ChainId;
use crate::color::Rgb;
use serde::{Deserialize, Serialize};

/// A named, colored bucket of chain IDs.
///
/// Derived and never persisted; recomputed from scratch whenever the chain
/// set or strategy changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: String,
    pub label: String,
    pub color: Rgb,
    /// Members in a deterministic order, without duplicates
    pub chain_ids: Vec<ChainId>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.chain_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain_ids.is_empty()
    }
}

/// Tag of a grouping strategy, without its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    ByVariable,
    ByRange,
    ByTopK,
    ByBranch,
    ByExpression,
}

impl GroupMode {
    /// Exclusive strategies put each chain in at most one group
    pub fn is_exclusive(&self) -> bool {
        !matches!(self, Self::ByExpression)
    }
}

/// The active grouping strategy with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GroupingStrategy {
    /// Bucket by the string value of a field
    ByVariable { field: String },
    /// Equal-width bins over a score column; `bins` is clamped to at least 2
    ByRange { column: String, bins: usize },
    /// First `k` chains by a score column, and the rest
    ByTopK {
        column: String,
        k: usize,
        #[serde(default)]
        ascending: bool,
    },
    /// Bucket by branch path
    ByBranch,
    /// User-defined rule groups; membership is not exclusive
    ByExpression { groups: Vec<ExpressionGroup> },
}

impl GroupingStrategy {
    pub fn mode(&self) -> GroupMode {
        match self {
            Self::ByVariable { .. } => GroupMode::ByVariable,
            Self::ByRange { .. } => GroupMode::ByRange,
            Self::ByTopK { .. } => GroupMode::ByTopK,
            Self::ByBranch => GroupMode::ByBranch,
            Self::ByExpression { .. } => GroupMode::ByExpression,
        }
    }
}

/// Comparison applied by an expression rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    Eq,
    Neq,
    Contains,
    NotContains,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl RuleOperator {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Gt | Self::Lt | Self::Gte | Self::Lte)
    }
}

/// How a group combines its rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionRule {
    pub field: String,
    pub operator: RuleOperator,
    pub value: String,
}

impl ExpressionRule {
    pub fn new(field: impl Into<String>, operator: RuleOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// A named group defined by rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionGroup {
    pub name: String,
    #[serde(default)]
    pub combinator: Combinator,
    pub rules: Vec<ExpressionRule>,
    /// Explicit color; otherwise taken from the palette by position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl ExpressionGroup {
    pub fn new(
        name: impl Into<String>,
        combinator: Combinator,
        rules: Vec<ExpressionRule>,
    ) -> Self {
        Self {
            name: name.into(),
            combinator,
            rules,
            color: None,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}
