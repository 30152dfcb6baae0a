//! Chain records as returned by the chain repository

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Unique identifier for a chain
///
/// Opaque to the engine; serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Create a ChainId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChainId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Learning task a chain was trained for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Regression,
    BinaryClassification,
    MulticlassClassification,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regression => "regression",
            Self::BinaryClassification => "binary_classification",
            Self::MulticlassClassification => "multiclass_classification",
        }
    }

    pub fn is_classification(&self) -> bool {
        matches!(
            self,
            Self::BinaryClassification | Self::MulticlassClassification
        )
    }
}

/// One trained pipeline variant with its scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub chain_id: ChainId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub dataset_name: String,
    pub model_class: String,
    pub task_type: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_path: Option<String>,
    /// Score columns by name; `None` records an explicit null from the repository
    #[serde(default)]
    pub scores: BTreeMap<String, Option<f64>>,
    /// Additional metadata fields, accessed by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl Chain {
    pub fn new(
        chain_id: impl Into<ChainId>,
        dataset_name: impl Into<String>,
        model_class: impl Into<String>,
        task_type: TaskType,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            run_id: None,
            dataset_name: dataset_name.into(),
            model_class: model_class.into(),
            task_type,
            preprocessings: None,
            branch_path: None,
            scores: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_score(mut self, column: impl Into<String>, value: f64) -> Self {
        self.scores.insert(column.into(), Some(value));
        self
    }

    pub fn with_null_score(mut self, column: impl Into<String>) -> Self {
        self.scores.insert(column.into(), None);
        self
    }

    pub fn with_branch(mut self, branch_path: impl Into<String>) -> Self {
        self.branch_path = Some(branch_path.into());
        self
    }

    pub fn with_run(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_preprocessings(mut self, preprocessings: impl Into<String>) -> Self {
        self.preprocessings = Some(preprocessings.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Value of a score column; null, missing and non-finite values are `None`
    pub fn score(&self, column: &str) -> Option<f64> {
        self.scores
            .get(column)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    /// String value of a named field.
    ///
    /// Resolution order: built-in attributes, then score columns, then
    /// metadata. Empty strings and nulls are reported as `None`.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "chain_id" => Some(self.chain_id.as_str().to_string()),
            "run_id" => self.run_id.clone(),
            "dataset_name" => Some(self.dataset_name.clone()),
            "model_class" => Some(self.model_class.clone()),
            "task_type" => Some(self.task_type.as_str().to_string()),
            "preprocessings" => self.preprocessings.clone(),
            "branch_path" => self.branch_path.clone(),
            _ => {
                if self.scores.contains_key(name) {
                    self.score(name).map(|v| v.to_string())
                } else {
                    self.metadata.get(name).and_then(metadata_to_string)
                }
            }
        };
        value.filter(|s| !s.is_empty())
    }
}

fn metadata_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
