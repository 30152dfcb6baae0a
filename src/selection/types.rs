//! Selection commands, events and persisted state

use crate::chain::ChainId;
use crate::color::Rgb;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a `select` command composes with the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Replace,
    Add,
    Remove,
    Toggle,
}

/// How the next pointer gesture interprets hits.
///
/// Stored and persisted for rendering consumers; the engine never acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionToolMode {
    #[default]
    Click,
    Box,
    Lasso,
}

/// A named snapshot of a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSelection {
    pub id: String,
    pub name: String,
    /// Members, sorted
    pub chain_ids: Vec<ChainId>,
    pub color: Rgb,
    pub created_at: DateTime<Utc>,
}

/// Every operation the selection manager accepts
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionCommand {
    /// Compose `ids` with the selection; `None` uses the ambient mode
    Select {
        ids: Vec<ChainId>,
        mode: Option<SelectionMode>,
    },
    Deselect { ids: Vec<ChainId> },
    Toggle { ids: Vec<ChainId> },
    Clear,
    /// Select exactly the given IDs
    SelectAll { ids: Vec<ChainId> },
    /// Select every ID in `universe` that is not currently selected
    Invert { universe: Vec<ChainId> },
    Undo,
    Redo,
    Pin { ids: Vec<ChainId> },
    Unpin { ids: Vec<ChainId> },
    TogglePin { id: ChainId },
    ClearPins,
    SaveSelection { name: String, color: Option<Rgb> },
    LoadSelection { id: String },
    DeleteSavedSelection { id: String },
    RenameSavedSelection { id: String, name: String },
    SetMode(SelectionMode),
    SetToolMode(SelectionToolMode),
}

/// Emitted after a command changed state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    SelectionChanged { size: usize },
    PinsChanged { size: usize },
    SavedSelectionsChanged { count: usize },
    ModeChanged,
}

/// Persisted selection state. History is not persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSnapshot {
    pub selected: Vec<ChainId>,
    pub pinned: Vec<ChainId>,
    pub saved_selections: Vec<SavedSelection>,
    pub mode: SelectionMode,
    pub tool_mode: SelectionToolMode,
}
