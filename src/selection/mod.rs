//! Selection manager
//!
//! Owns the selected chain set with bounded undo/redo, a separate set of
//! pinned chains, and named saved selections. All mutation goes through
//! `SelectionManager::apply`, which is synchronous, so commands never
//! interleave.

mod history;
mod keyboard;
mod manager;
mod types;

pub use history::HistoryRing;
pub use keyboard::{command_for_key, KeyEvent};
pub use manager::{SelectionManager, DEFAULT_HISTORY_CAPACITY};
pub use types::{
    SavedSelection, SelectionCommand, SelectionEvent, SelectionMode, SelectionSnapshot,
    SelectionToolMode,
};
