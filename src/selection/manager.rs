//! SelectionManager: selection state machine

use super::history::HistoryRing;
use super::types::{
    SavedSelection, SelectionCommand, SelectionEvent, SelectionMode, SelectionSnapshot,
    SelectionToolMode,
};
use crate::chain::ChainId;
use crate::color::{CategoricalPalette, Rgb};
use crate::notify::{Listeners, SubscriptionId};
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

type ChainIdSet = HashSet<ChainId>;

/// Owns selected chains, pins, history and saved selections.
///
/// Every command that computes a selected set pushes it onto the history,
/// including one equal to the current set. Pins never touch the history.
#[derive(Debug)]
pub struct SelectionManager {
    selected: ChainIdSet,
    pinned: ChainIdSet,
    history: HistoryRing<ChainIdSet>,
    saved: Vec<SavedSelection>,
    mode: SelectionMode,
    tool_mode: SelectionToolMode,
    palette: CategoricalPalette,
    listeners: Listeners<SelectionEvent>,
}

impl SelectionManager {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            selected: HashSet::new(),
            pinned: HashSet::new(),
            history: HistoryRing::new(history_capacity, HashSet::new()),
            saved: Vec::new(),
            mode: SelectionMode::default(),
            tool_mode: SelectionToolMode::default(),
            palette: CategoricalPalette::default(),
            listeners: Listeners::new(),
        }
    }

    /// Palette used for saved selections created without a color
    pub fn with_palette(mut self, palette: CategoricalPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Run one command. Returns true if any state changed.
    pub fn apply(&mut self, command: SelectionCommand) -> bool {
        match command {
            SelectionCommand::Select { ids, mode } => {
                let mode = mode.unwrap_or(self.mode);
                let next = compose(&self.selected, &ids, mode);
                self.commit(next)
            }
            SelectionCommand::Deselect { ids } => {
                let next = compose(&self.selected, &ids, SelectionMode::Remove);
                self.commit(next)
            }
            SelectionCommand::Toggle { ids } => {
                let next = compose(&self.selected, &ids, SelectionMode::Toggle);
                self.commit(next)
            }
            SelectionCommand::Clear => self.commit(HashSet::new()),
            SelectionCommand::SelectAll { ids } => self.commit(ids.into_iter().collect()),
            SelectionCommand::Invert { universe } => {
                let next = universe
                    .into_iter()
                    .filter(|id| !self.selected.contains(id))
                    .collect();
                self.commit(next)
            }
            SelectionCommand::Undo => self.step(true),
            SelectionCommand::Redo => self.step(false),
            SelectionCommand::Pin { ids } => {
                let mut changed = false;
                for id in ids {
                    changed |= self.pinned.insert(id);
                }
                self.pins_changed(changed)
            }
            SelectionCommand::Unpin { ids } => {
                let mut changed = false;
                for id in &ids {
                    changed |= self.pinned.remove(id);
                }
                self.pins_changed(changed)
            }
            SelectionCommand::TogglePin { id } => {
                if !self.pinned.remove(&id) {
                    self.pinned.insert(id);
                }
                self.pins_changed(true)
            }
            SelectionCommand::ClearPins => {
                let changed = !self.pinned.is_empty();
                self.pinned.clear();
                self.pins_changed(changed)
            }
            SelectionCommand::SaveSelection { name, color } => {
                self.save_selection(name, color).is_some()
            }
            SelectionCommand::LoadSelection { id } => {
                let Some(saved) = self.saved.iter().find(|s| s.id == id) else {
                    tracing::debug!(%id, "ignoring load of unknown saved selection");
                    return false;
                };
                let next = saved.chain_ids.iter().cloned().collect();
                self.commit(next)
            }
            SelectionCommand::DeleteSavedSelection { id } => {
                let before = self.saved.len();
                self.saved.retain(|s| s.id != id);
                self.saved_changed(self.saved.len() != before)
            }
            SelectionCommand::RenameSavedSelection { id, name } => {
                let changed = match self.saved.iter_mut().find(|s| s.id == id) {
                    Some(saved) if saved.name != name => {
                        saved.name = name;
                        true
                    }
                    _ => false,
                };
                self.saved_changed(changed)
            }
            SelectionCommand::SetMode(mode) => {
                let changed = self.mode != mode;
                self.mode = mode;
                self.mode_changed(changed)
            }
            SelectionCommand::SetToolMode(tool_mode) => {
                let changed = self.tool_mode != tool_mode;
                self.tool_mode = tool_mode;
                self.mode_changed(changed)
            }
        }
    }

    /// Records a history entry even when `next` equals the current set
    fn commit(&mut self, next: ChainIdSet) -> bool {
        self.history.push(next.clone());
        self.selected = next;
        self.listeners.notify(&SelectionEvent::SelectionChanged {
            size: self.selected.len(),
        });
        true
    }

    fn step(&mut self, back: bool) -> bool {
        let entry = if back {
            self.history.undo()
        } else {
            self.history.redo()
        };
        let Some(entry) = entry.cloned() else {
            return false;
        };
        self.selected = entry;
        self.listeners.notify(&SelectionEvent::SelectionChanged {
            size: self.selected.len(),
        });
        true
    }

    fn pins_changed(&self, changed: bool) -> bool {
        if changed {
            self.listeners.notify(&SelectionEvent::PinsChanged {
                size: self.pinned.len(),
            });
        }
        changed
    }

    fn saved_changed(&self, changed: bool) -> bool {
        if changed {
            self.listeners.notify(&SelectionEvent::SavedSelectionsChanged {
                count: self.saved.len(),
            });
        }
        changed
    }

    fn mode_changed(&self, changed: bool) -> bool {
        if changed {
            self.listeners.notify(&SelectionEvent::ModeChanged);
        }
        changed
    }

    // --- Commands ---

    pub fn select(
        &mut self,
        ids: impl IntoIterator<Item = ChainId>,
        mode: Option<SelectionMode>,
    ) -> bool {
        self.apply(SelectionCommand::Select {
            ids: ids.into_iter().collect(),
            mode,
        })
    }

    pub fn deselect(&mut self, ids: impl IntoIterator<Item = ChainId>) -> bool {
        self.apply(SelectionCommand::Deselect {
            ids: ids.into_iter().collect(),
        })
    }

    pub fn toggle(&mut self, ids: impl IntoIterator<Item = ChainId>) -> bool {
        self.apply(SelectionCommand::Toggle {
            ids: ids.into_iter().collect(),
        })
    }

    pub fn clear(&mut self) -> bool {
        self.apply(SelectionCommand::Clear)
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = ChainId>) -> bool {
        self.apply(SelectionCommand::SelectAll {
            ids: ids.into_iter().collect(),
        })
    }

    pub fn invert(&mut self, universe: impl IntoIterator<Item = ChainId>) -> bool {
        self.apply(SelectionCommand::Invert {
            universe: universe.into_iter().collect(),
        })
    }

    pub fn undo(&mut self) -> bool {
        self.apply(SelectionCommand::Undo)
    }

    pub fn redo(&mut self) -> bool {
        self.apply(SelectionCommand::Redo)
    }

    pub fn pin(&mut self, ids: impl IntoIterator<Item = ChainId>) -> bool {
        self.apply(SelectionCommand::Pin {
            ids: ids.into_iter().collect(),
        })
    }

    pub fn unpin(&mut self, ids: impl IntoIterator<Item = ChainId>) -> bool {
        self.apply(SelectionCommand::Unpin {
            ids: ids.into_iter().collect(),
        })
    }

    pub fn toggle_pin(&mut self, id: ChainId) -> bool {
        self.apply(SelectionCommand::TogglePin { id })
    }

    pub fn clear_pins(&mut self) -> bool {
        self.apply(SelectionCommand::ClearPins)
    }

    /// Snapshot the current selection under a name.
    ///
    /// Returns the new saved selection's ID, or `None` if nothing is selected.
    pub fn save_selection(
        &mut self,
        name: impl Into<String>,
        color: Option<Rgb>,
    ) -> Option<String> {
        if self.selected.is_empty() {
            return None;
        }
        let id = Uuid::new_v4().to_string();
        let color = color.unwrap_or_else(|| self.palette.color_at(self.saved.len()));
        self.saved.push(SavedSelection {
            id: id.clone(),
            name: name.into(),
            chain_ids: self.selected_ids(),
            color,
            created_at: Utc::now(),
        });
        self.saved_changed(true);
        Some(id)
    }

    pub fn load_selection(&mut self, id: &str) -> bool {
        self.apply(SelectionCommand::LoadSelection { id: id.to_string() })
    }

    pub fn delete_saved_selection(&mut self, id: &str) -> bool {
        self.apply(SelectionCommand::DeleteSavedSelection { id: id.to_string() })
    }

    pub fn rename_saved_selection(&mut self, id: &str, name: impl Into<String>) -> bool {
        self.apply(SelectionCommand::RenameSavedSelection {
            id: id.to_string(),
            name: name.into(),
        })
    }

    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        self.apply(SelectionCommand::SetMode(mode))
    }

    pub fn set_tool_mode(&mut self, tool_mode: SelectionToolMode) -> bool {
        self.apply(SelectionCommand::SetToolMode(tool_mode))
    }

    // --- Reads ---

    pub fn selected(&self) -> &HashSet<ChainId> {
        &self.selected
    }

    /// Selected IDs, sorted
    pub fn selected_ids(&self) -> Vec<ChainId> {
        sorted(&self.selected)
    }

    pub fn is_selected(&self, id: &ChainId) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn pinned(&self) -> &HashSet<ChainId> {
        &self.pinned
    }

    pub fn is_pinned(&self, id: &ChainId) -> bool {
        self.pinned.contains(id)
    }

    pub fn saved_selections(&self) -> &[SavedSelection] {
        &self.saved
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn tool_mode(&self) -> SelectionToolMode {
        self.tool_mode
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &HistoryRing<HashSet<ChainId>> {
        &self.history
    }

    // --- Persistence ---

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selected: self.selected_ids(),
            pinned: sorted(&self.pinned),
            saved_selections: self.saved.clone(),
            mode: self.mode,
            tool_mode: self.tool_mode,
        }
    }

    /// Replace all state from a snapshot; history restarts at the restored selection
    pub fn restore(&mut self, snapshot: SelectionSnapshot) {
        self.selected = snapshot.selected.into_iter().collect();
        self.pinned = snapshot.pinned.into_iter().collect();
        self.saved = snapshot.saved_selections;
        self.mode = snapshot.mode;
        self.tool_mode = snapshot.tool_mode;
        self.history.reset(self.selected.clone());
        self.listeners.notify(&SelectionEvent::SelectionChanged {
            size: self.selected.len(),
        });
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&SelectionEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

fn compose(current: &ChainIdSet, ids: &[ChainId], mode: SelectionMode) -> ChainIdSet {
    match mode {
        SelectionMode::Replace => ids.iter().cloned().collect(),
        SelectionMode::Add => current.iter().chain(ids).cloned().collect(),
        SelectionMode::Remove => {
            let mut next = current.clone();
            for id in ids {
                next.remove(id);
            }
            next
        }
        SelectionMode::Toggle => {
            let mut next = current.clone();
            for id in ids {
                if !next.remove(id) {
                    next.insert(id.clone());
                }
            }
            next
        }
    }
}

fn sorted(set: &ChainIdSet) -> Vec<ChainId> {
    let mut ids: Vec<ChainId> = set.iter().cloned().collect();
    ids.sort();
    ids
}
