//! The Inspector engine

use super::view::InspectorView;
use crate::chain::{ChainId, ChainSet};
use crate::color::{ColorConfig, Rgb};
use crate::config::{ConfigError, InspectorConfig};
use crate::data::{DataStore, FetchOutcome};
use crate::filter::{apply_filters, FilterState};
use crate::grouping::{compute_groups, GroupIndex, GroupingStrategy};
use crate::repository::{ChainRepository, QueryCriteria, RepositoryError};
use crate::selection::{
    command_for_key, KeyEvent, SelectionCommand, SelectionManager, SelectionSnapshot,
};
use crate::storage::{SessionPersistence, SessionStore, StorageError};
use std::sync::Arc;
use thiserror::Error;

const KEY_CRITERIA: &str = "criteria";
const KEY_FILTERS: &str = "filters";
const KEY_GROUPING: &str = "grouping";
const KEY_COLOR: &str = "color";
const KEY_SELECTION: &str = "selection";
const KEY_SCORE_COLUMN: &str = "score_column";

/// Errors that can occur in Inspector operations
#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for Inspector operations
pub type InspectorResult<T> = Result<T, InspectorError>;

/// What `Inspector::restore` found in the session store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    /// Snapshot names that were present, valid and unexpired
    pub restored: Vec<&'static str>,
    /// Outcome of refetching restored criteria, if any were restored
    pub fetch: Option<FetchOutcome>,
}

/// Composes the data store, filter state, grouping strategy, color config
/// and selection manager.
///
/// Setters persist their engine's state through the debounced session
/// adapter. Raw chain data is never persisted. Rendering reads go through
/// [`Inspector::view`], which derives everything from one chain snapshot.
pub struct Inspector {
    config: InspectorConfig,
    data: Arc<DataStore>,
    filters: FilterState,
    grouping: Option<GroupingStrategy>,
    color: ColorConfig,
    selection: SelectionManager,
    score_column: String,
    hovered: Option<ChainId>,
    persistence: SessionPersistence,
}

impl Inspector {
    pub fn new(
        repository: Arc<dyn ChainRepository>,
        store: Arc<dyn SessionStore>,
        config: InspectorConfig,
    ) -> Self {
        let config = config.normalized();
        let color = ColorConfig::default();
        let persistence = SessionPersistence::new(store, config.session_key_prefix.clone())
            .with_debounce(config.persist_debounce())
            .with_max_age(config.session_max_age());
        Self {
            data: Arc::new(DataStore::new(repository, config.refetch_dedup())),
            filters: FilterState::default(),
            grouping: None,
            selection: SelectionManager::new(config.history_capacity)
                .with_palette(color.categorical_palette),
            color,
            score_column: config.default_score_column.clone(),
            hovered: None,
            persistence,
            config,
        }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn data(&self) -> &Arc<DataStore> {
        &self.data
    }

    pub fn persistence(&self) -> &SessionPersistence {
        &self.persistence
    }

    /// The current chain set snapshot
    pub fn chains(&self) -> Arc<ChainSet> {
        self.data.chains()
    }

    // --- Data ---

    /// Change the repository criteria and refetch
    pub async fn set_criteria(&self, criteria: QueryCriteria) -> InspectorResult<FetchOutcome> {
        self.persistence.schedule(KEY_CRITERIA, &criteria);
        Ok(self.data.set_filters(criteria).await?)
    }

    /// Refetch the current criteria
    pub async fn refresh(&self) -> InspectorResult<FetchOutcome> {
        Ok(self.data.refresh().await?)
    }

    // --- Filters ---

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.persistence.schedule(KEY_FILTERS, &self.filters);
    }

    pub fn update_filters(&mut self, update: impl FnOnce(&mut FilterState)) {
        let mut filters = self.filters;
        update(&mut filters);
        self.set_filters(filters);
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(FilterState::default());
    }

    // --- Grouping ---

    pub fn grouping(&self) -> Option<&GroupingStrategy> {
        self.grouping.as_ref()
    }

    /// Set the active strategy; `None` disables grouping
    pub fn set_grouping(&mut self, strategy: Option<GroupingStrategy>) {
        self.grouping = strategy;
        self.persistence.schedule(KEY_GROUPING, &self.grouping);
    }

    // --- Color ---

    pub fn color_config(&self) -> &ColorConfig {
        &self.color
    }

    /// Replace the color config; `unselected_opacity` is normalized into [0, 1]
    pub fn set_color_config(&mut self, color: ColorConfig) {
        self.color = color.normalized();
        self.persistence.schedule(KEY_COLOR, &self.color);
    }

    pub fn score_column(&self) -> &str {
        &self.score_column
    }

    /// Score column used for filtering, outliers and score coloring
    pub fn set_score_column(&mut self, column: impl Into<String>) {
        self.score_column = column.into();
        self.persistence.schedule(KEY_SCORE_COLUMN, &self.score_column);
    }

    pub fn hovered(&self) -> Option<&ChainId> {
        self.hovered.as_ref()
    }

    /// Hover is transient and never persisted
    pub fn set_hovered(&mut self, id: Option<ChainId>) {
        self.hovered = id;
    }

    // --- Selection ---

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Run a selection command. Returns true if state changed.
    pub fn apply(&mut self, command: SelectionCommand) -> bool {
        let changed = self.selection.apply(command);
        if changed {
            self.persistence
                .schedule(KEY_SELECTION, &self.selection.snapshot());
        }
        changed
    }

    /// Run the command bound to a key press, if any
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match command_for_key(event) {
            Some(command) => self.apply(command),
            None => false,
        }
    }

    /// Select every chain that passes the current filters
    pub fn select_all_filtered(&mut self) -> bool {
        let ids = self.filtered_ids();
        self.apply(SelectionCommand::SelectAll { ids })
    }

    /// Invert the selection within the chains that pass the current filters
    pub fn invert_filtered(&mut self) -> bool {
        let universe = self.filtered_ids();
        self.apply(SelectionCommand::Invert { universe })
    }

    /// Save the current selection; returns the new saved selection's ID.
    ///
    /// `None` picks the next palette color.
    pub fn save_selection(
        &mut self,
        name: impl Into<String>,
        color: Option<Rgb>,
    ) -> Option<String> {
        let saved = self.apply(SelectionCommand::SaveSelection {
            name: name.into(),
            color,
        });
        if !saved {
            return None;
        }
        self.selection.saved_selections().last().map(|s| s.id.clone())
    }

    fn filtered_ids(&self) -> Vec<ChainId> {
        self.filtered_ids_in(&self.data.chains())
    }

    fn filtered_ids_in(&self, chains: &ChainSet) -> Vec<ChainId> {
        apply_filters(chains, &self.filters, &self.score_column, self.selection.selected())
            .into_iter()
            .map(|c| c.chain_id.clone())
            .collect()
    }

    // --- Reads ---

    /// Derive groups, filtered chains and colors from one chain snapshot
    pub fn view(&self) -> InspectorView {
        let chains = self.data.chains();
        let groups = match &self.grouping {
            Some(strategy) => GroupIndex::new(compute_groups(
                &chains,
                strategy,
                self.color.categorical_palette,
            )),
            None => GroupIndex::default(),
        };
        let filtered = self.filtered_ids_in(&chains);
        InspectorView {
            chains,
            groups,
            filtered,
            selected: self.selection.selected().clone(),
            pinned: self.selection.pinned().clone(),
            hovered: self.hovered.clone(),
            color: self.color.clone(),
            score_column: self.score_column.clone(),
            baseline_opacity: self.config.baseline_opacity,
            active_filter_count: self.filters.active_filter_count(),
        }
    }

    // --- Session ---

    /// Apply every persisted snapshot that is present, valid and unexpired.
    ///
    /// Absent or discarded snapshots leave the engine defaults in place.
    /// Restored criteria are refetched; a failed refetch is recorded on the
    /// data store and returned.
    pub async fn restore(&mut self) -> InspectorResult<RestoreReport> {
        let mut report = RestoreReport::default();

        if let Some(filters) = self.persistence.load::<FilterState>(KEY_FILTERS) {
            self.filters = filters;
            report.restored.push(KEY_FILTERS);
        }
        if let Some(grouping) = self.persistence.load::<Option<GroupingStrategy>>(KEY_GROUPING) {
            self.grouping = grouping;
            report.restored.push(KEY_GROUPING);
        }
        if let Some(color) = self.persistence.load::<ColorConfig>(KEY_COLOR) {
            let color = color.normalized();
            self.selection =
                std::mem::take(&mut self.selection).with_palette(color.categorical_palette);
            self.color = color;
            report.restored.push(KEY_COLOR);
        }
        if let Some(column) = self.persistence.load::<String>(KEY_SCORE_COLUMN) {
            self.score_column = column;
            report.restored.push(KEY_SCORE_COLUMN);
        }
        if let Some(snapshot) = self.persistence.load::<SelectionSnapshot>(KEY_SELECTION) {
            self.selection.restore(snapshot);
            report.restored.push(KEY_SELECTION);
        }
        if let Some(criteria) = self.persistence.load::<QueryCriteria>(KEY_CRITERIA) {
            report.restored.push(KEY_CRITERIA);
            tracing::info!(restored = ?report.restored, "session restored");
            report.fetch = Some(self.data.set_filters(criteria).await?);
            return Ok(report);
        }

        tracing::info!(restored = ?report.restored, "session restored");
        Ok(report)
    }

    /// Write pending session snapshots now
    pub fn flush_session(&self) -> usize {
        self.persistence.flush()
    }

    /// Remove all persisted session state. In-memory state is untouched.
    pub fn clear_session(&self) -> InspectorResult<usize> {
        Ok(self.persistence.clear()?)
    }
}
