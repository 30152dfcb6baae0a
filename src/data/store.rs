//! DataStore: owns the fetched chain set and its refetch lifecycle
//!
//! Fetches are tagged with the criteria that started them. A result is only
//! applied if those criteria are still current when it resolves; a result
//! for superseded criteria is discarded whatever its arrival order.

use crate::chain::ChainSet;
use crate::notify::{Listeners, SubscriptionId};
use crate::repository::{ChainRepository, QueryCriteria, QueryResponse, RepositoryError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Events emitted by the data store
#[derive(Debug, Clone, PartialEq)]
pub enum DataEvent {
    /// A fetch was issued for the given criteria key
    FetchStarted { criteria_key: String },
    /// A fetch resolved for the current criteria and replaced the chain set
    Loaded { chain_count: usize },
    /// A fetch for the current criteria failed; the previous chain set is kept
    FetchFailed { message: String },
}

/// What happened to a `set_filters` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result replaced the chain set
    Applied { chain_count: usize },
    /// Identical criteria were issued within the dedup window
    Skipped,
    /// The criteria changed while the fetch was in flight
    Discarded,
}

/// Selector values reported by the repository alongside a fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailableValues {
    pub metrics: Vec<String>,
    pub models: Vec<String>,
    pub datasets: Vec<String>,
    pub runs: Vec<String>,
    pub preprocessings: Vec<String>,
}

impl AvailableValues {
    fn from_response(response: &QueryResponse) -> Self {
        Self {
            metrics: response.available_metrics.clone(),
            models: response.available_models.clone(),
            datasets: response.available_datasets.clone(),
            runs: response.available_runs.clone(),
            preprocessings: response.available_preprocessings.clone(),
        }
    }
}

#[derive(Debug)]
struct DataState {
    criteria: QueryCriteria,
    chains: Arc<ChainSet>,
    available: AvailableValues,
    total: usize,
    /// Issue token of the latest fetch, while its result is still awaited
    loading_token: Option<u64>,
    next_token: u64,
    /// Key and issue time of the last fetch, for dedup
    last_issued: Option<(String, Instant)>,
    last_error: Option<String>,
}

/// The authoritative in-memory chain set.
///
/// Methods take `&self`, so several fetches may be awaited concurrently;
/// the lock is never held across an await point.
pub struct DataStore {
    repository: Arc<dyn ChainRepository>,
    dedup_window: Duration,
    state: Mutex<DataState>,
    listeners: Listeners<DataEvent>,
}

impl DataStore {
    pub fn new(repository: Arc<dyn ChainRepository>, dedup_window: Duration) -> Self {
        Self {
            repository,
            dedup_window,
            state: Mutex::new(DataState {
                criteria: QueryCriteria::default(),
                chains: Arc::new(ChainSet::empty()),
                available: AvailableValues::default(),
                total: 0,
                loading_token: None,
                next_token: 0,
                last_issued: None,
                last_error: None,
            }),
            listeners: Listeners::new(),
        }
    }

    /// Change the query criteria and refetch.
    ///
    /// While the fetch is in flight the previous chain set stays visible and
    /// `is_loading` is true. On failure the chain set is left unchanged, the
    /// error is recorded in `last_error` and returned.
    pub async fn set_filters(
        &self,
        criteria: QueryCriteria,
    ) -> Result<FetchOutcome, RepositoryError> {
        self.fetch(criteria, false).await
    }

    /// Refetch the current criteria, ignoring the dedup window
    pub async fn refresh(&self) -> Result<FetchOutcome, RepositoryError> {
        let criteria = self.criteria();
        self.fetch(criteria, true).await
    }

    async fn fetch(
        &self,
        criteria: QueryCriteria,
        force: bool,
    ) -> Result<FetchOutcome, RepositoryError> {
        let key = criteria.cache_key();
        let token = {
            let mut state = self.lock();
            state.criteria = criteria.clone();
            if !force && self.is_duplicate(&state, &key) {
                tracing::debug!(criteria = %key, "skipping duplicate fetch");
                return Ok(FetchOutcome::Skipped);
            }
            let token = state.next_token;
            state.next_token += 1;
            state.loading_token = Some(token);
            state.last_issued = Some((key.clone(), Instant::now()));
            token
        };
        tracing::debug!(criteria = %key, "fetching chains");
        self.listeners.notify(&DataEvent::FetchStarted {
            criteria_key: key.clone(),
        });

        let result = self.repository.query(&criteria).await;

        let applied = {
            let mut state = self.lock();
            if state.criteria.cache_key() != key {
                tracing::debug!(criteria = %key, "discarding result for superseded criteria");
                return Ok(FetchOutcome::Discarded);
            }
            // An earlier fetch for the same key must not end a later one's loading
            if state.loading_token == Some(token) {
                state.loading_token = None;
            }
            match result {
                Ok(response) => {
                    let available = AvailableValues::from_response(&response);
                    let total = response.total;
                    let chains = ChainSet::new(response.chains);
                    let chain_count = chains.len();
                    state.chains = Arc::new(chains);
                    state.available = available;
                    state.total = total;
                    state.last_error = None;
                    tracing::info!(chain_count, total, "chain set replaced");
                    Ok(chain_count)
                }
                Err(err) => {
                    state.last_error = Some(err.to_string());
                    // A failed key may be retried immediately
                    state.last_issued = None;
                    tracing::warn!(error = %err, "chain fetch failed; keeping previous data");
                    Err(err)
                }
            }
        };

        match applied {
            Ok(chain_count) => {
                self.listeners.notify(&DataEvent::Loaded { chain_count });
                Ok(FetchOutcome::Applied { chain_count })
            }
            Err(err) => {
                self.listeners.notify(&DataEvent::FetchFailed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn is_duplicate(&self, state: &DataState, key: &str) -> bool {
        match &state.last_issued {
            Some((last_key, at)) => last_key == key && at.elapsed() < self.dedup_window,
            None => false,
        }
    }

    /// The current chain set.
    ///
    /// The returned `Arc` is a consistent snapshot; derive everything for one
    /// render from the same snapshot.
    pub fn chains(&self) -> Arc<ChainSet> {
        self.lock().chains.clone()
    }

    pub fn criteria(&self) -> QueryCriteria {
        self.lock().criteria.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading_token.is_some()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Dismiss the current error banner
    pub fn clear_error(&self) {
        self.lock().last_error = None;
    }

    /// Total matching chains reported by the repository (before any limit)
    pub fn total(&self) -> usize {
        self.lock().total
    }

    pub fn available(&self) -> AvailableValues {
        self.lock().available.clone()
    }

    /// Distinct dataset names in the unfiltered chain set
    pub fn datasets(&self) -> Vec<String> {
        self.chains().datasets().to_vec()
    }

    /// Distinct model classes in the unfiltered chain set
    pub fn model_classes(&self) -> Vec<String> {
        self.chains().model_classes().to_vec()
    }

    /// Distinct score column names in the unfiltered chain set
    pub fn metrics(&self) -> Vec<String> {
        self.chains().metrics().to_vec()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&DataEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn lock(&self) -> MutexGuard<'_, DataState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("dedup_window", &self.dedup_window)
            .field("state", &*self.lock())
            .finish()
    }
}
