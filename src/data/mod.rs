//! Data store: the authoritative chain set for the current query criteria

mod store;

pub use store::{AvailableValues, DataEvent, DataStore, FetchOutcome};
