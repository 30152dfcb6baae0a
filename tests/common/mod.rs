//! Common test utilities for Chain Inspector integration tests
//!
//! Provides a deterministic chain export and helpers to write it to disk.

#![allow(dead_code, unused_imports)]

pub mod fixtures;

pub use fixtures::{sample_chains, write_export, CLASSIFICATION_START, OUTLIER_ID, NULL_SCORE_ID};
