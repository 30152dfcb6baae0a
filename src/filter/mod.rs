//! Filter pipeline and outlier detection
//!
//! Stages run in a fixed order (task type, score range, outlier, selection),
//! each narrowing the candidate set. All stages combine with AND semantics.

mod outlier;
mod pipeline;
mod types;

pub use outlier::{detect_outliers, iqr_bounds, OutlierBounds, OutlierReport, MIN_OUTLIER_POINTS};
pub use pipeline::apply_filters;
pub use types::{FilterState, OutlierFilter, ScoreRange, SelectionFilter, TaskTypeFilter};
