//! Chain data model
//!
//! A chain is one trained pipeline variant with its scores. Chains are
//! immutable once fetched and are always handled through a shared `ChainSet`.

mod model;
mod set;

pub use model::{Chain, ChainId, TaskType};
pub use set::ChainSet;
