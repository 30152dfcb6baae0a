//! Inspector facade: every engine wired to one chain repository and one
//! session store

mod engine;
mod view;

#[cfg(test)]
mod tests;

pub use engine::{Inspector, InspectorError, InspectorResult, RestoreReport};
pub use view::InspectorView;
