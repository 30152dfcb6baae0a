//! Grouping engine
//!
//! Partitions a chain set into named, colored groups. Exactly one strategy
//! is active at a time; `compute_groups` dispatches on it. Every strategy is
//! a pure function of (chain set, strategy parameters).

mod branch;
mod buckets;
mod expression;
mod index;
mod range;
mod top_k;
mod types;
mod variable;

pub use expression::{evaluate_rule, matches_group};
pub use index::GroupIndex;
pub use types::{
    Combinator, ExpressionGroup, ExpressionRule, Group, GroupMode, GroupingStrategy, RuleOperator,
};

use crate::chain::ChainSet;
use crate::color::CategoricalPalette;

/// Label for chains whose grouping field is null or empty
pub const EMPTY_LABEL: &str = "(empty)";
/// Label for chains without a branch path
pub const NO_BRANCH_LABEL: &str = "(no branch)";
/// Label of the remainder group in top-k grouping
pub const OTHERS_LABEL: &str = "Others";

/// Run the active strategy over a chain set
pub fn compute_groups(
    chains: &ChainSet,
    strategy: &GroupingStrategy,
    palette: CategoricalPalette,
) -> Vec<Group> {
    let groups = match strategy {
        GroupingStrategy::ByVariable { field } => {
            variable::group_by_variable(chains, field, palette)
        }
        GroupingStrategy::ByRange { column, bins } => {
            range::group_by_range(chains, column, *bins, palette)
        }
        GroupingStrategy::ByTopK { column, k, ascending } => {
            top_k::group_by_top_k(chains, column, *k, *ascending, palette)
        }
        GroupingStrategy::ByBranch => branch::group_by_branch(chains, palette),
        GroupingStrategy::ByExpression { groups } => {
            expression::group_by_expression(chains, groups, palette)
        }
    };
    tracing::debug!(
        mode = ?strategy.mode(),
        chains = chains.len(),
        groups = groups.len(),
        "computed groups"
    );
    groups
}
