//! Rule-based grouping
//!
//! Membership is not exclusive: a chain joins every group whose rules it
//! satisfies. A rule that cannot be evaluated is false, never an error.

use super::types::{Combinator, ExpressionGroup, ExpressionRule, Group, RuleOperator};
use crate::chain::{Chain, ChainSet};
use crate::color::CategoricalPalette;

pub(super) fn group_by_expression(
    chains: &ChainSet,
    definitions: &[ExpressionGroup],
    palette: CategoricalPalette,
) -> Vec<Group> {
    definitions
        .iter()
        .enumerate()
        .map(|(i, definition)| Group {
            id: format!("expr:{i}"),
            label: definition.name.clone(),
            color: definition.color.unwrap_or_else(|| palette.color_at(i)),
            chain_ids: chains
                .iter()
                .filter(|c| matches_group(c, definition))
                .map(|c| c.chain_id.clone())
                .collect(),
        })
        .collect()
}

/// Check a chain against a group's rules.
///
/// A group without rules matches nothing.
pub fn matches_group(chain: &Chain, group: &ExpressionGroup) -> bool {
    if group.rules.is_empty() {
        return false;
    }
    match group.combinator {
        Combinator::And => group.rules.iter().all(|r| evaluate_rule(chain, r)),
        Combinator::Or => group.rules.iter().any(|r| evaluate_rule(chain, r)),
    }
}

/// Evaluate one rule against a chain.
///
/// Missing fields compare as the empty string. String comparisons are exact
/// for `eq`/`neq` and case-insensitive for `contains`/`not_contains`.
/// Numeric operators are false when either side is not a number.
pub fn evaluate_rule(chain: &Chain, rule: &ExpressionRule) -> bool {
    let actual = chain.field(&rule.field).unwrap_or_default();

    if rule.operator.is_numeric() {
        let (Some(lhs), Some(rhs)) = (parse_number(&actual), parse_number(&rule.value)) else {
            return false;
        };
        return match rule.operator {
            RuleOperator::Gt => lhs > rhs,
            RuleOperator::Lt => lhs < rhs,
            RuleOperator::Gte => lhs >= rhs,
            RuleOperator::Lte => lhs <= rhs,
            _ => false,
        };
    }

    match rule.operator {
        RuleOperator::Eq => actual == rule.value,
        RuleOperator::Neq => actual != rule.value,
        RuleOperator::Contains => actual
            .to_lowercase()
            .contains(&rule.value.to_lowercase()),
        RuleOperator::NotContains => !actual
            .to_lowercase()
            .contains(&rule.value.to_lowercase()),
        _ => false,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainId, TaskType};
    use crate::color::Rgb;

    fn chain() -> Chain {
        Chain::new("c1", "corn", "RandomForest", TaskType::Regression).with_score("cv_score", 0.8)
    }

    fn rule(field: &str, operator: RuleOperator, value: &str) -> ExpressionRule {
        ExpressionRule::new(field, operator, value)
    }

    #[test]
    fn string_operators() {
        let c = chain();
        assert!(evaluate_rule(&c, &rule("dataset_name", RuleOperator::Eq, "corn")));
        assert!(!evaluate_rule(&c, &rule("dataset_name", RuleOperator::Eq, "Corn")));
        assert!(evaluate_rule(&c, &rule("dataset_name", RuleOperator::Neq, "wheat")));
        assert!(evaluate_rule(&c, &rule("model_class", RuleOperator::Contains, "forest")));
        assert!(evaluate_rule(&c, &rule("model_class", RuleOperator::NotContains, "svr")));
    }

    #[test]
    fn numeric_operators() {
        let c = chain();
        assert!(evaluate_rule(&c, &rule("cv_score", RuleOperator::Gt, "0.5")));
        assert!(evaluate_rule(&c, &rule("cv_score", RuleOperator::Gte, "0.8")));
        assert!(evaluate_rule(&c, &rule("cv_score", RuleOperator::Lte, " 0.8 ")));
        assert!(!evaluate_rule(&c, &rule("cv_score", RuleOperator::Lt, "0.8")));
    }

    #[test]
    fn unparseable_numbers_evaluate_false() {
        let c = chain();
        assert!(!evaluate_rule(&c, &rule("cv_score", RuleOperator::Gt, "abc")));
        assert!(!evaluate_rule(&c, &rule("dataset_name", RuleOperator::Lt, "5")));
        assert!(!evaluate_rule(&c, &rule("missing", RuleOperator::Gte, "0")));
    }

    #[test]
    fn missing_field_compares_as_empty() {
        let c = chain();
        assert!(evaluate_rule(&c, &rule("branch_path", RuleOperator::Eq, "")));
        assert!(evaluate_rule(&c, &rule("branch_path", RuleOperator::NotContains, "x")));
    }

    #[test]
    fn combinators_and_empty_rules() {
        let c = chain();
        let both = vec![
            rule("dataset_name", RuleOperator::Eq, "corn"),
            rule("cv_score", RuleOperator::Gt, "0.9"),
        ];
        assert!(!matches_group(&c, &ExpressionGroup::new("and", Combinator::And, both.clone())));
        assert!(matches_group(&c, &ExpressionGroup::new("or", Combinator::Or, both)));
        assert!(!matches_group(&c, &ExpressionGroup::new("none", Combinator::Or, Vec::new())));
    }

    #[test]
    fn chains_may_join_several_groups() {
        let set = ChainSet::new(vec![
            chain(),
            Chain::new("c2", "wheat", "PLS", TaskType::Regression).with_score("cv_score", 0.2),
        ]);
        let red = Rgb::new(255, 0, 0);
        let definitions = vec![
            ExpressionGroup::new(
                "corn",
                Combinator::And,
                vec![rule("dataset_name", RuleOperator::Eq, "corn")],
            )
            .with_color(red),
            ExpressionGroup::new(
                "any score",
                Combinator::And,
                vec![rule("cv_score", RuleOperator::Gte, "0")],
            ),
        ];
        let palette = CategoricalPalette::default();
        let groups = group_by_expression(&set, &definitions, palette);

        assert_eq!(groups[0].chain_ids, [ChainId::new("c1")]);
        assert_eq!(groups[0].color, red);
        assert_eq!(groups[1].len(), 2);
        assert_eq!(groups[1].color, palette.color_at(1));
    }
}
