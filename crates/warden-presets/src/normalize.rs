//! Wire-format normalization
//!
//! Authored condition trees can carry redundant logical structure: nested
//! disjunctions, duplicate branches, single-branch combinators. The
//! evaluator's wire format expects those collapsed. Normalization is
//! deterministic and purely structural - it never reorders children, so a
//! normalized tree can be diffed or hashed by downstream consumers.

use warden_core::condition::{Condition, Operator, ParamType};

/// Normalize a condition tree for the evaluator's wire format.
///
/// Bottom-up: splice same-operator `And`/`Or` children, drop duplicate
/// logical siblings (first occurrence wins), and collapse single-child
/// `And`/`Or` nodes into their child. `Nor` children are deduplicated but
/// never spliced or collapsed - `Nor` of one branch is a negation, not a
/// pass-through.
pub fn normalize_condition(condition: Condition) -> Condition {
    let mut children: Vec<Condition> = condition
        .children
        .into_iter()
        .map(normalize_condition)
        .collect();

    let is_plain_logical = condition.operator.is_logical()
        && condition.param_type == ParamType::None
        && condition.comp_value.is_none();

    if is_plain_logical {
        if matches!(condition.operator, Operator::And | Operator::Or) {
            children = children
                .into_iter()
                .flat_map(|child| {
                    let same_shape = child.operator == condition.operator
                        && child.param_type == ParamType::None
                        && child.comp_value.is_none();
                    if same_shape {
                        child.children
                    } else {
                        vec![child]
                    }
                })
                .collect();
        }

        children = dedup_preserving_order(children);

        if matches!(condition.operator, Operator::And | Operator::Or) && children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
    }

    Condition {
        children,
        ..condition
    }
}

fn dedup_preserving_order(children: Vec<Condition>) -> Vec<Condition> {
    let mut unique: Vec<Condition> = Vec::with_capacity(children.len());
    for child in children {
        if !unique.contains(&child) {
            unique.push(child);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;
    use warden_core::condition::CompValue;

    fn leaf(tag: u8) -> Condition {
        Condition::leaf(
            ParamType::Static,
            Operator::EqualTo,
            CompValue::Bytes(Bytes::from(vec![tag; 32])),
        )
    }

    #[test]
    fn nested_disjunctions_are_spliced() {
        let nested = Condition::logical(
            Operator::Or,
            vec![
                Condition::logical(Operator::Or, vec![leaf(1), leaf(2)]),
                leaf(3),
            ],
        );
        let normalized = normalize_condition(nested);
        assert_eq!(normalized.children, vec![leaf(1), leaf(2), leaf(3)]);
    }

    #[test]
    fn duplicate_branches_collapse_to_the_first() {
        let condition = Condition::logical(Operator::Or, vec![leaf(1), leaf(2), leaf(1)]);
        let normalized = normalize_condition(condition);
        assert_eq!(normalized.children, vec![leaf(1), leaf(2)]);
    }

    #[test]
    fn duplicate_collapse_can_unwrap_the_combinator() {
        let condition = Condition::logical(Operator::Or, vec![leaf(1), leaf(1)]);
        assert_eq!(normalize_condition(condition), leaf(1));
    }

    #[test]
    fn nor_is_never_collapsed_into_its_child() {
        let condition = Condition::logical(Operator::Nor, vec![leaf(1)]);
        let normalized = normalize_condition(condition.clone());
        assert_eq!(normalized, condition);
    }

    #[test]
    fn structural_nodes_are_untouched() {
        let condition = Condition::with_children(
            ParamType::Tuple,
            Operator::Matches,
            vec![leaf(1), leaf(1)],
        );
        let normalized = normalize_condition(condition.clone());
        // Matches children are positional; equal siblings must survive.
        assert_eq!(normalized, condition);
    }

    #[test]
    fn normalization_recurses_into_structure() {
        let condition = Condition::with_children(
            ParamType::Tuple,
            Operator::Matches,
            vec![Condition::logical(
                Operator::Or,
                vec![
                    Condition::logical(Operator::Or, vec![leaf(1), leaf(2)]),
                    leaf(3),
                ],
            )],
        );
        let normalized = normalize_condition(condition);
        assert_eq!(normalized.children[0].children.len(), 3);
    }
}
