//! Entry merging
//!
//! Multiple function-scoped entries addressing the same (target, selector)
//! pair collapse into one by logical OR of their conditions. The merge is a
//! pure fold over the compiled entry list: first-seen order is preserved,
//! fully-cleared entries pass through unchanged, and entries whose execution
//! flags differ stay separate - the same pair may legitimately appear twice
//! with different execution semantics (the finalizer decides whether that
//! survives).

use crate::entries::CompiledEntry;
use warden_core::condition::{Condition, Operator, ParamType};

/// Merge function-scoped entries that address the same (target, selector)
/// pair with identical execution flags.
///
/// Condition merge semantics: absence of a condition already matches
/// everything, so it is absorptive - if either side lacks a condition the
/// merged entry has none. When both sides carry one, the disjunction is
/// flattened: a side whose top-level operator is already `Or` contributes
/// its children directly, so repeated merges never build one-sided trees.
pub fn merge_function_entries(entries: Vec<CompiledEntry>) -> Vec<CompiledEntry> {
    entries.into_iter().fold(Vec::new(), |mut merged, entry| {
        match entry {
            CompiledEntry::Target { .. } => merged.push(entry),
            CompiledEntry::Function {
                address,
                selector,
                condition,
                send,
                delegatecall,
            } => {
                let slot = merged.iter().position(|existing| {
                    matches!(
                        existing,
                        CompiledEntry::Function {
                            address: a,
                            selector: s,
                            send: sd,
                            delegatecall: dc,
                            ..
                        } if *a == address && *s == selector && *sd == send && *dc == delegatecall
                    )
                });
                match slot {
                    Some(index) => {
                        if let CompiledEntry::Function {
                            condition: existing,
                            ..
                        } = &mut merged[index]
                        {
                            *existing = merge_conditions(existing.take(), condition);
                        }
                    }
                    None => merged.push(CompiledEntry::Function {
                        address,
                        selector,
                        condition,
                        send,
                        delegatecall,
                    }),
                }
            }
        }
        merged
    })
}

fn merge_conditions(a: Option<Condition>, b: Option<Condition>) -> Option<Condition> {
    match (a, b) {
        (Some(a), Some(b)) => Some(or_join(a, b)),
        // No condition matches everything already.
        _ => None,
    }
}

fn or_join(a: Condition, b: Condition) -> Condition {
    let mut children = Vec::new();
    splice_or(&mut children, a);
    splice_or(&mut children, b);
    Condition::logical(Operator::Or, children)
}

fn splice_or(children: &mut Vec<Condition>, condition: Condition) {
    if condition.operator == Operator::Or
        && condition.param_type == ParamType::None
        && condition.comp_value.is_none()
    {
        children.extend(condition.children);
    } else {
        children.push(condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Address, Selector};
    use warden_core::condition::CompValue;

    const TARGET: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");
    const SELECTOR: Selector = Selector::new([0xa9, 0x05, 0x9c, 0xbb]);

    fn entry(condition: Option<Condition>, send: bool) -> CompiledEntry {
        CompiledEntry::Function {
            address: TARGET,
            selector: SELECTOR,
            condition,
            send,
            delegatecall: false,
        }
    }

    fn leaf(tag: u8) -> Condition {
        Condition::leaf(
            ParamType::Static,
            Operator::EqualTo,
            CompValue::Bytes(alloy_primitives::Bytes::from(vec![tag; 32])),
        )
    }

    #[test]
    fn three_way_merge_stays_flat() {
        let merged = merge_function_entries(vec![
            entry(Some(leaf(1)), false),
            entry(Some(leaf(2)), false),
            entry(Some(leaf(3)), false),
        ]);
        assert_eq!(merged.len(), 1);
        let CompiledEntry::Function { condition, .. } = &merged[0] else {
            panic!("expected function entry");
        };
        let condition = condition.as_ref().expect("condition expected");
        assert_eq!(condition.operator, Operator::Or);
        assert_eq!(condition.children, vec![leaf(1), leaf(2), leaf(3)]);
    }

    #[test]
    fn missing_condition_absorbs() {
        let merged = merge_function_entries(vec![entry(Some(leaf(1)), false), entry(None, false)]);
        assert_eq!(merged.len(), 1);
        let CompiledEntry::Function { condition, .. } = &merged[0] else {
            panic!("expected function entry");
        };
        assert!(condition.is_none());

        let merged = merge_function_entries(vec![entry(None, false), entry(Some(leaf(1)), false)]);
        let CompiledEntry::Function { condition, .. } = &merged[0] else {
            panic!("expected function entry");
        };
        assert!(condition.is_none());
    }

    #[test]
    fn differing_flags_stay_separate() {
        let merged = merge_function_entries(vec![
            entry(Some(leaf(1)), false),
            entry(Some(leaf(2)), true),
            entry(Some(leaf(3)), false),
        ]);
        assert_eq!(merged.len(), 2);
        let CompiledEntry::Function { condition, .. } = &merged[0] else {
            panic!("expected function entry");
        };
        // 1 and 3 merged; 2 kept its own entry.
        assert_eq!(
            condition.as_ref().expect("condition expected").children,
            vec![leaf(1), leaf(3)]
        );
    }

    #[test]
    fn targets_pass_through_untouched() {
        let target = CompiledEntry::Target {
            address: TARGET,
            send: false,
            delegatecall: false,
        };
        let merged = merge_function_entries(vec![target.clone(), entry(None, false)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], target);
    }

    #[test]
    fn distinct_selectors_do_not_merge() {
        let other = CompiledEntry::Function {
            address: TARGET,
            selector: Selector::new([0x09, 0x5e, 0xa7, 0xb3]),
            condition: None,
            send: false,
            delegatecall: false,
        };
        let merged = merge_function_entries(vec![entry(None, false), other.clone()]);
        assert_eq!(merged.len(), 2);
    }
}
