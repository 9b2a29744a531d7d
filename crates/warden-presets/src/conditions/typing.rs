//! Effective parameter types and compatibility validation
//!
//! Logical combinator nodes carry no structural category of their own, so
//! the category they *effectively* constrain is derived from their children,
//! which must all agree. The structural matcher runs this check for every
//! resolved child against the category the ABI declares for that position.

use warden_core::abi::AbiType;
use warden_core::condition::{Condition, ParamType};
use warden_core::errors::{ScopeError, ScopeResult};

/// Compute the structural category a condition effectively constrains.
///
/// A node with its own category reports it directly. A logical node derives
/// the category from its children, which must all agree; a logical node with
/// no children effectively constrains nothing.
pub fn effective_param_type(condition: &Condition) -> ScopeResult<ParamType> {
    if condition.param_type != ParamType::None {
        return Ok(condition.param_type);
    }
    let mut effective = None;
    for child in &condition.children {
        let child_type = effective_param_type(child)?;
        match effective {
            None => effective = Some(child_type),
            Some(expected) if expected != child_type => {
                return Err(ScopeError::ParamTypeMismatch {
                    location: "logical branches".to_string(),
                    actual: child_type,
                    expected,
                });
            }
            Some(_) => {}
        }
    }
    Ok(effective.unwrap_or(ParamType::None))
}

/// Check a resolved child condition against the ABI-declared category of its
/// position.
///
/// The single tolerated divergence: an `AbiEncoded` condition may sit in a
/// `Dynamic` (bytes) slot, since encoded-blob matching overlays the bytes
/// region.
pub(crate) fn check_compatibility(
    condition: &Condition,
    ty: &AbiType,
    location: &str,
) -> ScopeResult<()> {
    let actual = effective_param_type(condition)?;
    let expected = ty.param_type();
    let compatible = actual == expected
        || (expected == ParamType::Dynamic && actual == ParamType::AbiEncoded);
    if compatible {
        Ok(())
    } else {
        Err(ScopeError::ParamTypeMismatch {
            location: location.to_string(),
            actual,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::condition::Operator;

    #[test]
    fn plain_nodes_report_their_own_category() {
        let condition = Condition::pass(ParamType::Tuple);
        assert_eq!(effective_param_type(&condition).unwrap(), ParamType::Tuple);
    }

    #[test]
    fn logical_nodes_derive_from_agreeing_children() {
        let condition = Condition::logical(
            Operator::Or,
            vec![
                Condition::pass(ParamType::Static),
                Condition::pass(ParamType::Static),
            ],
        );
        assert_eq!(effective_param_type(&condition).unwrap(), ParamType::Static);
    }

    #[test]
    fn mixed_logical_children_are_rejected() {
        let condition = Condition::logical(
            Operator::And,
            vec![
                Condition::pass(ParamType::Static),
                Condition::pass(ParamType::Dynamic),
            ],
        );
        let err = effective_param_type(&condition).unwrap_err();
        assert!(matches!(err, ScopeError::ParamTypeMismatch { .. }));
    }

    #[test]
    fn childless_logical_nodes_constrain_nothing() {
        let condition = Condition::logical(Operator::Or, vec![]);
        assert_eq!(effective_param_type(&condition).unwrap(), ParamType::None);
    }

    #[test]
    fn abi_encoded_satisfies_a_bytes_slot() {
        let condition = Condition::pass(ParamType::AbiEncoded);
        assert!(check_compatibility(&condition, &AbiType::Bytes, "data").is_ok());
        assert!(check_compatibility(&condition, &AbiType::Address, "data").is_err());
    }
}
