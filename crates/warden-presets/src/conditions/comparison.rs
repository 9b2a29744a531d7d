//! Leaf condition builders
//!
//! Equality, ordered comparison, and allowance predicates. Ordered
//! comparisons pick their operator by the signedness of the target integer
//! type. Requesting an ordered comparison on a type that is not an integer
//! is legal but advisory-logged: the evaluator then compares the encoded
//! bytes as an unsigned 256-bit integer.

use super::{ConditionExpr, ScopeValue, Scoping};
use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};
use warden_core::abi::AbiType;
use warden_core::codec;
use warden_core::condition::{CompValue, Condition, Operator, ParamType};
use warden_core::errors::{ScopeError, ScopeResult};
use warden_core::value::Value;

/// Opaque 32-byte identifier of a named consumption budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllowanceKey(pub B256);

impl AllowanceKey {
    /// Build a key from a short ASCII label, right-padded with zeros.
    pub fn from_label(label: &str) -> ScopeResult<Self> {
        let bytes = label.as_bytes();
        if bytes.len() > 32 {
            return Err(ScopeError::value_encoding(format!(
                "allowance label `{label}` exceeds 32 bytes"
            )));
        }
        let mut key = [0u8; 32];
        key[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(B256::from(key)))
    }

    /// The key as comparison-value bytes.
    pub fn to_bytes(self) -> Bytes {
        Bytes::from(self.0.to_vec())
    }
}

impl From<B256> for AllowanceKey {
    fn from(key: B256) -> Self {
        Self(key)
    }
}

impl From<[u8; 32]> for AllowanceKey {
    fn from(key: [u8; 32]) -> Self {
        Self(B256::from(key))
    }
}

/// Equality with a literal value or placeholder.
pub fn eq(value: impl Into<ScopeValue>) -> Scoping {
    Scoping::Expr(ConditionExpr::Eq(value.into()))
}

/// Strictly greater than a literal value or placeholder.
pub fn gt(value: impl Into<ScopeValue>) -> Scoping {
    Scoping::Expr(ConditionExpr::Gt(value.into()))
}

/// Greater than or equal to a literal value.
///
/// Compiled by encoding the adjusted boundary `value - 1`, so the value must
/// be a literal integer.
pub fn gte(value: impl Into<Value>) -> Scoping {
    Scoping::Expr(ConditionExpr::Gte(value.into()))
}

/// Strictly less than a literal value or placeholder.
pub fn lt(value: impl Into<ScopeValue>) -> Scoping {
    Scoping::Expr(ConditionExpr::Lt(value.into()))
}

/// Less than or equal to a literal value.
///
/// Compiled by encoding the adjusted boundary `value + 1`, so the value must
/// be a literal integer.
pub fn lte(value: impl Into<Value>) -> Scoping {
    Scoping::Expr(ConditionExpr::Lte(value.into()))
}

/// Charge the parameter's value against a named budget.
///
/// Only valid on unsigned integer parameters.
pub fn within_allowance(key: impl Into<AllowanceKey>) -> Scoping {
    Scoping::Expr(ConditionExpr::WithinAllowance(key.into()))
}

/// Charge the ether sent with the call against a named budget.
///
/// Attaches at entry level, not to a parameter.
pub fn ether_within_allowance(key: impl Into<AllowanceKey>) -> Condition {
    Condition::leaf(
        ParamType::None,
        Operator::EtherWithinAllowance,
        CompValue::Bytes(key.into().to_bytes()),
    )
}

/// Charge the call itself against a named budget.
///
/// Attaches at entry level, not to a parameter.
pub fn call_within_allowance(key: impl Into<AllowanceKey>) -> Condition {
    Condition::leaf(
        ParamType::None,
        Operator::CallWithinAllowance,
        CompValue::Bytes(key.into().to_bytes()),
    )
}

/// Direction and inclusivity of an ordered comparison.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Bound {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

pub(crate) fn compile_eq(value: &ScopeValue, ty: &AbiType) -> ScopeResult<Condition> {
    let comp_value = match value {
        ScopeValue::Literal(v) => CompValue::Bytes(codec::encode_value(v, ty)?),
        ScopeValue::Placeholder(placeholder) => CompValue::Placeholder(placeholder.clone()),
    };
    Ok(Condition::leaf(
        ty.param_type(),
        Operator::EqualTo,
        comp_value,
    ))
}

pub(crate) fn compile_comparison(
    bound: Bound,
    value: &ScopeValue,
    ty: &AbiType,
) -> ScopeResult<Condition> {
    if !matches!(ty, AbiType::Uint(_) | AbiType::Int(_)) {
        tracing::warn!(
            target_type = %ty.canonical(),
            "ordered comparison on a non-integer type; encoded bytes are compared as uint256"
        );
    }
    let signed = matches!(ty, AbiType::Int(_));
    let operator = match bound {
        Bound::Greater | Bound::GreaterOrEqual => {
            if signed {
                Operator::SignedIntGreaterThan
            } else {
                Operator::GreaterThan
            }
        }
        Bound::Less | Bound::LessOrEqual => {
            if signed {
                Operator::SignedIntLessThan
            } else {
                Operator::LessThan
            }
        }
    };
    let comp_value = match value {
        ScopeValue::Placeholder(placeholder) => CompValue::Placeholder(placeholder.clone()),
        ScopeValue::Literal(v) => {
            let boundary = match bound {
                Bound::GreaterOrEqual => v.checked_dec()?,
                Bound::LessOrEqual => v.checked_inc()?,
                Bound::Greater | Bound::Less => v.clone(),
            };
            CompValue::Bytes(codec::encode_value(&boundary, ty)?)
        }
    };
    Ok(Condition::leaf(ty.param_type(), operator, comp_value))
}

pub(crate) fn compile_allowance(key: &AllowanceKey, ty: &AbiType) -> ScopeResult<Condition> {
    if !matches!(ty, AbiType::Uint(_)) {
        return Err(ScopeError::InvalidAllowanceTarget {
            actual: ty.canonical(),
        });
    }
    Ok(Condition::leaf(
        ParamType::Static,
        Operator::WithinAllowance,
        CompValue::Bytes(key.to_bytes()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::resolve;
    use alloy_primitives::U256;

    fn compile(scoping: &Scoping, ty: &AbiType) -> Condition {
        resolve(scoping, ty).unwrap()
    }

    #[test]
    fn eq_carries_the_encoded_word() {
        let condition = compile(&eq(1000u64), &AbiType::Uint(256));
        assert_eq!(condition.operator, Operator::EqualTo);
        assert_eq!(condition.param_type, ParamType::Static);
        let Some(CompValue::Bytes(bytes)) = &condition.comp_value else {
            panic!("expected encoded comp value");
        };
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 0xe8);
    }

    #[test]
    fn comparison_operator_follows_signedness() {
        let condition = compile(&gt(5u64), &AbiType::Uint(96));
        assert_eq!(condition.operator, Operator::GreaterThan);

        let condition = compile(&gt(5u64), &AbiType::Int(96));
        assert_eq!(condition.operator, Operator::SignedIntGreaterThan);

        let condition = compile(&lt(5u64), &AbiType::Int(96));
        assert_eq!(condition.operator, Operator::SignedIntLessThan);
    }

    #[test]
    fn inclusive_bounds_encode_the_adjusted_boundary() {
        let condition = compile(&gte(10u64), &AbiType::Uint(256));
        assert_eq!(condition.operator, Operator::GreaterThan);
        let Some(CompValue::Bytes(bytes)) = &condition.comp_value else {
            panic!("expected encoded comp value");
        };
        assert_eq!(bytes[31], 9);

        let condition = compile(&lte(10u64), &AbiType::Uint(256));
        assert_eq!(condition.operator, Operator::LessThan);
        let Some(CompValue::Bytes(bytes)) = &condition.comp_value else {
            panic!("expected encoded comp value");
        };
        assert_eq!(bytes[31], 11);
    }

    #[test]
    fn gte_zero_on_unsigned_cannot_form_a_boundary() {
        assert!(resolve(&gte(0u64), &AbiType::Uint(256)).is_err());
    }

    #[test]
    fn comparison_on_non_integer_is_advisory_only() {
        // Compiles despite the type not being an integer; the evaluator
        // compares the bytes as uint256.
        let condition = resolve(&gt(U256::from(1u64)), &AbiType::FixedBytes(32));
        assert!(condition.is_ok());
    }

    #[test]
    fn allowance_requires_unsigned_integer() {
        let key = AllowanceKey::from_label("swap-budget").unwrap();
        let condition = compile(&within_allowance(key), &AbiType::Uint(128));
        assert_eq!(condition.operator, Operator::WithinAllowance);

        let err = resolve(&within_allowance(key), &AbiType::Address).unwrap_err();
        assert!(matches!(err, ScopeError::InvalidAllowanceTarget { .. }));
        let err = resolve(&within_allowance(key), &AbiType::Int(256)).unwrap_err();
        assert!(matches!(err, ScopeError::InvalidAllowanceTarget { .. }));
    }

    #[test]
    fn allowance_label_is_right_padded() {
        let key = AllowanceKey::from_label("x").unwrap();
        let bytes = key.to_bytes();
        assert_eq!(bytes[0], b'x');
        assert!(bytes[1..].iter().all(|b| *b == 0));
        assert!(AllowanceKey::from_label(&"y".repeat(33)).is_err());
    }
}
