//! Branch combinators
//!
//! Logical combinators resolve every branch against the same ABI type and
//! wrap them in a node that carries no structural category of its own; the
//! array combinators constrain elements through the array's element type.

use super::{resolve, typing, ConditionExpr, Scoping};
use warden_core::abi::AbiType;
use warden_core::condition::{Condition, Operator, ParamType};
use warden_core::errors::{ScopeError, ScopeResult};

/// At least one branch must hold.
pub fn or(branches: impl IntoIterator<Item = Scoping>) -> Scoping {
    Scoping::Expr(ConditionExpr::Or(branches.into_iter().collect()))
}

/// All branches must hold.
pub fn and(branches: impl IntoIterator<Item = Scoping>) -> Scoping {
    Scoping::Expr(ConditionExpr::And(branches.into_iter().collect()))
}

/// No branch may hold.
pub fn nor(branches: impl IntoIterator<Item = Scoping>) -> Scoping {
    Scoping::Expr(ConditionExpr::Nor(branches.into_iter().collect()))
}

/// Every element of the array satisfies the scoping.
pub fn every(scoping: impl Into<Scoping>) -> Scoping {
    Scoping::Expr(ConditionExpr::Every(Box::new(scoping.into())))
}

/// At least one element of the array satisfies the scoping.
pub fn some(scoping: impl Into<Scoping>) -> Scoping {
    Scoping::Expr(ConditionExpr::Some(Box::new(scoping.into())))
}

/// The array's elements form a subset of the listed scopings.
pub fn subset(scopings: impl IntoIterator<Item = Scoping>) -> Scoping {
    Scoping::Expr(ConditionExpr::Subset(scopings.into_iter().collect()))
}

pub(crate) fn compile_logical(
    operator: Operator,
    branches: &[Scoping],
    ty: &AbiType,
) -> ScopeResult<Condition> {
    if branches.len() < 2 {
        return Err(ScopeError::invalid_combinator(format!(
            "{} requires at least two branches",
            operator_name(operator)
        )));
    }
    let mut children = Vec::with_capacity(branches.len());
    for branch in branches {
        if matches!(branch, Scoping::Any) {
            return Err(ScopeError::invalid_combinator(format!(
                "every branch of {} must be specified",
                operator_name(operator)
            )));
        }
        children.push(resolve(branch, ty)?);
    }
    let condition = Condition::logical(operator, children);
    // Branches were resolved against one type, but nested combinators can
    // still disagree; surface that here rather than at match time.
    typing::effective_param_type(&condition)?;
    Ok(condition)
}

pub(crate) fn compile_array(
    operator: Operator,
    scopings: &[Scoping],
    ty: &AbiType,
) -> ScopeResult<Condition> {
    let Some(element) = ty.element() else {
        return Err(ScopeError::UnsupportedAbiShape {
            context: "an array combinator".to_string(),
            actual: ty.canonical(),
        });
    };
    if scopings.is_empty() {
        return Err(ScopeError::invalid_combinator(
            "array combinators need at least one element scoping",
        ));
    }
    let mut children = Vec::with_capacity(scopings.len());
    for scoping in scopings {
        if matches!(scoping, Scoping::Any) {
            return Err(ScopeError::invalid_combinator(
                "array combinator scopings must be specified",
            ));
        }
        children.push(resolve(scoping, element)?);
    }
    Ok(Condition::with_children(
        ParamType::Array,
        operator,
        children,
    ))
}

fn operator_name(operator: Operator) -> &'static str {
    match operator {
        Operator::And => "and",
        Operator::Or => "or",
        Operator::Nor => "nor",
        _ => "the combinator",
    }
}
