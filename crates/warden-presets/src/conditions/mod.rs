//! Scoping shorthand and its resolution into condition trees
//!
//! A [`Scoping`] is the author-facing shorthand for constraining one
//! function parameter. [`resolve`] is the single dispatch point that turns a
//! scoping into a compiled [`Condition`] for a given ABI type:
//!
//! 1. an explicit condition expression compiles itself against the type;
//! 2. a literal value or placeholder defaults to an equality condition;
//! 3. a struct- or list-shaped scoping defaults to the structural matcher.
//!
//! The variants are an explicit tagged union rather than runtime shape
//! probing, so the dispatch is exhaustive by construction.

pub mod branching;
pub mod comparison;
pub mod matches;
pub mod typing;

use warden_core::abi::{AbiParam, AbiType};
use warden_core::condition::{Condition, Operator};
use warden_core::errors::ScopeResult;
use warden_core::placeholder::Placeholder;
use warden_core::value::Value;

pub use comparison::AllowanceKey;

/// A literal value or a placeholder, as accepted by the equality builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeValue {
    /// A concrete literal.
    Literal(Value),
    /// A typed hole, substituted at fill time.
    Placeholder(Placeholder),
}

impl From<Value> for ScopeValue {
    fn from(value: Value) -> Self {
        ScopeValue::Literal(value)
    }
}

impl From<Placeholder> for ScopeValue {
    fn from(placeholder: Placeholder) -> Self {
        ScopeValue::Placeholder(placeholder)
    }
}

macro_rules! literal_scope_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ScopeValue {
                fn from(value: $ty) -> Self {
                    ScopeValue::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_scope_value!(
    bool,
    u8,
    u16,
    u32,
    u64,
    u128,
    alloy_primitives::U256,
    alloy_primitives::I256,
    alloy_primitives::Address,
    alloy_primitives::Bytes,
    Vec<u8>,
    &str,
    String,
);

/// Shorthand specification of an allowed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scoping {
    /// No constraint: any value of the parameter's shape is accepted.
    Any,
    /// A literal value; defaults to an equality condition.
    Value(Value),
    /// A placeholder; defaults to an equality condition on the value
    /// substituted later.
    Placeholder(Placeholder),
    /// An explicit condition expression (the escape hatch).
    Expr(ConditionExpr),
    /// A partial mapping of tuple field names to nested scopings.
    Struct(Vec<(String, Scoping)>),
    /// Positional nested scopings for tuple components or array elements.
    Elements(Vec<Scoping>),
}

/// The closed set of condition-producing expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionExpr {
    /// Byte equality with a literal or placeholder.
    Eq(ScopeValue),
    /// Strict greater-than.
    Gt(ScopeValue),
    /// Greater-or-equal, compiled as `Gt(value - 1)`.
    Gte(Value),
    /// Strict less-than.
    Lt(ScopeValue),
    /// Less-or-equal, compiled as `Lt(value + 1)`.
    Lte(Value),
    /// Consumption charged against a named unsigned-integer budget.
    WithinAllowance(AllowanceKey),
    /// Structural match over a tuple or array.
    Matches(Box<Scoping>),
    /// Structural match over an ABI-encoded blob in a `bytes` parameter.
    MatchesAbi {
        /// Per-parameter scopings, missing tail entries unconstrained.
        scopings: Vec<Scoping>,
        /// The parameter list the blob decodes to.
        params: Vec<AbiParam>,
    },
    /// At least one branch must hold.
    Or(Vec<Scoping>),
    /// All branches must hold.
    And(Vec<Scoping>),
    /// No branch may hold.
    Nor(Vec<Scoping>),
    /// Every array element satisfies the scoping.
    Every(Box<Scoping>),
    /// At least one array element satisfies the scoping.
    Some(Box<Scoping>),
    /// Array elements form a subset of the listed scopings.
    Subset(Vec<Scoping>),
}

impl ConditionExpr {
    /// Compile this expression against the parameter's ABI type.
    pub fn compile(&self, ty: &AbiType) -> ScopeResult<Condition> {
        match self {
            ConditionExpr::Eq(value) => comparison::compile_eq(value, ty),
            ConditionExpr::Gt(value) => {
                comparison::compile_comparison(comparison::Bound::Greater, value, ty)
            }
            ConditionExpr::Gte(value) => comparison::compile_comparison(
                comparison::Bound::GreaterOrEqual,
                &ScopeValue::Literal(value.clone()),
                ty,
            ),
            ConditionExpr::Lt(value) => {
                comparison::compile_comparison(comparison::Bound::Less, value, ty)
            }
            ConditionExpr::Lte(value) => comparison::compile_comparison(
                comparison::Bound::LessOrEqual,
                &ScopeValue::Literal(value.clone()),
                ty,
            ),
            ConditionExpr::WithinAllowance(key) => comparison::compile_allowance(key, ty),
            ConditionExpr::Matches(scoping) => matches::compile_matches(scoping, ty),
            ConditionExpr::MatchesAbi { scopings, params } => {
                matches::compile_embedded_abi_match(scopings, params, ty)
            }
            ConditionExpr::Or(branches) => branching::compile_logical(Operator::Or, branches, ty),
            ConditionExpr::And(branches) => {
                branching::compile_logical(Operator::And, branches, ty)
            }
            ConditionExpr::Nor(branches) => {
                branching::compile_logical(Operator::Nor, branches, ty)
            }
            ConditionExpr::Every(scoping) => branching::compile_array(
                Operator::ArrayEvery,
                std::slice::from_ref(scoping.as_ref()),
                ty,
            ),
            ConditionExpr::Some(scoping) => branching::compile_array(
                Operator::ArraySome,
                std::slice::from_ref(scoping.as_ref()),
                ty,
            ),
            ConditionExpr::Subset(scopings) => {
                branching::compile_array(Operator::ArraySubset, scopings, ty)
            }
        }
    }
}

/// An unconstrained scoping.
pub fn any() -> Scoping {
    Scoping::Any
}

/// Resolve a scoping against an ABI type.
///
/// Dispatch, in priority order: an explicit expression compiles itself; a
/// literal or placeholder defaults to equality; a struct or element list
/// defaults to the structural matcher; an unconstrained scoping becomes the
/// structural placeholder for the type's shape.
pub fn resolve(scoping: &Scoping, ty: &AbiType) -> ScopeResult<Condition> {
    match scoping {
        Scoping::Expr(expr) => expr.compile(ty),
        Scoping::Value(value) => {
            comparison::compile_eq(&ScopeValue::Literal(value.clone()), ty)
        }
        Scoping::Placeholder(placeholder) => {
            comparison::compile_eq(&ScopeValue::Placeholder(placeholder.clone()), ty)
        }
        Scoping::Struct(_) | Scoping::Elements(_) => matches::compile_matches(scoping, ty),
        Scoping::Any => Ok(matches::describe_structure(ty)),
    }
}

impl From<Value> for Scoping {
    fn from(value: Value) -> Self {
        Scoping::Value(value)
    }
}

impl From<Placeholder> for Scoping {
    fn from(placeholder: Placeholder) -> Self {
        Scoping::Placeholder(placeholder)
    }
}

impl From<ConditionExpr> for Scoping {
    fn from(expr: ConditionExpr) -> Self {
        Scoping::Expr(expr)
    }
}

impl From<Vec<Scoping>> for Scoping {
    fn from(elements: Vec<Scoping>) -> Self {
        Scoping::Elements(elements)
    }
}

macro_rules! literal_scoping {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Scoping {
                fn from(value: $ty) -> Self {
                    Scoping::Value(Value::from(value))
                }
            }
        )*
    };
}

literal_scoping!(
    bool,
    u8,
    u16,
    u32,
    u64,
    u128,
    alloy_primitives::U256,
    alloy_primitives::I256,
    alloy_primitives::Address,
    alloy_primitives::Bytes,
    &str,
    String,
);
