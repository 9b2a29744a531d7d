//! Compiled condition tree
//!
//! A [`Condition`] is the normalized predicate node consumed by the on-chain
//! evaluator. The numeric values of [`ParamType`] and [`Operator`] are a
//! fixed external contract with that evaluator and must never be renumbered;
//! unassigned slots are reserved on its side and rejected here on
//! deserialization.

use crate::placeholder::Placeholder;
use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural category of the value a condition node constrains.
///
/// `None` marks logical/combinator nodes that do not themselves consume
/// calldata structure. `Calldata` is the top-level argument-list flavor;
/// `AbiEncoded` the embedded flavor used when matching inside a `bytes`
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ParamType {
    /// Logical node, consumes no calldata structure.
    None,
    /// Single 32-byte word (address, bool, integers, fixed bytes).
    Static,
    /// Length-prefixed data (`bytes`, `string`).
    Dynamic,
    /// Ordered heterogeneous components.
    Tuple,
    /// Homogeneous elements, fixed or unbounded length.
    Array,
    /// A whole function-call argument list, selector excluded.
    Calldata,
    /// An ABI-encoded blob embedded in a `bytes` value.
    AbiEncoded,
}

impl From<ParamType> for u8 {
    fn from(value: ParamType) -> Self {
        match value {
            ParamType::None => 0,
            ParamType::Static => 1,
            ParamType::Dynamic => 2,
            ParamType::Tuple => 3,
            ParamType::Array => 4,
            ParamType::Calldata => 5,
            ParamType::AbiEncoded => 6,
        }
    }
}

impl TryFrom<u8> for ParamType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ParamType::None),
            1 => Ok(ParamType::Static),
            2 => Ok(ParamType::Dynamic),
            3 => Ok(ParamType::Tuple),
            4 => Ok(ParamType::Array),
            5 => Ok(ParamType::Calldata),
            6 => Ok(ParamType::AbiEncoded),
            other => Err(format!("unknown parameter type {other}")),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::None => "None",
            ParamType::Static => "Static",
            ParamType::Dynamic => "Dynamic",
            ParamType::Tuple => "Tuple",
            ParamType::Array => "Array",
            ParamType::Calldata => "Calldata",
            ParamType::AbiEncoded => "AbiEncoded",
        };
        write!(f, "{name}")
    }
}

/// Predicate kind of a condition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Operator {
    /// Accepts any value of the node's shape.
    Pass,
    /// All children must pass.
    And,
    /// At least one child must pass.
    Or,
    /// No child may pass.
    Nor,
    /// Children constrain the components/elements positionally.
    Matches,
    /// At least one array element satisfies the child condition.
    ArraySome,
    /// Every array element satisfies the child condition.
    ArrayEvery,
    /// Array elements form a subset of the child conditions.
    ArraySubset,
    /// Equality against the module's configured avatar address.
    EqualToAvatar,
    /// Byte equality against the comparison value.
    EqualTo,
    /// Unsigned greater-than against the comparison value.
    GreaterThan,
    /// Unsigned less-than against the comparison value.
    LessThan,
    /// Two's-complement greater-than against the comparison value.
    SignedIntGreaterThan,
    /// Two's-complement less-than against the comparison value.
    SignedIntLessThan,
    /// Masked byte comparison.
    Bitmask,
    /// Delegated to a custom checker contract.
    Custom,
    /// Consumption is charged against a named unsigned-integer budget.
    WithinAllowance,
    /// Transferred ether is charged against a named budget.
    EtherWithinAllowance,
    /// The call itself is charged against a named budget.
    CallWithinAllowance,
}

impl From<Operator> for u8 {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Pass => 0,
            Operator::And => 1,
            Operator::Or => 2,
            Operator::Nor => 3,
            Operator::Matches => 5,
            Operator::ArraySome => 6,
            Operator::ArrayEvery => 7,
            Operator::ArraySubset => 8,
            Operator::EqualToAvatar => 15,
            Operator::EqualTo => 16,
            Operator::GreaterThan => 17,
            Operator::LessThan => 18,
            Operator::SignedIntGreaterThan => 19,
            Operator::SignedIntLessThan => 20,
            Operator::Bitmask => 21,
            Operator::Custom => 22,
            Operator::WithinAllowance => 28,
            Operator::EtherWithinAllowance => 29,
            Operator::CallWithinAllowance => 30,
        }
    }
}

impl TryFrom<u8> for Operator {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Operator::Pass),
            1 => Ok(Operator::And),
            2 => Ok(Operator::Or),
            3 => Ok(Operator::Nor),
            5 => Ok(Operator::Matches),
            6 => Ok(Operator::ArraySome),
            7 => Ok(Operator::ArrayEvery),
            8 => Ok(Operator::ArraySubset),
            15 => Ok(Operator::EqualToAvatar),
            16 => Ok(Operator::EqualTo),
            17 => Ok(Operator::GreaterThan),
            18 => Ok(Operator::LessThan),
            19 => Ok(Operator::SignedIntGreaterThan),
            20 => Ok(Operator::SignedIntLessThan),
            21 => Ok(Operator::Bitmask),
            22 => Ok(Operator::Custom),
            28 => Ok(Operator::WithinAllowance),
            29 => Ok(Operator::EtherWithinAllowance),
            30 => Ok(Operator::CallWithinAllowance),
            other => Err(format!("unknown operator {other}")),
        }
    }
}

impl Operator {
    /// True for the pure logical combinators (`And`, `Or`, `Nor`).
    pub fn is_logical(self) -> bool {
        matches!(self, Operator::And | Operator::Or | Operator::Nor)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Opaque comparison value carried by leaf comparison operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompValue {
    /// ABI-encoded comparison bytes, wire-ready.
    Bytes(Bytes),
    /// An unresolved hole, substituted when the preset is finalized.
    Placeholder(Placeholder),
}

/// A compiled predicate node.
///
/// Child order mirrors ABI field/element declaration order and is
/// semantically significant. A node with [`Operator::Pass`] and no
/// comparison value is a pure structural placeholder: any value of its shape
/// is accepted, but the shape itself stays visible to downstream structural
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Structural category of the constrained value.
    pub param_type: ParamType,
    /// Predicate kind.
    pub operator: Operator,
    /// Comparison value, present for leaf comparison operators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comp_value: Option<CompValue>,
    /// Ordered child conditions, empty for leaves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Condition>,
}

impl Condition {
    /// A structural placeholder accepting any value of the given category.
    pub fn pass(param_type: ParamType) -> Self {
        Self {
            param_type,
            operator: Operator::Pass,
            comp_value: None,
            children: Vec::new(),
        }
    }

    /// A leaf node carrying a comparison value.
    pub fn leaf(param_type: ParamType, operator: Operator, comp_value: CompValue) -> Self {
        Self {
            param_type,
            operator,
            comp_value: Some(comp_value),
            children: Vec::new(),
        }
    }

    /// A logical combinator node over the given branches.
    pub fn logical(operator: Operator, children: Vec<Condition>) -> Self {
        Self {
            param_type: ParamType::None,
            operator,
            comp_value: None,
            children,
        }
    }

    /// A structural node with the given category and children.
    pub fn with_children(param_type: ParamType, operator: Operator, children: Vec<Condition>) -> Self {
        Self {
            param_type,
            operator,
            comp_value: None,
            children,
        }
    }
}
