//! Literal value model
//!
//! [`Value`] is the author-facing representation of a concrete comparison
//! value before the external codec encodes it against an ABI type.

use crate::errors::{ScopeError, ScopeResult};
use alloy_primitives::{Address, Bytes, I256, U256};
use serde::{Deserialize, Serialize};

/// A literal value supplied in a scoping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// A 20-byte address.
    Address(Address),
    /// A boolean.
    Bool(bool),
    /// An unsigned integer.
    Uint(U256),
    /// A signed integer.
    Int(I256),
    /// Raw bytes (also used for `bytesN` literals).
    Bytes(Bytes),
    /// A UTF-8 string.
    String(String),
    /// Positional tuple components.
    Tuple(Vec<Value>),
    /// Array elements.
    Array(Vec<Value>),
}

impl Value {
    /// A signed integer literal.
    ///
    /// # Panics
    ///
    /// Never panics: every `i128` fits in 256 bits.
    pub fn int(value: i128) -> Self {
        Value::Int(I256::try_from(value).expect("i128 fits in 256 bits"))
    }

    /// Short label for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Address(_) => "address",
            Value::Bool(_) => "bool",
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Tuple(_) => "tuple",
            Value::Array(_) => "array",
        }
    }

    /// The value minus one, for inclusive lower bounds.
    pub fn checked_dec(&self) -> ScopeResult<Value> {
        match self {
            Value::Uint(v) => v
                .checked_sub(U256::from(1u64))
                .map(Value::Uint)
                .ok_or_else(|| ScopeError::value_encoding("cannot form a bound below uint 0")),
            Value::Int(v) => v
                .checked_sub(I256::ONE)
                .map(Value::Int)
                .ok_or_else(|| ScopeError::value_encoding("cannot form a bound below int min")),
            other => Err(ScopeError::value_encoding(format!(
                "inclusive comparison needs an integer value, got {}",
                other.kind()
            ))),
        }
    }

    /// The value plus one, for inclusive upper bounds.
    pub fn checked_inc(&self) -> ScopeResult<Value> {
        match self {
            Value::Uint(v) => v
                .checked_add(U256::from(1u64))
                .map(Value::Uint)
                .ok_or_else(|| ScopeError::value_encoding("cannot form a bound above uint max")),
            Value::Int(v) => v
                .checked_add(I256::ONE)
                .map(Value::Int)
                .ok_or_else(|| ScopeError::value_encoding("cannot form a bound above int max")),
            other => Err(ScopeError::value_encoding(format!(
                "inclusive comparison needs an integer value, got {}",
                other.kind()
            ))),
        }
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Uint(value)
    }
}

impl From<I256> for Value {
    fn from(value: I256) -> Self {
        Value::Int(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_adjustments() {
        assert_eq!(
            Value::from(10u64).checked_dec().unwrap(),
            Value::from(9u64)
        );
        assert_eq!(
            Value::from(10u64).checked_inc().unwrap(),
            Value::from(11u64)
        );
        assert_eq!(Value::int(-5).checked_dec().unwrap(), Value::int(-6));
    }

    #[test]
    fn adjustment_fails_at_the_edges() {
        assert!(Value::from(0u64).checked_dec().is_err());
        assert!(Value::Uint(U256::MAX).checked_inc().is_err());
        assert!(Value::Int(I256::MIN).checked_dec().is_err());
        assert!(Value::Int(I256::MAX).checked_inc().is_err());
    }

    #[test]
    fn adjustment_rejects_non_numeric() {
        assert!(Value::from("x").checked_dec().is_err());
        assert!(Value::from(true).checked_inc().is_err());
    }
}
