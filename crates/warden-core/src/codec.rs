//! Adapter to the external ABI codec
//!
//! Comparison values are opaque encoded bytes produced by `alloy-dyn-abi`;
//! nothing in this workspace implements ABI encoding itself. The one wire
//! convention layered on top: for dynamic types the leading offset word of
//! the standalone encoding is stripped, so the comparison value starts at
//! the length word.

use crate::abi::AbiType;
use crate::errors::{ScopeError, ScopeResult};
use crate::value::Value;
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Bytes, B256, I256, U256};

/// Encode a literal value against an ABI type into comparison bytes.
pub fn encode_value(value: &Value, ty: &AbiType) -> ScopeResult<Bytes> {
    let dyn_value = to_dyn_value(value, ty)?;
    let encoded = dyn_value.abi_encode();
    if ty.is_dynamic() {
        Ok(Bytes::from(encoded[32..].to_vec()))
    } else {
        Ok(Bytes::from(encoded))
    }
}

fn to_dyn_value(value: &Value, ty: &AbiType) -> ScopeResult<DynSolValue> {
    match (ty, value) {
        (AbiType::Address, Value::Address(a)) => Ok(DynSolValue::Address(*a)),
        (AbiType::Bool, Value::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (AbiType::Uint(bits), Value::Uint(v)) => {
            check_uint_range(*v, *bits)?;
            Ok(DynSolValue::Uint(*v, *bits))
        }
        // Nonnegative signed literals are accepted where an unsigned type is
        // declared, and vice versa, since integer literals default to one of
        // the two representations.
        (AbiType::Uint(bits), Value::Int(v)) => {
            if v.is_negative() {
                return Err(ScopeError::value_encoding(format!(
                    "negative value for {}",
                    ty.canonical()
                )));
            }
            let unsigned = v.into_raw();
            check_uint_range(unsigned, *bits)?;
            Ok(DynSolValue::Uint(unsigned, *bits))
        }
        (AbiType::Int(bits), Value::Int(v)) => {
            check_int_range(*v, *bits)?;
            Ok(DynSolValue::Int(*v, *bits))
        }
        (AbiType::Int(bits), Value::Uint(v)) => {
            if *v > I256::MAX.into_raw() {
                return Err(ScopeError::value_encoding(format!(
                    "value does not fit {}",
                    ty.canonical()
                )));
            }
            let signed = I256::from_raw(*v);
            check_int_range(signed, *bits)?;
            Ok(DynSolValue::Int(signed, *bits))
        }
        (AbiType::FixedBytes(width), Value::Bytes(b)) => {
            if b.len() != *width {
                return Err(ScopeError::value_encoding(format!(
                    "expected {width} bytes for {}, got {}",
                    ty.canonical(),
                    b.len()
                )));
            }
            let mut word = [0u8; 32];
            word[..*width].copy_from_slice(b);
            Ok(DynSolValue::FixedBytes(B256::from(word), *width))
        }
        (AbiType::Bytes, Value::Bytes(b)) => Ok(DynSolValue::Bytes(b.to_vec())),
        (AbiType::String, Value::String(s)) => Ok(DynSolValue::String(s.clone())),
        (AbiType::Tuple(components), Value::Tuple(values)) => {
            if components.len() != values.len() {
                return Err(ScopeError::value_encoding(format!(
                    "tuple arity mismatch: {} values for {}",
                    values.len(),
                    ty.canonical()
                )));
            }
            let converted = components
                .iter()
                .zip(values)
                .map(|(component, v)| to_dyn_value(v, &component.ty))
                .collect::<ScopeResult<Vec<_>>>()?;
            Ok(DynSolValue::Tuple(converted))
        }
        (AbiType::Array(element), Value::Array(values)) => {
            let converted = values
                .iter()
                .map(|v| to_dyn_value(v, element))
                .collect::<ScopeResult<Vec<_>>>()?;
            Ok(DynSolValue::Array(converted))
        }
        (AbiType::FixedArray(element, len), Value::Array(values)) => {
            if values.len() != *len {
                return Err(ScopeError::value_encoding(format!(
                    "expected {len} elements for {}, got {}",
                    ty.canonical(),
                    values.len()
                )));
            }
            let converted = values
                .iter()
                .map(|v| to_dyn_value(v, element))
                .collect::<ScopeResult<Vec<_>>>()?;
            Ok(DynSolValue::FixedArray(converted))
        }
        (ty, value) => Err(ScopeError::value_encoding(format!(
            "cannot encode {} as {}",
            value.kind(),
            ty.canonical()
        ))),
    }
}

fn check_uint_range(value: U256, bits: usize) -> ScopeResult<()> {
    if bits < 256 && value >= U256::from(1u64) << bits {
        return Err(ScopeError::value_encoding(format!(
            "value does not fit uint{bits}"
        )));
    }
    Ok(())
}

fn check_int_range(value: I256, bits: usize) -> ScopeResult<()> {
    if bits < 256 {
        let limit = U256::from(1u64) << (bits - 1);
        let out_of_range = if value.is_negative() {
            value.unsigned_abs() > limit
        } else {
            value.unsigned_abs() >= limit
        };
        if out_of_range {
            return Err(ScopeError::value_encoding(format!(
                "value does not fit int{bits}"
            )));
        }
    }
    Ok(())
}
