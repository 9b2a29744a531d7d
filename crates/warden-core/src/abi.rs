//! ABI type descriptors
//!
//! [`AbiType`] describes the binary layout of a single function parameter;
//! [`AbiFunction`] is a parsed human-readable signature. These descriptors
//! are the input vocabulary of the compiler: scopings are always resolved
//! *against* an `AbiType`, and function entries derive their selectors from
//! the canonical signature.

use crate::condition::ParamType;
use crate::errors::{ScopeError, ScopeResult};
use alloy_primitives::{keccak256, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary-layout descriptor of a smart-contract function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbiType {
    /// 20-byte account address.
    Address,
    /// Boolean, one word.
    Bool,
    /// UTF-8 string, length-prefixed.
    String,
    /// Byte blob, length-prefixed.
    Bytes,
    /// Unsigned integer of the given bit width (8..=256, multiple of 8).
    Uint(usize),
    /// Signed integer of the given bit width (8..=256, multiple of 8).
    Int(usize),
    /// Fixed-width byte array (1..=32 bytes), left-aligned in one word.
    FixedBytes(usize),
    /// Ordered heterogeneous components, optionally named.
    Tuple(Vec<AbiParam>),
    /// Unbounded homogeneous array.
    Array(Box<AbiType>),
    /// Fixed-length homogeneous array.
    FixedArray(Box<AbiType>, usize),
}

/// A parameter: an [`AbiType`] plus an optional field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Field name, if the ABI declares one.
    pub name: Option<String>,
    /// The parameter's type.
    pub ty: AbiType,
}

impl AbiParam {
    /// An unnamed parameter.
    pub fn new(ty: AbiType) -> Self {
        Self { name: None, ty }
    }

    /// A named parameter.
    pub fn named(name: impl Into<String>, ty: AbiType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }
}

impl From<AbiType> for AbiParam {
    fn from(ty: AbiType) -> Self {
        Self::new(ty)
    }
}

impl AbiType {
    /// The structural category this type occupies in a condition tree.
    pub fn param_type(&self) -> ParamType {
        match self {
            AbiType::Tuple(_) => ParamType::Tuple,
            AbiType::Array(_) | AbiType::FixedArray(_, _) => ParamType::Array,
            AbiType::Bytes | AbiType::String => ParamType::Dynamic,
            _ => ParamType::Static,
        }
    }

    /// Whether the standalone ABI encoding of this type is offset-prefixed.
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Bytes | AbiType::String | AbiType::Array(_) => true,
            AbiType::FixedArray(element, _) => element.is_dynamic(),
            AbiType::Tuple(components) => components.iter().any(|c| c.ty.is_dynamic()),
            _ => false,
        }
    }

    /// Tuple components, if this is a tuple.
    pub fn components(&self) -> Option<&[AbiParam]> {
        match self {
            AbiType::Tuple(components) => Some(components),
            _ => None,
        }
    }

    /// Element type, if this is an array.
    pub fn element(&self) -> Option<&AbiType> {
        match self {
            AbiType::Array(element) | AbiType::FixedArray(element, _) => Some(element),
            _ => None,
        }
    }

    /// Canonical type string, as used in function signatures.
    pub fn canonical(&self) -> String {
        match self {
            AbiType::Address => "address".to_string(),
            AbiType::Bool => "bool".to_string(),
            AbiType::String => "string".to_string(),
            AbiType::Bytes => "bytes".to_string(),
            AbiType::Uint(bits) => format!("uint{bits}"),
            AbiType::Int(bits) => format!("int{bits}"),
            AbiType::FixedBytes(width) => format!("bytes{width}"),
            AbiType::Tuple(components) => {
                let inner: Vec<String> = components.iter().map(|c| c.ty.canonical()).collect();
                format!("({})", inner.join(","))
            }
            AbiType::Array(element) => format!("{}[]", element.canonical()),
            AbiType::FixedArray(element, len) => format!("{}[{len}]", element.canonical()),
        }
    }

    /// Parse a type string (`"uint256"`, `"(address owner, uint256[] ids)[2]"`).
    ///
    /// Accepts the `tuple(...)` spelling as well as bare parentheses.
    pub fn parse(input: &str) -> ScopeResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ScopeError::invalid_abi("empty type string"));
        }

        // Array suffixes bind last, so peel them off from the right.
        if let Some(stripped) = input.strip_suffix(']') {
            let open = stripped
                .rfind('[')
                .ok_or_else(|| ScopeError::invalid_abi(format!("unbalanced brackets in `{input}`")))?;
            let element = Self::parse(&stripped[..open])?;
            let len = stripped[open + 1..].trim();
            return if len.is_empty() {
                Ok(AbiType::Array(Box::new(element)))
            } else {
                let len: usize = len.parse().map_err(|_| {
                    ScopeError::invalid_abi(format!("invalid array length in `{input}`"))
                })?;
                Ok(AbiType::FixedArray(Box::new(element), len))
            };
        }

        let bare = input.strip_prefix("tuple").unwrap_or(input);
        if let Some(inner) = bare.strip_prefix('(') {
            let inner = inner
                .strip_suffix(')')
                .ok_or_else(|| ScopeError::invalid_abi(format!("unbalanced parens in `{input}`")))?;
            let components = if inner.trim().is_empty() {
                Vec::new()
            } else {
                split_top_level(inner)?
                    .into_iter()
                    .map(AbiParam::parse)
                    .collect::<ScopeResult<Vec<_>>>()?
            };
            return Ok(AbiType::Tuple(components));
        }

        Self::parse_scalar(input)
    }

    fn parse_scalar(input: &str) -> ScopeResult<Self> {
        match input {
            "address" => return Ok(AbiType::Address),
            "bool" => return Ok(AbiType::Bool),
            "string" => return Ok(AbiType::String),
            "bytes" => return Ok(AbiType::Bytes),
            "uint" => return Ok(AbiType::Uint(256)),
            "int" => return Ok(AbiType::Int(256)),
            _ => {}
        }
        if let Some(rest) = input.strip_prefix("uint") {
            return Ok(AbiType::Uint(parse_bits(rest, input)?));
        }
        if let Some(rest) = input.strip_prefix("int") {
            return Ok(AbiType::Int(parse_bits(rest, input)?));
        }
        if let Some(rest) = input.strip_prefix("bytes") {
            let width: usize = rest
                .parse()
                .map_err(|_| ScopeError::invalid_abi(format!("unknown type `{input}`")))?;
            if (1..=32).contains(&width) {
                return Ok(AbiType::FixedBytes(width));
            }
            return Err(ScopeError::invalid_abi(format!(
                "bytes width out of range in `{input}`"
            )));
        }
        Err(ScopeError::invalid_abi(format!("unknown type `{input}`")))
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl AbiParam {
    /// Parse a parameter string: a type optionally followed by a name
    /// (`"uint256 amount"`).
    pub fn parse(input: &str) -> ScopeResult<Self> {
        let input = input.trim();
        match split_trailing_name(input) {
            Some((ty, name)) => {
                if !is_identifier(name) {
                    return Err(ScopeError::invalid_abi(format!(
                        "invalid parameter name `{name}`"
                    )));
                }
                Ok(AbiParam::named(name, AbiType::parse(ty)?))
            }
            None => Ok(AbiParam::new(AbiType::parse(input)?)),
        }
    }
}

fn parse_bits(rest: &str, input: &str) -> ScopeResult<usize> {
    let bits: usize = rest
        .parse()
        .map_err(|_| ScopeError::invalid_abi(format!("unknown type `{input}`")))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(ScopeError::invalid_abi(format!(
            "integer width out of range in `{input}`"
        )));
    }
    Ok(bits)
}

/// Split on commas at nesting depth zero.
fn split_top_level(input: &str) -> ScopeResult<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ScopeError::invalid_abi(format!("unbalanced `{input}`")))?;
            }
            ',' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ScopeError::invalid_abi(format!("unbalanced `{input}`")));
    }
    parts.push(&input[start..]);
    Ok(parts)
}

/// Split off a trailing name at depth zero, if one is present.
fn split_trailing_name(input: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut split_at = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => split_at = Some(i),
            _ => {}
        }
    }
    split_at.map(|i| (input[..i].trim_end(), input[i..].trim_start()))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A function parsed from a human-readable signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiFunction {
    /// Function name.
    pub name: String,
    /// Input parameters in declaration order.
    pub inputs: Vec<AbiParam>,
}

impl AbiFunction {
    /// Parse a human-readable signature, with or without parameter names:
    /// `"transfer(address to, uint256 amount)"`.
    pub fn parse(signature: &str) -> ScopeResult<Self> {
        let signature = signature.trim();
        let open = signature
            .find('(')
            .ok_or_else(|| ScopeError::invalid_abi(format!("not a signature: `{signature}`")))?;
        let name = &signature[..open];
        if !is_identifier(name) {
            return Err(ScopeError::invalid_abi(format!(
                "invalid function name `{name}`"
            )));
        }
        let inner = signature[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| ScopeError::invalid_abi(format!("unbalanced `{signature}`")))?;
        let inputs = if inner.trim().is_empty() {
            Vec::new()
        } else {
            split_top_level(inner)?
                .into_iter()
                .map(AbiParam::parse)
                .collect::<ScopeResult<Vec<_>>>()?
        };
        Ok(Self {
            name: name.to_string(),
            inputs,
        })
    }

    /// The canonical signature: name plus canonical input types, no names.
    pub fn canonical_signature(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(|p| p.ty.canonical()).collect();
        format!("{}({})", self.name, inputs.join(","))
    }

    /// The 4-byte selector: `keccak256(canonical_signature)[..4]`.
    pub fn selector(&self) -> Selector {
        let hash = keccak256(self.canonical_signature().as_bytes());
        Selector::from_slice(&hash[..4])
    }
}

impl fmt::Display for AbiFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_signature())
    }
}
