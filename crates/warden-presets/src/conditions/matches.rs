//! Structural matcher
//!
//! Builds composite conditions over tuples, arrays, and whole ABI-encoded
//! argument lists. Fields or elements the author leaves unspecified receive
//! a structural placeholder describing their shape, so downstream consumers
//! always see one child per ABI component, in ABI declaration order.

use super::{resolve, typing, ConditionExpr, Scoping};
use warden_core::abi::{AbiParam, AbiType};
use warden_core::condition::{Condition, Operator, ParamType};
use warden_core::errors::{ScopeError, ScopeResult};

/// Structural match over a tuple or array parameter.
///
/// Accepts a positional element list for tuples and arrays, or a partial
/// named-field mapping for tuples.
pub fn matches(scoping: impl Into<Scoping>) -> Scoping {
    Scoping::Expr(ConditionExpr::Matches(Box::new(scoping.into())))
}

/// Structural match over the ABI-encoded blob carried in a `bytes`
/// parameter.
///
/// Each positional scoping is resolved against the corresponding parameter
/// of the encoded argument list; missing tail entries are unconstrained.
pub fn matches_abi(scopings: Vec<Scoping>, params: Vec<AbiParam>) -> Scoping {
    Scoping::Expr(ConditionExpr::MatchesAbi { scopings, params })
}

/// The structural placeholder for a type: accepts any value of the type's
/// shape while keeping that shape visible for validation.
pub(crate) fn describe_structure(ty: &AbiType) -> Condition {
    let children = match ty {
        AbiType::Tuple(components) => components
            .iter()
            .map(|component| describe_structure(&component.ty))
            .collect(),
        AbiType::Array(element) | AbiType::FixedArray(element, _) => {
            vec![describe_structure(element)]
        }
        _ => Vec::new(),
    };
    Condition {
        param_type: ty.param_type(),
        operator: Operator::Pass,
        comp_value: None,
        children,
    }
}

pub(crate) fn compile_matches(scoping: &Scoping, ty: &AbiType) -> ScopeResult<Condition> {
    match ty {
        AbiType::Tuple(components) => compile_tuple_match(scoping, components, ty),
        AbiType::Array(element) => compile_array_match(scoping, element, None, ty),
        AbiType::FixedArray(element, len) => compile_array_match(scoping, element, Some(*len), ty),
        _ => Err(ScopeError::UnsupportedAbiShape {
            context: "a structural scoping".to_string(),
            actual: ty.canonical(),
        }),
    }
}

fn compile_tuple_match(
    scoping: &Scoping,
    components: &[AbiParam],
    ty: &AbiType,
) -> ScopeResult<Condition> {
    let children = match scoping {
        Scoping::Elements(elements) => {
            if elements.len() > components.len() {
                return Err(ScopeError::TooManyElements {
                    given: elements.len(),
                    capacity: components.len(),
                });
            }
            resolve_positional(elements, components)?
        }
        Scoping::Struct(fields) => {
            for (field, _) in fields {
                let known = components
                    .iter()
                    .any(|component| component.name.as_deref() == Some(field));
                if !known {
                    return Err(ScopeError::UnknownField {
                        field: field.clone(),
                        tuple: ty.canonical(),
                    });
                }
            }
            let mut children = Vec::with_capacity(components.len());
            for (index, component) in components.iter().enumerate() {
                let given = component.name.as_deref().and_then(|name| {
                    fields
                        .iter()
                        .find(|(field, _)| field == name)
                        .map(|(_, scoping)| scoping)
                });
                let child = match given {
                    Some(scoping) => resolve(scoping, &component.ty)?,
                    None => describe_structure(&component.ty),
                };
                typing::check_compatibility(&child, &component.ty, &component_label(component, index))?;
                children.push(child);
            }
            children
        }
        _ => {
            return Err(ScopeError::UnsupportedAbiShape {
                context: "a structural scoping".to_string(),
                actual: ty.canonical(),
            })
        }
    };
    Ok(Condition::with_children(
        ParamType::Tuple,
        Operator::Matches,
        children,
    ))
}

fn compile_array_match(
    scoping: &Scoping,
    element: &AbiType,
    len: Option<usize>,
    ty: &AbiType,
) -> ScopeResult<Condition> {
    let Scoping::Elements(elements) = scoping else {
        return Err(ScopeError::UnsupportedAbiShape {
            context: "a named-field scoping".to_string(),
            actual: ty.canonical(),
        });
    };
    if let Some(len) = len {
        if elements.len() > len {
            return Err(ScopeError::TooManyElements {
                given: elements.len(),
                capacity: len,
            });
        }
    }
    // Fixed-length arrays are padded out to one child per element; unbounded
    // arrays match exactly the positions given.
    let positions = len.unwrap_or(elements.len());
    let mut children = Vec::with_capacity(positions);
    for index in 0..positions {
        let child = match elements.get(index) {
            Some(scoping) => resolve(scoping, element)?,
            None => describe_structure(element),
        };
        typing::check_compatibility(&child, element, &index.to_string())?;
        children.push(child);
    }
    Ok(Condition::with_children(
        ParamType::Array,
        Operator::Matches,
        children,
    ))
}

/// Compile a positional scoping list against a parameter list, one child per
/// parameter, under the given root category (`Calldata` for a function's
/// argument list, `AbiEncoded` for a blob inside a `bytes` value).
pub(crate) fn compile_abi_match(
    scopings: &[Scoping],
    params: &[AbiParam],
    root: ParamType,
) -> ScopeResult<Condition> {
    if scopings.len() > params.len() {
        return Err(ScopeError::TooManyElements {
            given: scopings.len(),
            capacity: params.len(),
        });
    }
    let mut children = Vec::with_capacity(params.len());
    for (index, param) in params.iter().enumerate() {
        let child = match scopings.get(index) {
            Some(scoping) => resolve(scoping, &param.ty)?,
            None => describe_structure(&param.ty),
        };
        typing::check_compatibility(&child, &param.ty, &component_label(param, index))?;
        children.push(child);
    }
    Ok(Condition::with_children(root, Operator::Matches, children))
}

/// `matches_abi` applied through the resolver: only meaningful on a `bytes`
/// parameter, where the blob's own argument list takes over.
pub(crate) fn compile_embedded_abi_match(
    scopings: &[Scoping],
    params: &[AbiParam],
    ty: &AbiType,
) -> ScopeResult<Condition> {
    if *ty != AbiType::Bytes {
        return Err(ScopeError::UnsupportedAbiShape {
            context: "an abi-encoded scoping".to_string(),
            actual: ty.canonical(),
        });
    }
    compile_abi_match(scopings, params, ParamType::AbiEncoded)
}

fn resolve_positional(elements: &[Scoping], components: &[AbiParam]) -> ScopeResult<Vec<Condition>> {
    let mut children = Vec::with_capacity(components.len());
    for (index, component) in components.iter().enumerate() {
        let child = match elements.get(index) {
            Some(scoping) => resolve(scoping, &component.ty)?,
            None => describe_structure(&component.ty),
        };
        typing::check_compatibility(&child, &component.ty, &component_label(component, index))?;
        children.push(child);
    }
    Ok(children)
}

fn component_label(component: &AbiParam, index: usize) -> String {
    component
        .name
        .clone()
        .unwrap_or_else(|| index.to_string())
}
