//! Preset finalization
//!
//! Turns a merged, validated allow list into the two record shapes the
//! evaluator expects: fully-cleared targets and function-scoped targets.
//! Conditions are normalized for the wire and placeholder holes are
//! substituted from the caller's assignment.

use crate::entries::{compile_entries, AllowEntry, CompiledEntry};
use crate::merge::merge_function_entries;
use crate::normalize::normalize_condition;
use alloy_primitives::{hex, Address, Selector};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use warden_core::codec;
use warden_core::condition::{CompValue, Condition};
use warden_core::errors::{ScopeError, ScopeResult};
use warden_core::placeholder::PlaceholderValues;

/// Scope of an authorization record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Clearance {
    /// No clearance.
    None,
    /// The whole target is cleared.
    Target,
    /// Cleared per function.
    Function,
}

impl From<Clearance> for u8 {
    fn from(value: Clearance) -> Self {
        match value {
            Clearance::None => 0,
            Clearance::Target => 1,
            Clearance::Function => 2,
        }
    }
}

impl TryFrom<u8> for Clearance {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Clearance::None),
            1 => Ok(Clearance::Target),
            2 => Ok(Clearance::Function),
            other => Err(format!("unknown clearance {other}")),
        }
    }
}

/// Execution flags in the evaluator's encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ExecutionOptions {
    /// Plain calls only.
    None,
    /// Value transfer allowed.
    Send,
    /// Delegate-call allowed.
    DelegateCall,
    /// Both value transfer and delegate-call allowed.
    Both,
}

impl ExecutionOptions {
    /// Derive the encoding from an entry's execution flags.
    pub fn from_flags(send: bool, delegatecall: bool) -> Self {
        match (send, delegatecall) {
            (false, false) => ExecutionOptions::None,
            (true, false) => ExecutionOptions::Send,
            (false, true) => ExecutionOptions::DelegateCall,
            (true, true) => ExecutionOptions::Both,
        }
    }
}

impl From<ExecutionOptions> for u8 {
    fn from(value: ExecutionOptions) -> Self {
        match value {
            ExecutionOptions::None => 0,
            ExecutionOptions::Send => 1,
            ExecutionOptions::DelegateCall => 2,
            ExecutionOptions::Both => 3,
        }
    }
}

impl TryFrom<u8> for ExecutionOptions {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ExecutionOptions::None),
            1 => Ok(ExecutionOptions::Send),
            2 => Ok(ExecutionOptions::DelegateCall),
            3 => Ok(ExecutionOptions::Both),
            other => Err(format!("unknown execution options {other}")),
        }
    }
}

/// One scoped function of a function-cleared target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRecord {
    /// The 4-byte selector.
    pub selector: Selector,
    /// Execution flags for calls through this function.
    pub execution_options: ExecutionOptions,
    /// True when no condition is attached: any arguments are accepted.
    pub wildcarded: bool,
    /// The wire-normalized condition, absent for wildcarded functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

/// One target of the finalized preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    /// The contract address.
    pub address: Address,
    /// Whether the whole target or individual functions are cleared.
    pub clearance: Clearance,
    /// Target-level execution flags; `None` for function-cleared targets,
    /// where the per-function flags govern.
    pub execution_options: ExecutionOptions,
    /// Scoped functions, empty for fully-cleared targets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionRecord>,
}

/// Finalize an allow list into evaluator-ready records.
///
/// Compiles and merges the entries, runs the global consistency checks, and
/// partitions the result: one record per fully-cleared target, then one
/// record per function-scoped address grouping all its functions in
/// first-seen order.
pub fn fill_preset(
    entries: &[AllowEntry],
    values: &PlaceholderValues,
) -> ScopeResult<Vec<TargetRecord>> {
    let merged = merge_function_entries(compile_entries(entries)?);

    check_wildcard_scope_conflicts(&merged)?;
    check_duplicate_functions(&merged)?;

    let mut records: Vec<TargetRecord> = Vec::new();
    for entry in &merged {
        if let CompiledEntry::Target {
            address,
            send,
            delegatecall,
        } = entry
        {
            records.push(TargetRecord {
                address: *address,
                clearance: Clearance::Target,
                execution_options: ExecutionOptions::from_flags(*send, *delegatecall),
                functions: Vec::new(),
            });
        }
    }

    let mut groups: IndexMap<Address, Vec<FunctionRecord>> = IndexMap::new();
    for entry in merged {
        let CompiledEntry::Function {
            address,
            selector,
            condition,
            send,
            delegatecall,
        } = entry
        else {
            continue;
        };
        let condition = condition
            .map(|condition| finalize_condition(condition, values))
            .transpose()?;
        groups.entry(address).or_default().push(FunctionRecord {
            selector,
            execution_options: ExecutionOptions::from_flags(send, delegatecall),
            wildcarded: condition.is_none(),
            condition,
        });
    }
    for (address, functions) in groups {
        records.push(TargetRecord {
            address,
            clearance: Clearance::Function,
            execution_options: ExecutionOptions::None,
            functions,
        });
    }

    Ok(records)
}

fn finalize_condition(
    condition: Condition,
    values: &PlaceholderValues,
) -> ScopeResult<Condition> {
    Ok(normalize_condition(substitute_placeholders(
        condition, values,
    )?))
}

fn substitute_placeholders(
    condition: Condition,
    values: &PlaceholderValues,
) -> ScopeResult<Condition> {
    let comp_value = match condition.comp_value {
        Some(CompValue::Placeholder(placeholder)) => {
            let value =
                values
                    .get(&placeholder)
                    .ok_or_else(|| ScopeError::MissingPlaceholderValue {
                        name: placeholder.name.clone(),
                    })?;
            Some(CompValue::Bytes(codec::encode_value(
                value,
                &placeholder.ty,
            )?))
        }
        other => other,
    };
    let children = condition
        .children
        .into_iter()
        .map(|child| substitute_placeholders(child, values))
        .collect::<ScopeResult<Vec<_>>>()?;
    Ok(Condition {
        comp_value,
        children,
        ..condition
    })
}

fn check_wildcard_scope_conflicts(entries: &[CompiledEntry]) -> ScopeResult<()> {
    let mut cleared: BTreeSet<Address> = BTreeSet::new();
    let mut scoped: BTreeSet<Address> = BTreeSet::new();
    for entry in entries {
        match entry {
            CompiledEntry::Target { address, .. } => {
                cleared.insert(*address);
            }
            CompiledEntry::Function { address, .. } => {
                scoped.insert(*address);
            }
        }
    }
    let conflicting: Vec<String> = cleared
        .intersection(&scoped)
        .map(|address| format!("0x{}", hex::encode(address)))
        .collect();
    if conflicting.is_empty() {
        Ok(())
    } else {
        Err(ScopeError::WildcardScopeConflict {
            addresses: conflicting,
        })
    }
}

fn check_duplicate_functions(entries: &[CompiledEntry]) -> ScopeResult<()> {
    let mut seen: BTreeMap<(Address, Selector), usize> = BTreeMap::new();
    for entry in entries {
        if let CompiledEntry::Function {
            address, selector, ..
        } = entry
        {
            *seen.entry((*address, *selector)).or_insert(0) += 1;
        }
    }
    let duplicates: Vec<String> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((address, selector), _)| {
            format!("0x{}:0x{}", hex::encode(address), hex::encode(selector))
        })
        .collect();
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ScopeError::UnmergeableDuplicateFunction { keys: duplicates })
    }
}
