//! Convenience re-exports for preset authoring.

pub use crate::conditions::branching::{and, every, nor, or, some, subset};
pub use crate::conditions::comparison::{
    call_within_allowance, eq, ether_within_allowance, gt, gte, lt, lte, within_allowance,
    AllowanceKey,
};
pub use crate::conditions::matches::{matches, matches_abi};
pub use crate::conditions::{any, resolve, ConditionExpr, ScopeValue, Scoping};
pub use crate::entries::{AllowEntry, CompiledEntry, FunctionEntry, FunctionRef, TargetEntry};
pub use crate::fill::{fill_preset, Clearance, ExecutionOptions, FunctionRecord, TargetRecord};
pub use crate::merge::merge_function_entries;

pub use warden_core::abi::{AbiFunction, AbiParam, AbiType};
pub use warden_core::condition::{CompValue, Condition, Operator, ParamType};
pub use warden_core::errors::{ScopeError, ScopeResult};
pub use warden_core::placeholder::{PlaceholderRegistry, PlaceholderValues};
pub use warden_core::value::Value;
