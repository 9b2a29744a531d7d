//! Warden preset compiler
//!
//! Compiles declarative shorthand scopings of allowed function-call
//! arguments into the normalized, validated condition trees consumed by an
//! external role-based access-control evaluator, and finalizes lists of
//! authorization entries into that evaluator's record shapes.
//!
//! The pipeline is a pure, synchronous tree transformation:
//!
//! ```text
//! scopings + ABI types
//!     -> resolve / matches / combinators   (conditions)
//!     -> Condition tree
//!     -> merge_function_entries            (merge)
//!     -> fill_preset                       (fill)
//!     -> target records
//! ```
//!
//! Identical inputs always produce structurally identical output, child
//! ordering included; downstream consumers diff and hash compiled
//! conditions.

pub mod conditions;
pub mod entries;
pub mod fill;
pub mod merge;
pub mod normalize;
pub mod prelude;

pub use conditions::typing::effective_param_type;
pub use conditions::{any, resolve, ConditionExpr, ScopeValue, Scoping};
pub use entries::{AllowEntry, CompiledEntry, FunctionEntry, FunctionRef, TargetEntry};
pub use fill::{fill_preset, Clearance, ExecutionOptions, FunctionRecord, TargetRecord};
pub use merge::merge_function_entries;
pub use normalize::normalize_condition;
