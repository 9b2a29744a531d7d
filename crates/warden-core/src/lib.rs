//! Core data model for the Warden permission compiler
//!
//! This crate holds the vocabulary shared by the authoring layer and the
//! on-chain evaluator's wire format: ABI type descriptors ([`abi`]), the
//! compiled condition tree ([`condition`]), literal values ([`value`]),
//! deferred placeholder values ([`placeholder`]), the adapter to the
//! external ABI codec ([`codec`]), and the unified error type ([`errors`]).
//!
//! Everything here is plain immutable data; the compilation logic lives in
//! `warden-presets`.

pub mod abi;
pub mod codec;
pub mod condition;
pub mod errors;
pub mod placeholder;
pub mod value;

pub use abi::{AbiFunction, AbiParam, AbiType};
pub use condition::{CompValue, Condition, Operator, ParamType};
pub use errors::{ScopeError, ScopeResult};
pub use placeholder::{Placeholder, PlaceholderId, PlaceholderRegistry, PlaceholderValues};
pub use value::Value;
