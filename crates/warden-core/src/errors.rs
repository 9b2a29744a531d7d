//! Unified error type for scoping compilation
//!
//! Every failure here is an authoring-time validation error: it is raised
//! immediately and propagates to the caller uncaught. There is no retry or
//! partial-result path - a preset that fails any check must not be deployed.

use crate::condition::ParamType;

/// Result alias used across the workspace.
pub type ScopeResult<T> = std::result::Result<T, ScopeError>;

/// Errors raised while compiling scopings into condition trees or while
/// finalizing a preset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// A structural matcher was applied to an ABI type it cannot match on.
    #[error("cannot match {context} against `{actual}`")]
    UnsupportedAbiShape {
        /// What was being matched (e.g. "a struct scoping").
        context: String,
        /// Canonical string of the offending ABI type.
        actual: String,
    },

    /// A named-field scoping referenced a field the ABI tuple does not have.
    #[error("unknown field `{field}` on `{tuple}`")]
    UnknownField {
        /// The field name that was not found.
        field: String,
        /// Canonical string of the tuple type searched.
        tuple: String,
    },

    /// A positional scoping supplied more entries than the fixed-length ABI
    /// type has room for.
    #[error("scoping specifies {given} elements but the type holds at most {capacity}")]
    TooManyElements {
        /// Number of scoping entries supplied.
        given: usize,
        /// Component/element capacity of the ABI type.
        capacity: usize,
    },

    /// A resolved condition's effective parameter type disagrees with the
    /// type the ABI declares for that position, or the branches of a logical
    /// combinator disagree among themselves.
    #[error("parameter type mismatch at {location}: got {actual}, expected {expected}")]
    ParamTypeMismatch {
        /// Field name or positional index of the offending child.
        location: String,
        /// The effective parameter type that was computed.
        actual: ParamType,
        /// The parameter type the ABI expects there.
        expected: ParamType,
    },

    /// A value was supplied without any way to determine its ABI type.
    #[error("no ABI type available for {location}")]
    MissingValueType {
        /// Where the untyped value appeared.
        location: String,
    },

    /// `within_allowance` was applied to a type that is not an unsigned
    /// integer.
    #[error("allowance conditions require an unsigned integer parameter, got `{actual}`")]
    InvalidAllowanceTarget {
        /// Canonical string of the offending ABI type.
        actual: String,
    },

    /// A target address appears both as a fully-cleared entry and as a
    /// function-scoped entry.
    #[error("targets are both fully cleared and function-scoped: {}", addresses.join(", "))]
    WildcardScopeConflict {
        /// The conflicting addresses, lower-case hex.
        addresses: Vec<String>,
    },

    /// Two entries address the same (target, selector) pair with execution
    /// flags that cannot be reconciled.
    #[error("duplicate function entries that cannot be merged: {}", keys.join(", "))]
    UnmergeableDuplicateFunction {
        /// `address:selector` keys of the duplicates, lower-case hex.
        keys: Vec<String>,
    },

    /// The external codec rejected a value, or a boundary adjustment
    /// (`gte`/`lte`) left the representable range.
    #[error("value encoding failed: {message}")]
    ValueEncoding {
        /// Description of the codec failure.
        message: String,
    },

    /// A branch combinator was invoked with an unusable branch list.
    #[error("invalid combinator: {message}")]
    InvalidCombinator {
        /// Description of the arity/shape problem.
        message: String,
    },

    /// A type string or human-readable function signature failed to parse.
    #[error("invalid ABI input: {message}")]
    InvalidAbi {
        /// Description of the parse failure.
        message: String,
    },

    /// A placeholder had no assigned value when the preset was finalized.
    #[error("no value provided for placeholder `{name}`")]
    MissingPlaceholderValue {
        /// Name the placeholder was registered under.
        name: String,
    },
}

impl ScopeError {
    /// Create a value-encoding error.
    pub fn value_encoding(message: impl Into<String>) -> Self {
        Self::ValueEncoding {
            message: message.into(),
        }
    }

    /// Create an invalid-ABI error.
    pub fn invalid_abi(message: impl Into<String>) -> Self {
        Self::InvalidAbi {
            message: message.into(),
        }
    }

    /// Create an invalid-combinator error.
    pub fn invalid_combinator(message: impl Into<String>) -> Self {
        Self::InvalidCombinator {
            message: message.into(),
        }
    }
}
