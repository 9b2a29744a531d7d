//! Authorization entries
//!
//! A preset is authored as a list of [`AllowEntry`] values: either a fully
//! cleared target (any call to the address) or a function-scoped entry
//! (one selector on the address, optionally condition-constrained). Entries
//! are plain values; [`compile_entries`] lowers them into the canonical form
//! the merger and finalizer operate on.

use crate::conditions::comparison::{
    call_within_allowance, ether_within_allowance, AllowanceKey,
};
use crate::conditions::matches::{compile_abi_match, describe_structure};
use crate::conditions::Scoping;
use alloy_primitives::{Address, Selector};
use warden_core::abi::AbiFunction;
use warden_core::condition::{Condition, Operator, ParamType};
use warden_core::errors::{ScopeError, ScopeResult};

/// How a function entry identifies its function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionRef {
    /// A raw 4-byte selector; no parameter types are known.
    Selector(Selector),
    /// A parsed signature; the selector is derived and parameter types are
    /// available for argument scoping.
    Signature(AbiFunction),
}

/// Fully cleared target: any function on the address may be called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEntry {
    /// The contract address.
    pub address: Address,
    /// Whether calls may transfer value.
    pub send: bool,
    /// Whether delegate-call semantics are allowed.
    pub delegatecall: bool,
}

impl TargetEntry {
    /// Clear a whole target with default execution flags.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            send: false,
            delegatecall: false,
        }
    }

    /// Allow value transfer.
    pub fn with_send(mut self) -> Self {
        self.send = true;
        self
    }

    /// Allow delegate-call.
    pub fn with_delegatecall(mut self) -> Self {
        self.delegatecall = true;
        self
    }
}

/// Function-scoped entry: one selector on an address, optionally
/// condition-constrained.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    /// The contract address.
    pub address: Address,
    /// The function being scoped.
    pub function: FunctionRef,
    /// Authoring shorthand: one scoping per parameter, missing tail entries
    /// unconstrained. Requires a signature.
    pub args: Option<Vec<Scoping>>,
    /// A pre-built condition; mutually exclusive with `args`.
    pub condition: Option<Condition>,
    /// Charge sent ether against this budget.
    pub ether_allowance: Option<AllowanceKey>,
    /// Charge the call itself against this budget.
    pub call_allowance: Option<AllowanceKey>,
    /// Whether calls may transfer value.
    pub send: bool,
    /// Whether delegate-call semantics are allowed.
    pub delegatecall: bool,
}

impl FunctionEntry {
    /// Scope a function by raw selector.
    pub fn selector(address: Address, selector: Selector) -> Self {
        Self::with_ref(address, FunctionRef::Selector(selector))
    }

    /// Scope a function by human-readable signature.
    pub fn signature(address: Address, signature: &str) -> ScopeResult<Self> {
        Ok(Self::with_ref(
            address,
            FunctionRef::Signature(AbiFunction::parse(signature)?),
        ))
    }

    fn with_ref(address: Address, function: FunctionRef) -> Self {
        Self {
            address,
            function,
            args: None,
            condition: None,
            ether_allowance: None,
            call_allowance: None,
            send: false,
            delegatecall: false,
        }
    }

    /// Constrain the call's arguments, one scoping per parameter.
    pub fn with_args(mut self, args: impl IntoIterator<Item = Scoping>) -> Self {
        self.args = Some(args.into_iter().collect());
        self
    }

    /// Attach a pre-built condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Charge sent ether against a budget.
    pub fn with_ether_allowance(mut self, key: impl Into<AllowanceKey>) -> Self {
        self.ether_allowance = Some(key.into());
        self
    }

    /// Charge each call against a budget.
    pub fn with_call_allowance(mut self, key: impl Into<AllowanceKey>) -> Self {
        self.call_allowance = Some(key.into());
        self
    }

    /// Allow value transfer.
    pub fn with_send(mut self) -> Self {
        self.send = true;
        self
    }

    /// Allow delegate-call.
    pub fn with_delegatecall(mut self) -> Self {
        self.delegatecall = true;
        self
    }

    /// Derive the selector this entry addresses.
    pub fn derived_selector(&self) -> Selector {
        match &self.function {
            FunctionRef::Selector(selector) => *selector,
            FunctionRef::Signature(function) => function.selector(),
        }
    }

    /// Lower this entry into its canonical compiled form.
    pub fn compile(&self) -> ScopeResult<CompiledEntry> {
        let selector = self.derived_selector();
        if self.args.is_some() && self.condition.is_some() {
            return Err(ScopeError::invalid_combinator(
                "an entry takes either argument scopings or a pre-built condition, not both",
            ));
        }

        let mut condition = match (&self.args, &self.condition) {
            (Some(args), _) => {
                let FunctionRef::Signature(function) = &self.function else {
                    return Err(ScopeError::MissingValueType {
                        location: format!("arguments of selector {selector}"),
                    });
                };
                Some(compile_abi_match(
                    args,
                    &function.inputs,
                    ParamType::Calldata,
                )?)
            }
            (None, Some(condition)) => Some(condition.clone()),
            (None, None) => None,
        };

        if self.ether_allowance.is_some() || self.call_allowance.is_some() {
            let mut root = match condition.take() {
                Some(root) => root,
                None => match &self.function {
                    // Allowance predicates hang off the calldata structure,
                    // so one is synthesized when no condition was given.
                    FunctionRef::Signature(function) => Condition::with_children(
                        ParamType::Calldata,
                        Operator::Matches,
                        function
                            .inputs
                            .iter()
                            .map(|param| describe_structure(&param.ty))
                            .collect(),
                    ),
                    FunctionRef::Selector(_) => {
                        return Err(ScopeError::MissingValueType {
                            location: format!("allowance options of selector {selector}"),
                        })
                    }
                },
            };
            if root.param_type != ParamType::Calldata || root.operator != Operator::Matches {
                return Err(ScopeError::invalid_combinator(
                    "allowance options require a calldata-rooted matches condition",
                ));
            }
            if let Some(key) = self.ether_allowance {
                root.children.push(ether_within_allowance(key));
            }
            if let Some(key) = self.call_allowance {
                root.children.push(call_within_allowance(key));
            }
            condition = Some(root);
        }

        Ok(CompiledEntry::Function {
            address: self.address,
            selector,
            condition,
            send: self.send,
            delegatecall: self.delegatecall,
        })
    }
}

/// One line of a preset's allow list.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowEntry {
    /// A fully cleared target.
    Target(TargetEntry),
    /// A function-scoped entry.
    Function(FunctionEntry),
}

impl From<TargetEntry> for AllowEntry {
    fn from(entry: TargetEntry) -> Self {
        AllowEntry::Target(entry)
    }
}

impl From<FunctionEntry> for AllowEntry {
    fn from(entry: FunctionEntry) -> Self {
        AllowEntry::Function(entry)
    }
}

/// Canonical compiled form of an entry, as consumed by the merger and the
/// finalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledEntry {
    /// A fully cleared target.
    Target {
        /// The contract address.
        address: Address,
        /// Whether calls may transfer value.
        send: bool,
        /// Whether delegate-call semantics are allowed.
        delegatecall: bool,
    },
    /// A function-scoped entry with its selector resolved.
    Function {
        /// The contract address.
        address: Address,
        /// The 4-byte selector.
        selector: Selector,
        /// The compiled condition, if the entry is not a wildcard.
        condition: Option<Condition>,
        /// Whether calls may transfer value.
        send: bool,
        /// Whether delegate-call semantics are allowed.
        delegatecall: bool,
    },
}

/// Lower every entry of an allow list.
pub fn compile_entries(entries: &[AllowEntry]) -> ScopeResult<Vec<CompiledEntry>> {
    entries
        .iter()
        .map(|entry| match entry {
            AllowEntry::Target(target) => Ok(CompiledEntry::Target {
                address: target.address,
                send: target.send,
                delegatecall: target.delegatecall,
            }),
            AllowEntry::Function(function) => function.compile(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::any;
    use crate::conditions::comparison::eq;
    use alloy_primitives::address;
    use warden_core::condition::Operator;

    const TOKEN: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");

    #[test]
    fn signature_entry_derives_its_selector() {
        let entry = FunctionEntry::signature(TOKEN, "transfer(address,uint256)").unwrap();
        assert_eq!(entry.derived_selector().as_slice(), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn args_compile_to_a_calldata_match() {
        let entry = FunctionEntry::signature(TOKEN, "transfer(address to, uint256 amount)")
            .unwrap()
            .with_args([any(), eq(1000u64)]);
        let CompiledEntry::Function { condition, .. } = entry.compile().unwrap() else {
            panic!("expected function entry");
        };
        let condition = condition.expect("args imply a condition");
        assert_eq!(condition.param_type, ParamType::Calldata);
        assert_eq!(condition.operator, Operator::Matches);
        assert_eq!(condition.children.len(), 2);
        assert_eq!(condition.children[0].operator, Operator::Pass);
        assert_eq!(condition.children[1].operator, Operator::EqualTo);
    }

    #[test]
    fn args_without_a_signature_have_no_types() {
        let entry = FunctionEntry::selector(TOKEN, Selector::from([0xa9, 0x05, 0x9c, 0xbb]))
            .with_args([eq(1000u64)]);
        let err = entry.compile().unwrap_err();
        assert!(matches!(err, ScopeError::MissingValueType { .. }));
    }

    #[test]
    fn no_args_and_no_condition_is_a_wildcard() {
        let entry = FunctionEntry::signature(TOKEN, "pause()").unwrap();
        let CompiledEntry::Function { condition, .. } = entry.compile().unwrap() else {
            panic!("expected function entry");
        };
        assert!(condition.is_none());
    }

    #[test]
    fn allowance_options_extend_the_calldata_root() {
        let key = AllowanceKey::from_label("eth-budget").unwrap();
        let entry = FunctionEntry::signature(TOKEN, "deposit(uint256 amount)")
            .unwrap()
            .with_args([eq(5u64)])
            .with_ether_allowance(key);
        let CompiledEntry::Function { condition, .. } = entry.compile().unwrap() else {
            panic!("expected function entry");
        };
        let condition = condition.expect("condition expected");
        assert_eq!(condition.children.len(), 2);
        assert_eq!(
            condition.children[1].operator,
            Operator::EtherWithinAllowance
        );
        assert_eq!(condition.children[1].param_type, ParamType::None);
    }

    #[test]
    fn allowance_without_structure_synthesizes_one() {
        let key = AllowanceKey::from_label("call-budget").unwrap();
        let entry = FunctionEntry::signature(TOKEN, "poke(address target)")
            .unwrap()
            .with_call_allowance(key);
        let CompiledEntry::Function { condition, .. } = entry.compile().unwrap() else {
            panic!("expected function entry");
        };
        let condition = condition.expect("condition expected");
        assert_eq!(condition.param_type, ParamType::Calldata);
        assert_eq!(condition.children.len(), 2);
        assert_eq!(condition.children[0].operator, Operator::Pass);
        assert_eq!(
            condition.children[1].operator,
            Operator::CallWithinAllowance
        );
    }
}
