//! Named, typed deferred values
//!
//! A [`Placeholder`] is a hole in a scoping that is substituted with a
//! concrete value when the preset is finalized. Identity is an explicit
//! arena index rather than object identity, so it survives serialization:
//! two placeholders denote the same logical hole exactly when they share an
//! `identity`. Retyping a placeholder preserves that identity.

use crate::abi::AbiType;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Index of a placeholder in its registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PlaceholderId(u32);

impl fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A handle to a registered placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// This handle's own index.
    pub id: PlaceholderId,
    /// The hole this handle denotes; differs from `id` after retyping.
    pub identity: PlaceholderId,
    /// Name the placeholder was registered under.
    pub name: String,
    /// ABI type the substituted value will be encoded against.
    pub ty: AbiType,
}

impl Placeholder {
    /// Whether two handles denote the same logical hole.
    pub fn same_hole(&self, other: &Placeholder) -> bool {
        self.identity == other.identity
    }
}

/// Arena of placeholder definitions.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PlaceholderRegistry {
    entries: Vec<Placeholder>,
}

impl PlaceholderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new placeholder. The handle's `identity` is its own id.
    pub fn define(&mut self, name: impl Into<String>, ty: AbiType) -> Placeholder {
        let id = PlaceholderId(self.entries.len() as u32);
        let placeholder = Placeholder {
            id,
            identity: id,
            name: name.into(),
            ty,
        };
        self.entries.push(placeholder.clone());
        placeholder
    }

    /// Re-declare a placeholder under a different ABI type.
    ///
    /// If the canonical type string is unchanged the original handle is
    /// reused; otherwise a fresh handle is allocated that still points back
    /// at the original hole.
    pub fn retype(&mut self, placeholder: &Placeholder, ty: AbiType) -> Placeholder {
        if placeholder.ty.canonical() == ty.canonical() {
            return placeholder.clone();
        }
        let id = PlaceholderId(self.entries.len() as u32);
        let retyped = Placeholder {
            id,
            identity: placeholder.identity,
            name: placeholder.name.clone(),
            ty,
        };
        self.entries.push(retyped.clone());
        retyped
    }

    /// Look up a handle by index.
    pub fn get(&self, id: PlaceholderId) -> Option<&Placeholder> {
        self.entries.get(id.0 as usize)
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Concrete values assigned to placeholder holes for finalization.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PlaceholderValues {
    values: BTreeMap<PlaceholderId, Value>,
}

impl PlaceholderValues {
    /// An empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a value to the hole a placeholder denotes.
    pub fn set(&mut self, placeholder: &Placeholder, value: impl Into<Value>) -> &mut Self {
        self.values.insert(placeholder.identity, value.into());
        self
    }

    /// Look up the value assigned to a placeholder's hole.
    pub fn get(&self, placeholder: &Placeholder) -> Option<&Value> {
        self.values.get(&placeholder.identity)
    }
}
