//! Lexical scopes managing variable and function bindings

mod frame;

pub use frame::ScopeGuard;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::ScopeError;
use crate::value::Value;

/// A single variable or function binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The bound value
    pub value: Value,

    /// Whether this binding rejects reassignment
    pub constant: bool,
}

impl Binding {
    /// A reassignable binding.
    pub fn mutable(value: Value) -> Self {
        Self {
            value,
            constant: false,
        }
    }

    /// A constant binding.
    pub fn constant(value: Value) -> Self {
        Self {
            value,
            constant: true,
        }
    }
}

/// Shared handle to a scope.
///
/// The runtime holds the active scope; closures hold the scope they were
/// defined in, which keeps it alive after its block exits.
pub type ScopeRef = Arc<Scope>;

/// One level of the scope chain.
///
/// Holds its own bindings and a link to its parent. Lookups here are local
/// only; walking the chain is up to the caller (see [`Scope::ancestors`]).
///
/// # Example
///
/// ```
/// use quickbeam::{Scope, Value};
///
/// let root = Scope::root();
/// root.set("x", Value::Int(1), false).unwrap();
///
/// let child = Scope::new_child(&root);
/// child.set("x", Value::Int(10), true).unwrap(); // Shadows outer x
///
/// assert_eq!(child.get("x").unwrap().value, Value::Int(10));
/// assert_eq!(root.get("x").unwrap().value, Value::Int(1));
/// assert!(child.set("x", Value::Int(11), false).is_err()); // constant
/// ```
pub struct Scope {
    /// Enclosing scope, `None` for the root
    parent: Option<ScopeRef>,

    /// Bindings in declaration order
    bindings: RwLock<IndexMap<String, Binding>>,
}

impl Scope {
    /// Create a scope with no parent.
    pub fn root() -> ScopeRef {
        Arc::new(Self {
            parent: None,
            bindings: RwLock::new(IndexMap::new()),
        })
    }

    /// Create a scope nested inside `parent`.
    pub fn new_child(parent: &ScopeRef) -> ScopeRef {
        Arc::new(Self {
            parent: Some(Arc::clone(parent)),
            bindings: RwLock::new(IndexMap::new()),
        })
    }

    /// The enclosing scope.
    pub fn parent(&self) -> Option<&ScopeRef> {
        self.parent.as_ref()
    }

    /// Iterate over this scope and then each enclosing scope, innermost first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Insert or overwrite a binding in this scope.
    ///
    /// # Errors
    ///
    /// `ConstantMutation` if an existing binding under `name` is constant;
    /// the scope is left unchanged.
    pub fn set(
        &self,
        name: impl Into<String>,
        value: Value,
        constant: bool,
    ) -> Result<(), ScopeError> {
        let name = name.into();
        let mut bindings = self.bindings.write();
        if let Some(existing) = bindings.get(&name) {
            if existing.constant {
                return Err(ScopeError::ConstantMutation { name });
            }
        }
        bindings.insert(name, Binding { value, constant });
        Ok(())
    }

    /// Replace the value of an existing binding in this scope.
    ///
    /// Returns `Ok(false)` if this scope has no binding under `name`.
    ///
    /// # Errors
    ///
    /// `ConstantMutation` if the binding is constant.
    pub fn assign(&self, name: &str, value: Value) -> Result<bool, ScopeError> {
        let mut bindings = self.bindings.write();
        match bindings.get_mut(name) {
            Some(binding) if binding.constant => Err(ScopeError::ConstantMutation {
                name: name.to_string(),
            }),
            Some(binding) => {
                binding.value = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding in this scope only.
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.bindings.read().get(name).cloned()
    }

    /// Check if this scope binds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.read().contains_key(name)
    }

    /// Names bound in this scope, in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.bindings.read().keys().cloned().collect()
    }

    /// Number of bindings in this scope.
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    /// Check if this scope has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("depth", &self.depth())
            .field("names", &self.names())
            .finish()
    }
}

/// Iterator returned by [`Scope::ancestors`].
pub struct Ancestors<'a> {
    next: Option<&'a Scope>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
