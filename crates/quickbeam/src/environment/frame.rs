//! RAII scope guard for automatic scope restoration

use crate::runtime::Runtime;

use super::{Scope, ScopeRef};

/// RAII guard that makes a new scope active and restores the previous one
/// when dropped, on success and error paths alike.
///
/// # Example
///
/// ```
/// use quickbeam::{Engine, Value};
///
/// let engine = Engine::new();
/// let mut runtime = engine.spawn_runtime();
///
/// {
///     let guard = runtime.scope_guard();
///     guard.scope().set("y", Value::Int(2), false).unwrap();
///     assert!(guard.lookup("y").is_ok());
/// }
/// // guard dropped, previous scope active again, y is gone
/// assert!(runtime.lookup("y").is_err());
/// ```
pub struct ScopeGuard<'a> {
    runtime: &'a mut Runtime,
    saved: ScopeRef,
}

impl Runtime {
    /// Enter a child of the active scope until the guard drops.
    pub fn scope_guard(&mut self) -> ScopeGuard<'_> {
        let child = Scope::new_child(self.scope());
        self.enter_scope(child)
    }

    /// Enter a child of `parent` (not of the active scope) until the guard
    /// drops. Function calls use this to run in their defining scope.
    pub fn scope_guard_in(&mut self, parent: &ScopeRef) -> ScopeGuard<'_> {
        let child = Scope::new_child(parent);
        self.enter_scope(child)
    }

    fn enter_scope(&mut self, scope: ScopeRef) -> ScopeGuard<'_> {
        let saved = self.replace_scope(scope);
        ScopeGuard {
            runtime: self,
            saved,
        }
    }
}

impl<'a> Drop for ScopeGuard<'a> {
    fn drop(&mut self) {
        let saved = self.saved.clone();
        self.runtime.replace_scope(saved);
    }
}

impl<'a> std::ops::Deref for ScopeGuard<'a> {
    type Target = Runtime;

    fn deref(&self) -> &Self::Target {
        self.runtime
    }
}

impl<'a> std::ops::DerefMut for ScopeGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.runtime
    }
}
