//! Callable value types: interpreted closures and host functions

use std::fmt;
use std::sync::Arc;

use crate::ast::FunctionDef;
use crate::environment::ScopeRef;

use super::{Value, ValueKind};

/// Type alias for native function pointers to reduce complexity
pub type NativeFnPtr = Arc<dyn Fn(&[Value]) -> anyhow::Result<Option<Value>> + Send + Sync>;

/// An interpreted function together with the scope it was defined in.
///
/// Calls run in a child of `scope`, never of the caller's scope.
#[derive(Clone)]
pub struct FunctionValue {
    /// The function's syntax, shared with the tree it came from
    pub def: Arc<FunctionDef>,

    /// Defining scope, kept alive for as long as the closure is
    pub scope: ScopeRef,
}

impl FunctionValue {
    /// Create a closure over `scope`.
    pub fn new(def: Arc<FunctionDef>, scope: ScopeRef) -> Self {
        Self { def, scope }
    }

    /// Function name, or `<anonymous>`.
    pub fn name(&self) -> &str {
        self.def.name.as_deref().unwrap_or("<anonymous>")
    }

    /// Number of declared positional parameters.
    pub fn arity(&self) -> usize {
        self.def.params.items.len()
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionValue({}/{})", self.name(), self.arity())
    }
}

/// How many arguments a native function takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many
    Fixed(usize),
    /// Any number
    Variadic,
}

impl Arity {
    /// Check an argument count against this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => n == count,
            Arity::Variadic => true,
        }
    }
}

/// What a native function promises to return.
///
/// Checked by the bridge after every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnContract {
    /// Nothing or any value
    #[default]
    Any,
    /// Some value, of any kind
    Required,
    /// Some value of exactly this kind
    Kind(ValueKind),
}

/// A host function exposed to scripts.
///
/// The signature is fixed by [`NativeFnPtr`]: an ordered argument slice in,
/// an optional value or an error out.
#[derive(Clone)]
pub struct NativeFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Accepted argument count
    pub arity: Arity,

    /// Declared return contract
    pub returns: ReturnContract,

    /// The actual function pointer
    pub func: NativeFnPtr,
}

impl NativeFn {
    /// Create a native function with a fixed arity.
    pub fn new<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity: Arity::Fixed(arity),
            returns: ReturnContract::Any,
            func: Arc::new(func),
        }
    }

    /// Create a native function accepting any number of arguments.
    pub fn variadic<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            arity: Arity::Variadic,
            ..Self::new(name, 0, func)
        }
    }

    /// Declare a return contract (builder pattern).
    pub fn returning(mut self, returns: ReturnContract) -> Self {
        self.returns = returns;
        self
    }

    /// Whether two handles wrap the same host closure.
    pub fn ptr_eq(&self, other: &NativeFn) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.func) as *const (),
            Arc::as_ptr(&other.func) as *const (),
        )
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}
