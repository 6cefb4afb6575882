//! Value representation for runtime values

mod callable;
mod collections;
mod display;
mod impls;

pub use callable::{Arity, FunctionValue, NativeFn, NativeFnPtr, ReturnContract};
pub use collections::{ArrayRef, ObjectRef};

use std::fmt;
use std::sync::Arc;

/// Runtime value representation for the Quickbeam evaluator.
///
/// Values fall into two groups:
/// - Value types (`Undefined`, `Bool`, `Int`, `Float`, `String`) are copied
///   on assignment.
/// - Reference types (`Object`, `Array`, `Function`, `NativeFn`) are shared:
///   cloning a `Value` clones the handle, and mutation through one handle is
///   visible through every other.
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Value Types
    // ═══════════════════════════════════════════════════════════════════
    /// The absence of a value
    Undefined,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// Integer subtype of Number
    Int(i64),

    /// Floating-point subtype of Number
    Float(f64),

    /// Immutable string
    String(Arc<String>),

    // ═══════════════════════════════════════════════════════════════════
    // Reference Types
    // ═══════════════════════════════════════════════════════════════════
    /// String-keyed map, insertion ordered
    Object(ObjectRef),

    /// Ordered sequence
    Array(ArrayRef),

    /// Interpreted closure
    Function(Arc<FunctionValue>),

    /// Host-supplied callable
    NativeFn(NativeFn),
}

/// The kind of a [`Value`], as seen by scripts.
///
/// `Int` and `Float` are both [`ValueKind::Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `undefined`
    Undefined,
    /// Integer or float
    Number,
    /// String
    String,
    /// Boolean
    Boolean,
    /// Object
    Object,
    /// Array
    Array,
    /// Interpreted function
    Function,
    /// Host function
    NativeFunction,
}

impl ValueKind {
    /// Diagnostic name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Boolean => "boolean",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Function => "function",
            ValueKind::NativeFunction => "native function",
        }
    }

    /// Whether values of this kind are shared by reference.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            ValueKind::Object | ValueKind::Array | ValueKind::Function | ValueKind::NativeFunction
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
