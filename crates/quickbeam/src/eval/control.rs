//! Control flow mechanism for return

use crate::Value;

/// Control flow signal for non-local jumps.
///
/// When `return` is evaluated, it doesn't produce a normal
/// `Result<Value, EvalError>`. Instead, it returns an
/// `Err(EvalError::ControlFlow(...))` that propagates through enclosing
/// blocks and loops until caught by the function call (or by
/// [`Runtime::run`](crate::Runtime::run) at top level).
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    /// Return from a function with a value.
    Return {
        /// Value to return from the function
        value: Value,
    },
}

impl ControlFlow {
    /// Create a return.
    pub fn return_value(value: Value) -> Self {
        ControlFlow::Return { value }
    }

    /// The carried value.
    pub fn into_value(self) -> Value {
        match self {
            ControlFlow::Return { value } => value,
        }
    }
}
