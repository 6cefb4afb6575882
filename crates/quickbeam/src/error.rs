//! Error types for Quickbeam evaluation

use thiserror::Error;

use crate::eval::ControlFlow;
use crate::value::{Value, ValueKind};

/// Everything that can go wrong while evaluating a tree.
///
/// Each failure kind is its own variant so hosts can match on it rather
/// than on message text. The first error aborts evaluation up to
/// [`Runtime::run`](crate::Runtime::run); side effects already performed are
/// not undone.
#[derive(Error, Debug)]
pub enum EvalError {
    /// A name resolved through neither the scope chain nor the globals
    #[error("`{name}` is not declared")]
    UndeclaredIdentifier {
        /// The unresolved name
        name: String,
    },

    /// Reassignment of a constant binding
    #[error("`{name}` is constant and can't be mutated")]
    ConstantMutation {
        /// The constant's name
        name: String,
    },

    /// Member access, for-in or a collection method on a non-object
    #[error("expected an object, found {}: {value}", .value.type_name())]
    NotAnObject {
        /// The offending value
        value: Value,
    },

    /// A call whose callee is not a function
    #[error("{} `{value}` is not callable", .value.type_name())]
    NotCallable {
        /// The offending callee
        value: Value,
    },

    /// A collection method was handed something other than a function
    #[error("`{method}` expects a function, found {}", .value.type_name())]
    NotAFunction {
        /// The collection method
        method: String,
        /// The offending argument
        value: Value,
    },

    /// Array position outside `[0, len)`
    #[error("can only index within length {len} of array, not {index}")]
    IndexOutOfBounds {
        /// The position after negative-index adjustment
        index: i64,
        /// Array length
        len: usize,
    },

    /// Array indexed with something other than an integer
    #[error("can only index arrays using integers, not {index:?}")]
    NonIntegerIndex {
        /// The offending index
        index: Value,
    },

    /// An object `map` callback returned something other than `[key, value]`
    #[error("expected a [key, value] pair, found {value:?}")]
    NotKeyValuePair {
        /// What the callback returned
        value: Value,
    },

    /// Argument count does not match the callee
    #[error("`{name}` takes {expected} args, got {got}")]
    WrongArgumentCount {
        /// Callee name
        name: String,
        /// Accepted count
        expected: usize,
        /// Supplied count
        got: usize,
    },

    /// A native function promised a value and returned none
    #[error("native function `{name}` returned no value")]
    MissingReturnValue {
        /// Function name
        name: String,
    },

    /// A native function returned a value of the wrong kind
    #[error("native function `{name}` returned {got}, expected {expected}")]
    WrongReturnType {
        /// Function name
        name: String,
        /// Declared kind
        expected: ValueKind,
        /// Returned kind
        got: ValueKind,
    },

    /// Operator applied to operands it is not defined for
    #[error("binary operation `{op}` not implemented for {} and {}", .left.type_name(), .right.type_name())]
    UnsupportedOperands {
        /// Operator spelling
        op: &'static str,
        /// Left operand
        left: Value,
        /// Right operand
        right: Value,
    },

    /// Syntax-tree node the evaluator does not implement
    #[error("evaluating {kind} not yet implemented: {node}")]
    UnsupportedConstruct {
        /// Node kind
        kind: &'static str,
        /// Debug rendering of the node
        node: String,
    },

    /// String or array repetition whose result would be too long
    #[error("repeating a value of length {len} {count} times exceeds the limit of {max}")]
    RepetitionTooLarge {
        /// Length of the repeated operand
        len: usize,
        /// Requested count
        count: i64,
        /// Largest allowed result length
        max: usize,
    },

    /// Integer division by zero
    #[error("integer division by zero")]
    DivisionByZero,

    /// Call depth exceeded the configured maximum
    #[error("stack overflow: call depth {depth} exceeds maximum {max}")]
    StackOverflow {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// A host function reported failure
    #[error("native function `{name}` failed: {cause:#}")]
    Native {
        /// Function name
        name: String,
        /// The host's error
        cause: anyhow::Error,
    },

    /// An evaluation hook stopped evaluation
    #[error("evaluation halted: {cause:#}")]
    Halted {
        /// The hook's error
        cause: anyhow::Error,
    },

    /// Non-local control flow; caught by the construct it targets
    #[error("control flow escaped its construct: {0:?}")]
    ControlFlow(ControlFlow),
}

/// Errors raised by a single [`Scope`](crate::Scope).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// Attempt to overwrite a constant binding
    #[error("`{name}` is constant and can't be mutated")]
    ConstantMutation {
        /// The constant's name
        name: String,
    },
}

impl From<ScopeError> for EvalError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::ConstantMutation { name } => EvalError::ConstantMutation { name },
        }
    }
}

/// Result type alias for Quickbeam operations
pub type Result<T> = std::result::Result<T, EvalError>;
