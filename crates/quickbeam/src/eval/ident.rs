//! Variable reference evaluation

use crate::{EvalError, Runtime, Value};

/// Evaluate a variable reference.
///
/// Resolves through the scope chain, then runtime-local globals, then
/// engine globals.
///
/// # Errors
///
/// Returns `UndeclaredIdentifier` if the name is bound nowhere.
pub fn eval_ident(name: &str, rt: &Runtime) -> Result<Value, EvalError> {
    rt.lookup(name)
}
