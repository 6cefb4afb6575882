//! Block evaluation

use crate::ast::{Block, Stmt};
use crate::{EvalContext, EvalError, Runtime, Value};

use super::Evaluate;

impl Evaluate for Block {
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        eval_block(self, rt, ctx)
    }
}

/// Evaluate a block, managing scope.
///
/// Enters a child of the active scope, evaluates the statements, and
/// restores the previous scope on every exit path.
///
/// # Errors
///
/// Returns errors from statement evaluation.
pub fn eval_block(block: &Block, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
    let mut guard = rt.scope_guard();
    eval_stmts(&block.stmts, &mut guard, ctx)
}

/// Evaluate statements in the active scope (without managing scope).
///
/// Returns the value of the last statement, or `Undefined` if there are
/// none.
///
/// # Errors
///
/// Returns the first error raised; later statements are not evaluated.
pub fn eval_stmts(stmts: &[Stmt], rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
    let mut last_value = Value::Undefined;

    for stmt in stmts {
        last_value = stmt.eval(rt, ctx)?;
    }

    Ok(last_value)
}
