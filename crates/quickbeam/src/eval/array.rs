//! Array literal evaluation

use crate::ast::Expr;
use crate::{EvalContext, EvalError, Runtime, Value};

use super::Evaluate;

/// Evaluate an array literal: `[a, b, c]`
///
/// Elements are evaluated left to right into a new array.
pub fn eval_array(items: &[Expr], rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
    let elements = items
        .iter()
        .map(|item| item.eval(rt, ctx))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::array(elements))
}
