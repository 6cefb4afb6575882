//! Assignment evaluation

use crate::ast::{AssignExpr, AssignOp, Expr};
use crate::{EvalContext, EvalError, Runtime, Value};

use super::binary::eval_binary_op;
use super::index::{assign_index, index_value};
use super::{unsupported, Evaluate};

impl Evaluate for AssignExpr {
    /// Evaluate an assignment: `x = 42`, `obj.k = v`, `arr[i] += 1`
    ///
    /// The right side is evaluated first. Compound operators are desugared
    /// (`x += y` → `x = x + y`). The result is the assigned value.
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        let rhs = self.value.eval(rt, ctx)?;

        match self.target.as_ref() {
            Expr::Ident(name) => {
                let value = combine(self.op, || rt.lookup(name), rhs)?;
                rt.assign(name, value.clone())?;
                Ok(value)
            }

            Expr::Dot(dot) => {
                let base = dot.object.eval(rt, ctx)?;
                let obj = match &base {
                    Value::Object(obj) => obj,
                    other => {
                        return Err(EvalError::NotAnObject {
                            value: other.clone(),
                        })
                    }
                };
                let current = || obj.get(&dot.property).unwrap_or(Value::Undefined);
                let value = combine(self.op, || Ok(current()), rhs)?;
                obj.insert(dot.property.as_str(), value.clone());
                Ok(value)
            }

            Expr::Index(index) => {
                let base = index.object.eval(rt, ctx)?;
                let key = index.index.eval(rt, ctx)?;
                let value = combine(self.op, || index_value(&base, &key), rhs)?;
                assign_index(&base, &key, value.clone())?;
                Ok(value)
            }

            other => Err(unsupported("assignment target", other)),
        }
    }
}

/// Apply a compound operator to the target's current value.
///
/// `current` is only consulted for compound operators.
fn combine(
    op: AssignOp,
    current: impl FnOnce() -> Result<Value, EvalError>,
    rhs: Value,
) -> Result<Value, EvalError> {
    match op.binary_op() {
        Some(bin_op) => eval_binary_op(bin_op, current()?, rhs),
        None => Ok(rhs),
    }
}
