//! Member access evaluation

use crate::ast::DotExpr;
use crate::{EvalContext, EvalError, Runtime, Value};

use super::Evaluate;

impl Evaluate for DotExpr {
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        let base = self.object.eval(rt, ctx)?;
        member(&base, &self.property)
    }
}

/// Read `base.name`.
///
/// # Errors
///
/// Returns `NotAnObject` unless `base` is an object. A missing key is not
/// an error; it reads as `Undefined`.
pub fn member(base: &Value, name: &str) -> Result<Value, EvalError> {
    match base {
        Value::Object(obj) => Ok(obj.get(name).unwrap_or(Value::Undefined)),
        other => Err(EvalError::NotAnObject {
            value: other.clone(),
        }),
    }
}
