//! If statement evaluation

use super::Evaluate;
use crate::ast::IfStmt;
use crate::{EvalContext, EvalError, Runtime, Value};

impl Evaluate for IfStmt {
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        // Any value may be tested; only truthiness matters
        let cond = self.cond.eval(rt, ctx)?;

        if cond.is_truthy() {
            self.body.eval(rt, ctx)
        } else if let Some(alternate) = &self.alternate {
            alternate.eval(rt, ctx)
        } else {
            Ok(Value::Undefined)
        }
    }
}
