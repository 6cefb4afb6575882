//! Function definition evaluation

use std::sync::Arc;

use crate::ast::{FuncDecl, FunctionDef};
use crate::{EvalContext, EvalError, FunctionValue, Runtime, Value};

use super::Evaluate;

/// Create a closure over the active scope.
///
/// Used for arrow functions and anonymous function expressions alike.
pub fn make_closure(def: &Arc<FunctionDef>, rt: &Runtime) -> Value {
    let func = FunctionValue::new(Arc::clone(def), Arc::clone(rt.scope()));
    Value::Function(Arc::new(func))
}

impl Evaluate for FuncDecl {
    /// Define a function in the active scope.
    ///
    /// The binding is constant, and the closure captures the scope it is
    /// bound in, so the function can call itself recursively.
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        let func_value = make_closure(&self.function, rt);
        ctx.before_bind(&self.name, &func_value)?;
        rt.scope().set(self.name.as_str(), func_value, true)?;
        Ok(Value::Undefined)
    }
}
