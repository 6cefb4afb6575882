//! Function call evaluation

use crate::ast::{CallExpr, Expr, NodeRef};
use crate::eval::control::ControlFlow;
use crate::{
    Arity, EvalContext, EvalError, FunctionValue, NativeFn, ReturnContract, Runtime, Value,
};

use super::field::member;
use super::local::bind_element;
use super::methods;
use super::stmt::eval_stmts;
use super::{unsupported, Evaluate};

impl Evaluate for CallExpr {
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        // Method call: evaluate the receiver once, then try built-in methods
        if let Expr::Dot(dot) = self.callee.as_ref() {
            ctx.before_eval(NodeRef::Expr(&self.callee))?;
            let receiver = dot.object.eval(rt, ctx)?;

            if let Some(method) = methods::lookup(&receiver, &dot.property) {
                let args = eval_args(&self.args, rt, ctx)?;
                return methods::call_method(method, &receiver, args, rt, ctx);
            }

            let func = member(&receiver, &dot.property)?;
            let args = eval_args(&self.args, rt, ctx)?;
            return call_value(func, args, rt, ctx);
        }

        // Evaluate the function expression
        let func = self.callee.eval(rt, ctx)?;

        // Evaluate arguments
        let args = eval_args(&self.args, rt, ctx)?;

        // Call the function
        call_value(func, args, rt, ctx)
    }
}

/// Evaluate arguments left to right.
fn eval_args(args: &[Expr], rt: &mut Runtime, ctx: &EvalContext) -> Result<Vec<Value>, EvalError> {
    args.iter().map(|arg| arg.eval(rt, ctx)).collect()
}

/// Call a Value as a function.
///
/// This is the single calling convention for interpreted closures and host
/// functions, used by call expressions, collection methods and
/// [`Runtime::call`].
///
/// # Errors
///
/// - `NotCallable` if the value is not a function
/// - `WrongArgumentCount` if the argument count doesn't fit the callee
/// - `MissingReturnValue` / `WrongReturnType` if a native function breaks
///   its return contract
/// - `Native` if a native function fails
/// - `StackOverflow` if the call depth limit is exceeded
pub fn call_value(
    func: Value,
    args: Vec<Value>,
    rt: &mut Runtime,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    match func {
        Value::Function(f) => call_function(&f, args, rt, ctx),
        Value::NativeFn(f) => call_native(&f, &args),
        other => Err(EvalError::NotCallable { value: other }),
    }
}

/// Call an interpreted function.
///
/// The body runs in a fresh child of the scope the function was defined in.
/// Missing arguments fall back to parameter defaults, evaluated in that new
/// scope so they can see earlier parameters.
fn call_function(
    func: &FunctionValue,
    args: Vec<Value>,
    rt: &mut Runtime,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let params = &func.def.params;

    if params.rest.is_some() {
        return Err(unsupported("rest parameter", params));
    }

    // Fewer arguments than parameters is fine; more is not
    if args.len() > params.items.len() {
        return Err(EvalError::WrongArgumentCount {
            name: func.name().to_string(),
            expected: params.items.len(),
            got: args.len(),
        });
    }

    // Track call depth (stack overflow protection)
    rt.enter_call(ctx.max_call_depth)?;

    let result = {
        let mut guard = rt.scope_guard_in(&func.scope);
        let mut args = args.into_iter();
        params
            .items
            .iter()
            .try_for_each(|param| bind_element(param, args.next(), false, &mut guard, ctx))
            .and_then(|()| eval_stmts(&func.def.body.stmts, &mut guard, ctx))
    };

    rt.exit_call();

    // Handle return control flow
    match result {
        Ok(_) => Ok(Value::Undefined),
        Err(EvalError::ControlFlow(ControlFlow::Return { value })) => Ok(value),
        Err(e) => Err(e),
    }
}

/// Call a native function, enforcing its arity and return contract.
fn call_native(func: &NativeFn, args: &[Value]) -> Result<Value, EvalError> {
    if let Arity::Fixed(expected) = func.arity {
        if args.len() != expected {
            return Err(EvalError::WrongArgumentCount {
                name: func.name.clone(),
                expected,
                got: args.len(),
            });
        }
    }

    tracing::debug!(name = %func.name, args = args.len(), "native call");

    let result = (func.func)(args).map_err(|cause| EvalError::Native {
        name: func.name.clone(),
        cause,
    })?;

    check_return(func, result)
}

fn check_return(func: &NativeFn, result: Option<Value>) -> Result<Value, EvalError> {
    match (func.returns, result) {
        (ReturnContract::Any, value) => Ok(value.unwrap_or(Value::Undefined)),
        (ReturnContract::Required | ReturnContract::Kind(_), None) => {
            Err(EvalError::MissingReturnValue {
                name: func.name.clone(),
            })
        }
        (ReturnContract::Kind(expected), Some(value)) if value.kind() != expected => {
            Err(EvalError::WrongReturnType {
                name: func.name.clone(),
                expected,
                got: value.kind(),
            })
        }
        (_, Some(value)) => Ok(value),
    }
}
