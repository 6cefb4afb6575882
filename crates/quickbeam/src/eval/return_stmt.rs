//! Return statement evaluation

use crate::ast::Expr;
use crate::eval::control::ControlFlow;
use crate::{EvalContext, EvalError, Runtime, Value};

use super::Evaluate;

/// Evaluate `return expr;`.
///
/// Return is implemented as a control flow error, caught by the enclosing
/// function call.
pub fn eval_return(
    value: Option<&Expr>,
    rt: &mut Runtime,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let value = match value {
        Some(expr) => expr.eval(rt, ctx)?,
        None => Value::Undefined,
    };

    Err(EvalError::ControlFlow(ControlFlow::Return { value }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Stmt;
    use crate::Engine;

    #[test]
    fn test_return_with_value() {
        let engine = Engine::new();
        let mut rt = engine.spawn_runtime();
        let ctx = EvalContext::default();

        let result = Stmt::ret(Expr::int(42)).eval(&mut rt, &ctx);
        match result {
            Err(EvalError::ControlFlow(ControlFlow::Return { value })) => {
                assert_eq!(value, Value::Int(42));
            }
            other => panic!("expected Return, got {other:?}"),
        }
    }

    #[test]
    fn test_return_without_value() {
        let engine = Engine::new();
        let mut rt = engine.spawn_runtime();
        let ctx = EvalContext::default();

        let result = Stmt::Return(None).eval(&mut rt, &ctx);
        assert!(matches!(
            result,
            Err(EvalError::ControlFlow(ControlFlow::Return {
                value: Value::Undefined
            }))
        ));
    }

    #[test]
    fn test_return_stops_enclosing_blocks() {
        let engine = Engine::new();
        let mut rt = engine.spawn_runtime();
        rt.define_global("hits", Value::Int(0));

        let program = crate::ast::Program::new(vec![Stmt::block(vec![
            Stmt::ret(Expr::int(1)),
            Stmt::expr(Expr::assign(Expr::ident("hits"), Expr::int(1))),
        ])]);

        assert_eq!(rt.run(&program).unwrap(), Value::Int(1));
        assert_eq!(rt.global("hits"), Some(Value::Int(0)));
    }
}
