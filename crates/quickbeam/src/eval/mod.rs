//! Statement and expression evaluation

pub mod array;
pub mod assign;
pub mod binary;
pub mod call;
pub mod control;
pub mod field;
pub mod function;
pub mod ident;
pub mod if_stmt;
pub mod index;
pub mod literal;
pub mod local;
pub mod loops;
pub mod methods;
pub mod object;
pub mod return_stmt;
pub mod stmt;

use std::fmt::Debug;

pub use call::call_value;
pub use control::ControlFlow;
pub use stmt::{eval_block, eval_stmts};

use crate::ast::{Expr, NodeRef, Program, Stmt};
use crate::stack::ensure_sufficient_stack;
use crate::{EvalContext, EvalError, Runtime, Value};

/// Trait for evaluating syntax nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter.
/// Each node type implements this trait; [`Stmt`] and [`Expr`] dispatch to
/// them after running the context's `before_eval` hook.
pub trait Evaluate {
    /// Evaluate this node against the runtime's active scope.
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Dispatchers
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Stmt {
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        ctx.before_eval(NodeRef::Stmt(self))?;

        ensure_sufficient_stack(|| match self {
            Stmt::Expr(expr) => expr.eval(rt, ctx),
            Stmt::VarDecl(decl) => decl.eval(rt, ctx),
            Stmt::FuncDecl(decl) => decl.eval(rt, ctx),
            Stmt::Block(block) => block.eval(rt, ctx),
            Stmt::If(stmt) => stmt.eval(rt, ctx),
            Stmt::Return(value) => return_stmt::eval_return(value.as_ref(), rt, ctx),
            Stmt::ForIn(stmt) => stmt.eval(rt, ctx),
            Stmt::Empty => Ok(Value::Undefined),

            // Representable but not evaluated
            Stmt::While(_) | Stmt::Break(_) | Stmt::Continue(_) | Stmt::Throw(_) => {
                Err(unsupported(self.kind_name(), self))
            }
        })
    }
}

impl Evaluate for Expr {
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        ctx.before_eval(NodeRef::Expr(self))?;

        ensure_sufficient_stack(|| match self {
            Expr::Literal(lit) => lit.eval(rt, ctx),
            Expr::Ident(name) => ident::eval_ident(name, rt),
            Expr::Array(items) => array::eval_array(items, rt, ctx),
            Expr::Object(props) => object::eval_object(props, rt, ctx),
            Expr::Function(def) => Ok(function::make_closure(def, rt)),
            Expr::Call(call) => call.eval(rt, ctx),
            Expr::Dot(dot) => dot.eval(rt, ctx),
            Expr::Index(index) => index.eval(rt, ctx),
            Expr::Binary(binary) => binary.eval(rt, ctx),
            Expr::Assign(assign) => assign.eval(rt, ctx),

            // Representable but not evaluated
            Expr::Unary(_) | Expr::Conditional(_) => Err(unsupported(self.kind_name(), self)),
        })
    }
}

impl Evaluate for Program {
    /// Evaluate the top-level statements in the active scope, returning the
    /// value of the last one.
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        eval_stmts(&self.body, rt, ctx)
    }
}

/// Build the error for a node the evaluator does not implement.
pub(crate) fn unsupported(kind: &'static str, node: &impl Debug) -> EvalError {
    EvalError::UnsupportedConstruct {
        kind,
        node: format!("{:?}", node),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate an expression (convenience wrapper).
pub fn eval_expr(expr: &Expr, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
    expr.eval(rt, ctx)
}
