//! # Quickbeam
//!
//! An embeddable tree-walking evaluator for a small JavaScript-like language.
//!
//! Quickbeam evaluates an already-parsed syntax tree ([`ast`]) against a
//! chain of lexical scopes. Hosts extend the language by installing global
//! values and native functions, and observe results only through those
//! native functions and through reference values they handed in.
//!
//! ## Architecture
//!
//! - **Engine**: owns globals shared by every runtime it spawns
//! - **Runtime**: an isolated interpreter with its own scopes and
//!   runtime-local globals
//! - **Evaluator**: the [`Evaluate`] trait, implemented per syntax node
//! - **Native bridge**: [`call_value`], the single calling convention for
//!   interpreted and host functions
//!
//! ## Example
//!
//! ```
//! use quickbeam::ast::{Expr, Program, Stmt};
//! use quickbeam::{Engine, NativeFn, Value};
//!
//! let engine = Engine::new();
//! engine.register_fn(NativeFn::new("twice", 1, |args| {
//!     Ok(Some(Value::array(vec![args[0].clone(), args[0].clone()])))
//! }));
//!
//! let mut runtime = engine.spawn_runtime();
//! let program = Program::new(vec![
//!     Stmt::const_("a", Expr::string("hi")),
//!     Stmt::ret(Expr::call(Expr::ident("twice"), vec![Expr::ident("a")])),
//! ]);
//!
//! let result = runtime.run(&program).unwrap();
//! assert_eq!(result.to_string(), r#"["hi", "hi"]"#);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod context;
pub mod engine;
pub mod environment;
pub mod error;
pub mod eval;
pub mod runtime;
mod stack;
pub mod value;

// Re-export main types
pub use context::{EvalContext, EvalHooks, NoopHooks};
pub use engine::Engine;
pub use environment::{Binding, Scope, ScopeGuard, ScopeRef};
pub use error::{EvalError, Result, ScopeError};
pub use eval::{call_value, ControlFlow, Evaluate};
pub use runtime::Runtime;
pub use value::{
    ArrayRef, Arity, FunctionValue, NativeFn, NativeFnPtr, ObjectRef, ReturnContract, Value,
    ValueKind,
};

/// Quickbeam version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
