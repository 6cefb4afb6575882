//! Per-evaluation interpreter state

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::Program;
use crate::context::EvalContext;
use crate::engine::EngineShared;
use crate::environment::{Scope, ScopeRef};
use crate::error::{EvalError, Result};
use crate::eval::{call_value, ControlFlow, Evaluate};
use crate::value::{NativeFn, Value};

/// An isolated interpreter spawned from an [`Engine`](crate::Engine).
///
/// A runtime owns its scope chain and its runtime-local globals. Names are
/// resolved innermost scope first, then runtime-local globals, then the
/// engine's shared globals.
///
/// # Example
///
/// ```
/// use quickbeam::ast::{Expr, Program, Stmt};
/// use quickbeam::{Engine, Value};
///
/// let engine = Engine::new();
/// let mut runtime = engine.spawn_runtime();
/// runtime.define_global("base", Value::Int(40));
///
/// let program = Program::new(vec![Stmt::ret(Expr::binary(
///     quickbeam::ast::BinaryOp::Add,
///     Expr::ident("base"),
///     Expr::int(2),
/// ))]);
/// assert_eq!(runtime.run(&program).unwrap(), Value::Int(42));
/// ```
pub struct Runtime {
    id: usize,
    engine: Arc<EngineShared>,
    globals: IndexMap<String, Value>,
    root: ScopeRef,
    scope: ScopeRef,
    debug: bool,
    context: EvalContext,
    call_depth: usize,
}

impl Runtime {
    pub(crate) fn new(id: usize, engine: Arc<EngineShared>, context: EvalContext) -> Self {
        let root = Scope::root();
        Self {
            id,
            engine,
            globals: IndexMap::new(),
            scope: Arc::clone(&root),
            root,
            debug: false,
            context,
            call_depth: 0,
        }
    }

    /// Sequence number assigned by the spawning engine.
    pub fn id(&self) -> usize {
        self.id
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scope Management
    // ═══════════════════════════════════════════════════════════════════

    /// The active scope.
    pub fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    /// The outermost scope of this runtime.
    pub fn root(&self) -> &ScopeRef {
        &self.root
    }

    /// Make `scope` active, returning the previously active one.
    pub(crate) fn replace_scope(&mut self, scope: ScopeRef) -> ScopeRef {
        std::mem::replace(&mut self.scope, scope)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Globals
    // ═══════════════════════════════════════════════════════════════════

    /// Define (or overwrite) a runtime-local global.
    pub fn define_global(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.globals.insert(name.into(), value.into());
    }

    /// Register a host function as a runtime-local global under its own name.
    pub fn register_fn(&mut self, func: NativeFn) {
        let name = func.name.clone();
        self.globals.insert(name, Value::NativeFn(func));
    }

    /// Read a runtime-local global.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.get(name).cloned()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Configuration
    // ═══════════════════════════════════════════════════════════════════

    /// Toggle per-node tracing for this runtime.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Whether tracing is on, either here or on the engine.
    pub fn debug(&self) -> bool {
        self.debug || self.engine.debug.load(Ordering::Relaxed)
    }

    /// The context used by [`run`](Self::run), [`eval`](Self::eval) and
    /// [`call`](Self::call).
    pub fn context(&self) -> &EvalContext {
        &self.context
    }

    /// Replace the evaluation context.
    pub fn set_context(&mut self, context: EvalContext) {
        self.context = context;
    }

    fn eval_context(&self) -> EvalContext {
        let trace = self.context.trace || self.debug();
        self.context.clone().with_trace(trace)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Name Resolution
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve a name through the scope chain, then runtime-local globals,
    /// then engine globals.
    ///
    /// # Errors
    ///
    /// `UndeclaredIdentifier` if no level binds `name`.
    pub fn lookup(&self, name: &str) -> Result<Value> {
        if let Some(binding) = self.scope.ancestors().find_map(|scope| scope.get(name)) {
            return Ok(binding.value);
        }
        if let Some(value) = self.globals.get(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.engine.globals.get(name) {
            return Ok(value.value().clone());
        }
        Err(EvalError::UndeclaredIdentifier {
            name: name.to_string(),
        })
    }

    /// Replace the value bound to `name` wherever it resolves.
    pub(crate) fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        for scope in self.scope.ancestors() {
            if scope.assign(name, value.clone())? {
                return Ok(());
            }
        }
        if let Some(slot) = self.globals.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        if let Some(mut slot) = self.engine.globals.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        Err(EvalError::UndeclaredIdentifier {
            name: name.to_string(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Depth Tracking (Stack Overflow Protection)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a function call. Returns error if max depth exceeded.
    pub(crate) fn enter_call(&mut self, max: usize) -> Result<()> {
        if self.call_depth >= max {
            return Err(EvalError::StackOverflow {
                depth: self.call_depth,
                max,
            });
        }
        self.call_depth += 1;
        Ok(())
    }

    /// Exit a function call.
    pub(crate) fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    /// Current call depth.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    // ═══════════════════════════════════════════════════════════════════
    // Entry Points
    // ═══════════════════════════════════════════════════════════════════

    /// Evaluate a program in a fresh child of the root scope.
    ///
    /// Declarations made by the program do not outlive the call. A top-level
    /// `return` ends the program with its value.
    #[tracing::instrument(level = "debug", skip_all, fields(runtime = self.id, stmts = program.body.len()))]
    pub fn run(&mut self, program: &Program) -> Result<Value> {
        let ctx = self.eval_context();
        let root = Arc::clone(&self.root);
        let mut guard = self.scope_guard_in(&root);
        catch_return(program.eval(&mut guard, &ctx))
    }

    /// Evaluate a single node in the active scope.
    ///
    /// Unlike [`run`](Self::run), declarations persist in the active scope
    /// for later calls.
    pub fn eval<N: Evaluate + ?Sized>(&mut self, node: &N) -> Result<Value> {
        let ctx = self.eval_context();
        catch_return(node.eval(self, &ctx))
    }

    /// Call a function by name with host-supplied arguments.
    ///
    /// # Errors
    ///
    /// `UndeclaredIdentifier` if `name` does not resolve, otherwise whatever
    /// the call itself raises.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value> {
        let func = self.lookup(name)?;
        let ctx = self.eval_context();
        catch_return(call_value(func, args, self, &ctx))
    }
}

fn catch_return(result: Result<Value>) -> Result<Value> {
    match result {
        Err(EvalError::ControlFlow(ControlFlow::Return { value })) => Ok(value),
        other => other,
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("id", &self.id)
            .field("globals", &self.globals.keys().collect::<Vec<_>>())
            .field("scope", &self.scope)
            .field("debug", &self.debug)
            .field("call_depth", &self.call_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{Expr, Stmt};
    use crate::Engine;

    #[test]
    fn test_lookup_order() {
        let engine = Engine::new();
        engine.define_global("x", Value::Int(1));
        engine.define_global("y", Value::Int(1));
        let mut runtime = engine.spawn_runtime();
        runtime.define_global("x", Value::Int(2));
        runtime.scope().set("y", Value::Int(3), false).unwrap();

        assert_eq!(runtime.lookup("x").unwrap(), Value::Int(2));
        assert_eq!(runtime.lookup("y").unwrap(), Value::Int(3));
        assert!(matches!(
            runtime.lookup("z"),
            Err(EvalError::UndeclaredIdentifier { name }) if name == "z"
        ));
    }

    #[test]
    fn test_assign_reaches_globals() {
        let engine = Engine::new();
        engine.define_global("shared", Value::Int(0));
        let mut runtime = engine.spawn_runtime();
        runtime.define_global("local", Value::Int(0));

        runtime.assign("shared", Value::Int(5)).unwrap();
        runtime.assign("local", Value::Int(6)).unwrap();

        assert_eq!(engine.global("shared"), Some(Value::Int(5)));
        assert_eq!(runtime.global("local"), Some(Value::Int(6)));
        assert!(runtime.assign("missing", Value::Int(1)).is_err());
    }

    #[test]
    fn test_run_does_not_leak_declarations() {
        let engine = Engine::new();
        let mut runtime = engine.spawn_runtime();
        let program = Program::new(vec![Stmt::let_("x", Expr::int(1))]);

        runtime.run(&program).unwrap();
        assert!(runtime.lookup("x").is_err());
    }

    #[test]
    fn test_eval_persists_declarations() {
        let engine = Engine::new();
        let mut runtime = engine.spawn_runtime();

        runtime.eval(&Stmt::let_("x", Expr::int(1))).unwrap();
        assert_eq!(runtime.eval(&Expr::ident("x")).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_call_by_name() {
        let engine = Engine::new();
        let mut runtime = engine.spawn_runtime();
        runtime
            .eval(&Stmt::function(
                "double",
                &["n"],
                vec![Stmt::ret(Expr::binary(
                    crate::ast::BinaryOp::Mul,
                    Expr::ident("n"),
                    Expr::int(2),
                ))],
            ))
            .unwrap();

        assert_eq!(
            runtime.call("double", vec![Value::Int(21)]).unwrap(),
            Value::Int(42)
        );
    }

    #[test]
    fn test_call_depth_limit() {
        let engine = Engine::new();
        let mut runtime = engine.spawn_runtime();
        runtime.enter_call(2).unwrap();
        runtime.enter_call(2).unwrap();
        assert!(matches!(
            runtime.enter_call(2),
            Err(EvalError::StackOverflow { depth: 2, max: 2 })
        ));
        runtime.exit_call();
        assert_eq!(runtime.call_depth(), 1);
    }

    #[test]
    fn test_debug_follows_engine() {
        let engine = Engine::new();
        let runtime = engine.spawn_runtime();
        assert!(!runtime.debug());
        engine.set_debug(true);
        assert!(runtime.debug());
    }
}
