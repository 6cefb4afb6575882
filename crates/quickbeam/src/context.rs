//! Evaluation context configuration

use std::fmt;
use std::sync::Arc;

use crate::ast::NodeRef;
use crate::error::EvalError;
use crate::value::Value;

/// Extension points invoked during evaluation.
///
/// Both methods default to no-ops. An error from either aborts evaluation
/// with [`EvalError::Halted`]; this is the seam for step quotas, deadlines or
/// cooperative cancellation.
pub trait EvalHooks: Send + Sync {
    /// Called before any statement or expression is evaluated.
    fn before_eval(&self, _node: NodeRef<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called before a new binding is created (declarations, parameters,
    /// loop variables, function declarations).
    fn before_bind(&self, _name: &str, _value: &Value) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl EvalHooks for NoopHooks {}

/// Configuration passed through all evaluation calls.
///
/// Controls recursion limits, tracing and the evaluation hooks.
#[derive(Clone)]
pub struct EvalContext {
    /// Maximum call depth (stack overflow protection)
    pub max_call_depth: usize,

    /// Whether to trace every evaluated node (for debugging)
    pub trace: bool,

    /// Evaluation hooks
    pub hooks: Arc<dyn EvalHooks>,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
            trace: false,
            hooks: Arc::new(NoopHooks),
        }
    }
}

impl fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("max_call_depth", &self.max_call_depth)
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Replace the hooks (builder pattern).
    pub fn with_hooks(mut self, hooks: impl EvalHooks + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    /// Enable or disable node tracing (builder pattern).
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Run the pre-evaluation hook, tracing the node if enabled.
    pub fn before_eval(&self, node: NodeRef<'_>) -> Result<(), EvalError> {
        if self.trace {
            tracing::trace!(target: "quickbeam::eval", kind = node.kind_name(), node = ?node, "eval");
        }
        self.hooks
            .before_eval(node)
            .map_err(|cause| EvalError::Halted { cause })
    }

    /// Run the pre-binding hook.
    pub fn before_bind(&self, name: &str, value: &Value) -> Result<(), EvalError> {
        self.hooks
            .before_bind(name, value)
            .map_err(|cause| EvalError::Halted { cause })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ast::Expr;

    struct Quota {
        remaining: AtomicUsize,
    }

    impl EvalHooks for Quota {
        fn before_eval(&self, _node: NodeRef<'_>) -> anyhow::Result<()> {
            let left = self.remaining.load(Ordering::Relaxed);
            anyhow::ensure!(left > 0, "step quota exhausted");
            self.remaining.store(left - 1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn test_defaults() {
        let ctx = EvalContext::default();
        assert_eq!(ctx.max_call_depth, 1000);
        assert!(!ctx.trace);
        assert!(ctx.before_eval(NodeRef::Expr(&Expr::int(1))).is_ok());
        assert!(ctx.before_bind("x", &Value::Undefined).is_ok());
    }

    #[test]
    fn test_with_max_call_depth() {
        let ctx = EvalContext::with_max_call_depth(5).with_trace(true);
        assert_eq!(ctx.max_call_depth, 5);
        assert!(ctx.trace);
    }

    #[test]
    fn test_hook_error_halts() {
        let ctx = EvalContext::new().with_hooks(Quota {
            remaining: AtomicUsize::new(1),
        });
        let node = Expr::int(1);
        assert!(ctx.before_eval(NodeRef::Expr(&node)).is_ok());
        let err = ctx.before_eval(NodeRef::Expr(&node)).unwrap_err();
        assert!(matches!(err, EvalError::Halted { .. }));
    }
}
