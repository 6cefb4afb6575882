//! Shared interpreter host

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::context::EvalContext;
use crate::runtime::Runtime;
use crate::value::{NativeFn, Value};

/// State shared by an engine and every runtime it spawns.
#[derive(Default)]
pub(crate) struct EngineShared {
    pub(crate) globals: DashMap<String, Value>,
    pub(crate) debug: AtomicBool,
    spawned: AtomicUsize,
}

/// Factory for [`Runtime`]s sharing one table of globals.
///
/// Engine globals are visible to every runtime spawned from this engine,
/// including ones spawned before the global was defined. Cloning an engine
/// shares the same table.
///
/// Spawned runtimes are owned by the caller; the engine only counts them.
///
/// # Example
///
/// ```
/// use quickbeam::{Engine, NativeFn, Value};
///
/// let engine = Engine::new();
/// engine.register_fn(NativeFn::new("answer", 0, |_| Ok(Some(Value::Int(42)))));
///
/// let mut a = engine.spawn_runtime();
/// let mut b = engine.spawn_runtime();
/// assert_eq!(a.call("answer", vec![]).unwrap(), Value::Int(42));
/// assert_eq!(b.call("answer", vec![]).unwrap(), Value::Int(42));
/// ```
#[derive(Clone, Default)]
pub struct Engine {
    shared: Arc<EngineShared>,
    context: EvalContext,
}

impl Engine {
    /// Create an engine with the default evaluation context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine whose runtimes start with `context`.
    pub fn with_context(context: EvalContext) -> Self {
        Self {
            shared: Arc::default(),
            context,
        }
    }

    /// Define (or overwrite) a global shared by all runtimes.
    pub fn define_global(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.shared.globals.insert(name.into(), value.into());
    }

    /// Register a host function as a shared global under its own name.
    pub fn register_fn(&self, func: NativeFn) {
        let name = func.name.clone();
        self.shared.globals.insert(name, Value::NativeFn(func));
    }

    /// Read a shared global.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.shared.globals.get(name).map(|entry| entry.value().clone())
    }

    /// Toggle per-node tracing for every runtime of this engine.
    pub fn set_debug(&self, debug: bool) {
        self.shared.debug.store(debug, Ordering::Relaxed);
    }

    /// Whether engine-wide tracing is on.
    pub fn debug(&self) -> bool {
        self.shared.debug.load(Ordering::Relaxed)
    }

    /// Create a new runtime with its own scopes and runtime-local globals.
    pub fn spawn_runtime(&self) -> Runtime {
        let id = self.shared.spawned.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(runtime = id, "spawned runtime");
        Runtime::new(id, Arc::clone(&self.shared), self.context.clone())
    }

    /// Number of runtimes spawned so far.
    pub fn runtimes_spawned(&self) -> usize {
        self.shared.spawned.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("globals", &self.shared.globals.len())
            .field("debug", &self.debug())
            .field("runtimes_spawned", &self.runtimes_spawned())
            .field("context", &self.context)
            .finish()
    }
}
