use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use quickbeam::ast::{BinaryOp, Expr, Program, Stmt};
use quickbeam::*;

// ═══════════════════════════════════════════════════════════════════════
// Scope chain
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_scope_set_and_get() {
    let root = Scope::root();
    root.set("x", Value::Int(1), false).unwrap();

    assert_eq!(root.get("x"), Some(Binding::mutable(Value::Int(1))));
    assert!(root.contains("x"));
    assert!(!root.contains("y"));
}

#[test]
fn test_scope_set_overwrites_mutable() {
    let root = Scope::root();
    root.set("x", Value::Int(1), false).unwrap();
    root.set("x", Value::Int(2), true).unwrap();

    assert_eq!(root.get("x"), Some(Binding::constant(Value::Int(2))));
    assert_eq!(root.len(), 1);
}

#[test]
fn test_scope_constant_rejects_set_and_assign() {
    let root = Scope::root();
    root.set("x", Value::Int(1), true).unwrap();

    assert_eq!(
        root.set("x", Value::Int(2), false),
        Err(ScopeError::ConstantMutation {
            name: "x".to_string()
        })
    );
    assert!(root.assign("x", Value::Int(2)).is_err());
    assert_eq!(root.get("x").unwrap().value, Value::Int(1));
}

#[test]
fn test_scope_assign_reports_missing() {
    let root = Scope::root();
    assert_eq!(root.assign("x", Value::Int(1)), Ok(false));
    assert!(root.is_empty());
}

#[test]
fn test_scope_child_shadows_parent() {
    let root = Scope::root();
    root.set("x", Value::Int(1), true).unwrap();

    let child = Scope::new_child(&root);
    child.set("x", Value::Int(2), false).unwrap();

    assert_eq!(child.get("x").unwrap().value, Value::Int(2));
    assert_eq!(root.get("x").unwrap().value, Value::Int(1));
}

#[test]
fn test_scope_ancestors_innermost_first() {
    let root = Scope::root();
    let middle = Scope::new_child(&root);
    let leaf = Scope::new_child(&middle);

    root.set("v", Value::string("root"), false).unwrap();
    middle.set("v", Value::string("middle"), false).unwrap();

    let seen: Vec<Value> = leaf
        .ancestors()
        .filter_map(|scope| scope.get("v"))
        .map(|binding| binding.value)
        .collect();
    assert_eq!(seen, vec![Value::string("middle"), Value::string("root")]);
    assert_eq!(leaf.depth(), 3);
    assert!(root.parent().is_none());
}

#[test]
fn test_scope_names_in_declaration_order() {
    let root = Scope::root();
    for name in ["c", "a", "b"] {
        root.set(name, Value::Undefined, false).unwrap();
    }
    assert_eq!(root.names(), vec!["c", "a", "b"]);
}

// ═══════════════════════════════════════════════════════════════════════
// Scope guard
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_scope_guard_restores_on_drop() {
    let engine = Engine::new();
    let mut runtime = engine.spawn_runtime();
    let before = Arc::clone(runtime.scope());

    {
        let guard = runtime.scope_guard();
        assert!(!Arc::ptr_eq(guard.scope(), &before));
        assert!(Arc::ptr_eq(guard.scope().parent().unwrap(), &before));
    }

    assert!(Arc::ptr_eq(runtime.scope(), &before));
}

#[test]
fn test_scope_restored_after_error() {
    let engine = Engine::new();
    let mut runtime = engine.spawn_runtime();
    let before = Arc::clone(runtime.scope());

    let block = Stmt::block(vec![
        Stmt::let_("inner", Expr::int(1)),
        Stmt::expr(Expr::ident("missing")),
    ]);
    assert!(runtime.eval(&block).is_err());
    assert!(Arc::ptr_eq(runtime.scope(), &before));
    assert!(runtime.lookup("inner").is_err());
}

// ═══════════════════════════════════════════════════════════════════════
// Globals
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_engine_global_seen_by_every_runtime() {
    let engine = Engine::new();
    let mut early = engine.spawn_runtime();
    engine.define_global("shared", 7);
    let mut late = engine.spawn_runtime();

    assert_eq!(early.eval(&Expr::ident("shared")).unwrap(), Value::Int(7));
    assert_eq!(late.eval(&Expr::ident("shared")).unwrap(), Value::Int(7));
}

#[test]
fn test_runtime_global_is_private() {
    let engine = Engine::new();
    let mut a = engine.spawn_runtime();
    let mut b = engine.spawn_runtime();

    a.define_global("mine", "a");

    assert_eq!(a.eval(&Expr::ident("mine")).unwrap(), Value::string("a"));
    assert!(matches!(
        b.eval(&Expr::ident("mine")),
        Err(EvalError::UndeclaredIdentifier { .. })
    ));
}

#[test]
fn test_lookup_precedence() {
    let engine = Engine::new();
    engine.define_global("x", "engine");
    let mut runtime = engine.spawn_runtime();

    assert_eq!(runtime.lookup("x").unwrap(), Value::string("engine"));

    runtime.define_global("x", "runtime");
    assert_eq!(runtime.lookup("x").unwrap(), Value::string("runtime"));

    runtime.eval(&Stmt::let_("x", Expr::string("scope"))).unwrap();
    assert_eq!(runtime.lookup("x").unwrap(), Value::string("scope"));

    // Globals themselves are untouched
    assert_eq!(runtime.global("x"), Some(Value::string("runtime")));
    assert_eq!(engine.global("x"), Some(Value::string("engine")));
}

#[test]
fn test_script_assignment_updates_engine_global() {
    let engine = Engine::new();
    engine.define_global("count", 0);
    let mut writer = engine.spawn_runtime();
    let mut reader = engine.spawn_runtime();

    writer
        .eval(&Expr::assign(
            Expr::ident("count"),
            Expr::binary(BinaryOp::Add, Expr::ident("count"), Expr::int(1)),
        ))
        .unwrap();

    assert_eq!(reader.eval(&Expr::ident("count")).unwrap(), Value::Int(1));
}

#[test]
fn test_run_leaves_no_declarations_behind() {
    let engine = Engine::new();
    let mut runtime = engine.spawn_runtime();

    let program = Program::new(vec![Stmt::const_("temp", Expr::int(1))]);
    runtime.run(&program).unwrap();
    // Running again does not trip over the earlier constant
    runtime.run(&program).unwrap();
    assert!(runtime.lookup("temp").is_err());
}

// ═══════════════════════════════════════════════════════════════════════
// Threads
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_runtimes_on_separate_threads() {
    let engine = Engine::new();
    engine.register_fn(NativeFn::new("square", 1, |args| {
        let n = args[0].as_i64().unwrap_or(0);
        Ok(Some(Value::Int(n * n)))
    }));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut runtime = engine.spawn_runtime();
            thread::spawn(move || {
                runtime
                    .call("square", vec![Value::Int(i)])
                    .map(|v| v.as_i64())
            })
        })
        .collect();

    let results: Vec<Option<i64>> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert_eq!(results, vec![Some(0), Some(1), Some(4), Some(9)]);
    assert_eq!(engine.runtimes_spawned(), 4);
}

#[test]
fn test_shared_array_across_runtimes() {
    let engine = Engine::new();
    let log = Value::array(vec![Value::Int(0), Value::Int(0)]);
    engine.define_global("log", log.clone());

    let handles: Vec<_> = (0..2)
        .map(|i| {
            let mut runtime = engine.spawn_runtime();
            thread::spawn(move || {
                runtime.eval(&Expr::assign(
                    Expr::index(Expr::ident("log"), Expr::int(i)),
                    Expr::int(i + 1),
                ))
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(log.to_string(), "[1, 2]");
}
