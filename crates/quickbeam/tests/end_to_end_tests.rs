//! Whole-program scenarios driven through `Runtime::run`, observed via a
//! host `emit` function.

use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use quickbeam::ast::{BinaryOp, DeclKind, Expr, Program, Stmt};
use quickbeam::*;

/// Run a program with an `emit` native installed, returning the run result
/// and everything emitted.
fn run_capture(stmts: Vec<Stmt>) -> (std::result::Result<Value, EvalError>, Vec<Value>) {
    let emitted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&emitted);

    let engine = Engine::new();
    engine.register_fn(NativeFn::variadic("emit", move |args| {
        sink.lock().extend(args.iter().cloned());
        Ok(None)
    }));

    let mut runtime = engine.spawn_runtime();
    let result = runtime.run(&Program::new(stmts));
    let out = emitted.lock().clone();
    (result, out)
}

fn emit(value: Expr) -> Stmt {
    Stmt::expr(Expr::call(Expr::ident("emit"), vec![value]))
}

// ═══════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_const_float_keeps_subtype() {
    // const a = 2.0; emit(a);
    let (result, out) = run_capture(vec![
        Stmt::const_("a", Expr::float(2.0)),
        emit(Expr::ident("a")),
    ]);
    result.unwrap();
    assert_eq!(out, vec![Value::Float(2.0)]);
    assert_eq!(format!("{:?}", out[0]), "2.0");
}

#[test]
fn test_let_reassignment() {
    // let a = 1.0; a = 2.0; emit(a);
    let (result, out) = run_capture(vec![
        Stmt::let_("a", Expr::float(1.0)),
        Stmt::expr(Expr::assign(Expr::ident("a"), Expr::float(2.0))),
        emit(Expr::ident("a")),
    ]);
    result.unwrap();
    assert_eq!(out, vec![Value::Float(2.0)]);
}

#[test]
fn test_const_reassignment_fails() {
    // const a = 1.0; a = 2.0; emit(a);
    let (result, out) = run_capture(vec![
        Stmt::const_("a", Expr::float(1.0)),
        Stmt::expr(Expr::assign(Expr::ident("a"), Expr::float(2.0))),
        emit(Expr::ident("a")),
    ]);
    assert!(matches!(result, Err(EvalError::ConstantMutation { name }) if name == "a"));
    assert!(out.is_empty());
}

#[test]
fn test_const_array_element_assignment() {
    // const a = [0, 2, 4]; a[1] = 6; emit(a[1]);
    let (result, out) = run_capture(vec![
        Stmt::const_(
            "a",
            Expr::array(vec![Expr::int(0), Expr::int(2), Expr::int(4)]),
        ),
        Stmt::expr(Expr::assign(
            Expr::index(Expr::ident("a"), Expr::int(1)),
            Expr::int(6),
        )),
        emit(Expr::index(Expr::ident("a"), Expr::int(1))),
    ]);
    result.unwrap();
    assert_eq!(out, vec![Value::Int(6)]);
}

#[test]
fn test_object_reduce() {
    // const a = {"x": 1, "y": 2}; emit(a.reduce((k, v, sum) => { return sum + v; }, 0));
    let sum = Expr::arrow(
        &["k", "v", "sum"],
        vec![Stmt::ret(Expr::binary(
            BinaryOp::Add,
            Expr::ident("sum"),
            Expr::ident("v"),
        ))],
    );
    let (result, out) = run_capture(vec![
        Stmt::const_(
            "a",
            Expr::object(vec![("x", Expr::int(1)), ("y", Expr::int(2))]),
        ),
        emit(Expr::method(
            Expr::ident("a"),
            "reduce",
            vec![sum, Expr::int(0)],
        )),
    ]);
    result.unwrap();
    assert_eq!(out, vec![Value::Int(3)]);
}

#[test]
fn test_array_map() {
    // emit([1, 2, 3].map((v) => { return v * 2; }));
    let double = Expr::arrow(
        &["v"],
        vec![Stmt::ret(Expr::binary(
            BinaryOp::Mul,
            Expr::ident("v"),
            Expr::int(2),
        ))],
    );
    let (result, out) = run_capture(vec![emit(Expr::method(
        Expr::array(vec![Expr::int(1), Expr::int(2), Expr::int(3)]),
        "map",
        vec![double],
    ))]);
    result.unwrap();
    assert_eq!(
        out,
        vec![Value::array(vec![Value::Int(2), Value::Int(4), Value::Int(6)])]
    );
}

#[test]
fn test_const_object_key_assignment() {
    // const a = {"x": "y"}; a["x"] = "z"; emit(a["x"]);
    let (result, out) = run_capture(vec![
        Stmt::const_("a", Expr::object(vec![("x", Expr::string("y"))])),
        Stmt::expr(Expr::assign(
            Expr::index(Expr::ident("a"), Expr::string("x")),
            Expr::string("z"),
        )),
        emit(Expr::index(Expr::ident("a"), Expr::string("x"))),
    ]);
    result.unwrap();
    assert_eq!(out, vec![Value::string("z")]);
}

// ═══════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_string_plus_number_renders() {
    let (result, out) = run_capture(vec![emit(Expr::binary(
        BinaryOp::Add,
        Expr::string("1 "),
        Expr::float(2.1),
    ))]);
    result.unwrap();
    assert_eq!(out, vec![Value::string("1 2.1")]);
}

#[test]
fn test_array_concatenation() {
    let (result, out) = run_capture(vec![emit(Expr::binary(
        BinaryOp::Add,
        Expr::array(vec![Expr::int(1)]),
        Expr::array(vec![Expr::string("a")]),
    ))]);
    result.unwrap();
    assert_eq!(out[0].to_string(), r#"[1, "a"]"#);
}

#[test]
fn test_integer_and_float_division() {
    let (result, out) = run_capture(vec![
        emit(Expr::binary(BinaryOp::Div, Expr::int(7), Expr::int(2))),
        emit(Expr::binary(BinaryOp::Div, Expr::float(7.0), Expr::int(2))),
    ]);
    result.unwrap();
    assert_eq!(out, vec![Value::Int(3), Value::Float(3.5)]);
}

#[test]
fn test_function_arity_excess() {
    let (result, out) = run_capture(vec![
        Stmt::function("f", &["a"], vec![Stmt::ret(Expr::ident("a"))]),
        emit(Expr::call(Expr::ident("f"), vec![Expr::int(1)])),
        emit(Expr::call(Expr::ident("f"), vec![])),
        emit(Expr::call(Expr::ident("f"), vec![Expr::int(1), Expr::int(2)])),
    ]);
    assert!(matches!(
        result,
        Err(EvalError::WrongArgumentCount { name, expected: 1, got: 2 }) if name == "f"
    ));
    assert_eq!(out, vec![Value::Int(1), Value::Undefined]);
}

#[test]
fn test_block_shadowing_restores_outer() {
    let (result, out) = run_capture(vec![
        Stmt::let_("x", Expr::int(1)),
        Stmt::block(vec![Stmt::const_("x", Expr::int(2)), emit(Expr::ident("x"))]),
        emit(Expr::ident("x")),
    ]);
    result.unwrap();
    assert_eq!(out, vec![Value::Int(2), Value::Int(1)]);
}

#[test]
fn test_for_in_emits_keys_and_elements() {
    let (result, out) = run_capture(vec![
        Stmt::for_in(
            DeclKind::Const,
            "k",
            Expr::object(vec![("x", Expr::int(1)), ("y", Expr::int(2))]),
            emit(Expr::ident("k")),
        ),
        Stmt::for_in(
            DeclKind::Let,
            "v",
            Expr::array(vec![Expr::int(3), Expr::int(4)]),
            emit(Expr::ident("v")),
        ),
    ]);
    result.unwrap();
    assert_eq!(
        out,
        vec![
            Value::string("x"),
            Value::string("y"),
            Value::Int(3),
            Value::Int(4)
        ]
    );
}

#[test]
fn test_side_effects_before_error_persist() {
    let host_array = Value::array(vec![Value::Int(0)]);

    let engine = Engine::new();
    engine.define_global("shared", host_array.clone());
    let mut runtime = engine.spawn_runtime();

    let program = Program::new(vec![
        Stmt::expr(Expr::assign(
            Expr::index(Expr::ident("shared"), Expr::int(0)),
            Expr::int(9),
        )),
        Stmt::expr(Expr::ident("boom")),
    ]);

    assert!(runtime.run(&program).is_err());
    assert_eq!(host_array.to_string(), "[9]");
}

#[test]
fn test_recursive_function() {
    // function fact(n) { if (n == 0) { return 1; } return n * fact(n - 1); }
    let fact = Stmt::function(
        "fact",
        &["n"],
        vec![
            Stmt::if_(
                Expr::binary(BinaryOp::Eq, Expr::ident("n"), Expr::int(0)),
                Stmt::block(vec![Stmt::ret(Expr::int(1))]),
                None,
            ),
            Stmt::ret(Expr::binary(
                BinaryOp::Mul,
                Expr::ident("n"),
                Expr::call(
                    Expr::ident("fact"),
                    vec![Expr::binary(BinaryOp::Sub, Expr::ident("n"), Expr::int(1))],
                ),
            )),
        ],
    );
    let (result, out) = run_capture(vec![
        fact,
        emit(Expr::call(Expr::ident("fact"), vec![Expr::int(10)])),
    ]);
    result.unwrap();
    assert_eq!(out, vec![Value::Int(3_628_800)]);
}
