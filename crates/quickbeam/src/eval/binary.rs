//! Binary operation evaluation

use crate::ast::{BinaryExpr, BinaryOp};
use crate::{EvalContext, EvalError, Runtime, Value};

use super::{unsupported, Evaluate};

impl Evaluate for BinaryExpr {
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        // Operators outside the implemented set fail before either side runs
        if !is_supported(self.op) {
            return Err(unsupported("binary expression", self));
        }

        // Evaluate both operands, left first
        let left = self.left.eval(rt, ctx)?;
        let right = self.right.eval(rt, ctx)?;

        eval_binary_op(self.op, left, right)
    }
}

/// Whether the evaluator implements `op`.
pub fn is_supported(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Eq
            | BinaryOp::StrictEq
    )
}

/// Apply a binary operator to already-evaluated operands.
///
/// Also used by compound assignment (`x += y` → `x = x + y`).
///
/// # Errors
///
/// - `UnsupportedOperands` if the operator is not defined for the operand kinds
/// - `DivisionByZero` for integer division by zero
/// - `UnsupportedConstruct` for operators the evaluator does not implement
pub fn eval_binary_op(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => eval_add(left, right),
        BinaryOp::Sub => eval_arith(op, left, right, i64::wrapping_sub, |a, b| a - b),
        BinaryOp::Mul => eval_mul(left, right),
        BinaryOp::Div => eval_div(left, right),

        // Equality
        BinaryOp::Eq => Ok(Value::Bool(left.loose_eq(&right))),
        BinaryOp::StrictEq => Ok(Value::Bool(left.strict_eq(&right))),

        _ => Err(EvalError::UnsupportedConstruct {
            kind: "binary operator",
            node: op.as_str().to_string(),
        }),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

fn eval_add(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            Ok(Value::string(format!("{}{}", left, right)))
        }
        (Value::Array(a), Value::Array(b)) => {
            let mut items = a.to_vec();
            items.extend(b.to_vec());
            Ok(Value::array(items))
        }
        _ => eval_arith(BinaryOp::Add, left, right, i64::wrapping_add, |a, b| a + b),
    }
}

fn eval_mul(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::String(s), Value::Int(n)) | (Value::Int(n), Value::String(s)) => {
            let count = repeat_count(s.len(), *n)?;
            Ok(Value::string(s.repeat(count)))
        }
        (Value::Array(a), Value::Int(n)) | (Value::Int(n), Value::Array(a)) => {
            let items = a.to_vec();
            let count = repeat_count(items.len(), *n)?;
            if items.is_empty() || count == 0 {
                return Ok(Value::array(Vec::new()));
            }
            let mut repeated = Vec::with_capacity(items.len() * count);
            for _ in 0..count {
                repeated.extend(items.iter().cloned());
            }
            Ok(Value::array(repeated))
        }
        _ => eval_arith(BinaryOp::Mul, left, right, i64::wrapping_mul, |a, b| a * b),
    }
}

fn eval_div(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Int(_), Value::Int(0)) => Err(EvalError::DivisionByZero),
        // Integer division truncates toward zero
        _ => eval_arith(BinaryOp::Div, left, right, i64::wrapping_div, |a, b| a / b),
    }
}

/// Numeric operation with integer/float promotion.
///
/// Two integers stay integer; a float on either side makes the result float.
fn eval_arith(
    op: BinaryOp,
    left: Value,
    right: Value,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    if let (Value::Int(a), Value::Int(b)) = (&left, &right) {
        return Ok(Value::Int(int_op(*a, *b)));
    }

    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
        _ => Err(EvalError::UnsupportedOperands {
            op: op.as_str(),
            left,
            right,
        }),
    }
}

/// Largest string (in bytes) or array (in elements) repetition may build.
pub const MAX_REPETITION_LEN: usize = 1 << 28;

/// Validate a repetition count against the operand length.
///
/// Negative counts repeat zero times.
fn repeat_count(len: usize, n: i64) -> Result<usize, EvalError> {
    let count = usize::try_from(n).unwrap_or(0);
    match len.checked_mul(count) {
        Some(total) if total <= MAX_REPETITION_LEN => Ok(count),
        _ => Err(EvalError::RepetitionTooLarge {
            len,
            count: n,
            max: MAX_REPETITION_LEN,
        }),
    }
}
