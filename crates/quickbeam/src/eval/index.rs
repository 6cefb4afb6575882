//! Index expression evaluation

use crate::ast::IndexExpr;
use crate::{EvalContext, EvalError, Runtime, Value};

use super::Evaluate;

impl Evaluate for IndexExpr {
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        // Evaluate the base expression
        let base = self.object.eval(rt, ctx)?;

        // Evaluate the index expression
        let index = self.index.eval(rt, ctx)?;

        index_value(&base, &index)
    }
}

/// Read `base[index]`.
///
/// Objects are keyed by the index's rendering, so `o[1]` reads key `"1"`;
/// a missing key reads as `Undefined`. Arrays take integer positions.
///
/// # Errors
///
/// - `NotAnObject` if `base` is neither an object nor an array
/// - `NonIntegerIndex` / `IndexOutOfBounds` for bad array positions
pub fn index_value(base: &Value, index: &Value) -> Result<Value, EvalError> {
    match base {
        Value::Object(obj) => Ok(obj.get(&index.to_string()).unwrap_or(Value::Undefined)),

        Value::Array(arr) => {
            let len = arr.len();
            let pos = array_position(index, len)?;
            arr.get(pos).ok_or(EvalError::IndexOutOfBounds {
                index: pos as i64,
                len,
            })
        }

        other => Err(EvalError::NotAnObject {
            value: other.clone(),
        }),
    }
}

/// Write `base[index] = value`.
///
/// Arrays never grow: a position at or past the end is out of bounds.
///
/// # Errors
///
/// Same as [`index_value`].
pub fn assign_index(base: &Value, index: &Value, value: Value) -> Result<(), EvalError> {
    match base {
        Value::Object(obj) => {
            obj.insert(index.to_string(), value);
            Ok(())
        }

        Value::Array(arr) => {
            let len = arr.len();
            let pos = array_position(index, len)?;
            if arr.set(pos, value) {
                Ok(())
            } else {
                Err(EvalError::IndexOutOfBounds {
                    index: pos as i64,
                    len,
                })
            }
        }

        other => Err(EvalError::NotAnObject {
            value: other.clone(),
        }),
    }
}

/// Resolve an index value to a position in an array of length `len`.
///
/// A negative index is replaced by its truncated remainder `index % len`,
/// which keeps its sign: `-3` in a 3-element array is position 0, while `-1`
/// stays `-1` and is out of bounds.
///
/// # Errors
///
/// - `NonIntegerIndex` unless the index is an integer
/// - `IndexOutOfBounds` unless the position lies in `[0, len)`; an empty
///   array is always out of bounds
pub fn array_position(index: &Value, len: usize) -> Result<usize, EvalError> {
    let raw = match index {
        Value::Int(n) => *n,
        other => {
            return Err(EvalError::NonIntegerIndex {
                index: other.clone(),
            })
        }
    };

    let pos = if raw < 0 && len > 0 {
        raw % len as i64
    } else {
        raw
    };

    match usize::try_from(pos) {
        Ok(pos) if pos < len => Ok(pos),
        _ => Err(EvalError::IndexOutOfBounds { index: pos, len }),
    }
}
