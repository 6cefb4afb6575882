//! Built-in collection methods: `forEach`, `map` and `reduce`
//!
//! Objects and arrays answer these methods unless an object has an own key
//! of the same name, which takes precedence. Callbacks go through
//! [`call_value`], so interpreted and native functions both work.
//!
//! The receiver is snapshotted before the first callback runs; callbacks may
//! mutate the collection without affecting the iteration.

use indexmap::IndexMap;

use crate::{EvalContext, EvalError, ObjectRef, Runtime, Value};

use super::call::call_value;

/// A built-in collection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `recv.forEach(fn)`
    ForEach,
    /// `recv.map(fn)`
    Map,
    /// `recv.reduce(fn, initial)`
    Reduce,
}

impl Method {
    /// Parse a method name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "forEach" => Some(Method::ForEach),
            "map" => Some(Method::Map),
            "reduce" => Some(Method::Reduce),
            _ => None,
        }
    }

    /// Script-visible name.
    pub fn name(self) -> &'static str {
        match self {
            Method::ForEach => "forEach",
            Method::Map => "map",
            Method::Reduce => "reduce",
        }
    }

    /// Number of arguments the method takes.
    pub fn arity(self) -> usize {
        match self {
            Method::ForEach | Method::Map => 1,
            Method::Reduce => 2,
        }
    }
}

/// Find the built-in method `name` on `receiver`, if it has one.
pub fn lookup(receiver: &Value, name: &str) -> Option<Method> {
    match receiver {
        Value::Object(obj) if !obj.contains_key(name) => Method::from_name(name),
        Value::Array(_) => Method::from_name(name),
        _ => None,
    }
}

/// Invoke a built-in method.
///
/// # Errors
///
/// - `WrongArgumentCount` if the method gets the wrong number of arguments
/// - `NotAFunction` if the callback is not callable
/// - `NotKeyValuePair` if an object `map` callback returns anything but a
///   two-element array
/// - the first error raised by a callback
pub fn call_method(
    method: Method,
    receiver: &Value,
    args: Vec<Value>,
    rt: &mut Runtime,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    if args.len() != method.arity() {
        return Err(EvalError::WrongArgumentCount {
            name: method.name().to_string(),
            expected: method.arity(),
            got: args.len(),
        });
    }

    let mut args = args.into_iter();
    let callback = args.next().unwrap_or(Value::Undefined);
    let initial = args.next().unwrap_or(Value::Undefined);

    if !callback.is_callable() {
        return Err(EvalError::NotAFunction {
            method: method.name().to_string(),
            value: callback,
        });
    }

    match (method, receiver) {
        // forEach: results discarded
        (Method::ForEach, Value::Object(obj)) => {
            for (key, value) in obj.entries() {
                call_value(callback.clone(), vec![Value::string(key), value], rt, ctx)?;
            }
            Ok(Value::Undefined)
        }
        (Method::ForEach, Value::Array(arr)) => {
            for item in arr.to_vec() {
                call_value(callback.clone(), vec![item], rt, ctx)?;
            }
            Ok(Value::Undefined)
        }

        // map: objects rebuild from [key, value] pairs
        (Method::Map, Value::Object(obj)) => {
            let mut mapped = IndexMap::with_capacity(obj.len());
            for (key, value) in obj.entries() {
                let pair = call_value(callback.clone(), vec![Value::string(key), value], rt, ctx)?;
                let (new_key, new_value) = key_value_pair(pair)?;
                mapped.insert(new_key.to_string(), new_value);
            }
            Ok(Value::Object(ObjectRef::from_map(mapped)))
        }
        (Method::Map, Value::Array(arr)) => {
            let mapped = arr
                .to_vec()
                .into_iter()
                .map(|item| call_value(callback.clone(), vec![item], rt, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::array(mapped))
        }

        // reduce: accumulator is the last argument
        (Method::Reduce, Value::Object(obj)) => {
            let mut acc = initial;
            for (key, value) in obj.entries() {
                acc = call_value(callback.clone(), vec![Value::string(key), value, acc], rt, ctx)?;
            }
            Ok(acc)
        }
        (Method::Reduce, Value::Array(arr)) => {
            let mut acc = initial;
            for item in arr.to_vec() {
                acc = call_value(callback.clone(), vec![item, acc], rt, ctx)?;
            }
            Ok(acc)
        }

        (_, other) => Err(EvalError::NotAnObject {
            value: other.clone(),
        }),
    }
}

/// Split a `[key, value]` array.
fn key_value_pair(pair: Value) -> Result<(Value, Value), EvalError> {
    if let Value::Array(arr) = &pair {
        if let [key, value] = arr.to_vec().as_slice() {
            return Ok((key.clone(), value.clone()));
        }
    }
    Err(EvalError::NotKeyValuePair { value: pair })
}
