//! Object literal evaluation

use indexmap::IndexMap;

use crate::ast::{Property, PropertyKey};
use crate::{EvalContext, EvalError, ObjectRef, Runtime, Value};

use super::Evaluate;

/// Evaluate an object literal: `{ x: 1, "y": 2, [k]: 3 }`
///
/// Keys keep their first-insertion position; a later duplicate key replaces
/// the earlier value.
pub fn eval_object(
    props: &[Property],
    rt: &mut Runtime,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let mut map = IndexMap::with_capacity(props.len());

    for prop in props {
        let key = eval_key(&prop.key, rt, ctx)?;
        let value = prop.value.eval(rt, ctx)?;
        map.insert(key, value);
    }

    Ok(Value::Object(ObjectRef::from_map(map)))
}

/// Resolve a property key to its string form.
///
/// Literal keys are rendered after evaluation, so `{ 1: ... }` and
/// `{ "1": ... }` name the same key.
fn eval_key(key: &PropertyKey, rt: &mut Runtime, ctx: &EvalContext) -> Result<String, EvalError> {
    match key {
        PropertyKey::Ident(name) => Ok(name.clone()),
        PropertyKey::Literal(lit) => Ok(lit.eval(rt, ctx)?.to_string()),
        PropertyKey::Computed(expr) => Ok(expr.eval(rt, ctx)?.to_string()),
    }
}
