//! Literal expression evaluation

use crate::ast::Literal;
use crate::{EvalContext, EvalError, Runtime, Value};

use super::{unsupported, Evaluate};

impl Evaluate for Literal {
    fn eval(&self, _rt: &mut Runtime, _ctx: &EvalContext) -> Result<Value, EvalError> {
        match self {
            Literal::Number(raw) => eval_number(raw),
            Literal::String(s) => Ok(Value::string(s.as_str())),
            Literal::Bool(b) => Ok(Value::Bool(*b)),
            Literal::Null => Err(unsupported("null literal", self)),
            Literal::Regex(_) => Err(unsupported("regular expression literal", self)),
        }
    }
}

/// Evaluate a numeric literal from its source spelling.
///
/// A spelling that parses as a decimal integer becomes `Int`; anything else
/// that parses as a float (`2.0`, `1e3`) becomes `Float`.
///
/// # Errors
///
/// `UnsupportedConstruct` if the spelling is neither.
pub fn eval_number(raw: &str) -> Result<Value, EvalError> {
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::Int(n));
    }

    raw.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| EvalError::UnsupportedConstruct {
            kind: "numeric literal",
            node: raw.to_string(),
        })
}
