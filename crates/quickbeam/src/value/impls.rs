//! Value trait implementations: constructors, predicates, coercions, equality, From traits

use std::sync::Arc;

use indexmap::IndexMap;

use super::*;
use crate::stack::ensure_sufficient_stack;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create a new array value
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(ArrayRef::from_vec(items))
    }

    /// Create a new object value from key/value pairs
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let map: IndexMap<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect();
        Value::Object(ObjectRef::from_map(map))
    }

    /// Wrap a native function
    pub fn native(func: NativeFn) -> Self {
        Value::NativeFn(func)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Kind Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// The script-visible kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Int(_) | Value::Float(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
            Value::Function(_) => ValueKind::Function,
            Value::NativeFn(_) => ValueKind::NativeFunction,
        }
    }

    /// Diagnostic name of this value's kind.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is a number of either subtype
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Check if value is callable (interpreted or native function)
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::NativeFn(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract integer value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract any number as f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract the array handle
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Extract the object handle
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Coercion and Equality
    // ═══════════════════════════════════════════════════════════════════

    /// Truthiness as used by `if`.
    ///
    /// `undefined`, `false`, numeric zero, NaN and the empty string are
    /// falsy. Reference values are always truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) | Value::Array(_) | Value::Function(_) | Value::NativeFn(_) => true,
        }
    }

    /// Loose equality (`==`): the string renderings are equal.
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.to_string() == other.to_string()
    }

    /// Strict equality (`===`).
    ///
    /// Kinds must match. Value types compare by value (integers and floats
    /// numerically), reference types by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::NativeFn(a), Value::NativeFn(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

/// Structural equality for host-side comparisons and tests.
///
/// Unlike [`Value::strict_eq`], arrays and objects compare by content and the
/// number subtypes are distinct (`Int(2) != Float(2.0)`). Functions still
/// compare by identity. A pair of composites met again while already being
/// compared counts as equal, so self-containing values terminate.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other, &mut Vec::new())
    }
}

fn structural_eq(a: &Value, b: &Value, pairs: &mut Vec<(*const (), *const ())>) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            if a.ptr_eq(b) {
                return true;
            }
            let (left, right) = (a.to_vec(), b.to_vec());
            left.len() == right.len()
                && nested_eq((a.as_ptr(), b.as_ptr()), pairs, |pairs| {
                    left.iter()
                        .zip(&right)
                        .all(|(x, y)| structural_eq(x, y, pairs))
                })
        }
        (Value::Object(a), Value::Object(b)) => {
            if a.ptr_eq(b) {
                return true;
            }
            let (left, right) = (a.entries(), b.entries());
            left.len() == right.len()
                && nested_eq((a.as_ptr(), b.as_ptr()), pairs, |pairs| {
                    left.iter()
                        .zip(&right)
                        .all(|((ka, va), (kb, vb))| ka == kb && structural_eq(va, vb, pairs))
                })
        }
        (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
        (Value::NativeFn(a), Value::NativeFn(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// Compare the contents of a composite pair unless that pair is already
/// being compared further up.
fn nested_eq(
    pair: (*const (), *const ()),
    pairs: &mut Vec<(*const (), *const ())>,
    compare: impl FnOnce(&mut Vec<(*const (), *const ())>) -> bool,
) -> bool {
    if pairs.contains(&pair) {
        return true;
    }
    pairs.push(pair);
    let equal = ensure_sufficient_stack(|| compare(pairs));
    pairs.pop();
    equal
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<NativeFn> for Value {
    fn from(func: NativeFn) -> Self {
        Value::NativeFn(func)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}
