//! Display and Debug implementations for Value
//!
//! `Display` is the script-visible string rendering: it is what `+` uses
//! for concatenation, what `==` compares and what object keys are made of.
//! `Debug` keeps the number subtype visible (`2.0` vs `2`).

use std::cell::RefCell;
use std::fmt;

use super::*;
use crate::stack::ensure_sufficient_stack;

/// Composites on the current rendering path, by storage address.
///
/// A value reached again while it is still being rendered is a cycle and
/// renders as `[...]` or `{...}`. Shared but acyclic values render in full.
#[derive(Default)]
struct Path(RefCell<Vec<*const ()>>);

impl Path {
    fn enter(&self, ptr: *const ()) -> Option<PathGuard<'_>> {
        let mut stack = self.0.borrow_mut();
        if stack.contains(&ptr) {
            return None;
        }
        stack.push(ptr);
        Some(PathGuard(self))
    }
}

struct PathGuard<'a>(&'a Path);

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.0 .0.borrow_mut().pop();
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_display(f, self, &Path::default())
    }
}

fn write_display(f: &mut fmt::Formatter<'_>, value: &Value, path: &Path) -> fmt::Result {
    match value {
        Value::Undefined => write!(f, "undefined"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Int(n) => write!(f, "{}", n),
        // Shortest round-trip digits, never exponent notation
        Value::Float(n) => write!(f, "{}", n),
        Value::String(s) => write!(f, "{}", s.as_str()),

        Value::Array(items) => {
            let Some(_guard) = path.enter(items.as_ptr()) else {
                return write!(f, "[...]");
            };
            ensure_sufficient_stack(|| {
                write!(f, "[")?;
                for (i, item) in items.to_vec().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_nested(f, item, path)?;
                }
                write!(f, "]")
            })
        }

        Value::Object(obj) => {
            let Some(_guard) = path.enter(obj.as_ptr()) else {
                return write!(f, "{{...}}");
            };
            let entries = obj.entries();
            if entries.is_empty() {
                return write!(f, "{{}}");
            }
            ensure_sufficient_stack(|| {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: ", k)?;
                    write_nested(f, v, path)?;
                }
                write!(f, " }}")
            })
        }

        Value::Function(func) => match &func.def.name {
            Some(name) => write!(f, "<function {}>", name),
            None => write!(f, "<function>"),
        },
        Value::NativeFn(native) => write!(f, "<native {}>", native.name),
    }
}

/// Render a value inside a composite: strings keep their quotes.
fn write_nested(f: &mut fmt::Formatter<'_>, value: &Value, path: &Path) -> fmt::Result {
    match value {
        Value::String(s) => write!(f, "{:?}", s.as_str()),
        other => write_display(f, other, path),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_debug(f, self, &Path::default())
    }
}

/// A nested value paired with the path it is rendered on.
struct DebugNested<'a> {
    value: &'a Value,
    path: &'a Path,
}

impl fmt::Debug for DebugNested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_debug(f, self.value, self.path)
    }
}

fn write_debug(f: &mut fmt::Formatter<'_>, value: &Value, path: &Path) -> fmt::Result {
    match value {
        Value::Undefined => write!(f, "undefined"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Int(n) => write!(f, "{}", n),
        Value::Float(n) => write!(f, "{:?}", n),
        Value::String(s) => write!(f, "{:?}", s.as_str()),

        Value::Array(items) => {
            let Some(_guard) = path.enter(items.as_ptr()) else {
                return write!(f, "[...]");
            };
            let items = items.to_vec();
            ensure_sufficient_stack(|| {
                f.debug_list()
                    .entries(items.iter().map(|value| DebugNested { value, path }))
                    .finish()
            })
        }

        Value::Object(obj) => {
            let Some(_guard) = path.enter(obj.as_ptr()) else {
                return write!(f, "{{...}}");
            };
            let entries = obj.entries();
            ensure_sufficient_stack(|| {
                f.debug_map()
                    .entries(
                        entries
                            .iter()
                            .map(|(k, value)| (k, DebugNested { value, path })),
                    )
                    .finish()
            })
        }

        Value::Function(func) => write!(f, "<function {}>", func.name()),
        Value::NativeFn(native) => write!(f, "<native {}>", native.name),
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Object(self.clone()), f)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Array(self.clone()), f)
    }
}
