//! Loop statement evaluation

use super::local::bind_element;
use super::{unsupported, Evaluate};
use crate::ast::{DeclKind, ForInStmt, ForInit};
use crate::{EvalContext, EvalError, Runtime, Value};

// ═══════════════════════════════════════════════════════════════════════
// for-in statement
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for ForInStmt {
    /// Evaluate `for (let x in collection) body`.
    ///
    /// Objects yield their keys in insertion order; arrays yield their
    /// elements. Each iteration binds the loop variable in a fresh child
    /// scope, so closures created in the body capture that iteration's value.
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        let collection = self.value.eval(rt, ctx)?;

        // Snapshot before the body can mutate the collection
        let items: Vec<Value> = match &collection {
            Value::Object(obj) => obj.keys().into_iter().map(Value::string).collect(),
            Value::Array(arr) => arr.to_vec(),
            other => {
                return Err(EvalError::NotAnObject {
                    value: other.clone(),
                })
            }
        };

        let (element, constant) = match &self.init {
            ForInit::Decl(decl) if decl.list.len() == 1 => {
                (&decl.list[0], decl.kind == DeclKind::Const)
            }
            other => return Err(unsupported("for-in initializer", other)),
        };

        for item in items {
            let mut guard = rt.scope_guard();
            bind_element(element, Some(item), constant, &mut guard, ctx)?;
            self.body.eval(&mut guard, ctx)?;
        }

        Ok(Value::Undefined)
    }
}
