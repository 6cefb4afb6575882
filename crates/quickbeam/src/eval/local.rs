//! Variable declaration evaluation

use crate::ast::{Binding, BindingElement, DeclKind, VarDecl};
use crate::{EvalContext, EvalError, Runtime, Value};

use super::{unsupported, Evaluate};

impl Evaluate for VarDecl {
    fn eval(&self, rt: &mut Runtime, ctx: &EvalContext) -> Result<Value, EvalError> {
        let constant = self.kind == DeclKind::Const;

        for element in &self.list {
            bind_element(element, None, constant, rt, ctx)?;
        }

        Ok(Value::Undefined)
    }
}

/// Bind one element in the active scope.
///
/// `value` is the supplied value (a call argument or loop item). When it is
/// absent or `Undefined`, the element's default expression is evaluated in
/// the active scope instead; with no default the binding holds `Undefined`.
///
/// # Errors
///
/// - `UnsupportedConstruct` for destructuring patterns
/// - `ConstantMutation` if the active scope already holds a constant of
///   the same name
/// - `Halted` if the `before_bind` hook refuses the binding
pub fn bind_element(
    element: &BindingElement,
    value: Option<Value>,
    constant: bool,
    rt: &mut Runtime,
    ctx: &EvalContext,
) -> Result<(), EvalError> {
    let name = match &element.binding {
        Binding::Ident(name) => name,
        Binding::Array(_) | Binding::Object(_) => {
            return Err(unsupported("destructuring binding", element));
        }
    };

    let value = match (value, &element.default) {
        (Some(value), _) if !value.is_undefined() => value,
        (_, Some(default)) => default.eval(rt, ctx)?,
        (_, None) => Value::Undefined,
    };

    ctx.before_bind(name, &value)?;
    rt.scope().set(name.as_str(), value, constant)?;
    Ok(())
}
