use crate::runtime::heap::Handle;

/// Runtime value on the VM data stack.
///
/// Values are the only data that can exist on the operand stack. Immediate
/// kinds are stored inline; heap-allocated kinds are carried as a non-owning
/// [`Handle`] whose referent is owned by the VM's heap registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Nil,

    Bool(bool),

    /// 64-bit floating-point number.
    Number(f64),

    /// Handle to a heap object (currently always a string).
    Obj(Handle),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Obj(_) => "object",
        }
    }

    /// nil and false are falsey; every other value is truthy.
    pub fn is_falsey(&self) -> bool {
        matches!(self, Value::Nil | Value::Bool(false))
    }
}
