use std::fmt::{self, Display, Formatter};

use crate::lang::value::Value;

/// Non-owning reference to a heap object.
///
/// Handles are only minted by the [`Heap`] that owns the referent; a handle
/// from one heap is meaningless against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle(usize);

/// A heap-allocated object.
///
/// Closed sum: adding a variant forces every dispatch site (display,
/// equality, concatenation) to handle it at compile time.
#[derive(Debug, PartialEq)]
pub enum Obj {
    String(ObjString),
}

/// An immutable heap-allocated string. The backing buffer is owned and never
/// mutated after construction.
#[derive(Debug, PartialEq)]
pub struct ObjString {
    chars: String,
}

impl ObjString {
    pub fn as_str(&self) -> &str {
        &self.chars
    }

    /// Byte length of the backing buffer.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl Display for Obj {
    /// Raw textual form: strings render their bytes with no quoting or
    /// escaping.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Obj::String(s) => write!(f, "{}", s.as_str()),
        }
    }
}

/// Registry of every heap object a VM has allocated.
///
/// Each VM instance owns one heap; there is no process-wide state. Objects
/// are appended at allocation and never individually freed by this core: the
/// whole registry is released exactly once when the heap is dropped. A
/// future collector would traverse exactly this storage, which is why slots
/// are never recycled in the meantime.
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<Obj>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object and return its handle. Unconditional, O(1), no
    /// deduplication.
    pub fn alloc(&mut self, obj: Obj) -> Handle {
        self.objects.push(obj);
        Handle(self.objects.len() - 1)
    }

    /// Allocate a string by copying a borrowed buffer.
    ///
    /// The caller keeps ownership of the input and may reuse or free it
    /// immediately; the object gets a fresh buffer of its own.
    pub fn copy_string(&mut self, chars: &str) -> Handle {
        self.alloc(Obj::String(ObjString {
            chars: chars.to_owned(),
        }))
    }

    /// Allocate a string by taking ownership of an existing buffer, with no
    /// copy. Moving the buffer in is what upholds the contract that the
    /// caller never touches it again.
    pub fn take_string(&mut self, chars: String) -> Handle {
        self.alloc(Obj::String(ObjString { chars }))
    }

    /// Resolve a handle to its object. Handles are only minted by `alloc`
    /// and nothing is ever removed, so the slot is always present.
    pub fn get(&self, handle: Handle) -> &Obj {
        &self.objects[handle.0]
    }

    /// Number of objects allocated since this heap was created.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Walk every live object once, in allocation order.
    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &Obj> {
        self.objects.iter()
    }

    /// Print an object's textual form to stdout.
    pub fn print_object(&self, handle: Handle) {
        print!("{}", self.get(handle));
    }

    /// Render a value, resolving object handles through the registry.
    pub fn format_value(&self, value: Value) -> String {
        match value {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Obj(handle) => self.get(handle).to_string(),
        }
    }

    /// Value equality with handles resolved to their referents: strings
    /// compare by content, immediates by value, mixed kinds are unequal.
    pub fn values_equal(&self, a: Value, b: Value) -> bool {
        match (a, b) {
            (Value::Obj(a), Value::Obj(b)) => self.get(a) == self.get(b),
            _ => a == b,
        }
    }
}
