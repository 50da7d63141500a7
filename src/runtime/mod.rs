//! # Cinder runtime
//!
//! The execution core: the [`Heap`] object registry that owns every
//! heap-allocated value, the [`Vm`] with its fixed-capacity operand stack and
//! chunk cursor, and the error taxonomy one interpret call can report.

pub mod heap;
pub mod runtime_error;
pub mod vm;

pub use heap::{Handle, Heap, Obj, ObjString};
pub use runtime_error::{InterpretError, RuntimeError};
pub use vm::{STACK_MAX, Vm};
