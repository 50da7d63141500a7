//! # Cinder bytecode
//!
//! The compiled program representation: a [`Chunk`] of instruction bytes plus
//! its constant pool, the [`OpCode`] instruction set, a structural verifier,
//! and a disassembler. Chunks are built via the [`Chunk`] writer methods or
//! decoded from their postcard on-disk form; the VM in
//! [`crate::runtime`] consumes them.

pub mod chunk;
pub mod disasm;
pub mod op;
pub mod verify;

pub use chunk::{Chunk, Constant};
pub use op::OpCode;
