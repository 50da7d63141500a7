//! # Cinder value model
//!
//! [`Value`] is the tagged union flowing across the operand stack: the
//! immediate kinds (nil, bool, number) and a handle-carrying object kind.
//! Object payloads themselves live in [`crate::runtime::heap`].

pub mod value;

pub use value::Value;
