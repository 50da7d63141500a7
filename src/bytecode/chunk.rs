use serde::{Deserialize, Serialize};

use crate::bytecode::op::OpCode;

/// A constant-pool entry.
///
/// String constants carry their bytes directly: a serialized pool cannot hold
/// heap handles, so the VM materializes a string object when the constant is
/// loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Number(f64),
    String(String),
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Number(n) => write!(f, "{}", n),
            Constant::String(s) => write!(f, "{}", s),
        }
    }
}

/// A compiled unit of bytecode: instruction bytes, a source-line table, and a
/// constant pool.
///
/// Chunks are produced externally (or by hand via the builder methods below)
/// and consumed by the VM, which treats `code` as an opaque byte stream read
/// strictly forward. `lines` records the source line for each code byte so
/// runtime errors can point back at the faulting instruction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chunk {
    pub code: Vec<u8>,
    pub lines: Vec<u32>,
    pub constants: Vec<Constant>,
}

#[derive(Debug)]
pub struct ChunkCodecError {
    pub message: String,
}

impl std::fmt::Display for ChunkCodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chunk codec error: {}", self.message)
    }
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an opcode byte.
    pub fn write(&mut self, op: OpCode, line: u32) {
        self.write_byte(op.into(), line);
    }

    /// Append a raw byte (an operand, or a hand-picked opcode byte).
    pub fn write_byte(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Add a constant to the pool and return its index.
    pub fn add_constant(&mut self, constant: Constant) -> usize {
        self.constants.push(constant);
        self.constants.len() - 1
    }

    /// Serialize to the compact on-disk chunk format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ChunkCodecError> {
        postcard::to_allocvec(self).map_err(|e| ChunkCodecError {
            message: format!("cannot encode chunk: {}", e),
        })
    }

    /// Deserialize a chunk from its on-disk format.
    ///
    /// Decoding only restores the structure; run [`verify`] before executing
    /// anything that arrived from outside.
    ///
    /// [`verify`]: crate::bytecode::verify::verify
    pub fn from_bytes(bytes: &[u8]) -> Result<Chunk, ChunkCodecError> {
        postcard::from_bytes(bytes).map_err(|e| ChunkCodecError {
            message: format!("cannot decode chunk: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_keeps_line_table_in_step() {
        let mut chunk = Chunk::new();
        chunk.write(OpCode::Nil, 1);
        chunk.write(OpCode::Return, 2);

        assert_eq!(chunk.code, vec![u8::from(OpCode::Nil), u8::from(OpCode::Return)]);
        assert_eq!(chunk.lines, vec![1, 2]);
    }

    #[test]
    fn test_add_constant_returns_index() {
        let mut chunk = Chunk::new();
        assert_eq!(chunk.add_constant(Constant::Number(1.0)), 0);
        assert_eq!(chunk.add_constant(Constant::String("hi".to_string())), 1);
        assert_eq!(chunk.constants.len(), 2);
    }

    #[test]
    fn test_codec_round_trip() {
        let mut chunk = Chunk::new();
        let index = chunk.add_constant(Constant::String("greeting".to_string()));
        chunk.write(OpCode::Constant, 3);
        chunk.write_byte(index as u8, 3);
        chunk.write(OpCode::Print, 3);
        chunk.write(OpCode::Return, 4);

        let bytes = chunk.to_bytes().unwrap();
        let decoded = Chunk::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.code, chunk.code);
        assert_eq!(decoded.lines, chunk.lines);
        assert_eq!(decoded.constants, chunk.constants);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = Chunk::from_bytes(&[0xff; 3]);
        assert!(result.is_err());
    }
}
