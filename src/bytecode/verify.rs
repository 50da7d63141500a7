use crate::bytecode::chunk::Chunk;
use crate::bytecode::op::OpCode;

/// A chunk that was never valid to execute.
#[derive(Debug)]
pub struct VerifyError {
    pub message: String,
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid chunk: {}", self.message)
    }
}

impl VerifyError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Structurally verify a chunk before execution.
///
/// One linear walk over the code stream. Rejects unknown opcode bytes,
/// operands truncated by the end of the code, constant indices outside the
/// pool, and a line table out of step with the code.
///
/// Stack effects are deliberately not checked here: stack underflow and
/// overflow are dispatch-time conditions and report as runtime errors.
pub fn verify(chunk: &Chunk) -> Result<(), VerifyError> {
    if chunk.lines.len() != chunk.code.len() {
        return Err(VerifyError::new(format!(
            "line table length {} does not match code length {}",
            chunk.lines.len(),
            chunk.code.len()
        )));
    }

    let mut ip = 0;
    while ip < chunk.code.len() {
        let op = OpCode::try_from(chunk.code[ip]).map_err(|byte| {
            VerifyError::new(format!("unknown opcode byte {} at offset {}", byte, ip))
        })?;

        let operands = op.operand_bytes();
        if ip + 1 + operands > chunk.code.len() {
            return Err(VerifyError::new(format!(
                "{} at offset {} is truncated by end of code",
                op.to_str(),
                ip
            )));
        }

        if op == OpCode::Constant {
            let index = chunk.code[ip + 1] as usize;
            if index >= chunk.constants.len() {
                return Err(VerifyError::new(format!(
                    "constant index {} at offset {} out of range (pool holds {})",
                    index,
                    ip,
                    chunk.constants.len()
                )));
            }
        }

        ip += 1 + operands;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::chunk::Constant;

    #[test]
    fn test_empty_chunk_is_valid() {
        assert!(verify(&Chunk::new()).is_ok());
    }

    #[test]
    fn test_well_formed_chunk_is_valid() {
        let mut chunk = Chunk::new();
        let index = chunk.add_constant(Constant::Number(1.0));
        chunk.write(OpCode::Constant, 1);
        chunk.write_byte(index as u8, 1);
        chunk.write(OpCode::Negate, 1);
        chunk.write(OpCode::Return, 1);
        assert!(verify(&chunk).is_ok());
    }

    #[test]
    fn test_unknown_opcode_rejected() {
        let mut chunk = Chunk::new();
        chunk.write_byte(0xff, 1);
        let result = verify(&chunk);
        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("unknown opcode"));
    }

    #[test]
    fn test_truncated_operand_rejected() {
        let mut chunk = Chunk::new();
        chunk.add_constant(Constant::Number(1.0));
        // Constant with no index byte after it.
        chunk.write(OpCode::Constant, 1);
        let result = verify(&chunk);
        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("truncated"));
    }

    #[test]
    fn test_constant_index_out_of_range_rejected() {
        let mut chunk = Chunk::new();
        chunk.write(OpCode::Constant, 1);
        chunk.write_byte(7, 1);
        let result = verify(&chunk);
        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("out of range"));
    }

    #[test]
    fn test_line_table_mismatch_rejected() {
        let mut chunk = Chunk::new();
        chunk.write(OpCode::Return, 1);
        chunk.lines.pop();
        assert!(verify(&chunk).is_err());
    }

    #[test]
    fn test_operand_byte_is_not_decoded_as_opcode() {
        // A constant index that happens to equal an invalid opcode byte must
        // be skipped over, not decoded.
        let mut chunk = Chunk::new();
        for _ in 0..=0x20 {
            chunk.add_constant(Constant::Number(0.0));
        }
        chunk.write(OpCode::Constant, 1);
        chunk.write_byte(0x20, 1);
        chunk.write(OpCode::Return, 1);
        assert!(verify(&chunk).is_ok());
    }
}
