// =============================================================================
// OPCODE - Bytecode instructions
// =============================================================================

/// A single bytecode instruction.
///
/// The chunk's code stream is raw bytes; each instruction starts with one of
/// these opcode bytes, followed by [`OpCode::operand_bytes`] operand bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Load a constant from the pool. One operand byte: the constant index.
    Constant,
    Nil,
    True,
    False,
    Pop,
    Equal,
    Greater,
    Less,
    /// Adds two numbers, or concatenates two strings.
    Add,
    Subtract,
    Multiply,
    Divide,
    Not,
    Negate,
    Print,
    /// Halt the current run.
    Return,
}

impl OpCode {
    pub fn to_str(self) -> &'static str {
        match self {
            OpCode::Constant => "Constant",
            OpCode::Nil => "Nil",
            OpCode::True => "True",
            OpCode::False => "False",
            OpCode::Pop => "Pop",
            OpCode::Equal => "Equal",
            OpCode::Greater => "Greater",
            OpCode::Less => "Less",
            OpCode::Add => "Add",
            OpCode::Subtract => "Subtract",
            OpCode::Multiply => "Multiply",
            OpCode::Divide => "Divide",
            OpCode::Not => "Not",
            OpCode::Negate => "Negate",
            OpCode::Print => "Print",
            OpCode::Return => "Return",
        }
    }

    /// Number of operand bytes that follow the opcode byte.
    pub fn operand_bytes(self) -> usize {
        match self {
            OpCode::Constant => 1,
            _ => 0,
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, u8> {
        match byte {
            0 => Ok(OpCode::Constant),
            1 => Ok(OpCode::Nil),
            2 => Ok(OpCode::True),
            3 => Ok(OpCode::False),
            4 => Ok(OpCode::Pop),
            5 => Ok(OpCode::Equal),
            6 => Ok(OpCode::Greater),
            7 => Ok(OpCode::Less),
            8 => Ok(OpCode::Add),
            9 => Ok(OpCode::Subtract),
            10 => Ok(OpCode::Multiply),
            11 => Ok(OpCode::Divide),
            12 => Ok(OpCode::Not),
            13 => Ok(OpCode::Negate),
            14 => Ok(OpCode::Print),
            15 => Ok(OpCode::Return),
            n => Err(n),
        }
    }
}
