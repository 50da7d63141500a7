use crate::bytecode::chunk::Chunk;
use crate::bytecode::op::OpCode;

/// Print a disassembly listing of a chunk.
pub fn disassemble(chunk: &Chunk, name: &str) {
    println!("== {} ==", name);

    let mut offset = 0;
    while offset < chunk.code.len() {
        offset = disassemble_instruction(chunk, offset);
    }
}

/// Print one instruction and return the offset of the next.
///
/// Tolerates malformed chunks (unknown bytes, truncated operands) so a bad
/// chunk can still be inspected; only execution requires a verified chunk.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> usize {
    print!("{:04} ", offset);

    if offset > 0 && chunk.lines.get(offset) == chunk.lines.get(offset - 1) {
        print!("   | ");
    } else {
        match chunk.lines.get(offset) {
            Some(line) => print!("{:>4} ", line),
            None => print!("   ? "),
        }
    }

    match OpCode::try_from(chunk.code[offset]) {
        Ok(OpCode::Constant) => constant_instruction(chunk, OpCode::Constant, offset),
        Ok(op) => simple_instruction(op, offset),
        Err(byte) => {
            println!("Unknown opcode {}", byte);
            offset + 1
        }
    }
}

fn simple_instruction(op: OpCode, offset: usize) -> usize {
    println!("{}", op.to_str());
    offset + 1
}

fn constant_instruction(chunk: &Chunk, op: OpCode, offset: usize) -> usize {
    match chunk.code.get(offset + 1) {
        Some(&index) => {
            match chunk.constants.get(index as usize) {
                Some(constant) => println!("{:<16} {:4} '{}'", op.to_str(), index, constant),
                None => println!("{:<16} {:4} <out of range>", op.to_str(), index),
            }
            offset + 2
        }
        None => {
            println!("{:<16} <truncated>", op.to_str());
            offset + 1
        }
    }
}
