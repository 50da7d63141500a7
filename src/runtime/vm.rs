use crate::bytecode::chunk::{Chunk, Constant};
use crate::bytecode::op::OpCode;
use crate::bytecode::verify::verify;
use crate::lang::value::Value;
use crate::runtime::heap::{Heap, Obj};
use crate::runtime::runtime_error::{
    InterpretError, RuntimeError, stack_overflow, stack_underflow, type_error,
};

/// Fixed operand-stack capacity. Pushing past it is a runtime error, never
/// undefined behavior.
pub const STACK_MAX: usize = 256;

/// The execution engine: one heap registry plus one operand stack.
///
/// `interpret` borrows a chunk for the duration of a single call; the engine
/// never owns the program it runs. Single-threaded by construction: every
/// mutation goes through `&mut self`.
pub struct Vm {
    heap: Heap,
    stack: Vec<Value>,
}

impl Vm {
    pub fn new() -> Self {
        Vm {
            heap: Heap::new(),
            stack: Vec::with_capacity(STACK_MAX),
        }
    }

    #[allow(dead_code)]
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    #[allow(dead_code)]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Push a value onto the operand stack.
    pub fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        if self.stack.len() == STACK_MAX {
            return Err(stack_overflow(STACK_MAX));
        }
        self.stack.push(value);
        Ok(())
    }

    /// Pop the top of the operand stack.
    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or_else(stack_underflow)
    }

    /// Inspect the stack without popping; distance 0 is the top slot.
    pub fn peek(&self, distance: usize) -> Result<Value, RuntimeError> {
        if distance < self.stack.len() {
            Ok(self.stack[self.stack.len() - 1 - distance])
        } else {
            Err(stack_underflow())
        }
    }

    fn pop_number(&mut self) -> Result<f64, RuntimeError> {
        match self.pop()? {
            Value::Number(n) => Ok(n),
            other => Err(type_error("number", other.type_name())),
        }
    }

    /// Execute a chunk to completion.
    ///
    /// The chunk is verified first: a structurally invalid chunk was never
    /// valid to execute and reports as [`InterpretError::Compile`]. The
    /// instruction cursor and the stack are then re-initialized, so repeated
    /// calls never leak state from a prior run. Execution halts on `Return`,
    /// on running off the end of the code, or on the first fatal condition.
    pub fn interpret(&mut self, chunk: &Chunk) -> Result<(), InterpretError> {
        verify(chunk)?;

        self.stack.clear();
        self.run(chunk)?;
        Ok(())
    }

    fn run(&mut self, chunk: &Chunk) -> Result<(), RuntimeError> {
        let mut ip: usize = 0;

        while ip < chunk.code.len() {
            let at = ip;

            // The verifier established that every opcode byte decodes and no
            // operand is truncated.
            let op = OpCode::try_from(chunk.code[ip])
                .map_err(|byte| RuntimeError::new(format!("unknown opcode byte {}", byte)))?;
            ip += 1;

            let result = match op {
                OpCode::Constant => {
                    let index = chunk.code[ip] as usize;
                    ip += 1;
                    self.load_constant(chunk, index)
                }
                OpCode::Nil => self.push(Value::Nil),
                OpCode::True => self.push(Value::Bool(true)),
                OpCode::False => self.push(Value::Bool(false)),
                OpCode::Pop => self.pop().map(|_| ()),
                OpCode::Equal => self.equal(),
                OpCode::Greater => self.binary_number_op(|a, b| Value::Bool(a > b)),
                OpCode::Less => self.binary_number_op(|a, b| Value::Bool(a < b)),
                OpCode::Add => self.add(),
                OpCode::Subtract => self.binary_number_op(|a, b| Value::Number(a - b)),
                OpCode::Multiply => self.binary_number_op(|a, b| Value::Number(a * b)),
                OpCode::Divide => self.binary_number_op(|a, b| Value::Number(a / b)),
                OpCode::Not => {
                    let value = self.pop()?;
                    self.push(Value::Bool(value.is_falsey()))
                }
                OpCode::Negate => {
                    let n = self.pop_number()?;
                    self.push(Value::Number(-n))
                }
                OpCode::Print => self.print(),
                OpCode::Return => return Ok(()),
            };

            result.map_err(|e| e.with_line(chunk.lines[at]))?;
        }

        Ok(())
    }

    fn load_constant(&mut self, chunk: &Chunk, index: usize) -> Result<(), RuntimeError> {
        let value = match &chunk.constants[index] {
            Constant::Number(n) => Value::Number(*n),
            // String constants carry bytes; the object is materialized and
            // registered here, and the stack gets only the handle.
            Constant::String(s) => Value::Obj(self.heap.copy_string(s)),
        };
        self.push(value)
    }

    /// The operand on top of the stack is the right-hand side.
    fn binary_number_op(
        &mut self,
        op: impl Fn(f64, f64) -> Value,
    ) -> Result<(), RuntimeError> {
        let b = self.pop_number()?;
        let a = self.pop_number()?;
        self.push(op(a, b))
    }

    fn equal(&mut self) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;
        let equal = self.heap.values_equal(a, b);
        self.push(Value::Bool(equal))
    }

    fn add(&mut self) -> Result<(), RuntimeError> {
        match (self.peek(1)?, self.peek(0)?) {
            (Value::Number(_), Value::Number(_)) => {
                let b = self.pop_number()?;
                let a = self.pop_number()?;
                self.push(Value::Number(a + b))
            }
            (Value::Obj(_), Value::Obj(_)) => self.concatenate(),
            (a, b) => Err(type_error(
                "two numbers or two strings",
                &format!("{} and {}", a.type_name(), b.type_name()),
            )),
        }
    }

    fn concatenate(&mut self) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        match (a, b) {
            (Value::Obj(a), Value::Obj(b)) => {
                let chars = match (self.heap.get(a), self.heap.get(b)) {
                    (Obj::String(a), Obj::String(b)) => {
                        let mut chars = String::with_capacity(a.len() + b.len());
                        chars.push_str(a.as_str());
                        chars.push_str(b.as_str());
                        chars
                    }
                };
                // The concatenated buffer is handed over as-is: no extra copy.
                let handle = self.heap.take_string(chars);
                self.push(Value::Obj(handle))
            }
            (a, b) => Err(type_error(
                "two strings",
                &format!("{} and {}", a.type_name(), b.type_name()),
            )),
        }
    }

    fn print(&mut self) -> Result<(), RuntimeError> {
        match self.pop()? {
            Value::Obj(handle) => {
                self.heap.print_object(handle);
                println!();
            }
            other => println!("{}", self.heap.format_value(other)),
        }
        Ok(())
    }
}
