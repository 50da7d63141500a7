use crate::bytecode::verify::VerifyError;

/// A fatal condition raised during dispatch.
///
/// Halts the current interpret call and is reported to the caller; never
/// silently recovered.
#[derive(Debug, PartialEq)]
pub struct RuntimeError {
    pub message: String,
    pub line: Option<u32>,
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "runtime error: {}", self.message)?;

        if let Some(line) = self.line {
            write!(f, "\n  [line {}] in script", line)?;
        }
        Ok(())
    }
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        RuntimeError {
            message: message.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

pub fn stack_overflow(limit: usize) -> RuntimeError {
    RuntimeError::new(format!("stack overflow (capacity {})", limit))
}

pub fn stack_underflow() -> RuntimeError {
    RuntimeError::new("stack underflow")
}

pub fn type_error(expected: &str, got: &str) -> RuntimeError {
    RuntimeError::new(format!("type error: expected {}, got {}", expected, got))
}

/// Outcome taxonomy for one interpret call.
///
/// A chunk that was never valid to execute surfaces as `Compile`; a fatal
/// condition detected during dispatch surfaces as `Runtime`. Success is the
/// `Ok` side of the `Result`.
#[derive(Debug)]
pub enum InterpretError {
    Compile(VerifyError),
    Runtime(RuntimeError),
}

impl std::fmt::Display for InterpretError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpretError::Compile(e) => write!(f, "{}", e),
            InterpretError::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl From<VerifyError> for InterpretError {
    fn from(e: VerifyError) -> Self {
        InterpretError::Compile(e)
    }
}

impl From<RuntimeError> for InterpretError {
    fn from(e: RuntimeError) -> Self {
        InterpretError::Runtime(e)
    }
}
