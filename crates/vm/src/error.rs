//! Runtime errors for the ibssbi VM.
//!
//! Every variant carries `at`, the byte offset of the instruction that
//! failed. All of them stop the run; none are recoverable.

use ibssbi_common::Word;
use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The byte at the program counter names no instruction.
    #[error("unknown opcode {opcode:#04x} at offset {at}")]
    UnknownOpcode { at: usize, opcode: u8 },

    /// The program counter left the instruction stream.
    #[error("program counter {at} is outside the program (size {size})")]
    ProgramCounterOutOfBounds { at: usize, size: usize },

    /// An immediate operand runs past the end of the stream.
    #[error("truncated immediate operand at offset {at}")]
    TruncatedImmediate { at: usize },

    /// Push onto a full stack.
    #[error("stack overflow (capacity {capacity}) at offset {at}")]
    StackOverflow { at: usize, capacity: usize },

    /// Pop from an empty stack.
    #[error("stack underflow at offset {at}")]
    StackUnderflow { at: usize },

    /// DIV or MOD with a zero right-hand side.
    #[error("division by zero at offset {at}")]
    DivisionByZero { at: usize },

    /// ALLOC could not be satisfied within the heap limit.
    #[error("allocation of {words} words failed at offset {at}")]
    AllocationFailed { at: usize, words: usize },

    /// FREE of an address that is not the start of a live block.
    #[error("invalid free of address {address:#x} at offset {at}")]
    InvalidFree { at: usize, address: Word },

    /// STO or RET through an address that is not a live word.
    #[error("invalid memory access at address {address:#x} at offset {at}")]
    InvalidMemoryAccess { at: usize, address: Word },

    /// INPUT_INT found no decimal integer on the input stream.
    #[error("expected a decimal integer on input at offset {at}")]
    InvalidInput { at: usize },

    /// Reading input or writing output failed.
    #[error("i/o error at offset {at}: {message}")]
    Io { at: usize, message: String },
}

impl RuntimeError {
    /// Offset of the instruction that failed.
    pub fn offset(&self) -> usize {
        match self {
            RuntimeError::UnknownOpcode { at, .. }
            | RuntimeError::ProgramCounterOutOfBounds { at, .. }
            | RuntimeError::TruncatedImmediate { at }
            | RuntimeError::StackOverflow { at, .. }
            | RuntimeError::StackUnderflow { at }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::AllocationFailed { at, .. }
            | RuntimeError::InvalidFree { at, .. }
            | RuntimeError::InvalidMemoryAccess { at, .. }
            | RuntimeError::InvalidInput { at }
            | RuntimeError::Io { at, .. } => *at,
        }
    }
}
