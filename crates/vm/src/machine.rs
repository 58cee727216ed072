//! VM state management: configuration, stack, heap, program counter.

use crate::error::RuntimeError;
use crate::heap::{Heap, HeapError};
use crate::stack::{Stack, StackError};
use ibssbi_common::{DecodeError, Instruction, Program, Word};

/// Default evaluation stack capacity, in words.
pub const DEFAULT_STACK_CAPACITY: usize = 256;

/// Default ceiling on live heap words (8 MiB of 64-bit words).
pub const DEFAULT_MAX_HEAP_WORDS: usize = 1 << 20;

/// Per-instance limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    pub stack_capacity: usize,
    pub max_heap_words: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            max_heap_words: DEFAULT_MAX_HEAP_WORDS,
        }
    }
}

/// The ibssbi virtual machine.
///
/// Each instance owns its stack and heap; nothing is shared between
/// instances.
pub struct VM<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    pub(crate) stack: Stack,
    pub(crate) heap: Heap,
    /// Byte offset of the next instruction.
    pub(crate) pc: usize,
    pub(crate) running: bool,
    /// Instructions executed so far.
    pub(crate) steps: u64,
}

impl<'a> VM<'a> {
    /// Create a VM with default limits.
    pub fn new(program: &'a Program) -> Self {
        Self::with_config(program, VmConfig::default())
    }

    pub fn with_config(program: &'a Program, config: VmConfig) -> Self {
        Self {
            program,
            stack: Stack::with_capacity(config.stack_capacity),
            heap: Heap::new(config.max_heap_words),
            pc: 0,
            running: true,
            steps: 0,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stack contents from bottom to top.
    pub fn stack(&self) -> &[Word] {
        self.stack.as_slice()
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Push a value onto the stack, checking for overflow.
    pub(crate) fn push(&mut self, value: Word) -> Result<(), RuntimeError> {
        self.stack.push(value).map_err(|e| self.stack_error(e))
    }

    /// Pop a value from the stack, checking for underflow.
    pub(crate) fn pop(&mut self) -> Result<Word, RuntimeError> {
        self.stack.pop().map_err(|e| self.stack_error(e))
    }

    /// Decode the instruction at the current pc.
    pub(crate) fn fetch(&self) -> Result<Instruction, RuntimeError> {
        let at = self.pc;
        self.program.instruction_at(at).map_err(|e| match e {
            DecodeError::UnknownOpcode(opcode) => RuntimeError::UnknownOpcode { at, opcode },
            DecodeError::TruncatedImmediate { .. } => RuntimeError::TruncatedImmediate { at },
            DecodeError::OutOfBounds { size, .. } => {
                RuntimeError::ProgramCounterOutOfBounds { at, size }
            }
        })
    }

    fn stack_error(&self, err: StackError) -> RuntimeError {
        match err {
            StackError::Overflow { capacity } => RuntimeError::StackOverflow {
                at: self.pc,
                capacity,
            },
            StackError::Underflow => RuntimeError::StackUnderflow { at: self.pc },
        }
    }

    pub(crate) fn heap_error(&self, err: HeapError) -> RuntimeError {
        match err {
            HeapError::Exhausted { requested, .. } => RuntimeError::AllocationFailed {
                at: self.pc,
                words: requested,
            },
            HeapError::InvalidFree { address } => RuntimeError::InvalidFree {
                at: self.pc,
                address,
            },
            HeapError::InvalidAccess { address } => RuntimeError::InvalidMemoryAccess {
                at: self.pc,
                address,
            },
        }
    }
}
