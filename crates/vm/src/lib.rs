//! ibssbi virtual machine: executes loaded bytecode programs.
//!
//! The VM is a stack machine over untyped machine words with:
//! - A bounded evaluation stack
//! - A heap of word blocks addressed by synthetic addresses
//! - Byte-level I/O through any `BufRead` / `Write` pair
//!
//! # Usage
//!
//! ```
//! use ibssbi_common::{Instruction, Opcode, Program, Version};
//! use ibssbi_vm::run_with_io;
//!
//! let program = Program::from_instructions(
//!     Version::CURRENT,
//!     &[
//!         Instruction::with_immediate(Opcode::Push, 2),
//!         Instruction::with_immediate(Opcode::Push, 3),
//!         Instruction::simple(Opcode::Add),
//!         Instruction::simple(Opcode::PrintInt),
//!         Instruction::simple(Opcode::Halt),
//!     ],
//! );
//!
//! let mut output = Vec::new();
//! run_with_io(&program, &mut &b""[..], &mut output).unwrap();
//! assert_eq!(output, b"5\n");
//! ```

pub mod error;
pub mod execute;
pub mod heap;
mod input;
pub mod machine;
pub mod stack;

pub use error::RuntimeError;
pub use execute::EOF_WORD;
pub use heap::{Heap, HeapError, HEAP_BASE};
pub use machine::{VmConfig, VM};
pub use stack::{Stack, StackError};

use std::io::{self, BufRead, Write};

use ibssbi_common::Program;

/// Run a program against the process's stdin and stdout with default limits.
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution fails (stack overflow, division
/// by zero, invalid heap access, etc.).
pub fn run(program: &Program) -> Result<(), RuntimeError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut output = io::BufWriter::new(stdout.lock());
    run_with_io(program, &mut stdin.lock(), &mut output)
}

/// Run a program against caller-supplied streams with default limits.
pub fn run_with_io<R: BufRead, W: Write>(
    program: &Program,
    input: &mut R,
    output: &mut W,
) -> Result<(), RuntimeError> {
    run_with_config(program, VmConfig::default(), input, output)
}

pub fn run_with_config<R: BufRead, W: Write>(
    program: &Program,
    config: VmConfig,
    input: &mut R,
    output: &mut W,
) -> Result<(), RuntimeError> {
    let mut vm = VM::with_config(program, config);
    vm.execute(input, output)
}
