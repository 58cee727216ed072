//! Errors surfaced by the command-line tools.

use ibssbi_assembler::AsmError;
use ibssbi_common::{DecodeError, LoadError};
use ibssbi_vm::RuntimeError;
use thiserror::Error;

/// Anything that makes a command fail. Every variant maps to exit code 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("cannot read '{path}': {message}")]
    Read { path: String, message: String },

    #[error("cannot write '{path}': {message}")]
    Write { path: String, message: String },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Asm(#[from] AsmError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
