//! Error types for the ibssbi assembler.

use thiserror::Error;

/// Errors produced during assembly of text to binary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode that takes an immediate was given none.
    #[error("line {line}: {opcode} expects an operand")]
    MissingOperand { line: usize, opcode: &'static str },

    /// An opcode without an immediate was given one.
    #[error("line {line}: {opcode} takes no operand, found '{token}'")]
    OperandNotAllowed {
        line: usize,
        opcode: &'static str,
        token: String,
    },

    /// A numeric or character literal could not be parsed or is out of range.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A label was defined twice.
    #[error("line {line}: label '{label}' is already defined on line {first}")]
    DuplicateLabel {
        line: usize,
        label: String,
        first: usize,
    },

    /// An operand names a label that is never defined.
    #[error("line {line}: undefined label '{label}'")]
    UndefinedLabel { line: usize, label: String },
}

impl AsmError {
    /// Source line the error was reported on (1-based).
    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownOpcode { line, .. }
            | AsmError::MissingOperand { line, .. }
            | AsmError::OperandNotAllowed { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::UnexpectedToken { line, .. }
            | AsmError::DuplicateLabel { line, .. }
            | AsmError::UndefinedLabel { line, .. } => *line,
        }
    }
}
