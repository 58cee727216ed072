//! ibssbi assembler: bidirectional text ↔ binary translation.
//!
//! The assembler is a mechanical 1:1 translation plus label resolution.
//! No optimization, no macros.
//!
//! # Usage
//!
//! ```
//! use ibssbi_assembler::{assemble, disassemble};
//!
//! let text = "PUSH 42\nPRINT_INT\nHALT\n";
//! let program = assemble(text).unwrap();
//! let roundtripped = disassemble(&program).unwrap();
//! assert_eq!(roundtripped, text);
//! ```
//!
//! # Syntax
//!
//! ```text
//! ; comment to end of line
//! start:              ; label at the current byte offset
//!     push 'A'        ; mnemonics are case-insensitive
//!     print
//!     push -1         ; negative literals wrap
//!     jmp_if_true end ; labels as jump targets
//! end: halt
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(program)) == program` holds for every program
//! that decodes and carries [`Version::CURRENT`]. Disassembly drops the
//! header, so other versions reassemble through [`assemble_with_version`].
//! The disassembler outputs canonical text; the assembler accepts both
//! canonical and non-canonical input (hex, char literals, labels, aliases
//! such as `B_AND`).

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::{disassemble, listing};
pub use error::AsmError;

use ibssbi_common::{Program, Version};
use lexer::tokenize_line;
use parser::{parse_line, SymbolTable};

/// Assemble text into a program stamped with [`Version::CURRENT`].
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    assemble_with_version(text, Version::CURRENT)
}

/// Assemble text into a program whose header carries `version`.
pub fn assemble_with_version(text: &str, version: Version) -> Result<Program, AsmError> {
    let mut symbols = SymbolTable::default();
    let mut pending = Vec::new();
    let mut offset = 0;

    // First pass: parse and place every label.
    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        let parsed = parse_line(&tokens, line_num)?;
        for label in parsed.labels {
            symbols.define(label, offset, line_num)?;
        }
        if let Some(instr) = parsed.instruction {
            offset += instr.opcode.width();
            pending.push(instr);
        }
    }

    // Second pass: resolve label operands.
    let instructions = pending
        .into_iter()
        .map(|instr| instr.resolve(&symbols))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Program::from_instructions(version, &instructions))
}
