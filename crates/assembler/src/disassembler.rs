//! Disassembler: binary program → assembly text.
//!
//! Canonical output is flat text, one instruction per line, upper-case
//! mnemonics and decimal immediates. Jump targets stay numeric; labels are
//! not reconstructed.

use ibssbi_common::{DecodeError, Program};

/// Disassemble a program into canonical assembly text.
///
/// The text carries no header, so reassembling it reproduces `program` only
/// when `program` is stamped with
/// [`Version::CURRENT`](ibssbi_common::Version::CURRENT).
pub fn disassemble(program: &Program) -> Result<String, DecodeError> {
    let mut out = String::new();
    for item in program.instructions() {
        let (_, instr) = item?;
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// Disassemble with a header comment and a byte offset before each
/// instruction. For reading, not for reassembly.
pub fn listing(program: &Program) -> Result<String, DecodeError> {
    let mut out = format!("; ibssbi {} ({} bytes)\n", program.version(), program.len());
    for item in program.instructions() {
        let (offset, instr) = item?;
        let line = match (instr.opcode.is_jump(), instr.immediate) {
            (true, Some(target)) => format!("{offset:04x}  {instr}  ; -> {target:04x}\n"),
            _ => format!("{offset:04x}  {instr}\n"),
        };
        out.push_str(&line);
    }
    Ok(out)
}
