//! Instruction encoding and decoding for the ibssbi instruction set.
//!
//! Instructions are variable width:
//! ```text
//! Byte 0:              opcode (u8)
//! Bytes 1..=WORD_SIZE: immediate word (little-endian), only for
//!                      PUSH, ALLOC, JMP, JMP_IF_TRUE, JMP_IF_FALSE
//! ```

use crate::error::DecodeError;
use crate::opcode::Opcode;
use crate::{Word, WORD_SIZE};

/// A single decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Inline operand. `Some` exactly when `opcode.has_immediate()`.
    pub immediate: Option<Word>,
}

impl Instruction {
    /// An instruction with no immediate.
    ///
    /// # Panics
    ///
    /// Panics if `opcode` requires an immediate.
    pub fn simple(opcode: Opcode) -> Self {
        assert!(
            !opcode.has_immediate(),
            "{opcode} requires an immediate operand"
        );
        Self {
            opcode,
            immediate: None,
        }
    }

    /// An instruction carrying an immediate word.
    ///
    /// # Panics
    ///
    /// Panics if `opcode` takes no immediate.
    pub fn with_immediate(opcode: Opcode, immediate: Word) -> Self {
        assert!(opcode.has_immediate(), "{opcode} takes no immediate operand");
        Self {
            opcode,
            immediate: Some(immediate),
        }
    }

    /// Encoded width in bytes.
    pub fn width(&self) -> usize {
        self.opcode.width()
    }

    /// Append the encoded bytes to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.opcode as u8);
        if let Some(imm) = self.immediate {
            out.extend_from_slice(&imm.to_le_bytes());
        }
    }

    /// Encode to a fresh byte vector.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width());
        self.encode_into(&mut out);
        out
    }

    /// Decode the instruction starting at `offset` in `bytes`.
    pub fn decode(bytes: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let &byte = bytes.get(offset).ok_or(DecodeError::OutOfBounds {
            offset,
            size: bytes.len(),
        })?;
        let opcode = Opcode::try_from(byte)?;

        if !opcode.has_immediate() {
            return Ok(Self {
                opcode,
                immediate: None,
            });
        }

        Ok(Self {
            opcode,
            immediate: Some(read_word(bytes, offset + 1)?),
        })
    }
}

/// Read a little-endian word starting at `offset`.
pub fn read_word(bytes: &[u8], offset: usize) -> Result<Word, DecodeError> {
    let available = bytes.len().saturating_sub(offset);
    let truncated = DecodeError::TruncatedImmediate {
        offset,
        needed: WORD_SIZE,
        available,
    };
    let end = offset.checked_add(WORD_SIZE).ok_or(truncated.clone())?;
    let slice = bytes.get(offset..end).ok_or(truncated)?;

    let mut buf = [0u8; WORD_SIZE];
    buf.copy_from_slice(slice);
    Ok(Word::from_le_bytes(buf))
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.immediate {
            Some(imm) => write!(f, "{} {imm}", self.opcode.mnemonic()),
            None => f.write_str(self.opcode.mnemonic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_simple_is_one_byte() {
        assert_eq!(Instruction::simple(Opcode::Add).encode(), vec![0x10]);
        assert_eq!(Instruction::simple(Opcode::Halt).encode(), vec![0xFF]);
    }

    #[test]
    fn encode_immediate_little_endian() {
        let bytes = Instruction::with_immediate(Opcode::Push, 0x0102).encode();
        assert_eq!(bytes.len(), 1 + WORD_SIZE);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(bytes[1], 0x02);
        assert_eq!(bytes[2], 0x01);
        assert!(bytes[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn decode_at_offset() {
        let mut bytes = vec![0x02];
        Instruction::with_immediate(Opcode::Jmp, 42).encode_into(&mut bytes);
        let instr = Instruction::decode(&bytes, 1).unwrap();
        assert_eq!(instr, Instruction::with_immediate(Opcode::Jmp, 42));
        assert_eq!(instr.width(), 1 + WORD_SIZE);
    }

    #[test]
    fn decode_rejects_unknown_opcode() {
        assert_eq!(
            Instruction::decode(&[0x99], 0),
            Err(DecodeError::UnknownOpcode(0x99))
        );
    }

    #[test]
    fn decode_rejects_truncated_immediate() {
        let bytes = [0x01, 0x05, 0x00];
        assert_eq!(
            Instruction::decode(&bytes, 0),
            Err(DecodeError::TruncatedImmediate {
                offset: 1,
                needed: WORD_SIZE,
                available: 2
            })
        );
    }

    #[test]
    fn decode_past_end() {
        assert_eq!(
            Instruction::decode(&[0xFF], 1),
            Err(DecodeError::OutOfBounds { offset: 1, size: 1 })
        );
    }

    #[test]
    fn read_word_max() {
        let bytes = Word::MAX.to_le_bytes();
        assert_eq!(read_word(&bytes, 0), Ok(Word::MAX));
    }

    #[test]
    fn read_word_offset_overflow() {
        assert!(matches!(
            read_word(&[0u8; 4], usize::MAX),
            Err(DecodeError::TruncatedImmediate { available: 0, .. })
        ));
    }

    #[test]
    fn display() {
        assert_eq!(
            Instruction::with_immediate(Opcode::Push, 7).to_string(),
            "PUSH 7"
        );
        assert_eq!(Instruction::simple(Opcode::PrintInt).to_string(), "PRINT_INT");
    }

    #[test]
    #[should_panic(expected = "requires an immediate")]
    fn simple_rejects_immediate_opcode() {
        Instruction::simple(Opcode::Push);
    }
}
