//! Opcode definitions for the ibssbi instruction set.
//!
//! Byte values are grouped by category: stack manipulation at 0x0_,
//! arithmetic at 0x1_, comparison at 0x2_, logic and bitwise at 0x3_,
//! memory at 0x4_, control flow at 0xE_ and I/O at 0xF_.

use crate::error::DecodeError;
use crate::WORD_SIZE;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute pins each variant to the byte that encodes it
/// in the instruction stream.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Stack manipulation
    /// Push the inline immediate word.
    Push = 0x01,
    /// Discard the top of stack.
    Pop = 0x02,
    /// Duplicate the top of stack.
    Dup = 0x03,
    /// Exchange the two topmost words.
    Swap = 0x04,
    /// Move the third word from the top to the top.
    Rot = 0x05,

    // Arithmetic
    /// Pop rhs, pop lhs, push `lhs + rhs` (wrapping).
    Add = 0x10,
    /// Pop rhs, pop lhs, push `lhs - rhs` (wrapping).
    Sub = 0x11,
    /// Pop rhs, pop lhs, push `lhs / rhs`. Division by zero is a runtime error.
    Div = 0x12,
    /// Pop rhs, pop lhs, push `lhs * rhs` (wrapping).
    Mult = 0x13,
    /// Pop rhs, pop lhs, push `lhs % rhs`. Zero divisor is a runtime error.
    Mod = 0x14,
    /// Pop rhs, pop lhs, push `lhs ^ rhs` computed in floating point.
    Pow = 0x15,

    // Comparison
    /// Push 1 if `lhs == rhs`, else 0.
    Eq = 0x20,
    /// Push 1 if `lhs != rhs`, else 0.
    Neq = 0x21,
    /// Push 1 if `lhs < rhs`, else 0.
    Lt = 0x22,
    /// Push 1 if `lhs <= rhs`, else 0.
    Lte = 0x23,
    /// Push 1 if `lhs > rhs`, else 0.
    Gt = 0x24,
    /// Push 1 if `lhs >= rhs`, else 0.
    Gte = 0x25,

    // Logical & bitwise
    /// Logical AND over non-zero-is-true words.
    And = 0x30,
    /// Logical OR over non-zero-is-true words.
    Or = 0x31,
    /// Logical XOR: exactly one operand non-zero.
    Xor = 0x32,
    /// Logical negation of a single operand.
    Not = 0x33,
    BitwiseAnd = 0x34,
    BitwiseOr = 0x35,
    BitwiseXor = 0x36,
    /// Bitwise complement of a single operand.
    BitwiseNot = 0x37,
    ShiftLeft = 0x38,
    ShiftRight = 0x39,

    // Memory
    /// Allocate `imm` words, push the block's base address.
    Alloc = 0x40,
    /// Pop an address and release the block it names.
    Free = 0x41,
    /// Pop value, pop address, store value at address.
    Sto = 0x42,
    /// Pop address, push the word stored there.
    Ret = 0x43,

    // Control flow
    /// Unconditional jump to the immediate offset.
    Jmp = 0xE0,
    /// Pop condition, jump if non-zero.
    JmpIfTrue = 0xE1,
    /// Pop condition, jump if zero.
    JmpIfFalse = 0xE2,

    // I/O & VM control
    /// Pop a word, write its low byte.
    Print = 0xF0,
    /// Pop a word, write it in decimal followed by a newline.
    PrintInt = 0xF1,
    /// Read one byte of input and push it.
    Input = 0xF2,
    /// Read one decimal integer from input and push it.
    InputInt = 0xF3,
    /// Stop execution.
    Halt = 0xFF,
}

/// All valid opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 39] = [
    Opcode::Push,
    Opcode::Pop,
    Opcode::Dup,
    Opcode::Swap,
    Opcode::Rot,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Div,
    Opcode::Mult,
    Opcode::Mod,
    Opcode::Pow,
    Opcode::Eq,
    Opcode::Neq,
    Opcode::Lt,
    Opcode::Lte,
    Opcode::Gt,
    Opcode::Gte,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
    Opcode::Not,
    Opcode::BitwiseAnd,
    Opcode::BitwiseOr,
    Opcode::BitwiseXor,
    Opcode::BitwiseNot,
    Opcode::ShiftLeft,
    Opcode::ShiftRight,
    Opcode::Alloc,
    Opcode::Free,
    Opcode::Sto,
    Opcode::Ret,
    Opcode::Jmp,
    Opcode::JmpIfTrue,
    Opcode::JmpIfFalse,
    Opcode::Print,
    Opcode::PrintInt,
    Opcode::Input,
    Opcode::InputInt,
    Opcode::Halt,
];

/// Alternate spellings accepted by [`Opcode::from_mnemonic`].
const ALIASES: [(&str, Opcode); 11] = [
    ("L_AND", Opcode::And),
    ("L_OR", Opcode::Or),
    ("L_XOR", Opcode::Xor),
    ("L_NOT", Opcode::Not),
    ("B_AND", Opcode::BitwiseAnd),
    ("B_OR", Opcode::BitwiseOr),
    ("B_XOR", Opcode::BitwiseXor),
    ("B_NOT", Opcode::BitwiseNot),
    ("SHL", Opcode::ShiftLeft),
    ("SHR", Opcode::ShiftRight),
    ("MUL", Opcode::Mult),
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Opcode::Push),
            0x02 => Ok(Opcode::Pop),
            0x03 => Ok(Opcode::Dup),
            0x04 => Ok(Opcode::Swap),
            0x05 => Ok(Opcode::Rot),

            0x10 => Ok(Opcode::Add),
            0x11 => Ok(Opcode::Sub),
            0x12 => Ok(Opcode::Div),
            0x13 => Ok(Opcode::Mult),
            0x14 => Ok(Opcode::Mod),
            0x15 => Ok(Opcode::Pow),

            0x20 => Ok(Opcode::Eq),
            0x21 => Ok(Opcode::Neq),
            0x22 => Ok(Opcode::Lt),
            0x23 => Ok(Opcode::Lte),
            0x24 => Ok(Opcode::Gt),
            0x25 => Ok(Opcode::Gte),

            0x30 => Ok(Opcode::And),
            0x31 => Ok(Opcode::Or),
            0x32 => Ok(Opcode::Xor),
            0x33 => Ok(Opcode::Not),
            0x34 => Ok(Opcode::BitwiseAnd),
            0x35 => Ok(Opcode::BitwiseOr),
            0x36 => Ok(Opcode::BitwiseXor),
            0x37 => Ok(Opcode::BitwiseNot),
            0x38 => Ok(Opcode::ShiftLeft),
            0x39 => Ok(Opcode::ShiftRight),

            0x40 => Ok(Opcode::Alloc),
            0x41 => Ok(Opcode::Free),
            0x42 => Ok(Opcode::Sto),
            0x43 => Ok(Opcode::Ret),

            0xE0 => Ok(Opcode::Jmp),
            0xE1 => Ok(Opcode::JmpIfTrue),
            0xE2 => Ok(Opcode::JmpIfFalse),

            0xF0 => Ok(Opcode::Print),
            0xF1 => Ok(Opcode::PrintInt),
            0xF2 => Ok(Opcode::Input),
            0xF3 => Ok(Opcode::InputInt),
            0xFF => Ok(Opcode::Halt),

            _ => Err(DecodeError::UnknownOpcode(value)),
        }
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Dup => "DUP",
            Opcode::Swap => "SWAP",
            Opcode::Rot => "ROT",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Div => "DIV",
            Opcode::Mult => "MULT",
            Opcode::Mod => "MOD",
            Opcode::Pow => "POW",
            Opcode::Eq => "EQ",
            Opcode::Neq => "NEQ",
            Opcode::Lt => "LT",
            Opcode::Lte => "LTE",
            Opcode::Gt => "GT",
            Opcode::Gte => "GTE",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Not => "NOT",
            Opcode::BitwiseAnd => "BITWISE_AND",
            Opcode::BitwiseOr => "BITWISE_OR",
            Opcode::BitwiseXor => "BITWISE_XOR",
            Opcode::BitwiseNot => "BITWISE_NOT",
            Opcode::ShiftLeft => "SHIFT_LEFT",
            Opcode::ShiftRight => "SHIFT_RIGHT",
            Opcode::Alloc => "ALLOC",
            Opcode::Free => "FREE",
            Opcode::Sto => "STO",
            Opcode::Ret => "RET",
            Opcode::Jmp => "JMP",
            Opcode::JmpIfTrue => "JMP_IF_TRUE",
            Opcode::JmpIfFalse => "JMP_IF_FALSE",
            Opcode::Print => "PRINT",
            Opcode::PrintInt => "PRINT_INT",
            Opcode::Input => "INPUT",
            Opcode::InputInt => "INPUT_INT",
            Opcode::Halt => "HALT",
        }
    }

    /// Look up an opcode by mnemonic. Case-insensitive; accepts the short
    /// `L_`/`B_` spellings for the logical and bitwise groups.
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        let upper = name.to_ascii_uppercase();
        ALL_OPCODES
            .iter()
            .copied()
            .find(|op| op.mnemonic() == upper)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == upper)
                    .map(|&(_, op)| op)
            })
    }

    /// Whether a word-sized immediate follows the opcode byte.
    pub fn has_immediate(&self) -> bool {
        matches!(
            self,
            Opcode::Push | Opcode::Alloc | Opcode::Jmp | Opcode::JmpIfTrue | Opcode::JmpIfFalse
        )
    }

    /// Encoded width in bytes, including any immediate.
    pub fn width(&self) -> usize {
        if self.has_immediate() {
            1 + WORD_SIZE
        } else {
            1
        }
    }

    /// Whether this opcode may transfer control somewhere other than the
    /// next instruction.
    pub fn is_jump(&self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::JmpIfTrue | Opcode::JmpIfFalse)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_opcodes_count() {
        assert_eq!(ALL_OPCODES.len(), 39);
    }

    #[test]
    fn roundtrip_all_valid_opcodes() {
        for &opcode in &ALL_OPCODES {
            let byte = opcode as u8;
            let decoded = Opcode::try_from(byte).unwrap();
            assert_eq!(
                opcode, decoded,
                "roundtrip failed for {opcode:?} ({byte:#04x})"
            );
        }
    }

    #[test]
    fn zero_is_unknown() {
        assert_eq!(Opcode::try_from(0x00), Err(DecodeError::UnknownOpcode(0x00)));
    }

    #[test]
    fn undefined_byte_is_unknown() {
        assert_eq!(Opcode::try_from(0x99), Err(DecodeError::UnknownOpcode(0x99)));
    }

    #[test]
    fn every_byte_value_resolves() {
        let mut valid = 0;
        for byte in 0..=255u8 {
            match Opcode::try_from(byte) {
                Ok(op) => {
                    assert_eq!(op as u8, byte);
                    valid += 1;
                }
                Err(DecodeError::UnknownOpcode(b)) => assert_eq!(b, byte),
                other => panic!("unexpected result for byte {byte:#04x}: {other:?}"),
            }
        }
        assert_eq!(valid, ALL_OPCODES.len());
    }

    #[test]
    fn immediate_opcodes() {
        let with_imm: Vec<_> = ALL_OPCODES.iter().filter(|op| op.has_immediate()).collect();
        assert_eq!(
            with_imm,
            vec![
                &Opcode::Push,
                &Opcode::Alloc,
                &Opcode::Jmp,
                &Opcode::JmpIfTrue,
                &Opcode::JmpIfFalse
            ]
        );
    }

    #[test]
    fn widths() {
        assert_eq!(Opcode::Add.width(), 1);
        assert_eq!(Opcode::Halt.width(), 1);
        assert_eq!(Opcode::Push.width(), 1 + WORD_SIZE);
        assert_eq!(Opcode::JmpIfFalse.width(), 1 + WORD_SIZE);
    }

    #[test]
    fn mnemonic_lookup_roundtrip() {
        for &opcode in &ALL_OPCODES {
            let m = opcode.mnemonic();
            assert_eq!(m, m.to_uppercase(), "mnemonic should be uppercase: {m}");
            assert_eq!(Opcode::from_mnemonic(m), Some(opcode));
        }
    }

    #[test]
    fn mnemonic_lookup_is_case_insensitive() {
        assert_eq!(Opcode::from_mnemonic("print_int"), Some(Opcode::PrintInt));
        assert_eq!(Opcode::from_mnemonic("Jmp"), Some(Opcode::Jmp));
    }

    #[test]
    fn mnemonic_aliases() {
        assert_eq!(Opcode::from_mnemonic("L_AND"), Some(Opcode::And));
        assert_eq!(Opcode::from_mnemonic("L_NOT"), Some(Opcode::Not));
        assert_eq!(Opcode::from_mnemonic("B_XOR"), Some(Opcode::BitwiseXor));
        assert_eq!(Opcode::from_mnemonic("B_NOT"), Some(Opcode::BitwiseNot));
        assert_eq!(Opcode::from_mnemonic("shl"), Some(Opcode::ShiftLeft));
        assert_eq!(Opcode::from_mnemonic("MUL"), Some(Opcode::Mult));
        assert_eq!(Opcode::from_mnemonic("NOPE"), None);
    }
}
