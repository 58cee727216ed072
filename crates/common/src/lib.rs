//! ibssbi common types, instruction encoding and program loading.
//!
//! This crate provides the foundational data structures for the ibssbi
//! instruction set:
//!
//! - [`Word`]: the untyped, pointer-sized stack value
//! - [`Opcode`]: the closed set of instructions
//! - [`Instruction`]: one decoded opcode plus its optional immediate
//! - [`Header`] / [`Version`]: the fixed binary header and version policy
//! - [`Program`]: a header plus its instruction stream
//! - [`Loader`]: reads and validates binaries
//! - [`DecodeError`] / [`LoadError`]: failures while decoding or loading

pub mod error;
pub mod header;
pub mod instruction;
pub mod loader;
pub mod opcode;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::{DecodeError, LoadError};
pub use header::{Header, Version, HEADER_SIZE};
pub use instruction::Instruction;
pub use loader::Loader;
pub use opcode::Opcode;
pub use program::Program;

/// The platform word: every stack slot, immediate and heap address.
pub type Word = usize;

/// Width of a [`Word`] in bytes, and of every inline immediate.
pub const WORD_SIZE: usize = std::mem::size_of::<Word>();

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy that generates a random valid Opcode.
    fn arb_opcode() -> impl Strategy<Value = Opcode> {
        prop::sample::select(&opcode::ALL_OPCODES[..])
    }

    /// Strategy that generates a random valid Instruction.
    fn arb_instruction() -> impl Strategy<Value = Instruction> {
        (arb_opcode(), any::<Word>()).prop_map(|(op, imm)| {
            if op.has_immediate() {
                Instruction::with_immediate(op, imm)
            } else {
                Instruction::simple(op)
            }
        })
    }

    proptest! {
        /// Any header with a supported major/minor and any patch survives
        /// encode, load and decode unchanged.
        #[test]
        fn header_roundtrip(patch in any::<u16>(), size in 0u32..64) {
            let header = Header::new(Version::new(0, 0, patch), size);
            let mut bytes = header.encode().to_vec();
            bytes.resize(HEADER_SIZE + size as usize, 0);

            let program = Loader::default().load_bytes(&bytes).unwrap();
            prop_assert_eq!(*program.header(), header);
            prop_assert_eq!(Header::decode(header.encode()), header);
        }

        /// A program built from instructions lists the same instructions back.
        #[test]
        fn program_instructions_roundtrip(
            instrs in prop::collection::vec(arb_instruction(), 0..50)
        ) {
            let program = Program::from_instructions(Version::CURRENT, &instrs);
            let listed: Vec<Instruction> = program
                .instructions()
                .map(|r| r.map(|(_, i)| i))
                .collect::<Result<_, _>>()
                .unwrap();
            prop_assert_eq!(listed, instrs);
        }

        /// Decoding arbitrary bytes never panics: it yields an instruction
        /// that re-encodes to the same prefix, or a specific DecodeError.
        #[test]
        fn random_bytes_decode(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
            match Instruction::decode(&bytes, 0) {
                Ok(instr) => {
                    let encoded = instr.encode();
                    prop_assert_eq!(&bytes[..encoded.len()], &encoded[..]);
                }
                Err(e) => match e {
                    DecodeError::UnknownOpcode(_)
                    | DecodeError::TruncatedImmediate { .. }
                    | DecodeError::OutOfBounds { .. } => {}
                },
            }
        }
    }
}
