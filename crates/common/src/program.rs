//! Program representation for ibssbi binaries.
//!
//! A program is a [`Header`] plus the raw instruction stream it describes.
//! Binary files (.ibc) are the encoded header immediately followed by the
//! body bytes.

use crate::error::DecodeError;
use crate::header::{Header, Version, HEADER_SIZE};
use crate::instruction::Instruction;

/// An ibssbi program: a header and the bytes it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    header: Header,
    body: Vec<u8>,
}

impl Program {
    /// Build a program from an already validated header and its body.
    ///
    /// The loader is the only caller that must uphold `header.size ==
    /// body.len()`; [`Program::from_body`] computes the size itself.
    pub(crate) fn from_parts(header: Header, body: Vec<u8>) -> Self {
        debug_assert_eq!(header.size as usize, body.len());
        Self { header, body }
    }

    /// Build a program from a body, stamping it with `version`.
    ///
    /// # Panics
    ///
    /// Panics if the body is longer than `u32::MAX` bytes.
    pub fn from_body(version: Version, body: Vec<u8>) -> Self {
        let size = u32::try_from(body.len()).expect("program body exceeds u32::MAX bytes");
        Self {
            header: Header::new(version, size),
            body,
        }
    }

    /// Build a program from a sequence of instructions.
    pub fn from_instructions(version: Version, instructions: &[Instruction]) -> Self {
        let mut body = Vec::new();
        for instr in instructions {
            instr.encode_into(&mut body);
        }
        Self::from_body(version, body)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn version(&self) -> Version {
        self.header.version
    }

    /// The instruction stream.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Encode header and body as a complete binary.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.body.len());
        bytes.extend_from_slice(&self.header.encode());
        bytes.extend_from_slice(&self.body);
        bytes
    }

    /// Decode the instruction at byte offset `offset`.
    pub fn instruction_at(&self, offset: usize) -> Result<Instruction, DecodeError> {
        Instruction::decode(&self.body, offset)
    }

    /// Iterate over `(offset, instruction)` pairs in stream order.
    ///
    /// This walks the stream linearly, so bytes that are only ever jumped
    /// over (data hidden behind a `JMP`) are still decoded. Iteration stops
    /// after the first error.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            bytes: &self.body,
            offset: 0,
            failed: false,
        }
    }

    /// Human-readable dump of the header and raw bytes.
    pub fn dump(&self) -> String {
        let mut out = format!(
            "== program ==\nVERSION\t{}\nSIZE\t{}\nPROGRAM\t",
            self.header.version, self.header.size
        );
        let hex: Vec<String> = self.body.iter().map(|b| format!("0x{b:02X}")).collect();
        out.push_str(&hex.join(" "));
        out.push('\n');
        out
    }
}

/// Linear iterator over a program's instructions.
pub struct Instructions<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl Iterator for Instructions<'_> {
    type Item = Result<(usize, Instruction), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }

        match Instruction::decode(self.bytes, self.offset) {
            Ok(instr) => {
                let at = self.offset;
                self.offset += instr.width();
                Some(Ok((at, instr)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
