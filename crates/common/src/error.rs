//! Decode and load errors for ibssbi programs.

use thiserror::Error;

/// Errors that occur while decoding an instruction from the byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The byte does not name any opcode.
    #[error("unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    /// The instruction's immediate runs past the end of the stream.
    #[error("truncated immediate at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedImmediate {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Decoding was asked to start past the end of the stream.
    #[error("offset {offset} is past the end of the program (size {size})")]
    OutOfBounds { offset: usize, size: usize },
}

/// Errors that occur while reading a program header and body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The stream ended before a full header was read.
    #[error("truncated header: expected {expected} bytes, found {found}")]
    TruncatedHeader { expected: usize, found: usize },

    /// Major version differs from the engine's; the format is incompatible.
    #[error("executable major version does not match: expected {expected}, found {found}")]
    VersionMismatch { expected: u16, found: u16 },

    /// Minor version is newer than the engine supports.
    #[error("executable minor version is too high: expected {supported} or lower, found {found}")]
    VersionTooNew { supported: u16, found: u16 },

    /// The body is shorter than the header's declared size.
    #[error("truncated program: header declares {expected} bytes, found {found}")]
    TruncatedProgram { expected: usize, found: usize },

    /// The underlying reader failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_opcode() {
        assert_eq!(
            DecodeError::UnknownOpcode(0x99).to_string(),
            "unknown opcode: 0x99"
        );
    }

    #[test]
    fn display_truncated_immediate() {
        let e = DecodeError::TruncatedImmediate {
            offset: 3,
            needed: 8,
            available: 2,
        };
        assert_eq!(
            e.to_string(),
            "truncated immediate at offset 3: need 8 bytes, 2 available"
        );
    }

    #[test]
    fn display_version_mismatch() {
        assert_eq!(
            LoadError::VersionMismatch {
                expected: 0,
                found: 3
            }
            .to_string(),
            "executable major version does not match: expected 0, found 3"
        );
    }

    #[test]
    fn display_version_too_new() {
        assert_eq!(
            LoadError::VersionTooNew {
                supported: 0,
                found: 2
            }
            .to_string(),
            "executable minor version is too high: expected 0 or lower, found 2"
        );
    }

    #[test]
    fn display_truncated_program() {
        assert_eq!(
            LoadError::TruncatedProgram {
                expected: 12,
                found: 5
            }
            .to_string(),
            "truncated program: header declares 12 bytes, found 5"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(LoadError::from(io), LoadError::Io("nope".to_string()));
    }
}
