//! Program header and version policy.
//!
//! Every binary begins with a fixed 10-byte header, little-endian:
//! ```text
//! Bytes 0-1: major (u16)
//! Bytes 2-3: minor (u16)
//! Bytes 4-5: patch (u16)
//! Bytes 6-9: body size in bytes (u32)
//! ```

use crate::error::LoadError;

/// Encoded header length in bytes.
pub const HEADER_SIZE: usize = 10;

/// A `major.minor.patch` triple.
///
/// Major versions mark incompatible format changes. Minor versions add
/// behaviour an older engine cannot run. Patch versions only add
/// instructions and are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    /// The version this engine implements.
    pub const CURRENT: Version = Version::new(0, 0, 1);

    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Check whether a program stamped `found` can run on an engine
    /// supporting `self`.
    pub fn check_compatible(&self, found: Version) -> Result<(), LoadError> {
        if found.major != self.major {
            return Err(LoadError::VersionMismatch {
                expected: self.major,
                found: found.major,
            });
        }
        if found.minor > self.minor {
            return Err(LoadError::VersionTooNew {
                supported: self.minor,
                found: found.minor,
            });
        }
        Ok(())
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The fixed header preceding the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: Version,
    /// Exact byte length of the body that follows.
    pub size: u32,
}

impl Header {
    pub fn new(version: Version, size: u32) -> Self {
        Self { version, size }
    }

    /// Encode to the 10-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..2].copy_from_slice(&self.version.major.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.version.minor.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.version.patch.to_le_bytes());
        bytes[6..10].copy_from_slice(&self.size.to_le_bytes());
        bytes
    }

    /// Decode the 10-byte wire form. No version policy is applied here;
    /// see [`Version::check_compatible`].
    pub fn decode(bytes: [u8; HEADER_SIZE]) -> Self {
        let major = u16::from_le_bytes([bytes[0], bytes[1]]);
        let minor = u16::from_le_bytes([bytes[2], bytes[3]]);
        let patch = u16::from_le_bytes([bytes[4], bytes[5]]);
        let size = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);

        Self {
            version: Version::new(major, minor, patch),
            size,
        }
    }
}
