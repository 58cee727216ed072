//! Binary loader: header validation and body read.

use std::io::Read;

use tracing::debug;

use crate::error::LoadError;
use crate::header::{Header, Version, HEADER_SIZE};
use crate::program::Program;

/// Reads programs stamped with a version the configured engine accepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    supported: Version,
}

impl Loader {
    pub fn new(supported: Version) -> Self {
        Self { supported }
    }

    pub fn supported(&self) -> Version {
        self.supported
    }

    /// Read and validate the 10-byte header.
    pub fn read_header<R: Read>(&self, reader: &mut R) -> Result<Header, LoadError> {
        let mut buf = [0u8; HEADER_SIZE];
        let found = read_full(reader, &mut buf)?;
        if found < HEADER_SIZE {
            return Err(LoadError::TruncatedHeader {
                expected: HEADER_SIZE,
                found,
            });
        }

        let header = Header::decode(buf);
        self.supported.check_compatible(header.version)?;

        debug!(
            version = %header.version,
            size = header.size,
            "read program header"
        );
        Ok(header)
    }

    /// Read exactly `header.size` body bytes.
    pub fn read_program<R: Read>(&self, header: Header, reader: &mut R) -> Result<Program, LoadError> {
        let expected = header.size as usize;
        // Grow with the data actually present; a lying header must not
        // force a 4 GiB allocation up front.
        let mut body = Vec::new();
        reader.take(u64::from(header.size)).read_to_end(&mut body)?;
        let found = body.len();
        if found < expected {
            return Err(LoadError::TruncatedProgram { expected, found });
        }

        debug!(bytes = expected, "read program body");
        Ok(Program::from_parts(header, body))
    }

    /// Read a header and its body.
    pub fn load<R: Read>(&self, reader: &mut R) -> Result<Program, LoadError> {
        let header = self.read_header(reader)?;
        self.read_program(header, reader)
    }

    /// Load from an in-memory binary. Trailing bytes after the body are ignored.
    pub fn load_bytes(&self, mut bytes: &[u8]) -> Result<Program, LoadError> {
        self.load(&mut bytes)
    }
}

/// Fill `buf` as far as the reader allows; returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, LoadError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
