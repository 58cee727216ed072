//! Byte and integer readers backing INPUT and INPUT_INT.

use std::io::{self, BufRead};

use ibssbi_common::Word;

/// Read a single byte. `Ok(None)` at end of input.
pub(crate) fn read_byte<R: BufRead>(input: &mut R) -> io::Result<Option<u8>> {
    let byte = peek_byte(input)?;
    if byte.is_some() {
        input.consume(1);
    }
    Ok(byte)
}

/// Read a decimal integer the way `scanf("%zu")` does: skip leading
/// whitespace, accept one optional sign, then consume digits. The first
/// non-digit is left on the stream. Values wrap to the word width and a
/// leading `-` negates modulo 2^bits.
///
/// `Ok(None)` if no digits were found.
pub(crate) fn read_integer<R: BufRead>(input: &mut R) -> io::Result<Option<Word>> {
    while let Some(b) = peek_byte(input)? {
        if !b.is_ascii_whitespace() {
            break;
        }
        input.consume(1);
    }

    let negative = match peek_byte(input)? {
        Some(b'-') => {
            input.consume(1);
            true
        }
        Some(b'+') => {
            input.consume(1);
            false
        }
        _ => false,
    };

    let mut value: Word = 0;
    let mut digits = 0usize;
    while let Some(b) = peek_byte(input)? {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.wrapping_mul(10).wrapping_add((b - b'0') as Word);
        digits += 1;
        input.consume(1);
    }

    if digits == 0 {
        return Ok(None);
    }
    Ok(Some(if negative { value.wrapping_neg() } else { value }))
}

fn peek_byte<R: BufRead>(input: &mut R) -> io::Result<Option<u8>> {
    loop {
        match input.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
