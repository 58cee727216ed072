//! Tokenizer for ibssbi assembly text.

use std::fmt;

use crate::error::AsmError;
use ibssbi_common::Word;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A label definition, written `name:`. Holds the name without the colon.
    Label(String),
    /// An identifier (opcode mnemonic or label reference), as written.
    Ident(String),
    /// A numeric or character literal, already converted to a word.
    Number(Word),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Label(name) => write!(f, "{name}:"),
            Token::Ident(name) => f.write_str(name),
            Token::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` and extend to end of line, except inside a
/// character literal.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();
    let mut rest = line;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with(';') {
            break;
        }
        let (word, tail) = if rest.starts_with('\'') {
            split_char_literal(rest)
        } else {
            split_word(rest)
        };
        tokens.push(classify(word, line_num)?);
        rest = tail;
    }

    Ok(tokens)
}

/// Split off everything up to whitespace or a comment.
fn split_word(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| c.is_whitespace() || c == ';')
        .unwrap_or(text.len());
    text.split_at(end)
}

/// Split off a quoted character literal, which may itself contain a space
/// or `;`. Malformed literals fall back to [`split_word`].
fn split_char_literal(text: &str) -> (&str, &str) {
    let mut chars = text.char_indices().skip(1);
    if let Some((_, '\\')) = chars.next() {
        chars.next();
    }
    match chars.next() {
        Some((i, '\'')) => text.split_at(i + 1),
        _ => split_word(text),
    }
}

fn classify(word: &str, line: usize) -> Result<Token, AsmError> {
    let invalid = || AsmError::InvalidNumber {
        line,
        token: word.to_string(),
    };
    let unexpected = || AsmError::UnexpectedToken {
        line,
        token: word.to_string(),
    };

    if word.starts_with('\'') {
        return parse_char(word).map(Token::Number).ok_or_else(invalid);
    }

    let first = word.chars().next().ok_or_else(unexpected)?;
    if first.is_ascii_digit() || first == '-' || first == '+' {
        return parse_number(word).map(Token::Number).ok_or_else(invalid);
    }

    match word.strip_suffix(':') {
        Some(name) if is_identifier(name) => Ok(Token::Label(name.to_string())),
        Some(_) => Err(unexpected()),
        None if is_identifier(word) => Ok(Token::Ident(word.to_string())),
        None => Err(unexpected()),
    }
}

/// Decimal, `0x` hex, or either with a leading `-` (negated modulo 2^bits).
fn parse_number(word: &str) -> Option<Word> {
    let (negative, digits) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word.strip_prefix('+').unwrap_or(word)),
    };

    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => Word::from_str_radix(hex, 16).ok()?,
        None if digits.bytes().all(|b| b.is_ascii_digit()) => digits.parse().ok()?,
        None => return None,
    };

    Some(if negative { value.wrapping_neg() } else { value })
}

/// `'a'`, `' '`, or one of the escapes `\n \t \r \0 \\ \'`.
fn parse_char(word: &str) -> Option<Word> {
    let inner = word.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let c = match chars.next()? {
        '\\' => match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            _ => return None,
        },
        c => c,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(c as Word)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '.')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
