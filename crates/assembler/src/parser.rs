//! Parser for ibssbi assembly tokens → instructions.
//!
//! Each line holds any number of label definitions followed by at most one
//! instruction. Label references are kept symbolic here and resolved once
//! every label's offset is known.

use std::collections::HashMap;

use crate::error::AsmError;
use crate::lexer::Token;
use ibssbi_common::{Instruction, Opcode, Word};

/// Immediate operand before label resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    Value(Word),
    Label(String),
}

/// An instruction whose operand may still name a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pending {
    pub opcode: Opcode,
    pub operand: Option<Operand>,
    pub line: usize,
}

/// Result of parsing a single assembly line.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedLine {
    pub labels: Vec<String>,
    pub instruction: Option<Pending>,
}

/// Parse the tokens of one line.
pub(crate) fn parse_line(tokens: &[Token], line_num: usize) -> Result<ParsedLine, AsmError> {
    let mut parsed = ParsedLine::default();

    let mut rest = tokens;
    while let [Token::Label(name), tail @ ..] = rest {
        parsed.labels.push(name.clone());
        rest = tail;
    }

    let (head, args) = match rest.split_first() {
        Some(split) => split,
        None => return Ok(parsed),
    };

    let mnemonic = match head {
        Token::Ident(s) => s,
        other => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: other.to_string(),
            })
        }
    };

    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.clone(),
    })?;

    let operand = if opcode.has_immediate() {
        let operand = match args.first() {
            Some(Token::Number(n)) => Operand::Value(*n),
            Some(Token::Ident(name)) => Operand::Label(name.clone()),
            Some(other) => {
                return Err(AsmError::UnexpectedToken {
                    line: line_num,
                    token: other.to_string(),
                })
            }
            None => {
                return Err(AsmError::MissingOperand {
                    line: line_num,
                    opcode: opcode.mnemonic(),
                })
            }
        };
        expect_end(&args[1..], line_num)?;
        Some(operand)
    } else {
        if let Some(extra) = args.first() {
            return Err(AsmError::OperandNotAllowed {
                line: line_num,
                opcode: opcode.mnemonic(),
                token: extra.to_string(),
            });
        }
        None
    };

    parsed.instruction = Some(Pending {
        opcode,
        operand,
        line: line_num,
    });
    Ok(parsed)
}

fn expect_end(args: &[Token], line: usize) -> Result<(), AsmError> {
    match args.first() {
        Some(extra) => Err(AsmError::UnexpectedToken {
            line,
            token: extra.to_string(),
        }),
        None => Ok(()),
    }
}

/// Label name → (byte offset, defining line).
#[derive(Debug, Default)]
pub(crate) struct SymbolTable {
    labels: HashMap<String, (Word, usize)>,
}

impl SymbolTable {
    pub fn define(&mut self, name: String, offset: Word, line: usize) -> Result<(), AsmError> {
        if let Some(&(_, first)) = self.labels.get(&name) {
            return Err(AsmError::DuplicateLabel {
                line,
                label: name,
                first,
            });
        }
        self.labels.insert(name, (offset, line));
        Ok(())
    }

    pub fn resolve(&self, name: &str, line: usize) -> Result<Word, AsmError> {
        self.labels
            .get(name)
            .map(|&(offset, _)| offset)
            .ok_or_else(|| AsmError::UndefinedLabel {
                line,
                label: name.to_string(),
            })
    }
}

impl Pending {
    /// Substitute label offsets and build the final instruction.
    pub fn resolve(self, symbols: &SymbolTable) -> Result<Instruction, AsmError> {
        Ok(match self.operand {
            None => Instruction::simple(self.opcode),
            Some(Operand::Value(v)) => Instruction::with_immediate(self.opcode, v),
            Some(Operand::Label(name)) => {
                let target = symbols.resolve(&name, self.line)?;
                Instruction::with_immediate(self.opcode, target)
            }
        })
    }
}
