//! Main execution loop and opcode dispatch for the ibssbi VM.

use std::io::{self, BufRead, Write};

use ibssbi_common::{Instruction, Opcode, Word};
use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::input::{read_byte, read_integer};
use crate::machine::VM;

/// Word pushed by INPUT once the input stream is exhausted.
pub const EOF_WORD: Word = Word::MAX;

impl<'a> VM<'a> {
    /// Execute the program until HALT or error.
    ///
    /// Output is flushed before returning, whether or not the run failed.
    pub fn execute<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), RuntimeError> {
        let mut result = Ok(());
        while self.running {
            if let Err(e) = self.step(input, output) {
                result = Err(e);
                break;
            }
        }

        let flushed = output.flush().map_err(|e| self.io_error(e));
        result.and(flushed)
    }

    /// Execute exactly one instruction. Does nothing once the VM has halted.
    ///
    /// On error the VM stops running and the program counter is left on the
    /// failing instruction.
    pub fn step<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), RuntimeError> {
        if !self.running {
            return Ok(());
        }

        let outcome = self.fetch().and_then(|instr| {
            trace!(
                pc = self.pc,
                op = instr.opcode.mnemonic(),
                depth = self.stack.len(),
                "step"
            );
            self.dispatch(instr, input, output)
        });

        match outcome {
            Ok(next) => {
                self.pc = next;
                self.steps += 1;
                Ok(())
            }
            Err(e) => {
                self.running = false;
                Err(e)
            }
        }
    }

    /// Run one instruction and return the program counter of its successor.
    fn dispatch<R: BufRead, W: Write>(
        &mut self,
        instr: Instruction,
        input: &mut R,
        output: &mut W,
    ) -> Result<usize, RuntimeError> {
        let next = self.pc + instr.width();
        let imm = instr.immediate.unwrap_or_default();

        match instr.opcode {
            // Stack manipulation
            Opcode::Push => self.push(imm)?,
            Opcode::Pop => {
                self.pop()?;
            }
            Opcode::Dup => self.exec_dup()?,
            Opcode::Swap => self.exec_swap()?,
            Opcode::Rot => self.exec_rot()?,

            // Arithmetic
            Opcode::Add => self.exec_binary(Word::wrapping_add)?,
            Opcode::Sub => self.exec_binary(Word::wrapping_sub)?,
            Opcode::Mult => self.exec_binary(Word::wrapping_mul)?,
            Opcode::Div => self.exec_checked(Word::checked_div)?,
            Opcode::Mod => self.exec_checked(Word::checked_rem)?,
            Opcode::Pow => self.exec_binary(pow)?,

            // Comparison
            Opcode::Eq => self.exec_comparison(|a, b| a == b)?,
            Opcode::Neq => self.exec_comparison(|a, b| a != b)?,
            Opcode::Lt => self.exec_comparison(|a, b| a < b)?,
            Opcode::Lte => self.exec_comparison(|a, b| a <= b)?,
            Opcode::Gt => self.exec_comparison(|a, b| a > b)?,
            Opcode::Gte => self.exec_comparison(|a, b| a >= b)?,

            // Logical
            Opcode::And => self.exec_comparison(|a, b| a != 0 && b != 0)?,
            Opcode::Or => self.exec_comparison(|a, b| a != 0 || b != 0)?,
            Opcode::Xor => self.exec_comparison(|a, b| (a != 0) != (b != 0))?,
            Opcode::Not => self.exec_unary(|a| (a == 0) as Word)?,

            // Bitwise
            Opcode::BitwiseAnd => self.exec_binary(|a, b| a & b)?,
            Opcode::BitwiseOr => self.exec_binary(|a, b| a | b)?,
            Opcode::BitwiseXor => self.exec_binary(|a, b| a ^ b)?,
            Opcode::BitwiseNot => self.exec_unary(|a| !a)?,
            Opcode::ShiftLeft => self.exec_binary(shift_left)?,
            Opcode::ShiftRight => self.exec_binary(shift_right)?,

            // Memory
            Opcode::Alloc => self.exec_alloc(imm)?,
            Opcode::Free => self.exec_free()?,
            Opcode::Sto => self.exec_store()?,
            Opcode::Ret => self.exec_load()?,

            // Control flow
            Opcode::Jmp => return Ok(imm),
            Opcode::JmpIfTrue => {
                if self.pop()? != 0 {
                    return Ok(imm);
                }
            }
            Opcode::JmpIfFalse => {
                if self.pop()? == 0 {
                    return Ok(imm);
                }
            }

            // I/O
            Opcode::Print => self.exec_print(output)?,
            Opcode::PrintInt => self.exec_print_int(output)?,
            Opcode::Input => self.exec_input(input, output)?,
            Opcode::InputInt => self.exec_input_int(input, output)?,

            Opcode::Halt => {
                self.running = false;
                debug!(pc = self.pc, steps = self.steps + 1, "halt");
                return Ok(self.pc);
            }
        }

        Ok(next)
    }

    // ---- Stack manipulation ----

    fn exec_dup(&mut self) -> Result<(), RuntimeError> {
        let v = self.pop()?;
        self.push(v)?;
        self.push(v)
    }

    fn exec_swap(&mut self) -> Result<(), RuntimeError> {
        let a = self.pop()?;
        let b = self.pop()?;
        self.push(a)?;
        self.push(b)
    }

    /// Bottom-to-top `A B C` becomes `B C A`.
    fn exec_rot(&mut self) -> Result<(), RuntimeError> {
        let c = self.pop()?;
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(b)?;
        self.push(c)?;
        self.push(a)
    }

    // ---- Arithmetic, comparison, logic ----

    /// Pop rhs, pop lhs, push `op(lhs, rhs)`.
    fn exec_binary(&mut self, op: fn(Word, Word) -> Word) -> Result<(), RuntimeError> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(op(lhs, rhs))
    }

    /// Like [`Self::exec_binary`], with `None` meaning a zero divisor.
    fn exec_checked(&mut self, op: fn(Word, Word) -> Option<Word>) -> Result<(), RuntimeError> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        let result = op(lhs, rhs).ok_or(RuntimeError::DivisionByZero { at: self.pc })?;
        self.push(result)
    }

    /// Pop rhs, pop lhs, push 1 if `op(lhs, rhs)` holds, else 0.
    fn exec_comparison(&mut self, op: fn(Word, Word) -> bool) -> Result<(), RuntimeError> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(op(lhs, rhs) as Word)
    }

    fn exec_unary(&mut self, op: fn(Word) -> Word) -> Result<(), RuntimeError> {
        let v = self.pop()?;
        self.push(op(v))
    }

    // ---- Memory ----

    fn exec_alloc(&mut self, words: Word) -> Result<(), RuntimeError> {
        let address = self.heap.alloc(words).map_err(|e| self.heap_error(e))?;
        self.push(address)
    }

    fn exec_free(&mut self) -> Result<(), RuntimeError> {
        let address = self.pop()?;
        self.heap.free(address).map_err(|e| self.heap_error(e))
    }

    fn exec_store(&mut self) -> Result<(), RuntimeError> {
        let value = self.pop()?;
        let address = self.pop()?;
        self.heap
            .store(address, value)
            .map_err(|e| self.heap_error(e))
    }

    fn exec_load(&mut self) -> Result<(), RuntimeError> {
        let address = self.pop()?;
        let value = self.heap.load(address).map_err(|e| self.heap_error(e))?;
        self.push(value)
    }

    // ---- I/O ----

    /// Writes the low byte only.
    fn exec_print<W: Write>(&mut self, output: &mut W) -> Result<(), RuntimeError> {
        let v = self.pop()?;
        output
            .write_all(&[v as u8])
            .map_err(|e| self.io_error(e))
    }

    fn exec_print_int<W: Write>(&mut self, output: &mut W) -> Result<(), RuntimeError> {
        let v = self.pop()?;
        writeln!(output, "{v}").map_err(|e| self.io_error(e))
    }

    fn exec_input<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), RuntimeError> {
        // Prompts written with PRINT must be visible before we block.
        output.flush().map_err(|e| self.io_error(e))?;
        let byte = read_byte(input).map_err(|e| self.io_error(e))?;
        self.push(byte.map_or(EOF_WORD, Word::from))
    }

    fn exec_input_int<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), RuntimeError> {
        output.flush().map_err(|e| self.io_error(e))?;
        let value = read_integer(input)
            .map_err(|e| self.io_error(e))?
            .ok_or(RuntimeError::InvalidInput { at: self.pc })?;
        self.push(value)
    }

    fn io_error(&self, err: io::Error) -> RuntimeError {
        RuntimeError::Io {
            at: self.pc,
            message: err.to_string(),
        }
    }
}

/// `lhs ^ rhs` in floating point, truncated (and saturated) back to a word.
fn pow(lhs: Word, rhs: Word) -> Word {
    (lhs as f64).powf(rhs as f64) as Word
}

/// Shifting by the word width or more clears every bit.
fn shift_left(value: Word, shift: Word) -> Word {
    u32::try_from(shift)
        .ok()
        .and_then(|s| value.checked_shl(s))
        .unwrap_or(0)
}

fn shift_right(value: Word, shift: Word) -> Word {
    u32::try_from(shift)
        .ok()
        .and_then(|s| value.checked_shr(s))
        .unwrap_or(0)
}
