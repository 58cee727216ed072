//! Fixed-capacity evaluation stack of untyped words.

use ibssbi_common::Word;
use thiserror::Error;

/// Capacity violations. The VM attaches the failing program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("stack overflow (capacity {capacity})")]
    Overflow { capacity: usize },

    #[error("stack underflow")]
    Underflow,
}

/// A stack that never grows past the capacity it was created with.
///
/// `len()` plays the role of the stack pointer: it is the index of the next
/// free slot and always satisfies `0 <= len() <= capacity()`.
#[derive(Debug, Clone)]
pub struct Stack {
    slots: Vec<Word>,
    capacity: usize,
}

impl Stack {
    /// Slots are allocated as values are pushed, so `capacity` is only a
    /// limit.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, value: Word) -> Result<(), StackError> {
        if self.slots.len() >= self.capacity {
            return Err(StackError::Overflow {
                capacity: self.capacity,
            });
        }
        self.slots.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Word, StackError> {
        self.slots.pop().ok_or(StackError::Underflow)
    }

    /// Top of stack without removing it.
    pub fn peek(&self) -> Option<Word> {
        self.slots.last().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Contents from bottom to top.
    pub fn as_slice(&self) -> &[Word] {
        &self.slots
    }
}
