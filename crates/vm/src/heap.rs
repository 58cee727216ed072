//! Heap allocations addressed by stack words.
//!
//! Programs only ever see addresses. Each block is owned by the heap and
//! looked up by address on every access, so a stale or forged address is an
//! error rather than a wild read.
//!
//! Layout of the synthetic address space:
//! ```text
//! HEAP_BASE              base + n*W         next base
//! | word 0 | word 1 | ... | guard word |    | word 0 | ...
//! ```
//! Addresses inside a block step by `WORD_SIZE`, so `base + k * WORD_SIZE`
//! names word `k`. The guard word keeps one-past-the-end from landing in the
//! neighbouring block. Addresses are never reused.

use std::collections::BTreeMap;

use ibssbi_common::{Word, WORD_SIZE};
use thiserror::Error;
use tracing::debug;

/// First address handed out. Zero stays invalid so a cleared word is never
/// a live pointer.
pub const HEAP_BASE: Word = 0x1000;

/// Heap misuse. The VM attaches the failing program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("cannot allocate {requested} words ({available} available)")]
    Exhausted { requested: usize, available: usize },

    #[error("free of {address:#x}, which is not the start of a live block")]
    InvalidFree { address: Word },

    #[error("access to {address:#x}, which is not a word of a live block")]
    InvalidAccess { address: Word },
}

#[derive(Debug)]
pub struct Heap {
    blocks: BTreeMap<Word, Vec<Word>>,
    next: Word,
    max_words: usize,
    live_words: usize,
}

impl Heap {
    /// A heap that holds at most `max_words` live words at once.
    pub fn new(max_words: usize) -> Self {
        Self {
            blocks: BTreeMap::new(),
            next: HEAP_BASE,
            max_words,
            live_words: 0,
        }
    }

    /// Allocate `words` zeroed words and return the block's base address.
    pub fn alloc(&mut self, words: usize) -> Result<Word, HeapError> {
        let exhausted = HeapError::Exhausted {
            requested: words,
            available: self.max_words - self.live_words,
        };

        let total = self
            .live_words
            .checked_add(words)
            .filter(|&total| total <= self.max_words)
            .ok_or(exhausted)?;

        // One guard word after every block, and at least one word of span so
        // empty blocks still get distinct addresses.
        let span = (words.max(1) + 1)
            .checked_mul(WORD_SIZE)
            .ok_or(exhausted)?;
        let base = self.next;
        let next = base.checked_add(span).ok_or(exhausted)?;

        let mut block = Vec::new();
        block.try_reserve_exact(words).map_err(|_| exhausted)?;
        block.resize(words, 0);

        self.next = next;
        self.blocks.insert(base, block);
        self.live_words = total;
        debug!(address = base, words, "heap alloc");
        Ok(base)
    }

    /// Release the block starting at `address`.
    pub fn free(&mut self, address: Word) -> Result<(), HeapError> {
        let block = self
            .blocks
            .remove(&address)
            .ok_or(HeapError::InvalidFree { address })?;
        self.live_words -= block.len();
        debug!(address, words = block.len(), "heap free");
        Ok(())
    }

    pub fn load(&self, address: Word) -> Result<Word, HeapError> {
        let (base, index) = self.resolve(address)?;
        Ok(self.blocks[&base][index])
    }

    pub fn store(&mut self, address: Word, value: Word) -> Result<(), HeapError> {
        let (base, index) = self.resolve(address)?;
        let slot = self
            .blocks
            .get_mut(&base)
            .and_then(|block| block.get_mut(index))
            .ok_or(HeapError::InvalidAccess { address })?;
        *slot = value;
        Ok(())
    }

    /// Number of blocks not yet freed.
    pub fn live_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Total words held by live blocks.
    pub fn live_words(&self) -> usize {
        self.live_words
    }

    /// Map an address to its block base and word index.
    fn resolve(&self, address: Word) -> Result<(Word, usize), HeapError> {
        let invalid = HeapError::InvalidAccess { address };
        let (&base, block) = self.blocks.range(..=address).next_back().ok_or(invalid)?;

        let offset = address - base;
        if offset % WORD_SIZE != 0 {
            return Err(invalid);
        }
        let index = offset / WORD_SIZE;
        if index >= block.len() {
            return Err(invalid);
        }
        Ok((base, index))
    }
}
