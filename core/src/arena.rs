//! The token arena.
//!
//! A linear allocator with fixed capacity, reset between consumer-defined
//! checkpoints (typically between top-level records). Kept as a standalone
//! object the caller owns — mirroring this crate's token matcher interface,
//! which threads an `arena: &Arena` parameter through rather than letting the
//! tokenizer own it — so arena-backed tokens' lifetime is independent of the
//! tokenizer's own `&mut self` borrow and can survive across several
//! `next_token` calls (the "lookahead by n tokens" case this crate calls out).

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("token arena exhausted: used {used} + requested {requested} > capacity {capacity}")]
pub struct ArenaOutOfMemory {
    pub used: usize,
    pub requested: usize,
    pub capacity: usize,
}

/// A linear (bump) allocator of fixed capacity, storing byte copies of
/// token text that must outlive the buffer region they were copied from.
#[derive(Debug, Clone)]
pub struct TokenArena {
    data: Vec<u8>,
    used: usize,
    capacity: usize,
}

impl TokenArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            used: 0,
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Reset the arena to empty. Checkpoint boundary is the caller's call.
    pub fn reset(&mut self) {
        self.used = 0;
        self.data.clear();
    }

    /// Copy `bytes` into the arena, returning a slice borrowed from it.
    pub fn alloc_copy(&mut self, bytes: &[u8]) -> Result<&[u8], ArenaOutOfMemory> {
        if self.used + bytes.len() > self.capacity {
            return Err(ArenaOutOfMemory {
                used: self.used,
                requested: bytes.len(),
                capacity: self.capacity,
            });
        }
        let start = self.used;
        self.data.extend_from_slice(bytes);
        self.used += bytes.len();
        Ok(&self.data[start..self.used])
    }
}
