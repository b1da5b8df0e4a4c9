//! The incremental ring/linear buffer.
//!
//! A contiguous byte store with a live `[start, end)` window inside a
//! capacity region, grown by a factor of 1.5 and compacted opportunistically
//! once the consumed prefix crosses `compact_threshold` of capacity.

use crate::position::Position;

/// Growth factor applied when the buffer must grow to satisfy an `append`.
const GROWTH_FACTOR_NUM: usize = 3;
const GROWTH_FACTOR_DEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("buffer would exceed max capacity {max} (requested {requested} live bytes)")]
    BufferOverflow { max: usize, requested: usize },
    #[error("reset is only supported for memory-backed buffers")]
    ResetUnsupported,
}

/// Point-in-time counters for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferStats {
    pub capacity: usize,
    pub live: usize,
    pub consumed_total: u64,
    pub compactions: u64,
    pub growths: u64,
    pub peak_capacity: usize,
}

/// A bounded, growable byte buffer tracking a read cursor's position.
#[derive(Debug, Clone)]
pub struct IncrementalBuffer {
    data: Vec<u8>,
    start: usize,
    end: usize,
    max_capacity: usize,
    compact_threshold: f64,
    position: Position,
    memory_backed: bool,
    memory_len: usize,
    consumed_total: u64,
    compactions: u64,
    growths: u64,
    peak_capacity: usize,
}

impl IncrementalBuffer {
    /// A growable buffer fed incrementally via `append`, intended for
    /// streaming sources. `reset` is unsupported for this variant.
    pub fn streaming(initial_capacity: usize, max_capacity: usize, compact_threshold: f64) -> Self {
        Self {
            data: vec![0u8; initial_capacity],
            start: 0,
            end: 0,
            max_capacity,
            compact_threshold,
            position: Position::START,
            memory_backed: false,
            memory_len: 0,
            consumed_total: 0,
            compactions: 0,
            growths: 0,
            peak_capacity: initial_capacity,
        }
    }

    /// A buffer pre-filled from a complete in-memory source. `reset`
    /// re-points the cursor at offset 0 of that same source.
    pub fn memory(source: &[u8]) -> Self {
        Self {
            data: source.to_vec(),
            start: 0,
            end: source.len(),
            max_capacity: source.len(),
            compact_threshold: 0.25,
            position: Position::START,
            memory_backed: true,
            memory_len: source.len(),
            consumed_total: 0,
            compactions: 0,
            growths: 0,
            peak_capacity: source.len(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn live_len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn live(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    /// Absolute index of the live window's start within the backing store.
    /// Stable across `consume`/`consume_n` (which only move `start`), but
    /// invalidated by `compact`/`append`/`reserve_free_mut` (which may move
    /// bytes or grow the store) — callers must read this only to index
    /// `raw()` before any such call happens.
    #[inline]
    pub fn live_start_index(&self) -> usize {
        self.start
    }

    /// The full backing store, including bytes already consumed below
    /// `start`. Only indices fixed via `live_start_index` taken before the
    /// most recent `consume`/`consume_n` remain valid to read here.
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    pub fn peek_at(&self, k: usize) -> Option<u8> {
        if self.start + k < self.end {
            Some(self.data[self.start + k])
        } else {
            None
        }
    }

    /// Consume and return one byte, advancing the tracked position.
    pub fn consume(&mut self) -> Option<u8> {
        if self.start >= self.end {
            return None;
        }
        let b = self.data[self.start];
        self.start += 1;
        self.position.advance(b);
        self.consumed_total += 1;
        Some(b)
    }

    /// Consume `n` bytes at once (the streaming tokenizer's token-advance
    /// path); panics if fewer than `n` bytes are live, since callers only
    /// ever pass the length of a match already confirmed against `live()`.
    pub fn consume_n(&mut self, n: usize) {
        assert!(n <= self.live_len(), "consume_n past live region");
        let bytes = &self.data[self.start..self.start + n];
        self.position.advance_bytes(bytes);
        self.start += n;
        self.consumed_total += n as u64;
    }

    /// Move `[start, end)` down to `[0, end - start)`.
    pub fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        self.data.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
        self.compactions += 1;
    }

    /// Valid only for memory-backed buffers; re-points into the original
    /// source at offset 0.
    pub fn reset(&mut self) -> Result<(), BufferError> {
        if !self.memory_backed {
            return Err(BufferError::ResetUnsupported);
        }
        self.start = 0;
        self.end = self.memory_len;
        self.position = Position::START;
        Ok(())
    }

    fn maybe_compact_opportunistically(&mut self) {
        if self.capacity() == 0 {
            return;
        }
        if self.start as f64 / self.capacity() as f64 >= self.compact_threshold {
            self.compact();
        }
    }

    /// Ensure at least `additional` bytes of contiguous free space exist at
    /// the tail, compacting and/or growing as needed.
    fn reserve(&mut self, additional: usize) -> Result<(), BufferError> {
        self.maybe_compact_opportunistically();

        if self.data.len() - self.end >= additional {
            return Ok(());
        }

        let live = self.live_len();
        let needed = live + additional;
        if self.data.len() - self.start >= needed {
            // Compacting alone frees enough contiguous room.
            self.compact();
            return Ok(());
        }

        if needed > self.max_capacity {
            return Err(BufferError::BufferOverflow {
                max: self.max_capacity,
                requested: needed,
            });
        }

        let mut new_capacity = self.data.len().max(1);
        while new_capacity < needed {
            new_capacity = (new_capacity * GROWTH_FACTOR_NUM).div_ceil(GROWTH_FACTOR_DEN);
        }
        new_capacity = new_capacity.min(self.max_capacity).max(needed);

        self.compact();
        self.data.resize(new_capacity, 0);
        self.growths += 1;
        self.peak_capacity = self.peak_capacity.max(new_capacity);
        Ok(())
    }

    /// Copy `bytes` into the buffer, compacting/growing as needed.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.reserve(bytes.len())?;
        self.data[self.end..self.end + bytes.len()].copy_from_slice(bytes);
        self.end += bytes.len();
        Ok(())
    }

    /// Mutable access to the free region at the tail, for sources that write
    /// directly into the buffer (the streaming tokenizer's `fill`).
    pub fn reserve_free_mut(&mut self, additional: usize) -> Result<&mut [u8], BufferError> {
        self.reserve(additional)?;
        Ok(&mut self.data[self.end..])
    }

    /// Record that `n` bytes were written into the slice returned by the
    /// preceding `reserve_free_mut`.
    pub fn commit(&mut self, n: usize) {
        self.end += n;
    }

    pub fn stats(&self) -> BufferStats {
        BufferStats {
            capacity: self.capacity(),
            live: self.live_len(),
            consumed_total: self.consumed_total,
            compactions: self.compactions,
            growths: self.growths,
            peak_capacity: self.peak_capacity,
        }
    }
}
