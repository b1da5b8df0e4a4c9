//! The streaming tokenizer.
//!
//! Reads from a pull source into an [`IncrementalBuffer`], emitting tokens
//! whose text slices stay valid until the next `fill`/`compact` boundary.
//! Forward progress is guaranteed: when no pattern matches at the current
//! position but bytes remain, a single-byte `ERROR` token is emitted and the
//! buffer advances by one byte regardless.

use crate::arena::TokenArena;
use crate::buffer::{BufferError, IncrementalBuffer};
use crate::memstream::NamedPattern;
use crate::pattern::match_pattern;
use crate::position::Position;
use crate::token::{Token, ERROR_KIND};

/// Bytes come from a pull source: `read(dst) -> Ok(0)` signals end-of-stream.
pub trait ByteSource {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize, SourceError>;
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("source read failed: {0}")]
pub struct SourceError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Fallback lookahead (bytes) requested per `fill` when the pattern set
/// contains an unbounded repetition and so has no static bound.
const DEFAULT_LOOKAHEAD: usize = 4096;

fn max_lookahead(patterns: &[NamedPattern]) -> usize {
    let mut bound = 1usize;
    for np in patterns {
        match np.pattern.bounded_len() {
            Some(n) => bound = bound.max(n),
            None => return DEFAULT_LOOKAHEAD,
        }
    }
    bound
}

/// Reads from a [`ByteSource`] through an [`IncrementalBuffer`], producing
/// tokens whose `kind` is one of `patterns`' ids, filtering any whose id is
/// in `skip_set` before returning them.
pub struct StreamingTokenizer<S: ByteSource> {
    source: S,
    buffer: IncrementalBuffer,
    patterns: &'static [NamedPattern],
    skip_set: &'static [u32],
    lookahead: usize,
    exhausted: bool,
}

impl<S: ByteSource> StreamingTokenizer<S> {
    pub fn new(
        source: S,
        initial_capacity: usize,
        max_capacity: usize,
        compact_threshold: f64,
        patterns: &'static [NamedPattern],
        skip_set: &'static [u32],
    ) -> Result<Self, crate::pattern::PatternError> {
        for np in patterns {
            np.pattern.validate()?;
        }
        Ok(Self {
            source,
            buffer: IncrementalBuffer::streaming(initial_capacity, max_capacity, compact_threshold),
            patterns,
            skip_set,
            lookahead: max_lookahead(patterns),
            exhausted: false,
        })
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.buffer.position()
    }

    #[inline]
    pub fn stats(&self) -> crate::buffer::BufferStats {
        self.buffer.stats()
    }

    fn fill(&mut self) -> Result<(), TokenizeError> {
        while self.buffer.live_len() < self.lookahead && !self.exhausted {
            let chunk = self.lookahead.max(256);
            let dst = self.buffer.reserve_free_mut(chunk)?;
            let n = self.source.read(dst)?;
            if n == 0 {
                self.exhausted = true;
            } else {
                self.buffer.commit(n);
            }
        }
        Ok(())
    }

    fn is_skip(&self, kind: u32) -> bool {
        self.skip_set.contains(&kind)
    }

    /// Scans the live window for the longest-available first-match-wins
    /// token starting at its front, returning `(kind, len)`.
    fn scan_one(&self) -> Option<(u32, usize)> {
        let live = self.buffer.live();
        for np in self.patterns {
            let r = match_pattern(np.pattern, live, 0);
            if r.matched && r.len > 0 {
                return Some((np.id, r.len));
            }
        }
        None
    }

    /// Returns the next non-skipped token, or `None` at end of input.
    ///
    /// The returned `Token` borrows the tokenizer's buffer; the borrow
    /// checker ties its lifetime to this call, so it cannot be retained
    /// across the next call to `next_token` or `next_token_into`.
    pub fn next_token(&mut self) -> Result<Option<Token<'_>>, TokenizeError> {
        loop {
            self.fill()?;
            if self.buffer.live_len() == 0 {
                return Ok(None);
            }

            let start_position = self.buffer.position();
            let token_start = self.buffer.live_start_index();

            match self.scan_one() {
                Some((kind, len)) => {
                    self.buffer.consume_n(len);
                    if self.is_skip(kind) {
                        continue;
                    }
                    let text = &self.buffer.raw()[token_start..token_start + len];
                    return Ok(Some(Token::new(kind, text, start_position)));
                }
                None => {
                    self.buffer.consume_n(1);
                    let text = &self.buffer.raw()[token_start..token_start + 1];
                    return Ok(Some(Token::new(ERROR_KIND, text, start_position)));
                }
            }
        }
    }

    /// Copy matched token text into an externally owned [`TokenArena`],
    /// decoupling the returned token's lifetime from this tokenizer's `&mut
    /// self` borrow so several tokens can be held at once (the "lookahead by
    /// n tokens" case).
    pub fn next_token_into<'t>(
        &mut self,
        arena: &'t mut TokenArena,
    ) -> Result<Option<Token<'t>>, TokenizeError> {
        let (kind, bytes, position) = match self.next_token()? {
            Some(tok) => (tok.kind, tok.text.to_vec(), tok.position),
            None => return Ok(None),
        };
        let text = arena
            .alloc_copy(&bytes)
            .map_err(|e| BufferError::BufferOverflow {
                max: e.capacity,
                requested: e.requested,
            })?;
        Ok(Some(Token::new(kind, text, position)))
    }
}
