//! The token matcher interface and the built-in matcher that
//! wraps the pattern algebra.

use crate::arena::TokenArena;
use crate::pattern::{match_pattern, Pattern, PatternError};
use crate::position::Position;
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatcherError {
    #[error("matcher failed to make progress at a non-end offset")]
    NoProgress,
}

/// A pluggable token recognizer bound to a numeric `token_id`, for matchers
/// outside the pattern algebra.
///
/// `try_match` either returns `None` (no match, no state change — matchers
/// must be idempotent on failure) or a token advancing past `offset` by its
/// `text.len()`. The returned token's `position` is a placeholder
/// (`Position::default()`); the driver that owns absolute line/column
/// tracking overwrites it before handing the token onward, since a matcher
/// operating on a bare buffer view has no way to know it.
pub trait TokenMatcher {
    fn token_id(&self) -> u32;

    fn try_match<'b>(
        &self,
        buffer_view: &'b [u8],
        offset: usize,
        arena: &'b mut TokenArena,
    ) -> Result<Option<Token<'b>>, MatcherError>;
}

/// The built-in matcher: wraps a single named [`Pattern`] from the algebra.
#[derive(Debug, Clone, Copy)]
pub struct PatternMatcher {
    pub id: u32,
    pub pattern: &'static Pattern,
}

impl PatternMatcher {
    pub fn new(id: u32, pattern: &'static Pattern) -> Result<Self, PatternError> {
        pattern.validate()?;
        Ok(Self { id, pattern })
    }
}

impl TokenMatcher for PatternMatcher {
    fn token_id(&self) -> u32 {
        self.id
    }

    fn try_match<'b>(
        &self,
        buffer_view: &'b [u8],
        offset: usize,
        _arena: &'b mut TokenArena,
    ) -> Result<Option<Token<'b>>, MatcherError> {
        let r = match_pattern(self.pattern, buffer_view, offset);
        if r.matched && r.len > 0 {
            Ok(Some(Token::new(
                self.id,
                &buffer_view[offset..offset + r.len],
                Position::default(),
            )))
        } else {
            Ok(None)
        }
    }
}
