//! The zero-allocation, in-memory token stream.

use crate::pattern::{match_pattern, Pattern, PatternError};
use crate::position::Position;
use crate::scanner::skip_whitespace;
use crate::token::Token;

/// A named entry in a pattern set: a stable numeric id, a human-readable
/// name (used only by diagnostics), and the pattern itself.
#[derive(Debug, Clone, Copy)]
pub struct NamedPattern {
    pub id: u32,
    pub name: &'static str,
    pub pattern: &'static Pattern,
}

fn validate_all(patterns: &[NamedPattern]) -> Result<(), PatternError> {
    for np in patterns {
        np.pattern.validate()?;
    }
    Ok(())
}

/// A zero-allocation iterator over a `&[u8]` producing borrowed [`Token`]s.
///
/// Two independently constructed variants exist, matching this crate exactly:
/// [`MemTokenStream::skip_aware`] skips whitespace before every match attempt
/// so it never surfaces as a token, while [`MemTokenStream::explicit`] treats
/// whitespace as just another pattern the caller must list. The two never
/// share behavior at runtime — `skip_aware` is a `const` flag set once at
/// construction, not a per-call choice.
#[derive(Debug, Clone)]
pub struct MemTokenStream<'a> {
    source: &'a [u8],
    pos: usize,
    position: Position,
    patterns: &'static [NamedPattern],
    skip_aware: bool,
}

impl<'a> MemTokenStream<'a> {
    /// Whitespace (`CharClass::Whitespace ∪ CharClass::Newline`) is skipped
    /// before every match attempt and never appears as a token.
    pub fn skip_aware(
        source: &'a [u8],
        patterns: &'static [NamedPattern],
    ) -> Result<Self, PatternError> {
        validate_all(patterns)?;
        Ok(Self {
            source,
            pos: 0,
            position: Position::START,
            patterns,
            skip_aware: true,
        })
    }

    /// Whitespace is not special-cased; if the caller wants it filtered out,
    /// it must be one of `patterns` and the caller filters by `kind`.
    pub fn explicit(
        source: &'a [u8],
        patterns: &'static [NamedPattern],
    ) -> Result<Self, PatternError> {
        validate_all(patterns)?;
        Ok(Self {
            source,
            pos: 0,
            position: Position::START,
            patterns,
            skip_aware: false,
        })
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.source[self.pos..]
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    fn skip_ws_if_needed(&mut self) {
        if self.skip_aware {
            let new_pos = skip_whitespace(self.source, self.pos);
            if new_pos > self.pos {
                self.position.advance_bytes(&self.source[self.pos..new_pos]);
                self.pos = new_pos;
            }
        }
    }

    /// Returns the next token, or `None` if the input is exhausted or no
    /// pattern matches at the current position (forward-progress policy is
    /// left to the caller).
    pub fn next(&mut self) -> Option<Token<'a>> {
        self.skip_ws_if_needed();
        if self.is_at_end() {
            return None;
        }
        for np in self.patterns {
            let r = match_pattern(np.pattern, self.source, self.pos);
            if r.matched && r.len > 0 {
                let start = self.pos;
                let text = &self.source[start..start + r.len];
                let start_position = self.position;
                self.position.advance_bytes(text);
                self.pos += r.len;
                return Some(Token::new(np.id, text, start_position));
            }
        }
        None
    }

    /// Returns what `next` would return, without mutating state.
    pub fn peek(&self) -> Option<Token<'a>> {
        self.clone().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charclass::CharClass;
    use crate::pattern::ClassSpec;

    const WORD: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Alpha));
    const NUMBER: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(
        CharClass::Digit,
    )));
    const WS: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(
        CharClass::Whitespace,
    )));

    const SKIP_PATTERNS: &[NamedPattern] = &[
        NamedPattern {
            id: 1,
            name: "word",
            pattern: &WORD,
        },
        NamedPattern {
            id: 2,
            name: "number",
            pattern: &NUMBER,
        },
    ];

    const EXPLICIT_PATTERNS: &[NamedPattern] = &[
        NamedPattern {
            id: 1,
            name: "word",
            pattern: &WORD,
        },
        NamedPattern {
            id: 3,
            name: "ws",
            pattern: &WS,
        },
        NamedPattern {
            id: 2,
            name: "number",
            pattern: &NUMBER,
        },
    ];

    #[test]
    fn s1_word_number_stream_skip_aware() {
        let mut stream = MemTokenStream::skip_aware(b"hello 123 world", SKIP_PATTERNS).unwrap();
        let t1 = stream.next().unwrap();
        assert_eq!((t1.kind, t1.text), (1, &b"hello"[..]));
        let t2 = stream.next().unwrap();
        assert_eq!((t2.kind, t2.text), (2, &b"123"[..]));
        let t3 = stream.next().unwrap();
        assert_eq!((t3.kind, t3.text), (1, &b"world"[..]));
        assert!(stream.next().is_none());
        assert!(stream.is_at_end());
    }

    #[test]
    fn s2_explicit_whitespace_is_a_token() {
        let mut stream = MemTokenStream::explicit(b"hello 123 world", EXPLICIT_PATTERNS).unwrap();
        let kinds: Vec<(u32, &[u8])> = std::iter::from_fn(|| stream.next())
            .map(|t| (t.kind, t.text))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (1, &b"hello"[..]),
                (3, &b" "[..]),
                (2, &b"123"[..]),
                (3, &b" "[..]),
                (1, &b"world"[..]),
            ]
        );
    }

    #[test]
    fn peek_is_idempotent() {
        let stream = MemTokenStream::skip_aware(b"hello 123", SKIP_PATTERNS).unwrap();
        let a = stream.peek();
        let b = stream.peek();
        assert_eq!(a, b);
    }

    #[test]
    fn position_monotonicity_and_validity() {
        let mut stream = MemTokenStream::skip_aware(b"aa bb cc", SKIP_PATTERNS).unwrap();
        let mut last_offset = None;
        while let Some(t) = stream.next() {
            assert!(t.position.offset as usize + t.text.len() <= 8);
            if let Some(prev) = last_offset {
                assert!(t.position.offset > prev);
            }
            last_offset = Some(t.position.offset);
        }
    }

    #[test]
    fn constructing_with_nullable_pattern_is_rejected() {
        const NULLABLE: Pattern = Pattern::zero_or_more(&Pattern::Literal(b"*"));
        static BAD: &[NamedPattern] = &[NamedPattern {
            id: 1,
            name: "stars",
            pattern: &NULLABLE,
        }];
        assert!(MemTokenStream::skip_aware(b"***", BAD).is_err());
    }
}
