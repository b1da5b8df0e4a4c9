//! The pattern algebra and its matcher.
//!
//! A [`Pattern`] is a pure, `'static`, heap-free value: composition happens
//! through `const` arrays of `Pattern` assembled once at compile time, so
//! there is no runtime "compile step" building a DFA or other derived
//! structure — matching walks the `const` tree directly.

use crate::charclass::{classify_byte, CharClass};

/// A 256-bit set of bytes, built at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSet([u64; 4]);

impl ByteSet {
    pub const EMPTY: Self = Self([0; 4]);

    #[inline]
    pub const fn with(mut self, b: u8) -> Self {
        let idx = (b >> 6) as usize;
        let bit = b & 0x3f;
        self.0[idx] |= 1u64 << bit;
        self
    }

    pub const fn from_bytes(bytes: &[u8]) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < bytes.len() {
            set = set.with(bytes[i]);
            i += 1;
        }
        set
    }

    pub const fn from_range(lo: u8, hi: u8) -> Self {
        let mut set = Self::EMPTY;
        let mut b = lo as u16;
        while b <= hi as u16 {
            set = set.with(b as u8);
            b += 1;
        }
        set
    }

    #[inline]
    pub const fn contains(&self, b: u8) -> bool {
        let idx = (b >> 6) as usize;
        let bit = b & 0x3f;
        (self.0[idx] >> bit) & 1 == 1
    }

    /// Returns the set's members when it has three or fewer, for the bulk
    /// scanner's `memchr`/`memchr2`/`memchr3` fast path (see `scanner.rs`).
    pub(crate) fn small_members(&self) -> Option<([u8; 3], usize)> {
        let mut out = [0u8; 3];
        let mut n = 0;
        for b in 0u16..=255 {
            if self.contains(b as u8) {
                if n == 3 {
                    return None;
                }
                out[n] = b as u8;
                n += 1;
            }
        }
        Some((out, n))
    }
}

/// A class reference usable in [`Pattern::Class`].
///
/// `CharClass` itself is a closed, disjoint partition; `Alpha` is
/// the one derived pseudo-class this crate names (`alpha = alpha_lower ∪
/// alpha_upper`), so it gets its own variant here rather than living in the
/// partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSpec {
    Exact(CharClass),
    Alpha,
}

impl ClassSpec {
    #[inline]
    const fn matches(self, c: CharClass) -> bool {
        match self {
            ClassSpec::Exact(e) => matches_class(e, c),
            ClassSpec::Alpha => c.is_alpha(),
        }
    }
}

const fn matches_class(a: CharClass, b: CharClass) -> bool {
    // CharClass has no derived PartialEq usable in const fn position before
    // 1.46-era const matching; compare by discriminant via `matches!`.
    match (a, b) {
        (CharClass::Other, CharClass::Other) => true,
        (CharClass::Whitespace, CharClass::Whitespace) => true,
        (CharClass::Newline, CharClass::Newline) => true,
        (CharClass::Digit, CharClass::Digit) => true,
        (CharClass::AlphaLower, CharClass::AlphaLower) => true,
        (CharClass::AlphaUpper, CharClass::AlphaUpper) => true,
        (CharClass::Punct, CharClass::Punct) => true,
        (CharClass::Control, CharClass::Control) => true,
        _ => false,
    }
}

/// The recursive pattern algebra.
///
/// Every variant is `Copy` and either holds inline data or a `'static`
/// reference into `const` storage, so a `Pattern` tree never allocates and
/// never needs a destructor.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Literal(&'static [u8]),
    Class(ClassSpec),
    AnyOf(ByteSet),
    Range(u8, u8),
    Any,
    Seq(&'static [Pattern]),
    Alt(&'static [Pattern]),
    Rep {
        min: usize,
        max: Option<usize>,
        inner: &'static Pattern,
    },
}

/// The result of attempting to match a [`Pattern`] at an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    pub len: usize,
}

impl MatchResult {
    const FAIL: Self = Self {
        matched: false,
        len: 0,
    };

    #[inline]
    const fn ok(len: usize) -> Self {
        Self { matched: true, len }
    }
}

/// Error returned by [`Pattern::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern can match zero bytes, which is forbidden for a named token pattern")]
    CanMatchEmpty,
}

impl Pattern {
    /// Sugar for `Rep { min: 1, max: None, inner: p }`.
    pub const fn one_or_more(p: &'static Pattern) -> Pattern {
        Pattern::Rep {
            min: 1,
            max: None,
            inner: p,
        }
    }

    /// Sugar for `Rep { min: 0, max: None, inner: p }`.
    pub const fn zero_or_more(p: &'static Pattern) -> Pattern {
        Pattern::Rep {
            min: 0,
            max: None,
            inner: p,
        }
    }

    /// Sugar for `Rep { min: 0, max: Some(1), inner: p }`.
    pub const fn optional(p: &'static Pattern) -> Pattern {
        Pattern::Rep {
            min: 0,
            max: Some(1),
            inner: p,
        }
    }

    /// Sugar for `Seq(parts)`: match `parts` in order, concatenated.
    pub const fn then(parts: &'static [Pattern]) -> Pattern {
        Pattern::Seq(parts)
    }

    /// Whether this pattern can match zero bytes at some offset.
    ///
    /// `Rep { min: 0, .. }` is nullable by construction (the whole point of
    /// "zero or more"); that is fine nested inside a `Seq` that also has a
    /// mandatory part, but is rejected by [`Pattern::validate`] when it is
    /// the *entire* pattern bound to a token name, since a named pattern
    /// with `len == 0` would never let the tokenizer make progress.
    pub const fn can_match_empty(&self) -> bool {
        match self {
            Pattern::Literal(s) => s.is_empty(),
            Pattern::Class(_) | Pattern::AnyOf(_) | Pattern::Range(..) | Pattern::Any => false,
            Pattern::Seq(list) => {
                let mut i = 0;
                while i < list.len() {
                    if !list[i].can_match_empty() {
                        return false;
                    }
                    i += 1;
                }
                true
            }
            Pattern::Alt(list) => {
                let mut i = 0;
                while i < list.len() {
                    if list[i].can_match_empty() {
                        return true;
                    }
                    i += 1;
                }
                false
            }
            Pattern::Rep { min, inner, .. } => *min == 0 || inner.can_match_empty(),
        }
    }

    /// Reject patterns that can match zero bytes. Call this on every pattern
    /// bound to a token name before it is used for matching.
    pub const fn validate(&self) -> Result<(), PatternError> {
        if self.can_match_empty() {
            Err(PatternError::CanMatchEmpty)
        } else {
            Ok(())
        }
    }

    /// An upper bound on the number of bytes this pattern can consume, or
    /// `None` if it is unbounded (an unbounded `Rep`). Used by the streaming
    /// tokenizer to decide how much lookahead to buffer before matching.
    pub const fn bounded_len(&self) -> Option<usize> {
        match self {
            Pattern::Literal(s) => Some(s.len()),
            Pattern::Class(_) | Pattern::AnyOf(_) | Pattern::Range(..) | Pattern::Any => Some(1),
            Pattern::Seq(parts) => {
                let mut total = 0;
                let mut i = 0;
                while i < parts.len() {
                    match parts[i].bounded_len() {
                        Some(n) => total += n,
                        None => return None,
                    }
                    i += 1;
                }
                Some(total)
            }
            Pattern::Alt(alts) => {
                let mut max = 0;
                let mut i = 0;
                while i < alts.len() {
                    match alts[i].bounded_len() {
                        Some(n) => {
                            if n > max {
                                max = n;
                            }
                        }
                        None => return None,
                    }
                    i += 1;
                }
                Some(max)
            }
            Pattern::Rep {
                max: Some(max),
                inner,
                ..
            } => match inner.bounded_len() {
                Some(n) => Some(n * *max),
                None => None,
            },
            Pattern::Rep { max: None, .. } => None,
        }
    }
}

/// Match `pattern` against `input` starting at `offset`.
///
/// Total over every `(pattern, input, offset)` triple, including
/// `offset >= input.len()`: never panics, never allocates.
pub fn match_pattern(pattern: &Pattern, input: &[u8], offset: usize) -> MatchResult {
    match pattern {
        Pattern::Literal(s) => {
            if offset + s.len() <= input.len() && &input[offset..offset + s.len()] == *s {
                MatchResult::ok(s.len())
            } else {
                MatchResult::FAIL
            }
        }
        Pattern::Class(spec) => match input.get(offset) {
            Some(&b) if spec.matches(classify_byte(b)) => MatchResult::ok(1),
            _ => MatchResult::FAIL,
        },
        Pattern::AnyOf(set) => match input.get(offset) {
            Some(&b) if set.contains(b) => MatchResult::ok(1),
            _ => MatchResult::FAIL,
        },
        Pattern::Range(lo, hi) => match input.get(offset) {
            Some(&b) if *lo <= b && b <= *hi => MatchResult::ok(1),
            _ => MatchResult::FAIL,
        },
        Pattern::Any => {
            if offset < input.len() {
                MatchResult::ok(1)
            } else {
                MatchResult::FAIL
            }
        }
        Pattern::Seq(parts) => {
            let mut total = 0;
            for part in *parts {
                let r = match_pattern(part, input, offset + total);
                if !r.matched {
                    return MatchResult::FAIL;
                }
                total += r.len;
            }
            MatchResult::ok(total)
        }
        Pattern::Alt(alts) => {
            for alt in *alts {
                let r = match_pattern(alt, input, offset);
                if r.matched {
                    return r;
                }
            }
            MatchResult::FAIL
        }
        Pattern::Rep { min, max, inner } => {
            let mut count = 0;
            let mut total = 0;
            loop {
                if let Some(max) = max {
                    if count >= *max {
                        break;
                    }
                }
                let r = match_pattern(inner, input, offset + total);
                if !r.matched || r.len == 0 {
                    break;
                }
                total += r.len;
                count += 1;
            }
            if count >= *min {
                MatchResult::ok(total)
            } else {
                MatchResult::FAIL
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const DIGIT: Pattern = Pattern::Class(ClassSpec::Exact(CharClass::Digit));
    const DIGITS: Pattern = Pattern::one_or_more(&DIGIT);
    const WS: Pattern = Pattern::Class(ClassSpec::Exact(CharClass::Whitespace));
    const MAYBE_MINUS: Pattern = Pattern::optional(&Pattern::Literal(b"-"));

    #[test_case(b"123abc", 0, true, 3; "digits then alpha")]
    #[test_case(b"abc", 0, false, 0; "no digits")]
    #[test_case(b"", 0, false, 0; "empty input")]
    fn digit_run(input: &[u8], offset: usize, matched: bool, len: usize) {
        let r = match_pattern(&DIGITS, input, offset);
        assert_eq!(r, MatchResult { matched, len });
    }

    #[test]
    fn literal_exact_and_oob() {
        assert_eq!(
            match_pattern(&Pattern::Literal(b"foo"), b"foobar", 0),
            MatchResult::ok(3)
        );
        assert_eq!(
            match_pattern(&Pattern::Literal(b"foo"), b"fo", 0),
            MatchResult::FAIL
        );
        assert_eq!(
            match_pattern(&Pattern::Literal(b"foo"), b"foobar", 10),
            MatchResult::FAIL
        );
    }

    #[test]
    fn alt_is_first_match_wins_not_longest() {
        const SHORT: Pattern = Pattern::Literal(b"a");
        const LONG: Pattern = Pattern::Literal(b"ab");
        const ALT: Pattern = Pattern::Alt(&[SHORT, LONG]);
        // SHORT is declared first and matches, so ALT takes it even though
        // LONG would have matched more input.
        assert_eq!(match_pattern(&ALT, b"ab", 0), MatchResult::ok(1));
    }

    #[test]
    fn seq_fails_atomically() {
        const SEQ: Pattern = Pattern::Seq(&[Pattern::Literal(b"a"), Pattern::Literal(b"b")]);
        assert_eq!(match_pattern(&SEQ, b"ac", 0), MatchResult::FAIL);
    }

    #[test]
    fn rep_zero_or_more_allows_zero_length() {
        const STARS: Pattern = Pattern::zero_or_more(&Pattern::Literal(b"*"));
        assert_eq!(match_pattern(&STARS, b"abc", 0), MatchResult::ok(0));
    }

    #[test]
    fn can_match_empty_rules() {
        assert!(!DIGITS.can_match_empty());
        assert!(Pattern::zero_or_more(&DIGIT).can_match_empty());
        assert!(!Pattern::Seq(&[MAYBE_MINUS, DIGITS]).can_match_empty());
        assert!(Pattern::Seq(&[MAYBE_MINUS, Pattern::zero_or_more(&WS)]).can_match_empty());
    }

    #[test]
    fn validate_rejects_nullable_top_level_pattern() {
        assert!(Pattern::zero_or_more(&WS).validate().is_err());
        assert!(DIGITS.validate().is_ok());
    }

    #[test]
    fn deterministic_across_calls() {
        const P: Pattern = Pattern::Seq(&[DIGITS, WS]);
        let a = match_pattern(&P, b"42 ", 0);
        let b = match_pattern(&P, b"42 ", 0);
        assert_eq!(a, b);
    }
}
