//! The structured error model: a numeric [`ErrorCode`], a
//! [`Severity`], and an [`ErrorContext`] carrying enough detail (position,
//! offending text, expected set, FSM state) to render a source snippet or
//! group related failures without re-parsing.
//!
//! User-defined parsers built on this crate typically wrap [`ErrorContext`]
//! in their own domain error type rather than matching on it directly.

use core::fmt;

use crate::position::Position;

/// Numeric error codes grouped by category: the hundreds digit names the
/// phase a failure was detected in, mirroring how the aggregator groups
/// cascades by `code / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum ErrorCode {
    // 100s: lexical — the tokenizer/scanner could not classify input.
    UnrecognizedByte = 100,
    UnterminatedString = 101,
    PatternCanMatchEmpty = 102,

    // 200s: syntax — tokens didn't fit the grammar the FSM encodes.
    UnexpectedToken = 200,
    UnexpectedEndOfInput = 201,
    UnbalancedDelimiter = 202,
    MissingToken = 203,

    // 300s: semantic — well-formed input the consumer's domain rejects.
    DuplicateAttribute = 300,
    ValueOutOfRange = 301,

    // 400s: I/O — the byte source itself failed.
    SourceReadFailed = 400,

    // 900s: internal — invariant violations in this crate, not the input.
    BufferOverflow = 900,
    ArenaExhausted = 901,
    InternalInvariantViolation = 999,
}

impl ErrorCode {
    /// Stable lowercase identifier, for log fields and snapshot tests where
    /// the numeric value alone is too opaque to read.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::UnrecognizedByte => "unrecognized-byte",
            ErrorCode::UnterminatedString => "unterminated-string",
            ErrorCode::PatternCanMatchEmpty => "pattern-can-match-empty",
            ErrorCode::UnexpectedToken => "unexpected-token",
            ErrorCode::UnexpectedEndOfInput => "unexpected-end-of-input",
            ErrorCode::UnbalancedDelimiter => "unbalanced-delimiter",
            ErrorCode::MissingToken => "missing-token",
            ErrorCode::DuplicateAttribute => "duplicate-attribute",
            ErrorCode::ValueOutOfRange => "value-out-of-range",
            ErrorCode::SourceReadFailed => "source-read-failed",
            ErrorCode::BufferOverflow => "buffer-overflow",
            ErrorCode::ArenaExhausted => "arena-exhausted",
            ErrorCode::InternalInvariantViolation => "internal-invariant-violation",
        }
    }

    /// The hundreds-digit category, used by the aggregator to group related
    /// failures (a lexical error and the syntax errors it cascades into
    /// share no category, but two syntax errors do).
    pub const fn category(self) -> u32 {
        (self as u32) / 100
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (E{:04})", self.name(), *self as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

/// One reported failure, with everything the visualizer and aggregator need
/// downstream of the point where it was detected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub severity: Severity,
    pub position: Position,
    pub message: String,
    pub token_text: Option<String>,
    pub expected_ids: Option<Vec<u32>>,
    pub state_id: Option<u32>,
    pub recovery_hint: Option<String>,
}

impl ErrorContext {
    pub fn new(code: ErrorCode, severity: Severity, position: Position, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            position,
            message: message.into(),
            token_text: None,
            expected_ids: None,
            state_id: None,
            recovery_hint: None,
        }
    }

    pub fn with_token_text(mut self, text: impl Into<String>) -> Self {
        self.token_text = Some(text.into());
        self
    }

    pub fn with_expected_ids(mut self, ids: Vec<u32>) -> Self {
        self.expected_ids = Some(ids);
        self
    }

    pub fn with_state_id(mut self, state_id: u32) -> Self {
        self.state_id = Some(state_id);
        self
    }

    pub fn with_recovery_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} at {}:{}: {} [{}]",
            self.severity, self.position.line, self.position.column, self.message, self.code
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ErrorContext {}

/// Errors this crate's own operations raise directly (buffer/arena/pattern
/// failures folded into one type so callers can propagate a single error
/// with `?` through code that touches several of this crate's modules).
///
/// Downstream parsers generally convert this into their own error type via
/// `From<Error>` rather than matching on it, the way [`ErrorContext`] is
/// used for parse-time diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Buffer(#[from] crate::buffer::BufferError),
    #[error(transparent)]
    Pattern(#[from] crate::pattern::PatternError),
    #[error(transparent)]
    Arena(#[from] crate::arena::ArenaOutOfMemory),
    #[error(transparent)]
    Tokenize(#[from] crate::streaming::TokenizeError),
    #[error(transparent)]
    Fsm(#[from] crate::fsm::FsmError),
    #[error("{0}")]
    Parse(#[from] ErrorContext),
}
