//! Error aggregation and grouping.
//!
//! A single lexical failure routinely produces a run of downstream syntax
//! errors as the parser resynchronizes token by token. The aggregator groups
//! those into one [`ErrorGroup`] so a consumer reports "one real problem"
//! instead of a wall of noise.

use crate::error::{ErrorCode, ErrorContext};

/// Maximum line distance between two errors for them to be considered part
/// of the same cascade, absent a known-cascade rule that says otherwise.
pub const DEFAULT_MAX_LINE_DISTANCE: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorGroup {
    pub primary: ErrorContext,
    pub related: Vec<ErrorContext>,
}

impl ErrorGroup {
    pub fn len(&self) -> usize {
        1 + self.related.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Specific code pairs known to cascade: the first routinely produces a run
/// of the second during resynchronization, even across categories that
/// otherwise wouldn't be considered related.
const KNOWN_CASCADES: &[(ErrorCode, ErrorCode)] = &[
    (ErrorCode::UnexpectedToken, ErrorCode::MissingToken),
    (ErrorCode::UnterminatedString, ErrorCode::UnexpectedToken),
    (ErrorCode::UnbalancedDelimiter, ErrorCode::UnexpectedToken),
    (ErrorCode::UnbalancedDelimiter, ErrorCode::MissingToken),
];

fn is_known_cascade(primary: ErrorCode, candidate: ErrorCode) -> bool {
    KNOWN_CASCADES.iter().any(|&(from, to)| from == primary && to == candidate)
}

/// Groups a flat, position-ordered error list into cascades.
///
/// `errors` must already be sorted by `position.offset` ascending (the order
/// the parser discovers them in); this does not re-sort.
pub struct Aggregator {
    max_line_distance: u32,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            max_line_distance: DEFAULT_MAX_LINE_DISTANCE,
        }
    }

    pub fn with_max_line_distance(mut self, max_line_distance: u32) -> Self {
        self.max_line_distance = max_line_distance;
        self
    }

    pub fn group(&self, errors: Vec<ErrorContext>) -> Vec<ErrorGroup> {
        let mut groups: Vec<ErrorGroup> = Vec::new();
        for err in errors {
            let target = groups.iter().position(|g| {
                let p = &g.primary;
                let line_gap = err.position.line.abs_diff(p.position.line);
                if line_gap > self.max_line_distance {
                    return false;
                }
                let same_category = err.code.category() == p.code.category();
                let adjacent = line_gap <= 1;
                let cascades = is_known_cascade(p.code, err.code);
                same_category || adjacent || cascades
            });

            match target {
                Some(idx) => groups[idx].related.push(err),
                None => groups.push(ErrorGroup {
                    primary: err,
                    related: Vec::new(),
                }),
            }
        }
        groups
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
