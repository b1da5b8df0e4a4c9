//! Source positions.

/// A location in the source byte stream.
///
/// Columns reset to 1 after a `\n`. A bare `\r` just advances the column;
/// because only `\n` increments `line`, a `\r\n` pair naturally counts as a
/// single line break without any special-casing here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub offset: u64,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };

    #[inline]
    pub const fn new() -> Self {
        Self::START
    }

    /// Advance past a single consumed byte.
    #[inline]
    pub fn advance(&mut self, byte: u8) {
        self.offset += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Advance past a consumed slice, byte by byte.
    #[inline]
    pub fn advance_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.advance(b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_counts_as_one_break() {
        let mut pos = Position::START;
        pos.advance_bytes(b"ab\r\ncd");
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 3);
        assert_eq!(pos.offset, 6);
    }

    #[test]
    fn bare_cr_advances_column() {
        let mut pos = Position::START;
        pos.advance_bytes(b"a\rb");
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 4);
    }

    #[test]
    fn column_resets_after_newline() {
        let mut pos = Position::START;
        pos.advance_bytes(b"abc\ndef");
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 4);
    }
}
