//! Source-snippet rendering for reported errors.
//!
//! Renders the offending line with a caret under the error's column, writing
//! to any `core::fmt::Write` sink so callers aren't forced through
//! `std::io` (the `kit` facade or a `no_std`-adjacent embedder can supply
//! their own).

use core::fmt::{self, Write};

use crate::error::ErrorContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualizerConfig {
    pub color: bool,
    /// Lines of unaffected source printed before and after the error line.
    pub context_lines: usize,
    /// Error (and context) lines longer than this are right-truncated with
    /// an ellipsis; the caret column is remapped to stay under the right
    /// byte once truncated.
    pub max_line_length: usize,
    /// Character used for the marker row under the reported column.
    pub marker_char: char,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            color: false,
            context_lines: 0,
            max_line_length: usize::MAX,
            marker_char: '^',
        }
    }
}

const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Right-truncates `line` to `max_len` bytes, appending `...`, and remaps a
/// 1-indexed column into the truncated line's coordinate space. A column
/// that falls past the kept window is clamped to sit right after the
/// ellipsis rather than pointing past the end of the printed text.
fn truncate_line(line: &str, col: usize, max_len: usize) -> (String, usize) {
    if max_len == 0 || line.len() <= max_len {
        return (line.to_string(), col);
    }
    const ELLIPSIS: &str = "...";
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut truncated = String::from_utf8_lossy(&line.as_bytes()[..keep]).into_owned();
    truncated.push_str(ELLIPSIS);
    let clamped_col = col.min(keep + 1);
    (truncated, clamped_col)
}

/// Render one error as a source snippet with a marker under its column.
///
/// `source` is the full original input; `error.position.line`/`.column` are
/// 1-indexed, matching [`crate::position::Position`].
pub fn render(out: &mut impl Write, source: &str, error: &ErrorContext, config: VisualizerConfig) -> fmt::Result {
    let lines: Vec<&str> = source.split('\n').collect();
    let error_idx = (error.position.line.saturating_sub(1) as usize).min(lines.len().saturating_sub(1));
    let col = error.position.column.max(1) as usize;
    let raw_line = lines.get(error_idx).copied().unwrap_or("");
    let (rendered_line, marker_col) = truncate_line(raw_line, col, config.max_line_length);

    if config.color {
        writeln!(out, "{BOLD}{RED}error[{}]{RESET}: {}", error.code, error.message)?;
    } else {
        writeln!(out, "error[{}]: {}", error.code, error.message)?;
    }
    writeln!(out, "  --> {}:{}", error.position.line, error.position.column)?;
    writeln!(out, "   |")?;

    let before_start = error_idx.saturating_sub(config.context_lines);
    for (offset, l) in lines[before_start..error_idx].iter().enumerate() {
        writeln!(out, "{:>3}| {l}", before_start + offset + 1)?;
    }

    if config.color {
        writeln!(out, "{:>3}| {RED}{rendered_line}{RESET}", error.position.line)?;
    } else {
        writeln!(out, "{:>3}| {rendered_line}", error.position.line)?;
    }
    write!(out, "   | ")?;
    for _ in 1..marker_col {
        write!(out, " ")?;
    }
    if config.color {
        writeln!(out, "{RED}{}{RESET}", config.marker_char)?;
    } else {
        writeln!(out, "{}", config.marker_char)?;
    }

    let after_end = (error_idx + 1 + config.context_lines).min(lines.len());
    for (offset, l) in lines[(error_idx + 1).min(lines.len())..after_end].iter().enumerate() {
        writeln!(out, "{:>3}| {l}", error_idx + 2 + offset)?;
    }

    if let Some(hint) = &error.recovery_hint {
        writeln!(out, "   = help: {hint}")?;
    }
    Ok(())
}

/// Render a whole group : the primary error in full, related
/// errors summarized as one line each so a cascade doesn't repeat the same
/// snippet machinery dozens of times.
pub fn render_group(
    out: &mut impl Write,
    source: &str,
    group: &crate::aggregator::ErrorGroup,
    config: VisualizerConfig,
) -> fmt::Result {
    render(out, source, &group.primary, config)?;
    for related in &group.related {
        writeln!(
            out,
            "   = note: and {} at {}:{}",
            related.code, related.position.line, related.position.column
        )?;
    }
    Ok(())
}
