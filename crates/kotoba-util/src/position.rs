//! Source positions and ranges tracked in Unicode scalar values.
//!
//! Unlike a byte-offset `Span`, every field here counts Unicode scalar
//! values (`char`s), never UTF-8 bytes. `\r\n` counts as a single line
//! break; lines and columns are 1-based, the scalar offset is 0-based.

use std::fmt;

/// A single point in source text: line, column, and scalar offset.
///
/// `line` and `column` are 1-based. `offset` is the 0-based count of
/// Unicode scalar values preceding this position from the start of the
/// (already-normalized) source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl SourcePosition {
    /// The position at the very start of a source: line 1, column 1, offset 0.
    pub const START: SourcePosition = SourcePosition {
        line: 1,
        column: 1,
        offset: 0,
    };

    pub const fn new(line: u32, column: u32, offset: usize) -> Self {
        SourcePosition {
            line,
            column,
            offset,
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        SourcePosition::START
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range `[start, end)` of source positions.
///
/// `start == end` denotes a "point range" (used for zero-width markers such
/// as an assumed-missing-token diagnostic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceRange {
    pub const fn new(start: SourcePosition, end: SourcePosition) -> Self {
        SourceRange { start, end }
    }

    /// A zero-width range at a single position.
    pub const fn point(pos: SourcePosition) -> Self {
        SourceRange {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of scalar values spanned by this range.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Smallest range covering both `self` and `other`.
    pub fn merge(&self, other: &SourceRange) -> SourceRange {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };
        SourceRange { start, end }
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start.offset && offset < self.end.offset
    }

    /// Whether this range overlaps or is immediately adjacent to `other`,
    /// used when computing incremental re-lex affected ranges.
    pub fn touches(&self, other: &SourceRange) -> bool {
        self.start.offset <= other.end.offset && other.start.offset <= self.end.offset
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Incrementally advances a `SourcePosition` as scalars are consumed.
///
/// Recomputing line/column by scanning from the start of the source on
/// every token would be quadratic; a tracker instead folds each consumed
/// scalar into the current position once, as the scanner moves forward.
#[derive(Debug, Clone, Copy)]
pub struct PositionTracker {
    current: SourcePosition,
    /// Set after a `\r` so a following `\n` is swallowed as one line break.
    pending_cr: bool,
}

impl PositionTracker {
    pub fn new() -> Self {
        PositionTracker {
            current: SourcePosition::START,
            pending_cr: false,
        }
    }

    pub fn at(position: SourcePosition) -> Self {
        PositionTracker {
            current: position,
            pending_cr: false,
        }
    }

    pub fn position(&self) -> SourcePosition {
        self.current
    }

    /// Folds one scalar value into the tracked position. `\r\n` is treated
    /// as a single line break: the `\r` advances the line, and the
    /// following `\n` is absorbed without incrementing the line again.
    pub fn advance(&mut self, ch: char) {
        self.current.offset += 1;
        match ch {
            '\n' if self.pending_cr => {
                self.pending_cr = false;
                self.current.column = 1;
            }
            '\n' => {
                self.current.line += 1;
                self.current.column = 1;
            }
            '\r' => {
                self.pending_cr = true;
                self.current.line += 1;
                self.current.column = 1;
            }
            _ => {
                self.pending_cr = false;
                self.current.column += 1;
            }
        }
    }

    /// Folds an entire slice into the tracked position, scalar by scalar.
    pub fn advance_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.advance(ch);
        }
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        PositionTracker::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_one_one_zero() {
        assert_eq!(SourcePosition::START, SourcePosition::new(1, 1, 0));
    }

    #[test]
    fn advances_column_on_plain_text() {
        let mut tracker = PositionTracker::new();
        tracker.advance_str("abc");
        assert_eq!(tracker.position(), SourcePosition::new(1, 4, 3));
    }

    #[test]
    fn newline_resets_column_and_bumps_line() {
        let mut tracker = PositionTracker::new();
        tracker.advance_str("ab\ncd");
        assert_eq!(tracker.position(), SourcePosition::new(2, 3, 5));
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let mut tracker = PositionTracker::new();
        tracker.advance_str("ab\r\ncd");
        assert_eq!(tracker.position(), SourcePosition::new(2, 3, 6));
    }

    #[test]
    fn lone_cr_also_breaks_a_line() {
        let mut tracker = PositionTracker::new();
        tracker.advance_str("ab\rcd");
        assert_eq!(tracker.position(), SourcePosition::new(2, 3, 5));
    }

    #[test]
    fn counts_scalars_not_bytes_for_multibyte_text() {
        let mut tracker = PositionTracker::new();
        tracker.advance_str("整数型");
        assert_eq!(tracker.position(), SourcePosition::new(1, 4, 3));
    }

    #[test]
    fn range_merge_takes_widest_bounds() {
        let a = SourceRange::new(SourcePosition::new(1, 1, 0), SourcePosition::new(1, 3, 2));
        let b = SourceRange::new(SourcePosition::new(1, 2, 1), SourcePosition::new(1, 5, 4));
        let merged = a.merge(&b);
        assert_eq!(merged.start.offset, 0);
        assert_eq!(merged.end.offset, 4);
    }

    #[test]
    fn point_range_is_empty() {
        let p = SourcePosition::new(1, 1, 0);
        assert!(SourceRange::point(p).is_empty());
    }
}
