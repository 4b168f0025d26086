//! Offset to line/column mapping and node range helpers.
//!
//! Offsets are byte offsets into the UTF-8 source text. Lines are 1-indexed
//! and columns 0-indexed, matching ESTree `loc` objects.

use serde::Serialize;
use swc_common::{BytePos, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

/// Half-open `[start, end)` offset pair, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range(pub u32, pub u32);

impl Range {
    pub fn new(start: u32, end: u32) -> Self {
        Self(start, end.max(start))
    }

    pub fn start(&self) -> u32 {
        self.0
    }

    pub fn end(&self) -> u32 {
        self.1
    }

    pub fn contains(&self, other: &Range) -> bool {
        self.0 <= other.0 && self.1 >= other.1
    }

    pub fn cover(&self, other: &Range) -> Range {
        Range(self.0.min(other.0), self.1.max(other.1))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == self.1
    }
}

/// Line-start table of a source text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i as u32 + 1);
                }
                b'\n' => line_starts.push(i as u32 + 1),
                // U+2028 and U+2029 are encoded as E2 80 A8 / E2 80 A9.
                0xE2 if bytes.get(i + 1).copied() == Some(0x80)
                    && matches!(bytes.get(i + 2).copied(), Some(0xA8 | 0xA9)) =>
                {
                    i += 2;
                    line_starts.push(i as u32 + 1);
                }
                _ => {}
            }
            i += 1;
        }

        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_and_column_for(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        Position {
            line: line + 1,
            column: (offset - self.line_starts[line]) as usize,
        }
    }

    pub fn loc_for(&self, start: u32, end: u32) -> SourceLocation {
        SourceLocation {
            start: self.line_and_column_for(start),
            end: self.line_and_column_for(end),
        }
    }
}

/// Source text of one file together with the position base swc assigned to it.
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    text: &'a str,
    base: u32,
    lines: LineIndex,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str, base: BytePos) -> Self {
        Self {
            text,
            base: base.0,
            lines: LineIndex::new(text),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// Converts an absolute swc position into an offset within this file.
    pub fn offset(&self, pos: BytePos) -> u32 {
        pos.0.saturating_sub(self.base).min(self.len())
    }

    pub fn range_of(&self, span: Span) -> Range {
        Range::new(self.offset(span.lo), self.offset(span.hi))
    }

    pub fn loc_of(&self, range: Range) -> SourceLocation {
        self.lines.loc_for(range.0, range.1)
    }

    pub fn slice(&self, range: Range) -> &'a str {
        self.text
            .get(range.0 as usize..range.1 as usize)
            .unwrap_or_default()
    }

    pub fn slice_span(&self, span: Span) -> &'a str {
        self.slice(self.range_of(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_offset_is_line_one_column_zero() {
        let index = LineIndex::new("abc");
        assert_eq!(index.line_and_column_for(0), Position { line: 1, column: 0 });
    }

    #[test]
    fn offsets_after_newline_start_next_line() {
        let index = LineIndex::new("ab\ncd\nef");
        assert_eq!(index.line_and_column_for(3), Position { line: 2, column: 0 });
        assert_eq!(index.line_and_column_for(7), Position { line: 3, column: 1 });
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let index = LineIndex::new("a\r\nb\rc");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_and_column_for(3), Position { line: 2, column: 0 });
        assert_eq!(index.line_and_column_for(5), Position { line: 3, column: 0 });
    }

    #[test]
    fn unicode_line_separators_break_lines() {
        let index = LineIndex::new("a\u{2028}b");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_and_column_for(4), Position { line: 2, column: 0 });
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let index = LineIndex::new("ab");
        assert_eq!(index.line_and_column_for(99), Position { line: 1, column: 2 });
    }

    #[test]
    fn loc_for_composes_two_positions() {
        let index = LineIndex::new("let x;\nlet y;");
        let loc = index.loc_for(4, 12);
        assert_eq!(loc.start, Position { line: 1, column: 4 });
        assert_eq!(loc.end, Position { line: 2, column: 5 });
    }

    #[test]
    fn range_of_subtracts_file_base() {
        let source = SourceText::new("const a = 1;", BytePos(1));
        let span = Span::new(BytePos(7), BytePos(8));
        assert_eq!(source.range_of(span), Range(6, 7));
        assert_eq!(source.slice_span(span), "a");
    }

    #[test]
    fn range_cover_and_contains() {
        let outer = Range(0, 10);
        assert!(outer.contains(&Range(2, 5)));
        assert!(!outer.contains(&Range(5, 12)));
        assert_eq!(outer.cover(&Range(5, 12)), Range(0, 12));
    }
}
