//! Line/column positions and offset conversion.

use text_size::{TextRange, TextSize};

/// A position in source code (0-indexed line, 0-indexed character column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A span representing a range in source code (0-indexed for LSP compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a span from line/column coordinates
    pub fn from_coords(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// Check if a position falls within this span
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Maps byte offsets to line/column pairs and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line.
    line_starts: Vec<TextSize>,
    text: std::sync::Arc<str>,
}

impl LineIndex {
    pub fn new(text: impl Into<std::sync::Arc<str>>) -> Self {
        let text = text.into();
        let mut line_starts = vec![TextSize::new(0)];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(idx as u32 + 1));
            }
        }
        Self { line_starts, text }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a line/column position.
    ///
    /// Offsets past the end of the text clamp to the last position.
    pub fn position(&self, offset: TextSize) -> Position {
        let offset = offset.min(TextSize::of(&*self.text));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let prefix = &self.text[usize::from(start)..usize::from(offset)];
        Position::new(line as u32, prefix.chars().count() as u32)
    }

    /// Convert a line/column position into a byte offset.
    ///
    /// Returns `None` when the line does not exist. Columns past the end of
    /// the line clamp to the line end.
    pub fn offset(&self, position: Position) -> Option<TextSize> {
        let start = *self.line_starts.get(position.line as usize)?;
        let end = self
            .line_starts
            .get(position.line as usize + 1)
            .copied()
            .unwrap_or_else(|| TextSize::of(&*self.text));
        let line_text = &self.text[usize::from(start)..usize::from(end)];
        let mut offset = start;
        for (col, ch) in line_text.chars().enumerate() {
            if col as u32 == position.column || ch == '\n' {
                return Some(offset);
            }
            offset += TextSize::of(ch);
        }
        Some(offset)
    }

    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.position(range.start()), self.position(range.end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_roundtrip_on_multiline_text() {
        let index = LineIndex::new("fun a() {}\nfun b() {}\n");
        let pos = index.position(TextSize::new(15));
        assert_eq!(pos, Position::new(1, 4));
        assert_eq!(index.offset(pos), Some(TextSize::new(15)));
    }

    #[test]
    fn test_offset_clamps_column_to_line_end() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.offset(Position::new(0, 10)), Some(TextSize::new(2)));
        assert_eq!(index.offset(Position::new(1, 10)), Some(TextSize::new(5)));
        assert_eq!(index.offset(Position::new(5, 0)), None);
    }

    #[test]
    fn test_columns_count_characters() {
        let index = LineIndex::new("// é\nx");
        assert_eq!(index.position(TextSize::new(5)), Position::new(0, 4));
    }

    #[test]
    fn test_span_contains() {
        let span = Span::from_coords(1, 2, 1, 6);
        assert!(span.contains(Position::new(1, 4)));
        assert!(!span.contains(Position::new(2, 0)));
    }
}
