//! Line-indexed view of a UTF-8 buffer with UTF-16 aware conversions.

use std::sync::Arc;

/// One line of the table: where it starts and where its content ends.
///
/// The span `start..content_end` is the line's content slice. The line
/// terminator (`\n` or `\r\n`), if any, occupies `content_end..` up to the
/// next line's start and is attributed to this line for offset purposes,
/// but it never contributes to the line's column count.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LineEntry {
    /// UTF-8 byte offset of the first byte of the line.
    start: usize,
    /// UTF-8 byte offset of the line terminator (or end of text).
    content_end: usize,
}

/// Indexed sequence of line slices over an immutable text buffer.
///
/// Line indices are 0-based. Columns are 0-based UTF-16 code-unit indices,
/// so astral-plane scalars consume two columns. A column equal to the
/// line's UTF-16 length is the valid end-of-line position.
#[derive(Debug, Clone, PartialEq)]
pub struct LineTable {
    text: Arc<str>,
    lines: Vec<LineEntry>,
}

impl LineTable {
    /// Build a table over `text`. `\n` and `\r\n` both count as a single
    /// line terminator; a possibly-empty final line follows the last one.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let bytes = text.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0usize;
        let mut i = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    lines.push(LineEntry { start, content_end: i });
                    i += 1;
                    start = i;
                }
                b'\r' => {
                    let content_end = i;
                    i += 1;
                    if i < bytes.len() && bytes[i] == b'\n' {
                        i += 1;
                    }
                    lines.push(LineEntry { start, content_end });
                    start = i;
                }
                _ => i += 1,
            }
        }
        // Final line, possibly empty.
        lines.push(LineEntry { start, content_end: bytes.len() });
        Self { text, lines }
    }

    /// The underlying text buffer.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines, counting the possibly-empty final line.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Content slice of `line` without its terminator.
    pub fn line_content(&self, line: u32) -> Option<&str> {
        let entry = self.lines.get(line as usize)?;
        Some(&self.text[entry.start..entry.content_end])
    }

    /// UTF-8 byte offset of the first byte of `line`.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        Some(self.lines.get(line as usize)?.start)
    }

    /// Convert `(line, UTF-16 column)` to a UTF-8 byte offset.
    ///
    /// Returns `None` if the line does not exist, the column is past the
    /// end of the line, or the column falls between the two code units of
    /// a surrogate pair.
    pub fn utf8_offset(&self, line: u32, utf16_column: u32) -> Option<usize> {
        let entry = self.lines.get(line as usize)?;
        let content = &self.text[entry.start..entry.content_end];
        let target = utf16_column as usize;
        let mut units = 0usize;
        for (byte, ch) in content.char_indices() {
            if units == target {
                return Some(entry.start + byte);
            }
            units += ch.len_utf16();
            if units > target {
                // Column addresses the trailing surrogate of `ch`.
                return None;
            }
        }
        (units == target).then_some(entry.content_end)
    }

    /// Convert a UTF-8 byte offset to `(line, UTF-16 column)`.
    ///
    /// Offsets inside a line terminator map to the end-of-line column of
    /// the preceding line. Returns `None` for offsets past the end of the
    /// buffer or not on a scalar boundary.
    pub fn line_and_utf16_column(&self, utf8_offset: usize) -> Option<(u32, u32)> {
        if utf8_offset > self.text.len() || !self.text.is_char_boundary(utf8_offset) {
            return None;
        }
        let line = self
            .lines
            .binary_search_by_key(&utf8_offset, |entry| entry.start)
            .unwrap_or_else(|insert| insert - 1);
        let entry = self.lines[line];
        // Terminator bytes do not add columns past the terminator start.
        let in_line = utf8_offset.min(entry.content_end) - entry.start;
        let column = self.utf16_column(line as u32, in_line)?;
        Some((line as u32, column))
    }

    /// Convert a UTF-8 column within `line` to a UTF-16 column.
    ///
    /// `utf8_column` is a byte count from the line start; it must land on a
    /// scalar boundary within the line's content (its end included).
    pub fn utf16_column(&self, line: u32, utf8_column: usize) -> Option<u32> {
        let entry = self.lines.get(line as usize)?;
        let content = &self.text[entry.start..entry.content_end];
        let prefix = content.get(..utf8_column)?;
        Some(prefix.chars().map(char::len_utf16).sum::<usize>() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn indexes_lines_with_mixed_terminators() {
        let table = LineTable::new("one\ntwo\r\nthree\rfour");
        assert_eq!(table.line_count(), 4);
        assert_eq!(table.line_content(0), Some("one"));
        assert_eq!(table.line_content(1), Some("two"));
        assert_eq!(table.line_content(2), Some("three"));
        assert_eq!(table.line_content(3), Some("four"));
        assert_eq!(table.line_start(3), Some(15));
    }

    #[test]
    fn trailing_newline_yields_empty_final_line() {
        let table = LineTable::new("abc\n");
        assert_eq!(table.line_count(), 2);
        assert_eq!(table.line_content(1), Some(""));
        assert_eq!(table.utf8_offset(1, 0), Some(4));
    }

    #[test]
    fn utf8_offset_counts_utf16_units() {
        // '😀' is four UTF-8 bytes and two UTF-16 code units.
        let table = LineTable::new("a😀b");
        assert_eq!(table.utf8_offset(0, 0), Some(0));
        assert_eq!(table.utf8_offset(0, 1), Some(1));
        assert_eq!(table.utf8_offset(0, 3), Some(5));
        assert_eq!(table.utf8_offset(0, 4), Some(6));
    }

    #[test]
    fn mid_surrogate_column_is_absent() {
        let table = LineTable::new("😀");
        assert_eq!(table.utf8_offset(0, 1), None);
    }

    #[test]
    fn end_of_line_column_is_valid() {
        let table = LineTable::new("ab\ncd");
        assert_eq!(table.utf8_offset(0, 2), Some(2));
        assert_eq!(table.utf8_offset(0, 3), None);
        assert_eq!(table.utf8_offset(9, 0), None);
    }

    #[test]
    fn offsets_inside_terminator_map_to_line_end() {
        let table = LineTable::new("ab\r\ncd");
        assert_eq!(table.line_and_utf16_column(2), Some((0, 2)));
        assert_eq!(table.line_and_utf16_column(3), Some((0, 2)));
        assert_eq!(table.line_and_utf16_column(4), Some((1, 0)));
        assert_eq!(table.line_and_utf16_column(6), Some((1, 2)));
        assert_eq!(table.line_and_utf16_column(7), None);
    }

    #[test]
    fn mid_scalar_offset_is_absent() {
        let table = LineTable::new("😀x");
        assert_eq!(table.line_and_utf16_column(2), None);
        assert_eq!(table.line_and_utf16_column(4), Some((0, 2)));
    }

    #[test]
    fn utf16_column_requires_scalar_boundary() {
        let table = LineTable::new("é!");
        assert_eq!(table.utf16_column(0, 0), Some(0));
        assert_eq!(table.utf16_column(0, 1), None);
        assert_eq!(table.utf16_column(0, 2), Some(1));
    }

    proptest! {
        // position -> offset -> position is the identity on valid positions.
        #[test]
        fn position_round_trips_through_offsets(text in "\\PC{0,80}(\n\\PC{0,40}){0,4}") {
            let table = LineTable::new(text.as_str());
            for line in 0..table.line_count() as u32 {
                let content = table.line_content(line).map(str::to_owned).unwrap_or_default();
                let utf16_len: usize = content.chars().map(char::len_utf16).sum();
                for column in 0..=utf16_len as u32 {
                    if let Some(offset) = table.utf8_offset(line, column) {
                        prop_assert_eq!(table.line_and_utf16_column(offset), Some((line, column)));
                    }
                }
            }
        }
    }
}
