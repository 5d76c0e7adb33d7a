//! Line storage and the text mutation primitives.
//!
//! The buffer owns the cursor alongside the lines so every primitive can keep
//! both consistent. Columns are grapheme indices; byte offsets never leak out
//! of this module.

use unicode_segmentation::UnicodeSegmentation;

use crate::traits::TextOps;
use crate::types::{Mode, Position};

#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Vec<String>,
    cursor: Position,
    // Bumped by every primitive that changes the text
    revision: u64,
}

impl Default for Buffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Position::ZERO,
            revision: 0,
        }
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines && self.cursor == other.cursor
    }
}

impl Eq for Buffer {}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty document is one empty line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buffer = Self::default();
        buffer.replace_lines(lines.into_iter().map(Into::into).collect());
        buffer
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Changes whenever the text does; equal revisions mean equal text.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Contents joined with newlines, without a trailing newline.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn set_cursor(&mut self, pos: Position, mode: Mode) {
        self.cursor = self.clamp(pos, mode);
    }

    pub fn clamp_cursor(&mut self, mode: Mode) {
        self.cursor = self.clamp(self.cursor, mode);
    }

    /// Swap in a whole new document, keeping the cursor in range.
    pub fn replace_lines(&mut self, lines: Vec<String>) {
        self.lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        self.touch();
        self.clamp_cursor(Mode::Insert);
    }

    fn current(&self) -> &str {
        &self.lines[self.cursor.line]
    }

    fn current_mut(&mut self) -> &mut String {
        &mut self.lines[self.cursor.line]
    }

    /// Insert `text` at the cursor and move past it.
    ///
    /// The new column is counted over the line, so a combining mark that
    /// joins the preceding grapheme does not advance the cursor.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = byte_index(self.current(), self.cursor.col);
        self.current_mut().insert_str(at, text);
        self.cursor.col = self.current()[..at + text.len()].graphemes(true).count();
        self.touch();
    }

    /// Backspace. At column 0 the line is joined onto the previous one.
    pub fn delete_before_cursor(&mut self) {
        let Position { line, col } = self.cursor;
        if col > 0 {
            let col = col.min(self.line_len(line));
            let start = byte_index(self.current(), col - 1);
            let end = byte_index(self.current(), col);
            self.current_mut().replace_range(start..end, "");
            self.cursor.col = col - 1;
            self.touch();
        } else if line > 0 {
            let removed = self.lines.remove(line);
            let prev_len = self.line_len(line - 1);
            self.lines[line - 1].push_str(&removed);
            self.cursor = Position::new(line - 1, prev_len);
            self.touch();
        }
    }

    /// Remove the grapheme under the cursor, if there is one.
    pub fn delete_under_cursor(&mut self) {
        let col = self.cursor.col;
        if col >= self.line_len(self.cursor.line) {
            return;
        }
        let start = byte_index(self.current(), col);
        let end = byte_index(self.current(), col + 1);
        self.current_mut().replace_range(start..end, "");
        self.touch();
    }

    /// Move the text right of the cursor onto a new line below.
    pub fn split_line(&mut self) {
        let at = byte_index(self.current(), self.cursor.col);
        let rest = self.current_mut().split_off(at);
        self.lines.insert(self.cursor.line + 1, rest);
        self.cursor = Position::new(self.cursor.line + 1, 0);
        self.touch();
    }

    pub fn open_line_below(&mut self) {
        self.insert_line(self.cursor.line + 1, String::new());
    }

    pub fn open_line_above(&mut self) {
        self.insert_line(self.cursor.line, String::new());
    }

    /// Insert a whole line at `index` and put the cursor at its start.
    pub fn insert_line(&mut self, index: usize, text: String) {
        let index = index.min(self.lines.len());
        self.lines.insert(index, text);
        self.cursor = Position::new(index, 0);
        self.touch();
    }

    /// Empty the current line, returning what it held.
    pub fn clear_line(&mut self) -> String {
        self.cursor.col = 0;
        let removed = std::mem::take(self.current_mut());
        if !removed.is_empty() {
            self.touch();
        }
        removed
    }

    pub fn join_next_line(&mut self) {
        let line = self.cursor.line;
        if line + 1 >= self.lines.len() {
            return;
        }
        let next = self.lines.remove(line + 1);
        self.touch();
        if next.is_empty() {
            self.cursor.col = self.line_len(line).saturating_sub(1);
            return;
        }
        self.cursor.col = self.line_len(line);
        let current = self.current_mut();
        current.push(' ');
        current.push_str(&next);
    }

    /// Overwrite the grapheme under the cursor with one non-empty replacement.
    ///
    /// An empty replacement (a key that types nothing) leaves the line alone.
    pub fn replace_char(&mut self, with: &str) {
        let col = self.cursor.col;
        if with.is_empty() || col >= self.line_len(self.cursor.line) {
            return;
        }
        let start = byte_index(self.current(), col);
        let end = byte_index(self.current(), col + 1);
        if self.current()[start..end] == *with {
            return;
        }
        self.current_mut().replace_range(start..end, with);
        self.touch();
    }
}

impl TextOps for Buffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, line: usize) -> &str {
        self.lines.get(line).map(String::as_str).unwrap_or("")
    }
}

/// Byte offset of grapheme column `col`, clamped to the end of `line`.
pub(crate) fn byte_index(line: &str, col: usize) -> usize {
    line.grapheme_indices(true)
        .nth(col)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}
