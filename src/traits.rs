use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Mode, Position};

pub trait TextOps {
    // Basic queries
    fn line_count(&self) -> usize;
    fn line(&self, line: usize) -> &str; // empty past the last line

    fn line_len(&self, line: usize) -> usize {
        self.line(line).graphemes(true).count()
    }

    // Rightmost column the cursor may rest on in `mode`
    fn max_col(&self, line: usize, mode: Mode) -> usize {
        let len = self.line_len(line);
        if mode.allows_append_column() {
            len
        } else {
            len.saturating_sub(1)
        }
    }

    fn clamp(&self, pos: Position, mode: Mode) -> Position {
        let last_line = self.line_count().saturating_sub(1);
        let line = pos.line.min(last_line);
        let col = pos.col.min(self.max_col(line, mode));
        Position { line, col }
    }
}

/// Storage for the last deleted line.
pub trait Clipboard {
    fn get(&mut self) -> Option<String>;
    fn set(&mut self, text: String);
}
