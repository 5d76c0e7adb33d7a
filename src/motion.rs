//! Cursor motions over anything implementing [`TextOps`].
//!
//! Motions are pure: they take a position and return the new one. Word motions
//! are built on a single scanner that walks graphemes in one direction looking
//! for a position satisfying a predicate, and decides what to do when the
//! current line runs out.

use unicode_segmentation::UnicodeSegmentation;

use crate::traits::TextOps;
use crate::types::{Mode, Position};

/// Character class used for word boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Blank,
    Word,
    Punct,
}

impl CharClass {
    /// Class of a grapheme, judged by its first char.
    pub fn of(grapheme: &str) -> CharClass {
        match grapheme.chars().next() {
            Some(c) if c.is_whitespace() => CharClass::Blank,
            Some(c) if c.is_alphabetic() || c == '_' => CharClass::Word,
            Some(_) => CharClass::Punct,
            None => CharClass::Blank,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// What the scanner does when the current line has no match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMiss {
    /// Continue on the neighbouring line, stopping at the buffer edge.
    CrossLine,
    /// Rest on the edge of the current line.
    StopAtEdge,
    /// Report failure and leave the cursor alone.
    Fail,
}

/// Walk from `from` in `dir` until `matches(graphemes, col)` holds.
///
/// The start column itself is never tested. Returns `None` only for
/// [`OnMiss::Fail`].
pub fn scan<T, P>(text: &T, from: Position, dir: Direction, on_miss: OnMiss, matches: P) -> Option<Position>
where
    T: TextOps + ?Sized,
    P: Fn(&[&str], usize) -> bool,
{
    let mut pos = text.clamp(from, Mode::Insert);
    loop {
        let graphemes: Vec<&str> = text.line(pos.line).graphemes(true).collect();
        let last = graphemes.len().saturating_sub(1);
        let hit = match dir {
            Direction::Forward => (pos.col + 1..graphemes.len()).find(|&i| matches(&graphemes, i)),
            Direction::Backward => (0..pos.col.min(graphemes.len()))
                .rev()
                .find(|&i| matches(&graphemes, i)),
        };
        if let Some(col) = hit {
            return Some(Position::new(pos.line, col));
        }

        match (on_miss, dir) {
            (OnMiss::Fail, _) => return None,
            (OnMiss::StopAtEdge, Direction::Forward) => return Some(Position::new(pos.line, last)),
            (OnMiss::StopAtEdge, Direction::Backward) => return Some(Position::new(pos.line, 0)),
            (OnMiss::CrossLine, Direction::Forward) => {
                if pos.line + 1 >= text.line_count() {
                    return Some(Position::new(pos.line, last));
                }
                pos = Position::new(pos.line + 1, 0);
            }
            (OnMiss::CrossLine, Direction::Backward) => {
                if pos.line == 0 {
                    return Some(Position::ZERO);
                }
                let line = pos.line - 1;
                pos = Position::new(line, text.line_len(line).saturating_sub(1));
            }
        }

        // Landing spot on the new line counts as a match when it qualifies
        let graphemes: Vec<&str> = text.line(pos.line).graphemes(true).collect();
        if graphemes.is_empty() || matches(&graphemes, pos.col) {
            return Some(pos);
        }
    }
}

fn class_at(graphemes: &[&str], i: usize) -> CharClass {
    graphemes.get(i).map_or(CharClass::Blank, |g| CharClass::of(g))
}

/// First grapheme of a word: leaving blanks, or switching between word and punctuation.
pub fn is_word_start(graphemes: &[&str], i: usize) -> bool {
    let class = class_at(graphemes, i);
    class != CharClass::Blank && (i == 0 || class != class_at(graphemes, i - 1))
}

/// First grapheme after a blank run.
pub fn is_big_word_start(graphemes: &[&str], i: usize) -> bool {
    class_at(graphemes, i) != CharClass::Blank && (i == 0 || class_at(graphemes, i - 1) == CharClass::Blank)
}

pub fn is_word_end(graphemes: &[&str], i: usize) -> bool {
    let class = class_at(graphemes, i);
    class != CharClass::Blank && (i + 1 == graphemes.len() || class != class_at(graphemes, i + 1))
}

pub fn is_big_word_end(graphemes: &[&str], i: usize) -> bool {
    class_at(graphemes, i) != CharClass::Blank
        && (i + 1 == graphemes.len() || class_at(graphemes, i + 1) == CharClass::Blank)
}

pub fn next_word<T: TextOps + ?Sized>(text: &T, pos: Position) -> Position {
    scan(text, pos, Direction::Forward, OnMiss::CrossLine, is_word_start).unwrap_or(pos)
}

pub fn next_big_word<T: TextOps + ?Sized>(text: &T, pos: Position) -> Position {
    scan(text, pos, Direction::Forward, OnMiss::CrossLine, is_big_word_start).unwrap_or(pos)
}

pub fn next_word_end<T: TextOps + ?Sized>(text: &T, pos: Position) -> Position {
    scan(text, pos, Direction::Forward, OnMiss::CrossLine, is_word_end).unwrap_or(pos)
}

pub fn next_big_word_end<T: TextOps + ?Sized>(text: &T, pos: Position) -> Position {
    scan(text, pos, Direction::Forward, OnMiss::CrossLine, is_big_word_end).unwrap_or(pos)
}

pub fn prev_word<T: TextOps + ?Sized>(text: &T, pos: Position) -> Position {
    scan(text, pos, Direction::Backward, OnMiss::CrossLine, is_word_start).unwrap_or(pos)
}

pub fn prev_big_word<T: TextOps + ?Sized>(text: &T, pos: Position) -> Position {
    scan(text, pos, Direction::Backward, OnMiss::CrossLine, is_big_word_start).unwrap_or(pos)
}

/// Find `target` on the cursor line. Never crosses lines.
pub fn find_in_line<T: TextOps + ?Sized>(
    text: &T,
    pos: Position,
    target: &str,
    dir: Direction,
) -> Option<Position> {
    scan(text, pos, dir, OnMiss::Fail, |graphemes, i| graphemes[i] == target)
}

pub fn left<T: TextOps + ?Sized>(text: &T, pos: Position) -> Position {
    // Past-the-end columns first snap back onto the last grapheme
    let col = pos.col.min(text.line_len(pos.line).saturating_sub(1));
    Position::new(pos.line, col.saturating_sub(1))
}

pub fn right<T: TextOps + ?Sized>(text: &T, pos: Position, mode: Mode) -> Position {
    Position::new(pos.line, (pos.col + 1).min(text.max_col(pos.line, mode)))
}

pub fn up<T: TextOps + ?Sized>(text: &T, pos: Position, mode: Mode) -> Position {
    text.clamp(Position::new(pos.line.saturating_sub(1), pos.col), mode)
}

pub fn down<T: TextOps + ?Sized>(text: &T, pos: Position, mode: Mode) -> Position {
    text.clamp(Position::new(pos.line + 1, pos.col), mode)
}

pub fn line_begin(pos: Position) -> Position {
    Position::new(pos.line, 0)
}

/// Last grapheme of the line, or column 0 on an empty line.
pub fn line_end<T: TextOps + ?Sized>(text: &T, pos: Position) -> Position {
    Position::new(pos.line, text.line_len(pos.line).saturating_sub(1))
}

/// Jump target of the `move` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTarget {
    Top,
    Bottom,
    /// Zero-based row.
    Row(usize),
}

impl LineTarget {
    pub fn parse(arg: &str) -> Option<LineTarget> {
        match arg {
            "top" => Some(LineTarget::Top),
            "bottom" => Some(LineTarget::Bottom),
            digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                // Rows beyond usize clamp to the last line anyway
                Some(LineTarget::Row(digits.parse().unwrap_or(usize::MAX)))
            }
            _ => None,
        }
    }
}

pub fn goto_line<T: TextOps + ?Sized>(text: &T, pos: Position, target: LineTarget) -> Position {
    let last = text.line_count().saturating_sub(1);
    match target {
        LineTarget::Top => Position::new(0, pos.col),
        LineTarget::Bottom => Position::new(last, pos.col),
        LineTarget::Row(row) => Position::new(row.min(last), 0),
    }
}
