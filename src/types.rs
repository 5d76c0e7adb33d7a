use std::fmt;

use crate::ops::Operation;

/// A cursor position within the buffer.
///
/// Positions are zero-indexed and column values are counted in grapheme clusters,
/// not bytes or chars. This ensures correct handling of emoji and combining characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column position in grapheme clusters.
    pub col: usize,
}

impl Position {
    /// The origin position (0, 0).
    pub const ZERO: Position = Position { line: 0, col: 0 };

    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// The current mode of the engine.
///
/// The same token resolves to a different action depending on the active
/// mode, because every mode carries its own binding table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Navigation and editing commands. Initial mode.
    #[default]
    Normal,
    /// Unbound tokens are inserted as text.
    Insert,
    /// Unbound tokens are appended to the command line.
    Command,
    /// Reserved. Nothing enters this mode yet.
    Search,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::Insert, Mode::Command, Mode::Search];

    /// Name used for this mode in keymap files.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::Search => "SEARCH",
        }
    }

    pub fn from_name(name: &str) -> Option<Mode> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }

    /// Whether digit tokens feed the repeat prefix in this mode.
    pub fn accepts_count(self) -> bool {
        !matches!(self, Mode::Insert | Mode::Command)
    }

    /// Whether the cursor may rest one past the last character.
    pub fn allows_append_column(self) -> bool {
        matches!(self, Mode::Insert | Mode::Command)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The resolved meaning of a token in the active mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Typed text, digits, or anything that names no operation.
    Literal(String),
    /// A bound engine operation.
    Operation(Operation),
    /// A fixed expansion into further tokens.
    Macro(Vec<String>),
}

impl Action {
    /// Classify a bare string: operation names win, everything else is literal.
    pub fn from_text(text: &str) -> Action {
        match Operation::from_name(text) {
            Some(op) => Action::Operation(op),
            None => Action::Literal(text.to_string()),
        }
    }

    /// The digit string of a literal made only of ASCII digits.
    pub fn as_digits(&self) -> Option<&str> {
        match self {
            Action::Literal(text) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
                Some(text)
            }
            _ => None,
        }
    }
}
