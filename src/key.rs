use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

/// Key codes representing individual keys on the keyboard.
///
/// This enum provides a platform-agnostic representation of keys.
/// Hosts should map their platform-specific key events to these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key, already shifted by the host ('A' rather than SHIFT+'a').
    Char(char),
    /// The Escape key, used to leave insert and command modes.
    Esc,
    /// The Enter/Return key.
    Enter,
    /// The Backspace key.
    Backspace,
    Tab,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

const NAMED_KEYS: &[(KeyCode, &[&str])] = &[
    (KeyCode::Esc, &["escape", "esc"]),
    (KeyCode::Enter, &["return", "enter", "cr"]),
    (KeyCode::Backspace, &["backspace", "bs"]),
    (KeyCode::Tab, &["tab"]),
    (KeyCode::Delete, &["delete", "del"]),
    (KeyCode::Up, &["up"]),
    (KeyCode::Down, &["down"]),
    (KeyCode::Left, &["left"]),
    (KeyCode::Right, &["right"]),
    (KeyCode::Home, &["home"]),
    (KeyCode::End, &["end"]),
];

impl KeyCode {
    /// Canonical binding name of a named key. Character keys have none.
    pub fn name(self) -> Option<&'static str> {
        NAMED_KEYS
            .iter()
            .find(|(code, _)| *code == self)
            .map(|(_, names)| names[0])
    }

    /// Parse a key name, accepting `<Esc>` style brackets and common aliases.
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let bare = strip_brackets(name).to_ascii_lowercase();
        NAMED_KEYS
            .iter()
            .find(|(_, names)| names.contains(&bare.as_str()))
            .map(|(code, _)| *code)
    }

    /// The text this key types, if any.
    pub fn text(self) -> Option<String> {
        match self {
            KeyCode::Char(c) => Some(c.to_string()),
            KeyCode::Tab => Some("\t".to_string()),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A key press event with optional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::empty(),
        }
    }

    pub fn with_mods(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    /// `ctrl+r` style name when a command modifier is held.
    ///
    /// SHIFT alone never produces a chord: hosts deliver shifted characters.
    pub fn chord_name(&self) -> Option<String> {
        let held = self.mods - Modifiers::SHIFT;
        if held.is_empty() {
            return None;
        }
        let key = match self.code {
            KeyCode::Char(c) => c.to_lowercase().to_string(),
            code => code.name()?.to_string(),
        };
        let mut parts = Vec::with_capacity(4);
        if held.contains(Modifiers::CTRL) {
            parts.push("ctrl");
        }
        if held.contains(Modifiers::ALT) {
            parts.push("alt");
        }
        if held.contains(Modifiers::META) {
            parts.push("meta");
        }
        Some(format!("{}+{}", parts.join("+"), key))
    }

    /// Parse a chord like `ctrl+r`, `alt+shift+x` or `<C-r>`.
    pub fn parse_chord(input: &str) -> Option<KeyEvent> {
        let trimmed = input.trim();
        let bare = strip_brackets(trimmed);
        let bracketed = bare.len() != trimmed.len();
        let lowered = bare.to_ascii_lowercase();
        // `C-r` spelling only inside brackets, so plain text like `a-b` stays text
        let parts: Vec<&str> = if lowered.contains('+') {
            lowered.split('+').map(str::trim).collect()
        } else if bracketed {
            lowered.split('-').map(str::trim).collect()
        } else {
            return None;
        };
        if parts.len() < 2 || parts.iter().any(|part| part.is_empty()) {
            return None;
        }

        let (key, modifiers) = parts.split_last()?;
        let mut mods = Modifiers::empty();
        for part in modifiers {
            match *part {
                "ctrl" | "control" | "c" => mods |= Modifiers::CTRL,
                "alt" | "option" | "a" | "m" => mods |= Modifiers::ALT,
                "shift" | "s" => mods |= Modifiers::SHIFT,
                "meta" | "cmd" | "super" | "d" => mods |= Modifiers::META,
                _ => return None,
            }
        }
        if (mods - Modifiers::SHIFT).is_empty() {
            return None;
        }

        let code = match KeyCode::from_name(key) {
            Some(code) => code,
            None => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(KeyEvent { code, mods })
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        KeyEvent::new(code)
    }
}

/// One unit of input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A key press delivered by the host.
    Key(KeyEvent),
    /// Synthetic text: macro expansions, command-line words, replayed input.
    Text(String),
}

impl Token {
    pub fn key(code: KeyCode) -> Token {
        Token::Key(KeyEvent::new(code))
    }

    pub fn text(text: impl Into<String>) -> Token {
        Token::Text(text.into())
    }

    /// Parse one token of `i X <Esc>` style notation.
    ///
    /// A single grapheme becomes a character key, `<...>` a named key or chord,
    /// anything else synthetic text.
    pub fn from_notation(word: &str) -> Token {
        let mut graphemes = word.graphemes(true);
        if let (Some(g), None) = (graphemes.next(), graphemes.next()) {
            let mut chars = g.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Token::key(KeyCode::Char(c));
            }
        }
        if word.starts_with('<') && word.ends_with('>') && word.len() > 2 {
            if let Some(code) = KeyCode::from_name(word) {
                return Token::key(code);
            }
            if let Some(event) = KeyEvent::parse_chord(word) {
                return Token::Key(event);
            }
        }
        Token::Text(word.to_string())
    }

    /// Whitespace separated notation, e.g. `"3 x i abc <Esc>"`.
    pub fn parse_sequence(notation: &str) -> Vec<Token> {
        notation.split_whitespace().map(Token::from_notation).collect()
    }

    /// Textual form used when the token is bound as an operation argument
    /// or passed through as literal text.
    pub fn as_text(&self) -> String {
        match self {
            Token::Key(event) => event.code.text().unwrap_or_default(),
            Token::Text(text) => text.clone(),
        }
    }

    /// Binding-table keys to try, most specific first.
    pub fn lookup_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(2);
        match self {
            Token::Key(event) => {
                if let Some(chord) = event.chord_name() {
                    keys.push(chord);
                } else {
                    if let Some(text) = event.code.text() {
                        keys.push(text);
                    }
                    if let Some(name) = event.code.name() {
                        keys.push(name.to_string());
                    }
                }
            }
            Token::Text(text) => {
                keys.push(text.clone());
                let normalized = normalize_key_name(text);
                if normalized != *text {
                    keys.push(normalized);
                }
            }
        }
        keys
    }
}

impl From<char> for Token {
    fn from(c: char) -> Self {
        Token::key(KeyCode::Char(c))
    }
}

impl From<KeyCode> for Token {
    fn from(code: KeyCode) -> Self {
        Token::key(code)
    }
}

impl From<&str> for Token {
    fn from(word: &str) -> Self {
        Token::from_notation(word)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Key(event) => match event.chord_name() {
                Some(chord) => write!(f, "<{chord}>"),
                None => match event.code {
                    KeyCode::Char(c) => write!(f, "{c}"),
                    code => write!(f, "<{}>", code.name().unwrap_or("?")),
                },
            },
            Token::Text(text) => f.write_str(text),
        }
    }
}

/// Canonical binding key for a name written in a keymap file.
///
/// Single graphemes stay as typed, named keys and chords are folded to their
/// canonical spelling, everything else is kept verbatim.
pub fn normalize_key_name(raw: &str) -> String {
    if raw.graphemes(true).count() <= 1 {
        return raw.to_string();
    }
    if let Some(code) = KeyCode::from_name(raw) {
        if let Some(name) = code.name() {
            return name.to_string();
        }
    }
    if let Some(chord) = KeyEvent::parse_chord(raw).and_then(|event| event.chord_name()) {
        return chord;
    }
    raw.to_string()
}

fn strip_brackets(name: &str) -> &str {
    name.strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(name)
}
