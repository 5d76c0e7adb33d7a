#![allow(dead_code)]

pub mod mock_clipboard;

use vim_runner::{Engine, Keymap, Mode, Position, Token};

pub fn keymap() -> Keymap {
    Keymap::builtin().expect("built-in keymap parses")
}

/// Engine over `lines` with the built-in keymap, cursor at `cursor`.
pub fn engine(lines: &[&str], cursor: Position) -> Engine {
    engine_with(keymap(), lines, cursor)
}

pub fn engine_with(keymap: Keymap, lines: &[&str], cursor: Position) -> Engine {
    let mut buffer = vim_runner::Buffer::from_lines(lines.iter().copied());
    buffer.set_cursor(cursor, Mode::Normal);
    Engine::builder().keymap(keymap).buffer(buffer).build()
}

/// Feed `i X <Esc>` style notation one token at a time, as keystrokes arrive.
pub fn feed(engine: &mut Engine, notation: &str) {
    for token in Token::parse_sequence(notation) {
        engine.handle_input(token);
    }
}

pub fn pos(line: usize, col: usize) -> Position {
    Position { line, col }
}
