use std::fs;

use vim_runner::key::normalize_key_name;
use vim_runner::{Action, ConfigError, KeyCode, KeyEvent, Keymap, Mode, Modifiers, Operation, Token};

mod support;
use support::{engine_with, feed, keymap, pos};

#[test]
fn builtin_keymap_classifies_values() {
    let keymap = keymap();
    assert_eq!(
        keymap.get(Mode::Normal, "i"),
        Some(&Action::Operation(Operation::SwitchToInsert))
    );
    assert_eq!(
        keymap.get(Mode::Normal, "G"),
        Some(&Action::Macro(vec!["move".to_string(), "bottom".to_string()]))
    );
    assert_eq!(
        keymap.get(Mode::Insert, "escape"),
        Some(&Action::Operation(Operation::SwitchToNormal))
    );
    assert_eq!(
        keymap.get(Mode::Command, "return"),
        Some(&Action::Operation(Operation::ExecuteCommand))
    );
    assert_eq!(keymap.bindings(Mode::Search).count(), 0);
}

#[test]
fn string_values_that_name_no_operation_are_literal() {
    let keymap = Keymap::from_toml_str(
        r#"
[keybindings.NORMAL]
z = "hello"
"#,
    )
    .unwrap();
    assert_eq!(
        keymap.get(Mode::Normal, "z"),
        Some(&Action::Literal("hello".to_string()))
    );
}

#[test]
fn mode_names_are_case_insensitive() {
    let keymap = Keymap::from_toml_str(
        r#"
[keybindings.insert]
"<Tab>" = "quit"
"#,
    )
    .unwrap();
    assert_eq!(keymap.get(Mode::Insert, "tab"), Some(&Action::Operation(Operation::Quit)));
}

#[test]
fn unknown_mode_is_rejected() {
    let err = Keymap::from_toml_str(
        r#"
[keybindings.VISUAL]
v = "quit"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownMode(ref mode) if mode == "VISUAL"));
}

#[test]
fn empty_macro_is_rejected() {
    let err = Keymap::from_toml_str(
        r#"
[keybindings.NORMAL]
q = []
"#,
    )
    .unwrap_err();
    match err {
        ConfigError::EmptyMacro { mode, key } => {
            assert_eq!(mode, "NORMAL");
            assert_eq!(key, "q");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn malformed_documents_fail_to_parse() {
    assert!(matches!(
        Keymap::from_toml_str("keybindings = 3"),
        Err(ConfigError::Parse { .. })
    ));
    assert!(matches!(
        Keymap::from_toml_str("[keybindings.NORMAL]\nx = 5\n"),
        Err(ConfigError::Parse { .. })
    ));
    assert!(matches!(
        Keymap::from_toml_str("[keybindings.NORMAL\n"),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn empty_document_is_an_empty_keymap() {
    let keymap = Keymap::from_toml_str("").unwrap();
    assert!(keymap.is_empty());
}

#[test]
fn key_names_are_normalised() {
    assert_eq!(normalize_key_name("<Esc>"), "escape");
    assert_eq!(normalize_key_name("esc"), "escape");
    assert_eq!(normalize_key_name("Escape"), "escape");
    assert_eq!(normalize_key_name("<CR>"), "return");
    assert_eq!(normalize_key_name("<C-r>"), "ctrl+r");
    assert_eq!(normalize_key_name("Ctrl+Shift+R"), "ctrl+r");
    assert_eq!(normalize_key_name("x"), "x");
    assert_eq!(normalize_key_name("bottom"), "bottom");
}

#[test]
fn every_spelling_of_a_key_binds_the_same_slot() {
    let mut keymap = Keymap::new();
    keymap.bind(Mode::Normal, "<Esc>", Action::Operation(Operation::Quit));
    let previous = keymap.bind(Mode::Normal, "Escape", Action::Operation(Operation::CleanOplist));
    assert_eq!(previous, Some(Action::Operation(Operation::Quit)));
    assert_eq!(keymap.len(), 1);
    assert_eq!(
        keymap.resolve(Mode::Normal, &Token::key(KeyCode::Esc)),
        Action::Operation(Operation::CleanOplist)
    );
}

#[test]
fn chords_resolve_only_with_their_modifiers() {
    let keymap = Keymap::new().with_binding(
        Mode::Normal,
        "<C-r>",
        Action::Operation(Operation::MoveCursorRight),
    );
    let ctrl_r = Token::Key(KeyEvent::with_mods(KeyCode::Char('r'), Modifiers::CTRL));
    assert_eq!(
        keymap.resolve(Mode::Normal, &ctrl_r),
        Action::Operation(Operation::MoveCursorRight)
    );
    assert_eq!(
        keymap.resolve(Mode::Normal, &Token::from('r')),
        Action::Literal("r".to_string())
    );
}

#[test]
fn unbound_tokens_fall_back_to_their_text() {
    let keymap = Keymap::new();
    assert_eq!(
        keymap.resolve(Mode::Normal, &Token::key(KeyCode::Esc)),
        Action::Literal(String::new())
    );
    assert_eq!(
        keymap.resolve(Mode::Insert, &Token::text("move")),
        Action::Operation(Operation::Move)
    );
    assert_eq!(
        keymap.resolve(Mode::Insert, &Token::key(KeyCode::Tab)),
        Action::Literal("\t".to_string())
    );
}

#[test]
fn notation_keeps_dashed_words_as_text() {
    assert_eq!(Token::from_notation("a-b"), Token::text("a-b"));
    assert_eq!(Token::from_notation("<Esc>"), Token::key(KeyCode::Esc));
    assert_eq!(
        Token::from_notation("<C-w>"),
        Token::Key(KeyEvent::with_mods(KeyCode::Char('w'), Modifiers::CTRL))
    );
    assert_eq!(Token::from_notation("<nope>"), Token::text("<nope>"));
}

#[test]
fn keymap_loads_from_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keymap.toml");
    fs::write(&path, "[keybindings.NORMAL]\nq = \"quit\"\n").unwrap();

    let keymap = Keymap::load(&path).unwrap();
    assert_eq!(keymap.get(Mode::Normal, "q"), Some(&Action::Operation(Operation::Quit)));

    let missing = dir.path().join("missing.toml");
    assert!(matches!(Keymap::load(&missing), Err(ConfigError::Read { .. })));
}

#[test]
fn source_reloads_the_keymap_from_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keymap.toml");
    fs::write(&path, "[keybindings.NORMAL]\nl = \"move_cursor_right\"\n").unwrap();

    let mut eng = vim_runner::Engine::builder()
        .keymap(Keymap::load(&path).unwrap())
        .keymap_path(&path)
        .lines(["abcdef"])
        .build();
    feed(&mut eng, "l");
    assert_eq!(eng.cursor(), pos(0, 1));

    fs::write(&path, "[keybindings.NORMAL]\nl = \"line_end\"\n").unwrap();
    eng.handle_input(Token::text("source"));
    assert_eq!(eng.status(), Some("Keymap reloaded"));

    feed(&mut eng, "l");
    assert_eq!(eng.cursor(), pos(0, 5));
}

#[test]
fn source_reports_failures_and_keeps_the_keymap() {
    let mut eng = engine_with(keymap(), &["abc"], pos(0, 0));
    eng.handle_input(Token::text("source"));
    assert_eq!(eng.status(), Some("no keymap path to reload from"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[keybindings.VISUAL]\nv = \"quit\"\n").unwrap();
    let mut eng = vim_runner::Engine::builder()
        .keymap(keymap())
        .keymap_path(&path)
        .lines(["abc"])
        .build();
    eng.handle_input(Token::text("source"));
    assert_eq!(eng.status(), Some("unknown mode `VISUAL` in keybindings"));

    feed(&mut eng, "l");
    assert_eq!(eng.cursor(), pos(0, 1));
}
