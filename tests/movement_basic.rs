use vim_runner::{Mode, Token};

mod support;
use support::{engine, feed, pos};

fn type_text(eng: &mut vim_runner::Engine, text: &str) {
    for c in text.chars() {
        eng.handle_input(c);
    }
}

#[test]
fn hjkl_moves() {
    let mut eng = engine(&["abc", "xyz"], pos(0, 0));

    eng.handle_input('l');
    assert_eq!(eng.cursor(), pos(0, 1));

    eng.handle_input('j');
    assert_eq!(eng.cursor(), pos(1, 1));

    eng.handle_input('h');
    assert_eq!(eng.cursor(), pos(1, 0));

    eng.handle_input('k');
    assert_eq!(eng.cursor(), pos(0, 0));
}

#[test]
fn caret_and_dollar() {
    let mut eng = engine(&["abcdef", "xy"], pos(0, 3));

    feed(&mut eng, "^");
    assert_eq!(eng.cursor(), pos(0, 0));

    // $ rests on the last character, not past it
    feed(&mut eng, "$");
    assert_eq!(eng.cursor(), pos(0, 5));
}

#[test]
fn g_and_big_g() {
    let mut eng = engine(&["line 1", "line 2", "line 3", "line 4"], pos(2, 3));

    feed(&mut eng, "G");
    assert_eq!(eng.cursor(), pos(3, 3));

    feed(&mut eng, "g");
    assert_eq!(eng.cursor(), pos(0, 3));
}

#[test]
fn counts_with_movements() {
    let mut eng = engine(&["0123456789", "abcdefghij", "ABCDEFGHIJ"], pos(0, 0));

    feed(&mut eng, "3 l");
    assert_eq!(eng.cursor(), pos(0, 3));

    feed(&mut eng, "2 j");
    assert_eq!(eng.cursor(), pos(2, 3));

    feed(&mut eng, "2 h");
    assert_eq!(eng.cursor(), pos(2, 1));

    // multi-digit count, clamped at the last character
    feed(&mut eng, "1 0 l");
    assert_eq!(eng.cursor(), pos(2, 9));
}

#[test]
fn right_stops_on_last_character_in_normal_mode() {
    let mut eng = engine(&["abc"], pos(0, 0));
    feed(&mut eng, "l l l l");
    assert_eq!(eng.cursor(), pos(0, 2));
}

#[test]
fn left_stops_at_column_zero() {
    let mut eng = engine(&["abc"], pos(0, 1));
    feed(&mut eng, "h h h");
    assert_eq!(eng.cursor(), pos(0, 0));
}

#[test]
fn vertical_moves_clamp_column_to_target_line() {
    let mut eng = engine(&["abcdef", "ab", ""], pos(0, 5));

    feed(&mut eng, "j");
    assert_eq!(eng.cursor(), pos(1, 1));

    feed(&mut eng, "j");
    assert_eq!(eng.cursor(), pos(2, 0));

    feed(&mut eng, "k k");
    assert_eq!(eng.cursor(), pos(0, 0));
}

#[test]
fn moves_never_leave_the_buffer() {
    let mut eng = engine(&["a"], pos(0, 0));
    feed(&mut eng, "k k j j 9 j 9 l");
    assert_eq!(eng.cursor(), pos(0, 0));
}

#[test]
fn arrow_keys_move_in_insert_mode() {
    let mut eng = engine(&["abc", "de"], pos(0, 0));
    feed(&mut eng, "i <Right> <Right> <Right> <Right>");
    // insert mode may rest one past the end
    assert_eq!(eng.cursor(), pos(0, 3));

    feed(&mut eng, "<Down>");
    assert_eq!(eng.cursor(), pos(1, 2));
    assert_eq!(eng.mode(), Mode::Insert);
}

#[test]
fn move_jumps_to_zero_based_row() {
    let mut eng = engine(&["a", "bb", "ccc", "dddd"], pos(0, 0));
    eng.handle_inputs([Token::text("move"), Token::text("2")]);
    assert_eq!(eng.cursor(), pos(2, 0));

    eng.handle_inputs([Token::text("move"), Token::text("99")]);
    assert_eq!(eng.cursor(), pos(3, 0));

    eng.handle_inputs([Token::text("move"), Token::text("top")]);
    assert_eq!(eng.cursor(), pos(0, 0));
}

#[test]
fn move_from_command_line() {
    let mut eng = engine(&["a", "b", "c", "d"], pos(0, 0));
    feed(&mut eng, ":");
    assert_eq!(eng.mode(), Mode::Command);

    type_text(&mut eng, "move 2");
    assert_eq!(eng.command_line(), "move 2");

    feed(&mut eng, "<CR>");
    assert_eq!(eng.mode(), Mode::Normal);
    assert_eq!(eng.command_line(), "");
    assert_eq!(eng.cursor(), pos(2, 0));
}

#[test]
fn move_with_unknown_target_is_reported() {
    let mut eng = engine(&["a", "b"], pos(1, 0));
    eng.handle_inputs([Token::text("move"), Token::text("nowhere")]);
    assert_eq!(eng.cursor(), pos(1, 0));
    assert_eq!(eng.status(), Some("Invalid move target: nowhere"));
}
