//! The closed set of operations a keymap can name.
//!
//! Every operation carries the number of argument tokens it consumes from
//! the queue after its own command token. The dispatcher reads that arity to
//! decide whether it can run now or has to wait for more input.

macro_rules! operations {
    ($($variant:ident => $name:literal, $arity:literal;)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $($variant,)+
        }

        impl Operation {
            pub const ALL: &'static [Operation] = &[$(Operation::$variant,)+];

            /// Name used for this operation in keymaps and on the command line.
            pub fn name(self) -> &'static str {
                match self {
                    $(Operation::$variant => $name,)+
                }
            }

            /// Number of required argument tokens.
            pub fn arity(self) -> usize {
                match self {
                    $(Operation::$variant => $arity,)+
                }
            }

            pub fn from_name(name: &str) -> Option<Operation> {
                match name {
                    $($name => Some(Operation::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

operations! {
    // mode
    SwitchToInsert => "switch_to_insert", 0;
    SwitchToNormal => "switch_to_normal", 0;
    SwitchToCommand => "switch_to_command", 0;
    Quit => "quit", 0;
    // edit
    InsertChar => "insert_char", 1;
    DeleteChar => "delete_char", 0;
    DeleteUnderCursor => "delete_under_cursor", 0;
    SplitLine => "split_line", 0;
    NewLine => "new_line", 0;
    NewLineUpward => "new_line_upward", 0;
    DeleteLine => "delete_line", 0;
    AppendChar => "append_char", 0;
    JoinNextLine => "join_next_line", 0;
    ReplaceChar => "replace_char", 1;
    PasteLine => "paste_line", 0;
    // motion
    MoveCursorLeft => "move_cursor_left", 0;
    MoveCursorRight => "move_cursor_right", 0;
    MoveCursorUp => "move_cursor_up", 0;
    MoveCursorDown => "move_cursor_down", 0;
    LineBegin => "line_begin", 0;
    LineEnd => "line_end", 0;
    NextWord => "next_word", 0;
    NextBigWord => "next_WORD", 0;
    NextWordEnd => "next_word_end", 0;
    NextBigWordEnd => "next_WORD_end", 0;
    LastWord => "last_word", 0;
    LastBigWord => "last_WORD", 0;
    InlineSearch => "inline_search", 1;
    InlineSearchUntil => "inline_search_until", 1;
    InlineSearchBackward => "inline_search_backward", 1;
    InlineSearchBackwardUntil => "inline_search_backward_until", 1;
    Move => "move", 1;
    // command line
    ExecuteCommand => "execute_command", 0;
    DeleteCommand => "delete_command", 0;
    // files and config
    SaveToFile => "save_to_file", 1;
    LoadFromFile => "load_from_file", 1;
    Source => "source", 0;
    // diagnostics
    CleanOplist => "clean_oplist", 0;
    PrintOplist => "print_oplist", 0;
    PrintPrefix => "print_prefix", 0;
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
