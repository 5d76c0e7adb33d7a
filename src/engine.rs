use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace, warn};

use crate::buffer::Buffer;
use crate::clipboard::LineSlot;
use crate::error::{ConfigError, FileIoError};
use crate::file_io;
use crate::key::Token;
use crate::keymap::Keymap;
use crate::motion::{self, Direction, LineTarget};
use crate::ops::Operation;
use crate::traits::Clipboard;
use crate::types::{Action, Mode, Position};

/// Largest number of copies a counted macro expands into.
pub const MAX_MACRO_REPEAT: usize = 10_000;

#[derive(Debug, Default, Clone)]
struct Counts {
    prefix: usize,
}

impl Counts {
    /// Fold a run of digits into the prefix: `value + prefix * 10^len`.
    fn push_digits(&mut self, digits: &str) {
        let value = digits.parse::<usize>().unwrap_or(usize::MAX);
        let shift = u32::try_from(digits.len())
            .ok()
            .and_then(|len| 10usize.checked_pow(len))
            .unwrap_or(usize::MAX);
        self.prefix = self.prefix.saturating_mul(shift).saturating_add(value);
    }

    fn effective(&self) -> usize {
        self.prefix.max(1)
    }

    fn clear(&mut self) {
        self.prefix = 0;
    }
}

/// The modal editing engine.
///
/// Tokens go in through [`Engine::handle_input`]; the engine resolves them
/// against the keymap of the active mode and runs the resulting operations
/// against its buffer. Commands that need argument tokens which have not
/// arrived yet stay queued until they do.
pub struct Engine {
    mode: Mode,
    buffer: Buffer,
    keymap: Keymap,
    keymap_path: Option<PathBuf>,
    queue: VecDeque<Token>,
    counts: Counts,
    waiting: bool,
    command_line: String,
    clipboard: Box<dyn Clipboard>,
    quit_requested: bool,
    status: Option<String>,
    // Queue replacement requested by the operation being run
    redirect: Option<VecDeque<Token>>,
}

/// The engine state an operation can change. Two equal fingerprints around
/// an invocation mean repeating it further changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    revision: u64,
    cursor: Position,
    mode: Mode,
    command_len: usize,
}

/// Read-only view of the engine state a renderer needs each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub cursor: Position,
    pub command_line: String,
    pub pending_count: Option<usize>,
    pub pending: Vec<Token>,
    pub waiting: bool,
    pub status: Option<String>,
    pub quit_requested: bool,
}

pub struct EngineBuilder {
    mode: Mode,
    buffer: Buffer,
    keymap: Keymap,
    keymap_path: Option<PathBuf>,
    clipboard: Box<dyn Clipboard>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            buffer: Buffer::new(),
            keymap: Keymap::new(),
            keymap_path: None,
            clipboard: Box::new(LineSlot::new()),
        }
    }
}

impl EngineBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn buffer(mut self, buffer: Buffer) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn lines<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buffer(Buffer::from_lines(lines))
    }

    pub fn keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Where the `source` operation reloads the keymap from.
    pub fn keymap_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.keymap_path = Some(path.into());
        self
    }

    pub fn clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn build(self) -> Engine {
        let mut buffer = self.buffer;
        buffer.clamp_cursor(self.mode);
        Engine {
            mode: self.mode,
            buffer,
            keymap: self.keymap,
            keymap_path: self.keymap_path,
            queue: VecDeque::new(),
            counts: Counts::default(),
            waiting: false,
            command_line: String::new(),
            clipboard: self.clipboard,
            quit_requested: false,
            status: None,
            redirect: None,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::default().build()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("mode", &self.mode)
            .field("buffer", &self.buffer)
            .field("queue", &self.queue)
            .field("prefix", &self.counts.prefix)
            .field("waiting", &self.waiting)
            .field("command_line", &self.command_line)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            mode: self.mode,
            cursor: self.buffer.cursor(),
            command_line: self.command_line.clone(),
            pending_count: (self.counts.prefix > 0).then_some(self.counts.prefix),
            pending: self.queue.iter().cloned().collect(),
            waiting: self.waiting,
            status: self.status.clone(),
            quit_requested: self.quit_requested,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> Position {
        self.buffer.cursor()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn lines(&self) -> &[String] {
        self.buffer.lines()
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn should_quit(&self) -> bool {
        self.quit_requested
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn set_keymap(&mut self, keymap: Keymap) {
        self.keymap = keymap;
    }

    /// Enqueue one token and drain the queue as far as possible.
    pub fn handle_input(&mut self, token: impl Into<Token>) {
        self.handle_inputs([token.into()]);
    }

    /// Enqueue several tokens as if they arrived together, then drain.
    pub fn handle_inputs<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = Token>,
    {
        if self.quit_requested {
            debug!("input after quit request ignored");
            return;
        }
        self.queue.extend(tokens);
        self.run();
    }

    /// Replace the buffer with the contents of `path`.
    pub fn load_file(&mut self, path: &Path) -> Result<(), FileIoError> {
        let lines = file_io::load(path)?;
        self.buffer.replace_lines(lines);
        self.buffer.clamp_cursor(self.mode);
        Ok(())
    }

    pub fn save_file(&self, path: &Path) -> Result<(), FileIoError> {
        file_io::save(path, self.buffer.lines())
    }

    /// Re-read the keymap from the configured path.
    pub fn reload_keymap(&mut self) -> Result<(), ConfigError> {
        let path = self.keymap_path.as_deref().ok_or(ConfigError::NoSource)?;
        self.keymap = Keymap::load(path)?;
        Ok(())
    }

    fn run(&mut self) {
        // Fresh input gets a fresh attempt at whatever was waiting
        self.waiting = false;
        while !self.waiting && !self.quit_requested {
            let Some(head) = self.queue.front() else {
                break;
            };
            let action = self.keymap.resolve(self.mode, head);
            trace!(token = %head, ?action, mode = %self.mode, "resolve");

            if self.mode.accepts_count() {
                if let Some(digits) = action.as_digits() {
                    self.counts.push_digits(digits);
                    self.queue.pop_front();
                    continue;
                }
            }

            let count = self.counts.effective();
            match action {
                Action::Macro(tokens) => {
                    self.queue.pop_front();
                    let expansion: Vec<Token> = tokens.iter().map(|t| Token::text(t.as_str())).collect();
                    let copies = count.min(MAX_MACRO_REPEAT);
                    if copies < count {
                        warn!(count, copies, "macro repeat count capped");
                    }
                    for _ in 0..copies {
                        for token in expansion.iter().rev() {
                            self.queue.push_front(token.clone());
                        }
                    }
                }
                Action::Operation(op) => {
                    let Some(args) = self.take_arguments(op) else {
                        trace!(%op, queued = self.queue.len(), "waiting for arguments");
                        self.waiting = true;
                        break;
                    };
                    for done in 1..=count {
                        let before = self.fingerprint();
                        self.invoke(op, &args);
                        self.buffer.clamp_cursor(self.mode);
                        if self.redirect.is_some() || self.quit_requested {
                            break;
                        }
                        // A no-op invocation stays a no-op for the rest of the count
                        if self.fingerprint() == before {
                            if done < count {
                                trace!(%op, done, count, "repeat reached a fixed point");
                            }
                            break;
                        }
                    }
                    if let Some(queue) = self.redirect.take() {
                        self.queue = queue;
                    }
                }
                Action::Literal(text) => {
                    self.queue.pop_front();
                    match self.mode {
                        Mode::Insert => self.buffer.insert_text(&text.repeat(count)),
                        Mode::Command => self.command_line.push_str(&text.repeat(count)),
                        Mode::Normal | Mode::Search => {
                            warn!("unknown action `{}` in {} mode", text, self.mode);
                            self.status = Some(format!("Unknown action: {text}"));
                        }
                    }
                }
            }

            self.counts.clear();
            self.buffer.clamp_cursor(self.mode);
        }
    }

    fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            revision: self.buffer.revision(),
            cursor: self.buffer.cursor(),
            mode: self.mode,
            command_len: self.command_line.len(),
        }
    }

    /// Pop the command token and its arguments, or leave the queue untouched
    /// when not enough tokens have arrived yet.
    fn take_arguments(&mut self, op: Operation) -> Option<Vec<String>> {
        let arity = op.arity();
        if self.queue.len() <= arity {
            return None;
        }
        self.queue.pop_front();
        Some(self.queue.drain(..arity).map(|token| token.as_text()).collect())
    }

    fn invoke(&mut self, op: Operation, args: &[String]) {
        let arg = args.first().map(String::as_str).unwrap_or("");
        let cursor = self.buffer.cursor();
        match op {
            Operation::SwitchToInsert => self.switch_mode(Mode::Insert),
            // Leaving INSERT always steps back one column, not only from the
            // end of the line, so `i X <Esc>` rests on the inserted X.
            Operation::SwitchToNormal => {
                match self.mode {
                    Mode::Insert => self.move_to(Position::new(cursor.line, cursor.col.saturating_sub(1))),
                    Mode::Command => self.command_line.clear(),
                    Mode::Normal | Mode::Search => {}
                }
                self.switch_mode(Mode::Normal);
            }
            Operation::SwitchToCommand => {
                self.command_line.clear();
                self.switch_mode(Mode::Command);
            }
            Operation::Quit => {
                info!("quit requested");
                self.quit_requested = true;
                self.queue.clear();
            }

            Operation::InsertChar => self.buffer.insert_text(arg),
            Operation::DeleteChar => self.buffer.delete_before_cursor(),
            Operation::DeleteUnderCursor => self.buffer.delete_under_cursor(),
            Operation::SplitLine => self.buffer.split_line(),
            Operation::NewLine => {
                self.buffer.open_line_below();
                self.switch_mode(Mode::Insert);
            }
            Operation::NewLineUpward => {
                self.buffer.open_line_above();
                self.switch_mode(Mode::Insert);
            }
            Operation::DeleteLine => {
                let removed = self.buffer.clear_line();
                self.clipboard.set(removed);
            }
            Operation::PasteLine => match self.clipboard.get() {
                Some(text) => self.buffer.insert_line(cursor.line + 1, text),
                None => self.status = Some("Nothing to paste".to_string()),
            },
            Operation::AppendChar => {
                self.move_to(motion::right(&self.buffer, cursor, Mode::Insert));
                self.switch_mode(Mode::Insert);
            }
            Operation::JoinNextLine => self.buffer.join_next_line(),
            Operation::ReplaceChar => self.buffer.replace_char(arg),

            Operation::MoveCursorLeft => self.move_to(motion::left(&self.buffer, cursor)),
            Operation::MoveCursorRight => self.move_to(motion::right(&self.buffer, cursor, self.mode)),
            Operation::MoveCursorUp => self.move_to(motion::up(&self.buffer, cursor, self.mode)),
            Operation::MoveCursorDown => self.move_to(motion::down(&self.buffer, cursor, self.mode)),
            Operation::LineBegin => self.move_to(motion::line_begin(cursor)),
            Operation::LineEnd => self.move_to(motion::line_end(&self.buffer, cursor)),
            Operation::NextWord => self.move_to(motion::next_word(&self.buffer, cursor)),
            Operation::NextBigWord => self.move_to(motion::next_big_word(&self.buffer, cursor)),
            Operation::NextWordEnd => self.move_to(motion::next_word_end(&self.buffer, cursor)),
            Operation::NextBigWordEnd => self.move_to(motion::next_big_word_end(&self.buffer, cursor)),
            Operation::LastWord => self.move_to(motion::prev_word(&self.buffer, cursor)),
            Operation::LastBigWord => self.move_to(motion::prev_big_word(&self.buffer, cursor)),
            Operation::InlineSearch => {
                if let Some(found) = motion::find_in_line(&self.buffer, cursor, arg, Direction::Forward) {
                    self.move_to(found);
                }
            }
            Operation::InlineSearchUntil => {
                if let Some(found) = motion::find_in_line(&self.buffer, cursor, arg, Direction::Forward) {
                    self.move_to(motion::left(&self.buffer, found));
                }
            }
            Operation::InlineSearchBackward => {
                if let Some(found) = motion::find_in_line(&self.buffer, cursor, arg, Direction::Backward) {
                    self.move_to(found);
                }
            }
            Operation::InlineSearchBackwardUntil => {
                if let Some(found) = motion::find_in_line(&self.buffer, cursor, arg, Direction::Backward) {
                    self.move_to(motion::right(&self.buffer, found, self.mode));
                }
            }
            Operation::Move => match LineTarget::parse(arg) {
                Some(target) => self.move_to(motion::goto_line(&self.buffer, cursor, target)),
                None => {
                    warn!("move: unrecognised target `{}`", arg);
                    self.status = Some(format!("Invalid move target: {arg}"));
                }
            },

            Operation::ExecuteCommand => self.execute_command(),
            Operation::DeleteCommand => {
                self.command_line.pop();
            }

            Operation::SaveToFile => {
                let path = Path::new(arg);
                self.status = Some(match self.save_file(path) {
                    Ok(()) => format!("{} written", path.display()),
                    Err(err) => {
                        warn!("save failed: {}", err);
                        error_chain(&err)
                    }
                });
            }
            Operation::LoadFromFile => {
                let path = Path::new(arg);
                self.status = Some(match self.load_file(path) {
                    Ok(()) => format!("{} loaded", path.display()),
                    Err(err) => {
                        warn!("load failed: {}", err);
                        error_chain(&err)
                    }
                });
            }
            Operation::Source => {
                self.status = Some(match self.reload_keymap() {
                    Ok(()) => "Keymap reloaded".to_string(),
                    Err(err) => {
                        warn!("keymap reload failed: {}", err);
                        error_chain(&err)
                    }
                });
            }

            Operation::CleanOplist => {
                self.waiting = false;
                self.redirect = Some(VecDeque::new());
            }
            Operation::PrintOplist => {
                info!(pending = ?self.queue, "token queue");
            }
            Operation::PrintPrefix => {
                info!(prefix = self.counts.prefix, "repeat prefix");
            }
        }
    }

    fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        // Leaving an append position for NORMAL steps back onto the last grapheme
        self.buffer.clamp_cursor(mode);
        debug!("switched to {} mode", mode);
    }

    fn move_to(&mut self, pos: Position) {
        self.buffer.set_cursor(pos, Mode::Insert);
        let Position { line, col } = self.buffer.cursor();
        debug!("cursor moved to ({}, {})", line, col);
    }

    /// Run the command line as NORMAL-mode input.
    fn execute_command(&mut self) {
        let line = std::mem::take(&mut self.command_line);
        self.switch_mode(Mode::Normal);
        let words: VecDeque<Token> = line
            .split(' ')
            .filter(|word| !word.is_empty())
            .map(Token::text)
            .collect();
        debug!(command = %line, "execute command line");

        if words.front().is_some_and(|word| *word == Token::text("q")) {
            info!("quit requested");
            self.quit_requested = true;
            self.redirect = Some(VecDeque::new());
            return;
        }
        self.redirect = Some(words);
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
