//! Terminal host: crossterm input, ratatui rendering.
//!
//! Run with: cargo run --features tui -- [--config keymap.toml] [FILE]

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tracing::{info, warn};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;
use vim_runner::{Engine, KeyCode, KeyEvent, Keymap, Mode, Modifiers, Token, logging};

const BACKGROUND: Color = Color::Rgb(0x2b, 0x2f, 0x40);
const CURRENT_LINE: Color = Color::Rgb(0x35, 0x39, 0x4b);

#[derive(Debug, Parser)]
#[command(version, about = "Modal text editor driven by a configurable keymap")]
struct Cli {
    /// Keymap file; the built-in keymap is used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// File to open
    file: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging().context("initialize logging failed")?;

    let mut builder = Engine::builder();
    let keymap = match &cli.config {
        Some(path) => {
            builder = builder.keymap_path(path);
            Keymap::load(path).with_context(|| format!("load keymap {}", path.display()))?
        }
        None => Keymap::builtin().context("load built-in keymap")?,
    };
    let mut engine = builder.keymap(keymap).build();

    if let Some(path) = &cli.file {
        // A missing file starts an empty buffer
        if let Err(err) = engine.load_file(path) {
            warn!("open {} failed: {}", path.display(), err);
        }
    }

    enable_raw_mode().context("enable raw mode failed")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen failed")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).context("create terminal failed")?;

    let result = event_loop(&mut terminal, &mut engine);

    disable_raw_mode().context("disable raw mode failed")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen failed")?;
    terminal.show_cursor().context("show cursor failed")?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, engine: &mut Engine) -> Result<()> {
    while !engine.should_quit() {
        terminal.draw(|frame| draw(frame, engine)).context("draw failed")?;
        if !event::poll(Duration::from_millis(33)).context("poll input failed")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("read input failed")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(token) = translate(key) {
                engine.handle_input(token);
            }
        }
    }
    info!("leaving event loop");
    Ok(())
}

fn translate(key: CKeyEvent) -> Option<Token> {
    let code = match key.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        _ => return None,
    };
    let mut mods = Modifiers::empty();
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::CTRL;
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::ALT;
    }
    if key.modifiers.contains(KeyModifiers::SUPER) {
        mods |= Modifiers::META;
    }
    Some(Token::Key(KeyEvent::with_mods(code, mods)))
}

fn draw(frame: &mut Frame, engine: &Engine) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.size());
    let text_area = chunks[0];
    let cursor = engine.cursor();

    let visible = text_area.height as usize;
    let scroll = cursor
        .line
        .saturating_sub(visible / 2)
        .min(engine.lines().len().saturating_sub(visible));

    let lines: Vec<Line> = engine
        .lines()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .map(|(idx, text)| {
            let line = Line::from(text.as_str());
            if idx == cursor.line {
                line.style(Style::default().bg(CURRENT_LINE))
            } else {
                line
            }
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(BACKGROUND).fg(Color::White)),
        text_area,
    );

    let status = match engine.mode() {
        Mode::Command => Line::from(format!(":{}", engine.command_line())),
        mode => {
            let label = match mode {
                Mode::Normal => String::new(),
                other => format!("-- {other} --"),
            };
            let message = engine.status().unwrap_or_default();
            Line::from(vec![
                Span::raw(label),
                Span::raw("  "),
                Span::raw(message.to_string()),
                Span::raw("  "),
                Span::raw(format!("{},{}", cursor.line, cursor.col)),
            ])
        }
    };
    frame.render_widget(Paragraph::new(status), chunks[1]);

    match engine.mode() {
        Mode::Command => {
            let col = to_cells(engine.command_line().width() + 1);
            frame.set_cursor(chunks[1].x.saturating_add(col), chunks[1].y);
        }
        _ => {
            let row = to_cells(cursor.line - scroll);
            let line = engine.lines().get(cursor.line).map(String::as_str).unwrap_or("");
            let col = to_cells(display_width(line, cursor.col));
            frame.set_cursor(text_area.x.saturating_add(col), text_area.y.saturating_add(row));
        }
    }
}

/// Terminal cells taken by the first `col` graphemes of `line`.
fn display_width(line: &str, col: usize) -> usize {
    line.graphemes(true).take(col).map(UnicodeWidthStr::width).sum()
}

fn to_cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
