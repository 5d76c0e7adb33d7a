pub mod buffer;
pub mod clipboard;
pub mod config;
pub mod engine;
pub mod error;
pub mod file_io;
pub mod key;
pub mod keymap;
#[cfg(feature = "tui")]
pub mod logging;
pub mod motion;
pub mod ops;
pub mod traits;
pub mod types;

pub use crate::buffer::Buffer;
pub use crate::clipboard::LineSlot;
#[cfg(feature = "clipboard")]
pub use crate::clipboard::SystemClipboard;
pub use crate::engine::{Engine, EngineBuilder, EngineSnapshot};
pub use crate::error::{ConfigError, FileIoError};
pub use crate::key::{KeyCode, KeyEvent, Modifiers, Token};
pub use crate::keymap::Keymap;
pub use crate::ops::Operation;
pub use crate::traits::{Clipboard, TextOps};
pub use crate::types::{Action, Mode, Position};
