use std::path::PathBuf;

use thiserror::Error;

/// Keymap source could not be turned into a [`Keymap`](crate::Keymap).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read keymap {path} failed")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse keymap failed")]
    Parse {
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown mode `{0}` in keybindings")]
    UnknownMode(String),
    #[error("macro bound to `{key}` in {mode} is empty")]
    EmptyMacro { mode: String, key: String },
    #[error("no keymap path to reload from")]
    NoSource,
}

#[derive(Debug, Error)]
pub enum FileIoError {
    #[error("{0} not found")]
    NotFound(PathBuf),
    #[error("read {path} failed")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write {path} failed")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
