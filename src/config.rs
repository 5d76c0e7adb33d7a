//! Keymap loading.
//!
//! Keymaps are TOML documents with one table per mode under `keybindings`:
//!
//! ```toml
//! [keybindings.NORMAL]
//! i = "switch_to_insert"
//! x = ["l", "delete_char"]
//! "<Esc>" = "switch_to_normal"
//! ```
//!
//! A string value names an operation, or else is literal text. An array is a
//! macro expanded into further tokens.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::keymap::Keymap;
use crate::types::{Action, Mode};

const DEFAULT_KEYMAP: &str = include_str!("../config/default.toml");

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    keybindings: BTreeMap<String, BTreeMap<String, RawAction>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAction {
    Text(String),
    Macro(Vec<String>),
}

impl Keymap {
    /// The keymap shipped with the crate.
    pub fn builtin() -> Result<Keymap, ConfigError> {
        Keymap::from_toml_str(DEFAULT_KEYMAP)
    }

    pub fn from_toml_str(contents: &str) -> Result<Keymap, ConfigError> {
        let raw: RawConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse { source })?;
        let mut keymap = Keymap::new();
        for (mode_name, table) in raw.keybindings {
            let mode = Mode::from_name(&mode_name).ok_or_else(|| ConfigError::UnknownMode(mode_name.clone()))?;
            for (key, raw_action) in table {
                let action = match raw_action {
                    RawAction::Text(text) => Action::from_text(&text),
                    RawAction::Macro(tokens) if tokens.is_empty() => {
                        return Err(ConfigError::EmptyMacro {
                            mode: mode.name().to_string(),
                            key,
                        });
                    }
                    RawAction::Macro(tokens) => Action::Macro(tokens),
                };
                keymap.bind(mode, &key, action);
            }
        }
        Ok(keymap)
    }

    pub fn load(path: &Path) -> Result<Keymap, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Keymap::from_toml_str(&contents)
    }
}
