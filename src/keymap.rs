use std::collections::HashMap;

use crate::key::{Token, normalize_key_name};
use crate::types::{Action, Mode};

/// Per-mode binding table from token names to actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    modes: HashMap<Mode, HashMap<String, Action>>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` in `mode`. Key names are normalised (`<Esc>` → `escape`).
    pub fn bind(&mut self, mode: Mode, key: &str, action: Action) -> Option<Action> {
        self.modes
            .entry(mode)
            .or_default()
            .insert(normalize_key_name(key), action)
    }

    pub fn with_binding(mut self, mode: Mode, key: &str, action: Action) -> Self {
        self.bind(mode, key, action);
        self
    }

    pub fn get(&self, mode: Mode, key: &str) -> Option<&Action> {
        self.modes.get(&mode)?.get(key)
    }

    pub fn bindings(&self, mode: Mode) -> impl Iterator<Item = (&str, &Action)> {
        self.modes
            .get(&mode)
            .into_iter()
            .flat_map(|table| table.iter().map(|(key, action)| (key.as_str(), action)))
    }

    pub fn len(&self) -> usize {
        self.modes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a token to its action in `mode`.
    ///
    /// A bound token yields its binding. An unbound token passes through as
    /// its own text, which still names an operation when the text is an
    /// operation name (command-line words rely on this).
    pub fn resolve(&self, mode: Mode, token: &Token) -> Action {
        let bound = self.modes.get(&mode).and_then(|table| {
            token
                .lookup_keys()
                .into_iter()
                .find_map(|key| table.get(&key).cloned())
        });
        bound.unwrap_or_else(|| Action::from_text(&token.as_text()))
    }
}
