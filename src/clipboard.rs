use crate::traits::Clipboard;

/// In-memory slot holding the last deleted line.
#[derive(Debug, Default, Clone)]
pub struct LineSlot {
    content: Option<String>,
}

impl LineSlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for LineSlot {
    fn get(&mut self) -> Option<String> {
        self.content.clone()
    }

    fn set(&mut self, text: String) {
        self.content = Some(text);
    }
}

/// The deleted-line slot backed by the system clipboard.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, arboard::Error> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn get(&mut self) -> Option<String> {
        self.inner.get_text().ok()
    }

    fn set(&mut self, text: String) {
        if let Err(err) = self.inner.set_text(text) {
            tracing::warn!("system clipboard write failed: {}", err);
        }
    }
}
