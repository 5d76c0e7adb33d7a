use std::cell::RefCell;
use std::rc::Rc;

use vim_runner::traits::Clipboard;

/// Clipboard whose contents stay observable after the engine takes ownership.
#[derive(Default, Debug, Clone)]
pub struct MockClipboard {
    content: Rc<RefCell<Option<String>>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.content.borrow().clone()
    }
}

impl Clipboard for MockClipboard {
    fn get(&mut self) -> Option<String> {
        self.content.borrow().clone()
    }

    fn set(&mut self, text: String) {
        *self.content.borrow_mut() = Some(text);
    }
}
