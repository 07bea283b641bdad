//! Clipboard collaborator
//!
//! The engine itself never writes the clipboard; it emits a
//! `WriteClipboard` effect and the shell executes it through this trait,
//! feeding the outcome back as a `ClipboardFinished` event. Failures are
//! advisory only and never touch conversion state.

use std::cell::RefCell;

use epochal_core::{ConvertError, ConvertResult};

/// Text sink for copy actions.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> ConvertResult<()>;
}

/// Shell without clipboard access. Every write reports
/// `ClipboardUnavailable`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullClipboard;

impl Clipboard for NullClipboard {
    fn write_text(&self, _text: &str) -> ConvertResult<()> {
        Err(ConvertError::ClipboardUnavailable)
    }
}

/// In-memory clipboard recording every write, for tests and simulations.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: RefCell<Vec<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        MemoryClipboard::default()
    }

    /// Most recent write, if any.
    pub fn last(&self) -> Option<String> {
        self.writes.borrow().last().cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> ConvertResult<()> {
        self.writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}
