//! Clipboard seam for the copy buttons.

use std::io;

use tracing::warn;

/// Somewhere copied text can be placed.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

/// Confirmation shown after a copy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

pub const COPIED: Notice = Notice {
    title: "Copied",
    description: "Text copied to clipboard",
};

/// Best-effort copy: a failed write is logged, and the confirmation is
/// returned either way.
pub fn copy_to_clipboard(clipboard: &mut dyn Clipboard, text: &str) -> Notice {
    if let Err(err) = clipboard.write_text(text) {
        warn!(%err, "clipboard write failed");
    }
    COPIED
}
