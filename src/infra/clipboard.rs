use anyhow::{Context, Result};

use crate::infra::contracts::ClipboardAdapter;

/// System clipboard, connected on first use so that headless sessions only
/// fail when something is actually copied.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardAdapter for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("clipboard is unavailable")?,
        };
        let clipboard = self.clipboard.insert(clipboard);

        clipboard
            .set_text(text.to_owned())
            .context("failed to write to clipboard")
    }
}
