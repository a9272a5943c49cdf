use anyhow::Result;

use crate::{
    domain::message::MessageRef,
    infra::contracts::{ClipboardAdapter, ExternalOpener},
    usecases::{activate_button::ButtonAction, contracts::ButtonActionSink},
};

#[derive(Debug, Clone, Default)]
pub struct NoopOpener;

impl ExternalOpener for NoopOpener {
    fn open(&self, _target: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingClipboard {
    pub copied: Vec<String>,
}

impl ClipboardAdapter for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.copied.push(text.to_owned());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingActionSink {
    pub dispatched: Vec<(MessageRef, ButtonAction)>,
}

impl ButtonActionSink for RecordingActionSink {
    fn dispatch(&mut self, message: MessageRef, action: &ButtonAction) -> Result<()> {
        self.dispatched.push((message, action.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_clipboard_keeps_order() {
        let mut clipboard = RecordingClipboard::default();
        clipboard.set_text("one").expect("copy");
        clipboard.set_text("two").expect("copy");

        assert_eq!(clipboard.copied, vec!["one".to_owned(), "two".to_owned()]);
    }

    #[test]
    fn noop_opener_accepts_anything() {
        NoopOpener.open("https://example.com").expect("noop open");
    }
}
