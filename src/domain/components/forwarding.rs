//! Forward headers and reply previews.

use crate::domain::{
    message::{ChatId, Message, MessageId, MessageRef},
    text::elide,
};

use super::Via;

/// Lookup of live messages by stable reference.
pub trait MessageLookup {
    fn find_message(&self, reference: MessageRef) -> Option<&Message>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forwarded {
    pub original_sender: String,
    pub original_author: Option<String>,
    pub original_date_ms: i64,
    pub original_id: MessageId,
    pub saved_from: Option<MessageRef>,
    text: String,
}

impl Forwarded {
    pub fn new(original_sender: impl Into<String>, original_date_ms: i64, original_id: MessageId) -> Self {
        Self {
            original_sender: original_sender.into(),
            original_author: None,
            original_date_ms,
            original_id,
            saved_from: None,
            text: String::new(),
        }
    }

    /// Builds the header text. The inline bot is named only when the
    /// message came through one.
    pub fn create(&mut self, via: Option<&Via>) {
        let name = match &self.original_author {
            Some(author) if !author.is_empty() => format!("{} ({author})", self.original_sender),
            _ => self.original_sender.clone(),
        };
        self.text = match via {
            Some(via) => format!("Forwarded from {name} via @{}", via.bot_username()),
            None => format!("Forwarded from {name}"),
        };
    }

    pub fn text(&self) -> &str {
        &self.text
    }

}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPreview {
    /// Target not seen yet; it may still arrive.
    Pending,
    Resolved { sender: String, text: String },
    Deleted,
}

/// Quote of the message being replied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    reply_to: MessageId,
    preview: ReplyPreview,
    name_line: String,
    text_line: String,
}

/// Width of the quote bar drawn left of the preview.
const QUOTE_BAR_WIDTH: u16 = 2;

impl Reply {
    pub fn new(reply_to: MessageId) -> Self {
        let mut reply = Self {
            reply_to,
            preview: ReplyPreview::Pending,
            name_line: String::new(),
            text_line: String::new(),
        };
        reply.refresh_lines();
        reply
    }

    pub fn reply_to(&self) -> MessageId {
        self.reply_to
    }

    #[cfg(test)]
    pub fn preview(&self) -> &ReplyPreview {
        &self.preview
    }

    /// Reference the preview jumps to when clicked.
    pub fn target(&self, chat_id: ChatId) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: self.reply_to,
        }
    }

    /// Tries to resolve the quoted message. Returns true once the preview
    /// is settled: resolved, or given up on when `force` is set.
    pub fn update_data(&mut self, chat_id: ChatId, lookup: &dyn MessageLookup, force: bool) -> bool {
        if matches!(self.preview, ReplyPreview::Resolved { .. }) && !force {
            return true;
        }

        let settled = match lookup.find_message(self.target(chat_id)) {
            Some(message) => {
                self.preview = ReplyPreview::Resolved {
                    sender: message.sender_name.clone(),
                    text: message.display_content(),
                };
                true
            }
            None if force => {
                self.preview = ReplyPreview::Deleted;
                true
            }
            None => false,
        };
        self.refresh_lines();
        settled
    }

    /// Called when a message of the chat is removed.
    pub fn item_removed(&mut self, removed: MessageId) {
        if removed == self.reply_to {
            self.preview = ReplyPreview::Deleted;
            self.refresh_lines();
        }
    }

    /// Name and text lines elided to fit `width` cells including the quote bar.
    pub fn resize(&self, width: u16) -> (String, String) {
        let available = width.saturating_sub(QUOTE_BAR_WIDTH);
        (
            elide(&self.name_line, available),
            elide(&self.text_line, available),
        )
    }

    fn refresh_lines(&mut self) {
        let (name, text) = match &self.preview {
            ReplyPreview::Pending => (String::new(), "Loading...".to_owned()),
            ReplyPreview::Deleted => (String::new(), "Deleted message".to_owned()),
            ReplyPreview::Resolved { sender, text } => {
                (sender.clone(), text.lines().next().unwrap_or_default().to_owned())
            }
        };
        self.name_line = name;
        self.text_line = text;
    }
}
