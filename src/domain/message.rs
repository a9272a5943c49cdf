use super::components::MessageComponents;

/// Chat id as issued by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatId(pub i64);

/// Message id, unique within a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub i32);

/// A stable reference to a message that survives the message object itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl MessageRef {
    pub fn new(chat_id: i64, message_id: i32) -> Self {
        Self {
            chat_id: ChatId(chat_id),
            message_id: MessageId(message_id),
        }
    }
}

/// Type of media attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageMedia {
    #[default]
    None,
    Photo,
    Voice,
    Video,
    Sticker,
    Document,
    Other,
}

impl MessageMedia {
    /// Returns a display label for the media type, or None if no media.
    pub fn display_label(&self) -> Option<&'static str> {
        match self {
            MessageMedia::None => None,
            MessageMedia::Photo => Some("[Photo]"),
            MessageMedia::Voice => Some("[Voice]"),
            MessageMedia::Video => Some("[Video]"),
            MessageMedia::Sticker => Some("[Sticker]"),
            MessageMedia::Document => Some("[Document]"),
            MessageMedia::Other => Some("[Media]"),
        }
    }

    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "" | "none" => MessageMedia::None,
            "photo" => MessageMedia::Photo,
            "voice" => MessageMedia::Voice,
            "video" => MessageMedia::Video,
            "sticker" => MessageMedia::Sticker,
            "document" => MessageMedia::Document,
            _ => MessageMedia::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub reference: MessageRef,
    pub sender_name: String,
    pub text: String,
    pub timestamp_ms: i64,
    pub is_outgoing: bool,
    pub media: MessageMedia,
    pub components: MessageComponents,
}

impl Message {
    pub fn new(reference: MessageRef, sender_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference,
            sender_name: sender_name.into(),
            text: text.into(),
            timestamp_ms: 0,
            is_outgoing: false,
            media: MessageMedia::None,
            components: MessageComponents::default(),
        }
    }

    /// Returns the display content: media label + text, or just text if no media.
    pub fn display_content(&self) -> String {
        match (self.media.display_label(), self.text.is_empty()) {
            (Some(label), true) => label.to_owned(),
            (Some(label), false) => format!("{} {}", label, self.text),
            (None, _) => self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str, media: MessageMedia) -> Message {
        let mut message = Message::new(MessageRef::new(1, 1), "User", text);
        message.media = media;
        message
    }

    #[test]
    fn display_label_returns_none_for_no_media() {
        assert_eq!(MessageMedia::None.display_label(), None);
    }

    #[test]
    fn display_content_returns_text_only_when_no_media() {
        assert_eq!(msg("Hello world", MessageMedia::None).display_content(), "Hello world");
    }

    #[test]
    fn display_content_returns_media_label_only_when_text_empty() {
        assert_eq!(msg("", MessageMedia::Voice).display_content(), "[Voice]");
    }

    #[test]
    fn display_content_combines_media_label_and_text() {
        assert_eq!(
            msg("Check this out", MessageMedia::Photo).display_content(),
            "[Photo] Check this out"
        );
    }

    #[test]
    fn media_from_wire_treats_unknown_as_other() {
        assert_eq!(MessageMedia::from_wire("voice"), MessageMedia::Voice);
        assert_eq!(MessageMedia::from_wire("hologram"), MessageMedia::Other);
        assert_eq!(MessageMedia::from_wire(""), MessageMedia::None);
    }

    #[test]
    fn message_refs_order_by_chat_then_message() {
        assert!(MessageRef::new(1, 9) < MessageRef::new(2, 1));
        assert!(MessageRef::new(1, 1) < MessageRef::new(1, 2));
    }
}
