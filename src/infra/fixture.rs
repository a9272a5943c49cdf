//! Demo chat loaded from a TOML file.

use std::{collections::BTreeMap, fs, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::{
    domain::{
        components::{
            DocumentCaption, DocumentName, Edited, Forwarded, Group, MessageGroupId, Reply, ReplyMarkup, Signed,
            UnreadBar, Via, Views, Voice,
        },
        markup::{ButtonKind, MarkupButton, MarkupFlags, MarkupGrid},
        message::{ChatId, Message, MessageId, MessageMedia, MessageRef},
        open_chat_state::OpenChatState,
        text::format_time,
    },
    infra::error::AppError,
};

const BUILT_IN_CHAT: &str = include_str!("../../demos/chat.toml");
const BUILT_IN_ORIGIN: &str = "<built-in chat>";

#[derive(Debug, Deserialize)]
struct ChatFixture {
    chat_id: i64,
    title: String,
    #[serde(default)]
    messages: Vec<MessageFixture>,
}

#[derive(Debug, Deserialize)]
struct MessageFixture {
    id: i32,
    sender: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    timestamp_ms: i64,
    #[serde(default)]
    outgoing: bool,
    #[serde(default)]
    media: String,
    via: Option<String>,
    views: Option<u32>,
    signed: Option<String>,
    edited_ms: Option<i64>,
    reply_to: Option<i32>,
    unread_bar: Option<u32>,
    album: Option<u64>,
    voice: Option<VoiceFixture>,
    document: Option<DocumentFixture>,
    forwarded: Option<ForwardedFixture>,
    keyboard: Option<KeyboardFixture>,
}

#[derive(Debug, Deserialize)]
struct VoiceFixture {
    duration_ms: u32,
    #[serde(default)]
    position_ms: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DocumentFixture {
    name: String,
    caption: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForwardedFixture {
    from: String,
    author: Option<String>,
    #[serde(default)]
    date_ms: i64,
    #[serde(default)]
    id: i32,
}

#[derive(Debug, Deserialize)]
struct KeyboardFixture {
    #[serde(default = "inline_default")]
    inline: bool,
    #[serde(default)]
    resize: bool,
    #[serde(default)]
    single_use: bool,
    rows: Vec<Vec<ButtonFixture>>,
}

fn inline_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ButtonFixture {
    kind: Option<String>,
    label: String,
    data: Option<String>,
    data_base64: Option<String>,
}

/// Loads the chat at `path`, or the bundled demo chat when no path is given.
pub fn load_chat(path: Option<&Path>) -> Result<OpenChatState, AppError> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| AppError::FixtureRead {
                path: path.to_path_buf(),
                source,
            })?;
            parse_chat(&raw, &path.display().to_string())
        }
        None => parse_chat(BUILT_IN_CHAT, BUILT_IN_ORIGIN),
    }
}

fn parse_chat(raw: &str, origin: &str) -> Result<OpenChatState, AppError> {
    let fixture: ChatFixture = toml::from_str(raw).map_err(|source| AppError::FixtureParse {
        origin: origin.to_owned(),
        source,
    })?;
    let chat_id = ChatId(fixture.chat_id);

    let mut albums = BTreeMap::<u64, Vec<MessageId>>::new();
    let mut messages = Vec::with_capacity(fixture.messages.len());
    for message in fixture.messages {
        if let Some(album) = message.album {
            albums.entry(album).or_default().push(MessageId(message.id));
        }
        messages.push(build_message(chat_id, message, origin)?);
    }

    check_reply_targets(&messages, origin)?;
    group_albums(&mut messages, &albums);
    tracing::debug!(origin, chat_id = chat_id.0, messages = messages.len(), "chat fixture loaded");

    Ok(OpenChatState::open(chat_id, fixture.title, messages))
}

fn build_message(chat_id: ChatId, fixture: MessageFixture, origin: &str) -> Result<Message, AppError> {
    let mut message = Message::new(MessageRef::new(chat_id.0, fixture.id), fixture.sender, fixture.text);
    message.timestamp_ms = fixture.timestamp_ms;
    message.is_outgoing = fixture.outgoing;
    message.media = MessageMedia::from_wire(&fixture.media);

    let via = fixture.via.map(Via::new);
    if let Some(forwarded) = fixture.forwarded {
        let mut header = Forwarded::new(forwarded.from, forwarded.date_ms, MessageId(forwarded.id));
        header.original_author = forwarded.author;
        header.create(via.as_ref());
        message.components.insert(header);
    }
    if let Some(via) = via {
        message.components.insert(via);
    }
    if let Some(count) = fixture.views {
        message.components.insert(Views::new(count));
    }
    if let Some(author) = fixture.signed {
        let mut signed = Signed::new(author);
        signed.refresh(&format_time(fixture.timestamp_ms));
        message.components.insert(signed);
    }
    if let Some(edited_ms) = fixture.edited_ms {
        message.components.insert(Edited::new(edited_ms));
    }
    if let Some(reply_to) = fixture.reply_to {
        message.components.insert(Reply::new(MessageId(reply_to)));
    }
    if let Some(count) = fixture.unread_bar {
        message.components.insert(UnreadBar::new(count));
    }
    if let Some(voice) = fixture.voice {
        let mut component = Voice::new(voice.duration_ms);
        if let Some(position) = voice.position_ms {
            component.update_position(position, voice.duration_ms);
        }
        message.components.insert(component);
    }
    if let Some(document) = fixture.document {
        message.components.insert(DocumentName::new(document.name));
        if let Some(caption) = document.caption {
            message.components.insert(DocumentCaption::new(caption));
        }
    }
    if let Some(keyboard) = fixture.keyboard {
        message.components.insert(build_markup(keyboard, fixture.id, origin)?);
    }

    Ok(message)
}

fn build_markup(keyboard: KeyboardFixture, message_id: i32, origin: &str) -> Result<ReplyMarkup, AppError> {
    let flags = MarkupFlags {
        inline: keyboard.inline,
        resize: keyboard.resize,
        single_use: keyboard.single_use,
        selective: false,
    };

    let rows = keyboard
        .rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|button| build_button(button, message_id, origin))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReplyMarkup::new(flags, MarkupGrid::new(rows)))
}

fn build_button(button: ButtonFixture, message_id: i32, origin: &str) -> Result<MarkupButton, AppError> {
    let payload = match (button.data, button.data_base64) {
        (Some(_), Some(_)) => {
            return Err(AppError::FixtureInvalid {
                origin: origin.to_owned(),
                details: format!(
                    "button \"{}\" of message {message_id} sets both data and data_base64",
                    button.label
                ),
            })
        }
        (Some(text), None) => text.into_bytes(),
        (None, Some(encoded)) => STANDARD.decode(encoded.trim()).map_err(|error| AppError::FixtureInvalid {
            origin: origin.to_owned(),
            details: format!("button \"{}\" of message {message_id}: {error}", button.label),
        })?,
        (None, None) => Vec::new(),
    };

    let kind = button
        .kind
        .as_deref()
        .map_or(ButtonKind::Default, ButtonKind::from_wire);
    Ok(MarkupButton::new(kind, button.label, payload))
}

/// Gives every member of a multi-message album its group. The first
/// message of an album leads it.
fn group_albums(messages: &mut [Message], albums: &BTreeMap<u64, Vec<MessageId>>) {
    for (album, members) in albums {
        let [leader, others @ ..] = members.as_slice() else {
            continue;
        };
        if others.is_empty() {
            continue;
        }
        for message in messages.iter_mut().filter(|message| members.contains(&message.reference.message_id)) {
            message
                .components
                .insert(Group::new(MessageGroupId(*album), *leader, others.to_vec()));
        }
    }
}

fn check_reply_targets(messages: &[Message], origin: &str) -> Result<(), AppError> {
    for message in messages {
        let Some(reply) = message.components.get::<Reply>() else {
            continue;
        };
        let known = messages
            .iter()
            .any(|candidate| candidate.reference.message_id == reply.reply_to());
        if !known {
            return Err(AppError::FixtureInvalid {
                origin: origin.to_owned(),
                details: format!(
                    "message {} replies to unknown message {}",
                    message.reference.message_id.0,
                    reply.reply_to().0
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::markup::{ButtonCoords, MarkupResolver};

    #[test]
    fn built_in_chat_loads_with_keyboards() {
        let chat = load_chat(None).expect("built-in chat must load");

        assert!(!chat.messages().is_empty());
        assert!(chat.first_with_markup().is_some());
    }

    #[test]
    fn parses_buttons_with_text_and_base64_payloads() {
        let raw = r#"
chat_id = 7
title = "Bots"

[[messages]]
id = 1
sender = "Bot"
text = "Pick"

[messages.keyboard]
rows = [
  [ { kind = "callback", label = "Yes", data = "yes" }, { kind = "game", label = "Play", data_base64 = "AAEC" } ],
  [ { kind = "url", label = "Site", data = "https://example.com" } ],
]
"#;

        let chat = parse_chat(raw, "test").expect("fixture must parse");
        let grid = chat.markup(MessageRef::new(7, 1)).expect("markup");

        let yes = grid.button(ButtonCoords::new(0, 0)).expect("yes button");
        assert_eq!(yes.kind(), ButtonKind::Callback);
        assert_eq!(yes.payload(), b"yes");
        let play = grid.button(ButtonCoords::new(0, 1)).expect("play button");
        assert_eq!(play.payload(), &[0, 1, 2]);
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(chat.chat_title(), "Bots");
    }

    #[test]
    fn decorations_become_components() {
        let raw = r#"
chat_id = 1
title = "Channel"

[[messages]]
id = 3
sender = "News"
text = "Post"
views = 1500
signed = "Alice"
via = "pizzabot"
unread_bar = 2

[messages.forwarded]
from = "Daily"
author = "Bob"
"#;

        let chat = parse_chat(raw, "test").expect("fixture must parse");
        let message = &chat.messages()[0];

        assert!(message.components.has::<Views>());
        assert!(message.components.has::<Signed>());
        assert!(message.components.has::<UnreadBar>());
        let forwarded = message.components.get::<Forwarded>().expect("forward header");
        assert_eq!(forwarded.text(), "Forwarded from Daily (Bob) via @pizzabot");
    }

    #[test]
    fn albums_and_documents_become_components() {
        let raw = r#"
chat_id = 1
title = "Files"

[[messages]]
id = 1
sender = "Alice"
media = "photo"
album = 5

[[messages]]
id = 2
sender = "Alice"
media = "photo"
album = 5

[[messages]]
id = 3
sender = "Alice"
media = "photo"
album = 6

[[messages]]
id = 4
sender = "Alice"
media = "document"

[messages.document]
name = "menu.pdf"
caption = "Full menu"
"#;

        let chat = parse_chat(raw, "test").expect("fixture must parse");
        let messages = chat.messages();

        for message in &messages[..2] {
            let group = message.components.get::<Group>().expect("album member");
            assert_eq!(group.id(), MessageGroupId(5));
            assert_eq!(group.leader(), MessageId(1));
            assert_eq!(group.item_count(), 2);
        }
        assert!(!messages[2].components.has::<Group>(), "single-message album stays ungrouped");
        assert!(messages[3].components.has::<DocumentName>());
        assert!(messages[3].components.has::<DocumentCaption>());
    }

    #[test]
    fn bad_base64_is_reported() {
        let raw = r#"
chat_id = 1
title = "Bots"

[[messages]]
id = 1
sender = "Bot"

[messages.keyboard]
rows = [[ { kind = "callback", label = "Broken", data_base64 = "***" } ]]
"#;

        let error = parse_chat(raw, "test").expect_err("bad payload must fail");

        assert!(matches!(error, AppError::FixtureInvalid { .. }));
        assert!(error.to_string().contains("Broken"));
    }

    #[test]
    fn unknown_reply_target_is_reported() {
        let raw = r#"
chat_id = 1
title = "Chat"

[[messages]]
id = 2
sender = "Alice"
text = "answer"
reply_to = 99
"#;

        let error = parse_chat(raw, "test").expect_err("dangling reply must fail");

        assert!(error.to_string().contains("unknown message 99"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let error = load_chat(Some(Path::new("./no-such-chat.toml"))).expect_err("missing file must fail");

        assert!(matches!(error, AppError::FixtureRead { .. }));
    }

    #[test]
    fn loads_chat_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp fixture");
        file.write_all(b"chat_id = 3\ntitle = \"Empty\"\n")
            .expect("fixture must be writable");

        let chat = load_chat(Some(file.path())).expect("fixture must load");

        assert_eq!(chat.chat_title(), "Empty");
        assert!(chat.messages().is_empty());
    }
}
