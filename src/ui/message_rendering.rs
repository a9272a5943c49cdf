//! Message list rendering logic.
//!
//! Turns messages into blocks of styled lines:
//! - day marks and the unread bar above a message
//! - forward header, then time + sender (grouped for consecutive messages)
//! - reply preview behind a quote bar
//! - album size on the first message of an album
//! - text with media indicators, document name and caption, voice progress
//! - footer annotations (signature, edit mark, views)
//!
//! The inline keyboard is not part of the lines; the view paints it right
//! under the block.

use ratatui::{
    layout::Alignment,
    text::{Line, Span},
};

use crate::domain::{
    components::{
        DateMark, DocumentCaption, DocumentName, Edited, Forwarded, Group, MessageGroupId, Reply, ReplyMarkup, Signed,
        UnreadBar, Via, Views, Voice,
    },
    message::{Message, MessageRef},
    text::{display_width, elide, format_time},
};

use super::styles;

/// Indent of message content, aligned with the time column.
pub const CONTENT_INDENT: u16 = 6;

const VOICE_BAR_CELLS: usize = 20;

/// Rendered lines of one message plus whether a keyboard follows them.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBlock {
    pub reference: MessageRef,
    pub lines: Vec<Line<'static>>,
    pub has_keyboard: bool,
}

/// Builds the visual blocks of `messages` for a viewport `width` cells wide.
pub fn build_message_blocks(messages: &[Message], width: u16) -> Vec<MessageBlock> {
    let content_width = width.saturating_sub(CONTENT_INDENT);
    let mut blocks = Vec::with_capacity(messages.len());
    let mut prev_sender: Option<&str> = None;
    let mut prev_group: Option<MessageGroupId> = None;

    for message in messages {
        let mut lines = Vec::new();

        if let Some(mark) = message.components.get::<DateMark>() {
            lines.push(Line::default());
            lines.push(date_mark_line(mark));
            lines.push(Line::default());
            prev_sender = None;
            prev_group = None;
        }

        if let Some(bar) = message.components.get::<UnreadBar>() {
            for _ in 0..UnreadBar::margin_top() {
                lines.push(Line::default());
            }
            lines.push(unread_bar_line(bar, width));
            prev_sender = None;
            prev_group = None;
        }

        let forwarded = message.components.get::<Forwarded>();
        let sender_name = effective_sender_name(message);
        let group = message.components.get::<Group>();
        // Album members after the first one continue the leader's block.
        let continues_album = group.is_some_and(|group| prev_group == Some(group.id()));
        let show_sender = !continues_album && (forwarded.is_some() || prev_sender != Some(sender_name));

        if let Some(forwarded) = forwarded {
            lines.push(indented(vec![Span::styled(
                elide(forwarded.text(), content_width),
                styles::forward_header_style(),
            )]));
        }

        let time = format_time(message.timestamp_ms);
        let via = message
            .components
            .get::<Via>()
            .filter(|_| forwarded.is_none());
        let mut content = message.display_content().lines().map(str::to_owned).collect::<Vec<_>>();

        if show_sender {
            lines.push(header_line(&time, sender_name, via, width));
        }

        if let Some(reply) = message.components.get::<Reply>() {
            lines.extend(reply_lines(reply, content_width));
        }

        if let Some(group) = group.filter(|group| group.leader() == message.reference.message_id) {
            lines.push(indented(vec![Span::styled(
                elide(&format!("Album · {} items", group.item_count()), content_width),
                styles::annotation_style(),
            )]));
        }

        if !show_sender {
            // Grouped message: time shares the row with the first content line.
            let first = if content.is_empty() {
                None
            } else {
                Some(content.remove(0))
            };
            let mut spans = vec![Span::styled(format!("{time:>5} "), styles::message_time_style())];
            spans.extend(content_spans(first.as_deref()));
            lines.push(Line::from(spans));
        } else if content.is_empty() {
            lines.push(indented(content_spans(None)));
        }

        for text_line in &content {
            lines.push(indented(content_spans(Some(text_line))));
        }

        if let Some(name) = message.components.get::<DocumentName>() {
            lines.push(indented(document_name_spans(name, content_width)));
        }

        if let Some(caption) = message.components.get::<DocumentCaption>() {
            for caption_line in caption.lines() {
                lines.push(indented(vec![Span::styled(
                    elide(caption_line, content_width),
                    styles::message_text_style(),
                )]));
            }
        }

        if let Some(voice) = message.components.get::<Voice>() {
            lines.push(indented(voice_spans(voice)));
        }

        if let Some(footer) = footer_line(message, width) {
            lines.push(footer);
        }

        blocks.push(MessageBlock {
            reference: message.reference,
            lines,
            has_keyboard: message
                .components
                .get::<ReplyMarkup>()
                .is_some_and(|markup| !markup.grid().is_empty()),
        });
        prev_sender = Some(sender_name);
        prev_group = group.map(Group::id);
    }

    blocks
}

fn date_mark_line(mark: &DateMark) -> Line<'static> {
    Line::from(vec![Span::styled(
        format!("——— {} ———", mark.text()),
        styles::date_separator_style(),
    )])
    .alignment(Alignment::Center)
}

fn unread_bar_line(bar: &UnreadBar, width: u16) -> Line<'static> {
    Line::from(vec![Span::styled(
        elide(&format!("── {} ──", bar.text()), width),
        styles::unread_bar_style(),
    )])
    .alignment(Alignment::Center)
}

fn header_line(time: &str, sender: &str, via: Option<&Via>, width: u16) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("{time:>5} "), styles::message_time_style()),
        Span::styled(sender.to_owned(), styles::message_sender_style()),
    ];
    if let Some(via) = via {
        // Time column, sender, the gap before the marker and the trailing colon.
        let used = CONTENT_INDENT + display_width(sender) + 2;
        let mut via = via.clone();
        via.resize(width.saturating_sub(used));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(via.text().to_owned(), styles::annotation_style()));
    }
    spans.push(Span::styled(":", styles::message_sender_style()));
    Line::from(spans)
}

fn reply_lines(reply: &Reply, width: u16) -> Vec<Line<'static>> {
    let (name, text) = reply.resize(width);
    let mut lines = Vec::with_capacity(2);
    if !name.is_empty() {
        lines.push(indented(vec![
            Span::styled("▍ ", styles::reply_bar_style()),
            Span::styled(name, styles::reply_sender_style()),
        ]));
    }
    lines.push(indented(vec![
        Span::styled("▍ ", styles::reply_bar_style()),
        Span::styled(text, styles::reply_text_style()),
    ]));
    lines
}

fn document_name_spans(name: &DocumentName, width: u16) -> Vec<Span<'static>> {
    const ICON: &str = "📎 ";
    vec![
        Span::styled(ICON, styles::message_media_style()),
        Span::styled(
            name.fitted(width.saturating_sub(display_width(ICON))).into_owned(),
            styles::message_media_style(),
        ),
    ]
}

fn voice_spans(voice: &Voice) -> Vec<Span<'static>> {
    let progress = voice.display_progress();
    let filled = ((progress * VOICE_BAR_CELLS as f64).round() as usize).min(VOICE_BAR_CELLS);
    let position_ms = voice.playback().map_or(0, |playback| playback.position_ms);
    vec![
        Span::styled("▶ ", styles::voice_progress_style()),
        Span::styled("━".repeat(filled), styles::voice_progress_style()),
        Span::styled("─".repeat(VOICE_BAR_CELLS - filled), styles::annotation_style()),
        Span::styled(
            format!(" {} / {}", format_duration(position_ms), format_duration(voice.duration_ms())),
            styles::annotation_style(),
        ),
    ]
}

/// Right-aligned footer with signature, edit mark and views.
fn footer_line(message: &Message, width: u16) -> Option<Line<'static>> {
    let mut parts = Vec::new();
    if let Some(signed) = message.components.get::<Signed>() {
        parts.push(signed.signature().to_owned());
    }
    if let Some(edited) = message.components.get::<Edited>() {
        parts.push(edited.text().to_owned());
    }
    if let Some(views) = message.components.get::<Views>() {
        parts.push(format!("👁 {}", views.text()));
    }
    if parts.is_empty() {
        return None;
    }

    let text = elide(&parts.join(" · "), width);
    Some(Line::from(vec![Span::styled(text, styles::annotation_style())]).alignment(Alignment::Right))
}

fn format_duration(ms: u32) -> String {
    let seconds = ms / 1_000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn indented(spans: Vec<Span<'static>>) -> Line<'static> {
    let mut line_spans = vec![Span::raw(" ".repeat(usize::from(CONTENT_INDENT)))];
    line_spans.extend(spans);
    Line::from(line_spans)
}

/// Builds styled spans for content line, highlighting media indicators in cyan.
fn content_spans(text: Option<&str>) -> Vec<Span<'static>> {
    let Some(text) = text else {
        return vec![Span::styled("[Empty message]", styles::message_media_style())];
    };

    if text.starts_with('[') {
        if let Some(end_bracket) = text.find(']') {
            let media_part = &text[..=end_bracket];
            let rest = text[end_bracket + 1..].trim_start();

            if rest.is_empty() {
                return vec![Span::styled(media_part.to_owned(), styles::message_media_style())];
            }
            return vec![
                Span::styled(media_part.to_owned(), styles::message_media_style()),
                Span::raw(" "),
                Span::styled(rest.to_owned(), styles::message_text_style()),
            ];
        }
    }

    vec![Span::styled(text.to_owned(), styles::message_text_style())]
}

fn effective_sender_name(message: &Message) -> &str {
    if message.is_outgoing {
        "You"
    } else {
        &message.sender_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        markup::{ButtonKind, MarkupButton, MarkupFlags, MarkupGrid},
        message::{MessageId, MessageMedia},
    };

    const FEB_14_2026_10AM: i64 = 1771059600000;

    fn msg(id: i32, sender: &str, text: &str, outgoing: bool) -> Message {
        let mut message = Message::new(MessageRef::new(1, id), sender, text);
        message.timestamp_ms = FEB_14_2026_10AM + i64::from(id) * 60_000;
        message.is_outgoing = outgoing;
        message
    }

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn texts(block: &MessageBlock) -> Vec<String> {
        block.lines.iter().map(text_of).collect()
    }

    #[test]
    fn date_mark_renders_centered_separator() {
        let mut message = msg(1, "Alice", "Hello", false);
        message.components.insert(DateMark::from_date(
            chrono::NaiveDate::from_ymd_opt(2026, 2, 14).expect("valid date"),
        ));

        let blocks = build_message_blocks(&[message], 60);

        assert_eq!(texts(&blocks[0])[1], "——— 14 Feb 2026 ———");
        assert_eq!(blocks[0].lines[1].alignment, Some(Alignment::Center));
    }

    #[test]
    fn groups_consecutive_messages_from_same_sender() {
        let messages = vec![msg(1, "Alice", "First", false), msg(2, "Alice", "Second", false)];

        let blocks = build_message_blocks(&messages, 60);

        assert_eq!(blocks[0].lines.len(), 2);
        assert!(texts(&blocks[0])[0].contains("Alice:"));
        assert_eq!(blocks[1].lines.len(), 1);
        assert!(texts(&blocks[1])[0].ends_with("Second"));
    }

    #[test]
    fn shows_sender_when_sender_changes() {
        let messages = vec![msg(1, "Alice", "Hi", false), msg(2, "Bob", "Hello", false)];

        let blocks = build_message_blocks(&messages, 60);

        assert!(texts(&blocks[1])[0].contains("Bob:"));
    }

    #[test]
    fn uses_you_for_outgoing_messages() {
        let blocks = build_message_blocks(&[msg(1, "MyName", "Hello", true)], 60);

        assert!(texts(&blocks[0])[0].contains("You:"));
    }

    #[test]
    fn media_message_shows_indicator() {
        let mut message = msg(1, "Alice", "", false);
        message.media = MessageMedia::Photo;

        let blocks = build_message_blocks(&[message], 60);

        assert_eq!(texts(&blocks[0])[1].trim(), "[Photo]");
    }

    #[test]
    fn empty_message_gets_placeholder() {
        let blocks = build_message_blocks(&[msg(1, "Alice", "", false)], 60);

        assert_eq!(texts(&blocks[0])[1].trim(), "[Empty message]");
    }

    #[test]
    fn via_is_shown_next_to_sender() {
        let mut message = msg(1, "Alice", "Result", false);
        message.components.insert(Via::new("gif"));

        let blocks = build_message_blocks(&[message], 60);

        assert!(texts(&blocks[0])[0].contains("Alice via @gif:"));
    }

    #[test]
    fn via_is_elided_in_narrow_viewport() {
        let mut message = msg(1, "Alice", "Result", false);
        message.components.insert(Via::new("gifsearchbot"));

        let blocks = build_message_blocks(&[message], 20);

        let header = texts(&blocks[0])[0].clone();
        assert!(header.contains("Alice via @g…:"));
        assert!(header.ends_with("…:"));
        assert_eq!(display_width(&header), 20);
    }

    #[test]
    fn forwarded_header_precedes_sender_line() {
        let mut message = msg(1, "Alice", "Look", false);
        let mut forwarded = Forwarded::new("News", FEB_14_2026_10AM, MessageId(5));
        forwarded.create(None);
        message.components.insert(forwarded);

        let blocks = build_message_blocks(&[message], 60);

        let lines = texts(&blocks[0]);
        assert_eq!(lines[0].trim(), "Forwarded from News");
        assert!(lines[1].contains("Alice:"));
    }

    #[test]
    fn reply_preview_is_quoted_and_elided() {
        let question = msg(1, "Alice", "What time is the meeting tomorrow morning?", false);
        let mut answer = msg(2, "Bob", "Ten", false);
        let mut reply = Reply::new(MessageId(1));
        let chat = [question.clone()];
        reply.update_data(crate::domain::message::ChatId(1), &Lookup(&chat), true);
        answer.components.insert(reply);

        let blocks = build_message_blocks(&[question, answer], 24);

        let lines = texts(&blocks[1]);
        assert_eq!(lines[1].trim(), "▍ Alice");
        assert!(lines[2].trim_start().starts_with("▍ What time"));
        assert!(lines[2].ends_with('…'));
    }

    #[test]
    fn footer_collects_annotations() {
        let mut message = msg(1, "Channel", "Post", false);
        let mut signed = Signed::new("Alice");
        signed.refresh("10:00");
        message.components.insert(signed);
        message.components.insert(Views::new(1_500));

        let blocks = build_message_blocks(&[message], 60);

        let footer = blocks[0].lines.last().expect("footer line");
        assert_eq!(text_of(footer), "Alice, 10:00 · 👁 1,500");
        assert_eq!(footer.alignment, Some(Alignment::Right));
    }

    #[test]
    fn unread_bar_resets_grouping() {
        let mut second = msg(2, "Alice", "New", false);
        second.components.insert(UnreadBar::new(1));

        let blocks = build_message_blocks(&[msg(1, "Alice", "Old", false), second], 60);

        let lines = texts(&blocks[1]);
        assert!(lines.iter().any(|line| line == "── 1 unread message ──"));
        assert!(lines.iter().any(|line| line.contains("Alice:")));
    }

    #[test]
    fn voice_progress_reflects_position() {
        let mut message = msg(1, "Alice", "", false);
        message.media = MessageMedia::Voice;
        let mut voice = Voice::new(30_000);
        voice.update_position(15_000, 30_000);
        message.components.insert(voice);

        let blocks = build_message_blocks(&[message], 60);

        let line = texts(&blocks[0]).pop().expect("voice line");
        assert_eq!(line.matches('━').count(), 10);
        assert!(line.ends_with("0:15 / 0:30"));
    }

    #[test]
    fn keyboard_flag_follows_non_empty_markup() {
        let mut with_keyboard = msg(1, "Bot", "Pick", false);
        with_keyboard.components.insert(ReplyMarkup::new(
            MarkupFlags::default(),
            MarkupGrid::new(vec![vec![MarkupButton::new(ButtonKind::Default, "A", Vec::new())]]),
        ));
        let mut empty_keyboard = msg(2, "Bot", "Nothing", false);
        empty_keyboard
            .components
            .insert(ReplyMarkup::new(MarkupFlags::default(), MarkupGrid::default()));

        let blocks = build_message_blocks(&[with_keyboard, empty_keyboard], 60);

        assert!(blocks[0].has_keyboard);
        assert!(!blocks[1].has_keyboard);
    }

    #[test]
    fn album_leader_shows_size_and_members_continue_block() {
        let members = vec![MessageId(1), MessageId(2)];
        let mut messages = vec![msg(1, "Alice", "", false), msg(2, "Alice", "", false)];
        for message in &mut messages {
            message.media = MessageMedia::Photo;
            message
                .components
                .insert(Group::new(MessageGroupId(3), members[0], members[1..].to_vec()));
        }
        let mut other = msg(3, "Alice", "", false);
        other.media = MessageMedia::Photo;
        other
            .components
            .insert(Group::new(MessageGroupId(4), MessageId(3), vec![MessageId(4)]));
        messages.push(other);

        let blocks = build_message_blocks(&messages, 60);

        let leader = texts(&blocks[0]);
        assert!(leader[0].contains("Alice:"));
        assert_eq!(leader[1].trim(), "Album · 2 items");
        assert_eq!(blocks[1].lines.len(), 1);
        assert!(texts(&blocks[1])[0].ends_with("[Photo]"));
        // A different album from the same sender also skips the header but
        // announces its own size.
        assert!(texts(&blocks[2]).iter().any(|line| line.trim() == "Album · 2 items"));
    }

    #[test]
    fn album_member_from_new_sender_keeps_header() {
        let mut message = msg(2, "Bob", "", false);
        message
            .components
            .insert(Group::new(MessageGroupId(3), MessageId(1), vec![MessageId(2)]));

        let blocks = build_message_blocks(&[msg(1, "Alice", "Hi", false), message], 60);

        assert!(texts(&blocks[1])[0].contains("Bob:"));
    }

    #[test]
    fn document_name_and_caption_follow_content() {
        let mut message = msg(1, "Alice", "", false);
        message.media = MessageMedia::Document;
        message.components.insert(DocumentName::new("menu.pdf"));
        message
            .components
            .insert(DocumentCaption::new("Full menu\nPrices include VAT"));

        let blocks = build_message_blocks(&[message], 60);

        let lines = texts(&blocks[0]);
        assert_eq!(lines[1].trim(), "[Document]");
        assert_eq!(lines[2].trim(), "📎 menu.pdf");
        assert_eq!(lines[3].trim(), "Full menu");
        assert_eq!(lines[4].trim(), "Prices include VAT");
    }

    #[test]
    fn long_document_name_is_elided_to_content_width() {
        let mut message = msg(1, "Alice", "", false);
        message.components.insert(DocumentName::new("annual-financial-statement-2026.pdf"));

        let blocks = build_message_blocks(&[message], 24);

        let line = texts(&blocks[0]).pop().expect("name line");
        assert!(line.ends_with('…'));
        assert_eq!(display_width(&line), 24);
    }

    #[test]
    fn format_duration_pads_seconds() {
        assert_eq!(format_duration(65_000), "1:05");
        assert_eq!(format_duration(999), "0:00");
    }

    struct Lookup<'a>(&'a [Message]);

    impl crate::domain::components::MessageLookup for Lookup<'_> {
        fn find_message(&self, reference: MessageRef) -> Option<&Message> {
            self.0.iter().find(|message| message.reference == reference)
        }
    }
}
