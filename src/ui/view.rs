use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{events::TimeMs, open_chat_state::OpenChatState, shell_state::ShellState};

use super::{
    message_rendering::{build_message_blocks, CONTENT_INDENT},
    state::{KeyboardPlacement, ViewState},
    styles,
};

const KEY_HINTS: &str =
    "click: press | right click: copy link | j/k: scroll | e: edit | d: delete | u: rekey | n/r: unread | v: views | [/]: seek | c: clear | q: quit";

pub fn render(frame: &mut Frame<'_>, state: &ShellState, view: &mut ViewState, now: TimeMs) {
    let [messages_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    render_messages_panel(frame, messages_area, state.open_chat(), view, now);

    let status = Paragraph::new(status_line(state, view)).style(styles::status_line_style());
    frame.render_widget(status, status_area);
}

fn render_messages_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    chat: &OpenChatState,
    view: &mut ViewState,
    now: TimeMs,
) {
    let block = Block::default()
        .title(open_chat_title(chat))
        .borders(Borders::ALL)
        .border_style(styles::date_separator_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if chat.messages().is_empty() {
        frame.render_widget(Paragraph::new("No messages in this chat"), inner);
        view.set_layout(inner, 0, Vec::new());
        return;
    }

    let blocks = build_message_blocks(chat.messages(), inner.width);
    let keyboard_x = inner.x.saturating_add(CONTENT_INDENT);
    let keyboard_width = inner.width.saturating_sub(CONTENT_INDENT);
    let scroll = i32::from(chat.scroll_offset());

    let mut placements = Vec::new();
    let mut doc_y: i32 = 0;

    for message_block in &blocks {
        for line in &message_block.lines {
            let row = i32::from(inner.y) + doc_y - scroll;
            if let Some(row) = visible_row(inner, row) {
                frame.render_widget(line.clone(), Rect::new(inner.x, row, inner.width, 1));
            }
            doc_y += 1;
        }

        if !message_block.has_keyboard {
            continue;
        }
        let height = view.keyboard_height(message_block.reference);
        let Some(keyboard) = view.fitted_keyboard(message_block.reference, keyboard_width) else {
            continue;
        };
        let top = i32::from(inner.y) + doc_y - scroll;
        let bottom = top + i32::from(height);
        if bottom > i32::from(inner.top()) && top < i32::from(inner.bottom()) && keyboard_width > 0 {
            let placement = KeyboardPlacement {
                message: message_block.reference,
                x: keyboard_x,
                top,
                width: keyboard_width,
                height,
            };
            paint_keyboard(frame.buffer_mut(), inner, placement, |buf, area, clip| {
                keyboard.paint(buf, area, clip, now, chat);
            });
            placements.push(placement);
        }
        doc_y += i32::from(height);
    }

    let content_height = u16::try_from(doc_y).unwrap_or(u16::MAX);
    view.set_layout(inner, content_height, placements);
}

/// Paints straight into the frame when the keyboard's top row is visible,
/// otherwise into a scratch buffer whose visible rows are copied over.
fn paint_keyboard(
    buf: &mut Buffer,
    viewport: Rect,
    placement: KeyboardPlacement,
    paint: impl FnOnce(&mut Buffer, Rect, Rect),
) {
    if let Ok(top) = u16::try_from(placement.top) {
        if top >= viewport.top() {
            let area = Rect::new(placement.x, top, placement.width, placement.height);
            paint(buf, area, viewport);
            return;
        }
    }

    let scratch_area = Rect::new(0, 0, placement.width, placement.height);
    let mut scratch = Buffer::empty(scratch_area);
    paint(&mut scratch, scratch_area, scratch_area);

    for row in 0..placement.height {
        let Some(screen_row) = visible_row(viewport, placement.top + i32::from(row)) else {
            continue;
        };
        for column in 0..placement.width {
            let x = placement.x.saturating_add(column);
            if x >= viewport.right() {
                break;
            }
            if let (Some(source), Some(target)) = (
                scratch.cell(Position::new(column, row)),
                buf.cell_mut(Position::new(x, screen_row)),
            ) {
                *target = source.clone();
            }
        }
    }
}

fn visible_row(viewport: Rect, row: i32) -> Option<u16> {
    let row = u16::try_from(row).ok()?;
    (row >= viewport.top() && row < viewport.bottom()).then_some(row)
}

fn open_chat_title(chat: &OpenChatState) -> String {
    if chat.chat_title().is_empty() {
        "Messages".to_owned()
    } else {
        format!("Messages — {}", chat.chat_title())
    }
}

fn status_line(state: &ShellState, view: &ViewState) -> Line<'static> {
    if let Some(tooltip) = view.tooltip(state.open_chat()) {
        return Line::styled(tooltip, styles::tooltip_style());
    }
    match state.status() {
        Some(status) => Line::raw(format!("{status} | {KEY_HINTS}")),
        None => Line::raw(KEY_HINTS),
    }
}
