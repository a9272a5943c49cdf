//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Message list styles
// =============================================================================

/// Style for message sender name (white, bold).
pub fn message_sender_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for message time in the messages panel.
pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for message text content.
pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for media type indicators like [Photo], [Voice].
pub fn message_media_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Style for date separator line.
pub fn date_separator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Message decoration styles
// =============================================================================

/// "Forwarded from ..." header.
pub fn forward_header_style() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::ITALIC)
}

/// Quote bar in front of a reply preview.
pub fn reply_bar_style() -> Style {
    Style::default().fg(Color::LightBlue)
}

pub fn reply_sender_style() -> Style {
    Style::default().fg(Color::LightBlue)
}

pub fn reply_text_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Footer annotations: via bot, signature, edited mark, views.
pub fn annotation_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn unread_bar_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn voice_progress_style() -> Style {
    Style::default().fg(Color::Cyan)
}

// =============================================================================
// Inline keyboard styles
// =============================================================================

pub const KEYBOARD_BUTTON_BG: Color = Color::Rgb(38, 52, 66);
pub const KEYBOARD_BUTTON_BG_OVER: Color = Color::Rgb(58, 80, 102);
pub const KEYBOARD_RIPPLE: Color = Color::Rgb(96, 132, 168);

pub fn keyboard_button_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn keyboard_button_border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Kind icon and loading mark in the button corner.
pub fn keyboard_button_icon_style() -> Style {
    Style::default().fg(Color::LightCyan)
}

// =============================================================================
// Status line
// =============================================================================

pub fn status_line_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Gray)
}

pub fn tooltip_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::LightYellow)
}
