//! Plain-text dump of keyboard geometry for the `layout` subcommand.

use std::rc::Rc;

use crate::domain::{components::ReplyMarkup, open_chat_state::OpenChatState};

use super::keyboard::{
    style::{ButtonMetrics, TerminalKeyboardStyle},
    KeyboardTimings, ReplyKeyboard,
};

/// One block per keyboard message: a summary line, then one line per button.
pub fn keyboard_report(chat: &OpenChatState, width: u16, metrics: ButtonMetrics) -> Vec<String> {
    let style = Rc::new(TerminalKeyboardStyle::new(metrics));
    let mut lines = Vec::new();

    for message in chat.messages() {
        let Some(markup) = message.components.get::<ReplyMarkup>() else {
            continue;
        };
        let mut keyboard = ReplyKeyboard::new(
            message.reference,
            markup.grid(),
            markup.version(),
            style.clone(),
            KeyboardTimings::default(),
        );
        let size = keyboard.layout(width);
        let enough = keyboard.is_enough_space(width, metrics);

        lines.push(format!(
            "message {}: natural {}x{}, width {width}, enough space: {}",
            message.reference.message_id.0,
            size.width,
            size.height,
            if enough { "yes" } else { "no" },
        ));
        for (row, buttons) in keyboard.rows().iter().enumerate() {
            for (column, button) in buttons.iter().enumerate() {
                let rect = button.rect();
                lines.push(format!(
                    "  [{row},{column}] {:<18} x={:<3} y={:<3} w={:<3} h={}{} {:?}",
                    button.kind().as_wire(),
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    if button.binding().full_displayed() { "" } else { " cut" },
                    button.label(),
                ));
            }
        }
    }

    lines
}
