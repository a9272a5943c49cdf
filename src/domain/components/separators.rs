//! Day marks and the unread bar drawn above a message.

use crate::domain::text::format_date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMark {
    text: String,
}

impl DateMark {
    pub fn from_date(date: chrono::NaiveDate) -> Self {
        Self {
            text: format_date(date),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadBar {
    count: u32,
    // While frozen the chat is open and new messages are read on arrival,
    // so the counter stays put.
    frozen: bool,
    text: String,
}

impl UnreadBar {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            frozen: false,
            text: unread_text(count),
        }
    }

    #[cfg(test)]
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn add_unread(&mut self, added: u32) {
        if self.frozen {
            return;
        }
        self.count = self.count.saturating_add(added);
        self.text = unread_text(self.count);
    }

    pub fn margin_top() -> u16 {
        1
    }
}

fn unread_text(count: u32) -> String {
    if count == 1 {
        "1 unread message".to_owned()
    } else {
        format!("{count} unread messages")
    }
}
