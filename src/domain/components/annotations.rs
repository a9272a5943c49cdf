//! Small text annotations shown in a message header or footer.

use crate::domain::text::{display_width, elide, format_time};

/// "via @bot" marker for messages sent through an inline bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Via {
    bot_username: String,
    full_text: String,
    text: String,
    max_width: u16,
}

impl Via {
    pub fn new(bot_username: impl Into<String>) -> Self {
        let bot_username = bot_username.into();
        let full_text = format!("via @{bot_username}");
        let max_width = display_width(&full_text);
        Self {
            bot_username,
            text: full_text.clone(),
            full_text,
            max_width,
        }
    }

    pub fn bot_username(&self) -> &str {
        &self.bot_username
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fits the marker into `available` cells.
    pub fn resize(&mut self, available: u16) {
        if available < self.max_width {
            self.text = elide(&self.full_text, available);
        } else {
            self.text.clone_from(&self.full_text);
        }
    }
}

/// View counter of a channel post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Views {
    count: u32,
    text: String,
}

impl Views {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            text: format_views_count(count),
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Updates the counter. Returns false when nothing changed.
    pub fn set_count(&mut self, count: u32) -> bool {
        if count == self.count {
            return false;
        }
        *self = Self::new(count);
        true
    }
}

/// Formats a view count compactly: `999`, `1,234`, `12.3K`, `1.2M`.
fn format_views_count(views: u32) -> String {
    if views > 999_999 {
        let tenths = views / 100_000;
        compact(tenths, 'M')
    } else if views > 9_999 {
        let tenths = views / 100;
        compact(tenths, 'K')
    } else if views > 999 {
        format!("{},{:03}", views / 1000, views % 1000)
    } else {
        views.to_string()
    }
}

fn compact(tenths: u32, suffix: char) -> String {
    if tenths % 10 == 0 {
        format!("{}{suffix}", tenths / 10)
    } else {
        format!("{}.{}{suffix}", tenths / 10, tenths % 10)
    }
}

/// Author signature of a channel post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signed {
    author: String,
    signature: String,
}

impl Signed {
    pub fn new(author: impl Into<String>) -> Self {
        let author = author.into();
        Self {
            signature: author.clone(),
            author,
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Rebuilds the signature with the post date, e.g. `"Alice, 10:42"`.
    pub fn refresh(&mut self, date: &str) {
        self.signature = format!("{}, {date}", self.author);
    }

}

/// Edit marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edited {
    text: String,
}

impl Edited {
    pub fn new(date_ms: i64) -> Self {
        let mut edited = Self { text: String::new() };
        edited.refresh(&format_time(date_ms), true);
        edited
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `displayed` controls whether the "edited" word is shown or only the time.
    pub fn refresh(&mut self, date: &str, displayed: bool) {
        self.text = if displayed {
            format!("edited {date}")
        } else {
            date.to_owned()
        };
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn via_elides_when_space_is_short() {
        let mut via = Via::new("longbotname");

        via.resize(8);
        assert_eq!(via.text(), "via @lo…");
        assert_eq!(display_width(via.text()), 8);

        via.resize(16);
        assert_eq!(via.text(), "via @longbotname");
    }

    #[test]
    fn views_count_formatting() {
        assert_eq!(format_views_count(0), "0");
        assert_eq!(format_views_count(999), "999");
        assert_eq!(format_views_count(1_234), "1,234");
        assert_eq!(format_views_count(10_005), "10K");
        assert_eq!(format_views_count(12_345), "12.3K");
        assert_eq!(format_views_count(1_000_000), "1M");
        assert_eq!(format_views_count(3_456_789), "3.4M");
    }

    #[test]
    fn views_set_count_reports_change() {
        let mut views = Views::new(5);

        assert!(!views.set_count(5));
        assert!(views.set_count(1_500));
        assert_eq!(views.text(), "1,500");
        assert_eq!(views.count(), 1_500);
    }

    #[test]
    fn signed_refresh_appends_date() {
        let mut signed = Signed::new("Alice");
        signed.refresh("10:42");

        assert_eq!(signed.signature(), "Alice, 10:42");
    }

    #[test]
    fn edited_text_depends_on_displayed_flag() {
        let mut edited = Edited::new(0);

        edited.refresh("10:42", true);
        assert_eq!(edited.text(), "edited 10:42");

        edited.refresh("10:42", false);
        assert_eq!(edited.text(), "10:42");
    }
}
