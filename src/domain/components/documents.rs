//! File name and caption of a document message.

use std::borrow::Cow;

use crate::domain::text::{display_width, elide};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentName {
    name: String,
    width: u16,
}

impl DocumentName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let width = display_width(&name);
        Self { name, width }
    }

    /// The name shortened to `available` cells.
    pub fn fitted(&self, available: u16) -> Cow<'_, str> {
        if self.width <= available {
            Cow::Borrowed(&self.name)
        } else {
            Cow::Owned(elide(&self.name, available))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCaption {
    caption: String,
}

impl DocumentCaption {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.caption.lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_is_kept() {
        let name = DocumentName::new("menu.pdf");

        assert!(matches!(name.fitted(8), Cow::Borrowed("menu.pdf")));
    }

    #[test]
    fn long_name_is_elided() {
        let name = DocumentName::new("quarterly-report.pdf");

        assert_eq!(name.fitted(10), "quarterly…");
        assert_eq!(name.fitted(40), "quarterly-report.pdf");
    }

    #[test]
    fn caption_splits_into_lines() {
        let caption = DocumentCaption::new("Full menu\nPrices include VAT");

        assert_eq!(caption.lines().collect::<Vec<_>>(), vec!["Full menu", "Prices include VAT"]);
    }
}
