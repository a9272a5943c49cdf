//! Deferred link between a keyboard button on screen and the markup it came from.

use std::cell::Cell;

use super::{
    markup::{ButtonCoords, ButtonKind, MarkupButton, MarkupResolver},
    message::MessageRef,
};

/// Click handler of one inline keyboard button.
///
/// Activation runs on a later turn of the event loop than the click, and by
/// then the message may be gone or its markup rebuilt. The binding therefore
/// keeps only the message reference and the button coordinates, and looks
/// the button up again when asked.
///
/// The lookup is positional: if the markup was replaced and another button
/// now sits at the same coordinates, that button is the one resolved.
#[derive(Debug, PartialEq)]
pub struct ClickBinding {
    coords: ButtonCoords,
    message: Cell<MessageRef>,
    full_displayed: bool,
}

impl ClickBinding {
    pub fn new(coords: ButtonCoords, message: MessageRef, full_displayed: bool) -> Self {
        Self {
            coords,
            message: Cell::new(message),
            full_displayed,
        }
    }

    pub fn coords(&self) -> ButtonCoords {
        self.coords
    }

    pub fn message(&self) -> MessageRef {
        self.message.get()
    }

    /// Retargets the binding after the message got a new id.
    pub fn set_message(&self, message: MessageRef) {
        self.message.set(message);
    }

    pub fn full_displayed(&self) -> bool {
        self.full_displayed
    }

    /// The button currently at this binding's coordinates, if any.
    pub fn button<'a>(&self, resolver: &'a dyn MarkupResolver) -> Option<&'a MarkupButton> {
        resolver.markup(self.message())?.button(self.coords)
    }

    pub fn button_mut<'a>(&self, resolver: &'a mut dyn MarkupResolver) -> Option<&'a mut MarkupButton> {
        resolver.markup_mut(self.message())?.button_mut(self.coords)
    }

    /// Full label for a button whose label was cut when drawn.
    pub fn tooltip(&self, resolver: &dyn MarkupResolver) -> Option<String> {
        if self.full_displayed {
            return None;
        }
        self.button(resolver).map(|button| button.label().to_owned())
    }

    /// Text put on the clipboard by "copy link"; only URL buttons have one.
    pub fn clipboard_text(&self, resolver: &dyn MarkupResolver) -> Option<String> {
        self.button(resolver)
            .filter(|button| button.kind() == ButtonKind::Url)
            .map(MarkupButton::payload_text)
    }

    pub fn clipboard_context_label(&self, resolver: &dyn MarkupResolver) -> Option<&'static str> {
        self.clipboard_text(resolver).map(|_| "Copy link")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::markup::MarkupGrid;

    #[derive(Default)]
    struct Markups(HashMap<MessageRef, MarkupGrid>);

    impl MarkupResolver for Markups {
        fn markup(&self, message: MessageRef) -> Option<&MarkupGrid> {
            self.0.get(&message)
        }

        fn markup_mut(&mut self, message: MessageRef) -> Option<&mut MarkupGrid> {
            self.0.get_mut(&message)
        }
    }

    fn single_row(buttons: Vec<MarkupButton>) -> MarkupGrid {
        MarkupGrid::new(vec![buttons])
    }

    #[test]
    fn resolves_button_at_coordinates() {
        let message = MessageRef::new(1, 10);
        let mut markups = Markups::default();
        markups.0.insert(
            message,
            single_row(vec![
                MarkupButton::new(ButtonKind::Callback, "A", b"a".to_vec()),
                MarkupButton::new(ButtonKind::Callback, "B", b"b".to_vec()),
            ]),
        );

        let binding = ClickBinding::new(ButtonCoords::new(0, 1), message, true);

        assert_eq!(binding.button(&markups).map(MarkupButton::label), Some("B"));
    }

    #[test]
    fn resolves_current_button_after_rebuild() {
        let message = MessageRef::new(1, 10);
        let mut markups = Markups::default();
        markups.0.insert(
            message,
            single_row(vec![MarkupButton::new(ButtonKind::Callback, "Old", b"old".to_vec())]),
        );
        let binding = ClickBinding::new(ButtonCoords::new(0, 0), message, true);

        markups.0.insert(
            message,
            single_row(vec![MarkupButton::new(ButtonKind::Url, "New", b"https://new".to_vec())]),
        );

        let button = binding.button(&markups).expect("button at coordinates");
        assert_eq!(button.label(), "New");
        assert_eq!(button.kind(), ButtonKind::Url);
    }

    #[test]
    fn missing_message_or_coordinates_resolve_to_none() {
        let message = MessageRef::new(1, 10);
        let mut markups = Markups::default();
        markups.0.insert(
            message,
            single_row(vec![MarkupButton::new(ButtonKind::Default, "Only", Vec::new())]),
        );

        let past_end = ClickBinding::new(ButtonCoords::new(0, 3), message, true);
        let other_message = ClickBinding::new(ButtonCoords::new(0, 0), MessageRef::new(1, 11), true);

        assert!(past_end.button(&markups).is_none());
        assert!(other_message.button(&markups).is_none());
    }

    #[test]
    fn tooltip_only_for_truncated_labels() {
        let message = MessageRef::new(1, 10);
        let mut markups = Markups::default();
        markups.0.insert(
            message,
            single_row(vec![MarkupButton::new(ButtonKind::Default, "A long label", Vec::new())]),
        );

        let visible = ClickBinding::new(ButtonCoords::new(0, 0), message, true);
        let truncated = ClickBinding::new(ButtonCoords::new(0, 0), message, false);

        assert_eq!(visible.tooltip(&markups), None);
        assert_eq!(truncated.tooltip(&markups), Some("A long label".to_owned()));
    }

    #[test]
    fn clipboard_text_is_url_for_url_buttons_only() {
        let message = MessageRef::new(1, 10);
        let mut markups = Markups::default();
        markups.0.insert(
            message,
            single_row(vec![
                MarkupButton::new(ButtonKind::Url, "Site", b"https://example.org".to_vec()),
                MarkupButton::new(ButtonKind::Callback, "Ping", b"ping".to_vec()),
            ]),
        );

        let url = ClickBinding::new(ButtonCoords::new(0, 0), message, true);
        let callback = ClickBinding::new(ButtonCoords::new(0, 1), message, true);

        assert_eq!(url.clipboard_text(&markups), Some("https://example.org".to_owned()));
        assert_eq!(url.clipboard_context_label(&markups), Some("Copy link"));
        assert_eq!(callback.clipboard_text(&markups), None);
    }

    #[test]
    fn set_message_retargets_binding() {
        let binding = ClickBinding::new(ButtonCoords::new(0, 0), MessageRef::new(1, -5), true);

        binding.set_message(MessageRef::new(1, 42));

        assert_eq!(binding.message(), MessageRef::new(1, 42));
    }
}
