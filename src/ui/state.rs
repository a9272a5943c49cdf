//! View-side state of the open chat: keyboard widgets, their on-screen
//! placement and queued activations.

use std::{
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use ratatui::layout::{Position, Rect};

use crate::domain::{
    click_binding::ClickBinding,
    components::ReplyMarkup,
    events::{PointerAction, PointerInput, TimeMs, ViewRequest},
    markup::MarkupResolver,
    message::MessageRef,
    open_chat_state::OpenChatState,
};

use super::keyboard::{
    animation::AnimationDriver,
    style::{ButtonMetrics, KeyboardStyle, TerminalKeyboardStyle},
    KeyboardTimings, ReplyKeyboard,
};

const SCROLL_STEP: i32 = 3;

/// Where a keyboard ended up on screen during the last render. `top` may
/// lie above the viewport when the keyboard is scrolled partly out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardPlacement {
    pub message: MessageRef,
    pub x: u16,
    pub top: i32,
    pub width: u16,
    pub height: u16,
}

impl KeyboardPlacement {
    fn local_point(&self, column: u16, row: u16) -> Option<Position> {
        let row = i32::from(row) - self.top;
        let column = column.checked_sub(self.x)?;
        if column >= self.width || row < 0 || row >= i32::from(self.height) {
            return None;
        }
        Some(Position::new(column, u16::try_from(row).ok()?))
    }
}

/// What the shell has to do after a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    Nothing,
    /// A button was clicked; the activation is queued for the next turn.
    Clicked,
    /// Secondary press on a button.
    Context(Rc<ClickBinding>),
    Scroll(i32),
}

pub struct ViewState {
    style: Rc<dyn KeyboardStyle>,
    // Used for keyboards whose labels do not fit the regular paddings.
    compact_style: Rc<dyn KeyboardStyle>,
    timings: KeyboardTimings,
    keyboards: HashMap<MessageRef, ReplyKeyboard>,
    placements: Vec<KeyboardPlacement>,
    viewport: Rect,
    content_height: u16,
    driver: AnimationDriver,
    pending_activations: VecDeque<Rc<ClickBinding>>,
    hovered_keyboard: Option<MessageRef>,
    pressed_keyboard: Option<MessageRef>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ButtonMetrics::default(), KeyboardTimings::default())
    }
}

impl ViewState {
    pub fn new(metrics: ButtonMetrics, timings: KeyboardTimings) -> Self {
        Self {
            style: Rc::new(TerminalKeyboardStyle::new(metrics)),
            compact_style: Rc::new(TerminalKeyboardStyle::new(ButtonMetrics { padding: 0, ..metrics })),
            timings,
            keyboards: HashMap::new(),
            placements: Vec::new(),
            viewport: Rect::default(),
            content_height: 0,
            driver: AnimationDriver::default(),
            pending_activations: VecDeque::new(),
            hovered_keyboard: None,
            pressed_keyboard: None,
        }
    }

    /// Creates, rebuilds and drops keyboards so they mirror the chat's markups.
    pub fn sync(&mut self, chat: &OpenChatState) {
        let mut alive = Vec::new();
        for message in chat.messages() {
            let Some(markup) = message.components.get::<ReplyMarkup>() else {
                continue;
            };
            if markup.grid().is_empty() {
                continue;
            }
            alive.push(message.reference);

            match self.keyboards.get_mut(&message.reference) {
                Some(keyboard) if keyboard.grid_version() != markup.version() => {
                    keyboard.rebuild(markup.grid(), markup.version());
                    self.driver.unregister(message.reference);
                }
                Some(_) => {}
                None => {
                    self.keyboards.insert(
                        message.reference,
                        ReplyKeyboard::new(
                            message.reference,
                            markup.grid(),
                            markup.version(),
                            Rc::clone(&self.style),
                            self.timings,
                        ),
                    );
                }
            }
        }

        let driver = &mut self.driver;
        self.keyboards.retain(|reference, _| {
            let keep = alive.contains(reference);
            if !keep {
                driver.unregister(*reference);
            }
            keep
        });
        if self
            .pressed_keyboard
            .is_some_and(|reference| !self.keyboards.contains_key(&reference))
        {
            self.pressed_keyboard = None;
        }
    }

    pub fn apply_requests(&mut self, requests: Vec<ViewRequest>) {
        for request in requests {
            match request {
                ViewRequest::ClearSelection => self.clear_selection(),
                ViewRequest::Rekeyed { from, to } => self.rekey(from, to),
            }
        }
    }

    pub fn clear_selection(&mut self) {
        for (reference, keyboard) in &mut self.keyboards {
            keyboard.clear_selection();
            self.driver.unregister(*reference);
        }
        self.hovered_keyboard = None;
        self.pressed_keyboard = None;
    }

    fn rekey(&mut self, from: MessageRef, to: MessageRef) {
        let Some(mut keyboard) = self.keyboards.remove(&from) else {
            return;
        };
        keyboard.update_message_ref(to);
        self.driver.unregister(from);
        if keyboard.is_animating() {
            self.driver.register(to);
        }
        if self.pressed_keyboard == Some(from) {
            self.pressed_keyboard = Some(to);
        }
        if self.hovered_keyboard == Some(from) {
            self.hovered_keyboard = Some(to);
        }
        self.keyboards.insert(to, keyboard);
        tracing::debug!(?from, ?to, "keyboard moved to new message id");
    }

    #[cfg(test)]
    pub fn keyboard(&self, message: MessageRef) -> Option<&ReplyKeyboard> {
        self.keyboards.get(&message)
    }

    #[cfg(test)]
    pub fn keyboard_mut(&mut self, message: MessageRef) -> Option<&mut ReplyKeyboard> {
        self.keyboards.get_mut(&message)
    }

    /// Keyboard of `message` ready to paint `width` cells wide. A keyboard
    /// whose labels do not fit switches to the compact style, which marks
    /// it for relayout.
    pub fn fitted_keyboard(&mut self, message: MessageRef, width: u16) -> Option<&mut ReplyKeyboard> {
        let keyboard = self.keyboards.get_mut(&message)?;
        let style = if keyboard.is_enough_space(width, self.style.metrics()) {
            &self.style
        } else {
            &self.compact_style
        };
        keyboard.set_style(Rc::clone(style));
        Some(keyboard)
    }

    /// Rows the keyboard of `message` occupies, zero without one.
    pub fn keyboard_height(&self, message: MessageRef) -> u16 {
        self.keyboards.get(&message).map_or(0, ReplyKeyboard::height)
    }

    /// Records the geometry of the last render for hit-testing.
    pub fn set_layout(&mut self, viewport: Rect, content_height: u16, placements: Vec<KeyboardPlacement>) {
        self.viewport = viewport;
        self.content_height = content_height;
        self.placements = placements;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn content_height(&self) -> u16 {
        self.content_height
    }

    fn keyboard_at(&self, column: u16, row: u16) -> Option<(MessageRef, Position)> {
        if !self.viewport.contains(Position::new(column, row)) {
            return None;
        }
        self.placements.iter().find_map(|placement| {
            placement
                .local_point(column, row)
                .map(|point| (placement.message, point))
        })
    }

    pub fn handle_pointer(&mut self, input: PointerInput, now: TimeMs) -> PointerOutcome {
        match input.action {
            PointerAction::ScrollUp => return PointerOutcome::Scroll(-SCROLL_STEP),
            PointerAction::ScrollDown => return PointerOutcome::Scroll(SCROLL_STEP),
            _ => {}
        }

        let target = self.keyboard_at(input.column, input.row);
        self.update_hover(target, now);

        let outcome = match input.action {
            PointerAction::Pressed => {
                if let Some(previous) = self.pressed_keyboard.take() {
                    if let Some(keyboard) = self.keyboards.get_mut(&previous) {
                        keyboard.cancel_press(now);
                    }
                }
                self.pressed_keyboard = target.and_then(|(message, point)| {
                    let keyboard = self.keyboards.get_mut(&message)?;
                    keyboard.press(point, now).then_some(message)
                });
                PointerOutcome::Nothing
            }
            PointerAction::Released => match self.pressed_keyboard.take() {
                Some(message) => {
                    let clicked = self
                        .keyboards
                        .get_mut(&message)
                        .and_then(|keyboard| keyboard.release(now));
                    match clicked {
                        Some(binding) => {
                            tracing::debug!(
                                message = ?binding.message(),
                                coords = ?binding.coords(),
                                "button clicked"
                            );
                            self.pending_activations.push_back(binding);
                            PointerOutcome::Clicked
                        }
                        None => PointerOutcome::Nothing,
                    }
                }
                None => PointerOutcome::Nothing,
            },
            PointerAction::ContextPressed => self
                .hovered_binding()
                .map_or(PointerOutcome::Nothing, PointerOutcome::Context),
            _ => PointerOutcome::Nothing,
        };

        self.register_animating();
        outcome
    }

    fn update_hover(&mut self, target: Option<(MessageRef, Position)>, now: TimeMs) {
        let target_message = target.map(|(message, _)| message);
        for (reference, keyboard) in &mut self.keyboards {
            if Some(*reference) != target_message {
                keyboard.leave(now);
            }
        }
        self.hovered_keyboard = target.and_then(|(message, point)| {
            let keyboard = self.keyboards.get_mut(&message)?;
            keyboard.hit_test(point, now).map(|_| message)
        });
    }

    /// Current binding of the hovered button. Read from the keyboard each
    /// time, since a relayout replaces the bindings.
    fn hovered_binding(&self) -> Option<Rc<ClickBinding>> {
        let keyboard = self.keyboards.get(&self.hovered_keyboard?)?;
        let button = keyboard.button(keyboard.hovered()?)?;
        Some(Rc::clone(button.binding()))
    }

    fn register_animating(&mut self) {
        for (reference, keyboard) in &self.keyboards {
            if keyboard.is_animating() {
                self.driver.register(*reference);
            }
        }
    }

    /// Steps every animating keyboard. Returns whether anything still animates.
    pub fn tick(&mut self, now: TimeMs) -> bool {
        let keyboards = &mut self.keyboards;
        self.driver.tick(now, |message, now| {
            keyboards
                .get_mut(&message)
                .is_some_and(|keyboard| keyboard.step_animations(now))
        });
        !self.driver.is_idle()
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        !self.driver.is_idle()
    }

    /// Clicks queued since the last turn, oldest first.
    pub fn take_pending_activations(&mut self) -> Vec<Rc<ClickBinding>> {
        self.pending_activations.drain(..).collect()
    }

    /// Full label of the hovered button when it is shown truncated.
    pub fn tooltip(&self, resolver: &dyn MarkupResolver) -> Option<String> {
        self.hovered_binding()?.tooltip(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        markup::{ButtonCoords, ButtonKind, MarkupButton, MarkupFlags, MarkupGrid},
        message::{ChatId, Message},
    };

    fn keyboard_message(id: i32, labels: &[&str]) -> Message {
        let mut message = Message::new(MessageRef::new(1, id), "Bot", "pick");
        let row = labels
            .iter()
            .map(|label| MarkupButton::new(ButtonKind::Callback, *label, label.as_bytes().to_vec()))
            .collect();
        message
            .components
            .insert(ReplyMarkup::new(MarkupFlags::default(), MarkupGrid::new(vec![row])));
        message
    }

    fn chat() -> OpenChatState {
        OpenChatState::open(
            ChatId(1),
            "Bots",
            vec![keyboard_message(5, &["Yes", "No"]), Message::new(MessageRef::new(1, 6), "Bot", "plain")],
        )
    }

    /// View with the keyboard of message 5 laid out at (10, 4), 30 cells wide.
    fn placed_view(chat: &OpenChatState) -> ViewState {
        let mut view = ViewState::default();
        view.sync(chat);
        let message = MessageRef::new(1, 5);
        view.keyboard_mut(message).expect("keyboard").layout(30);
        view.set_layout(
            Rect::new(0, 0, 60, 20),
            40,
            vec![KeyboardPlacement {
                message,
                x: 10,
                top: 4,
                width: 30,
                height: 1,
            }],
        );
        view
    }

    #[test]
    fn sync_creates_keyboards_only_for_markup_messages() {
        let mut view = ViewState::default();

        view.sync(&chat());

        assert!(view.keyboard(MessageRef::new(1, 5)).is_some());
        assert!(view.keyboard(MessageRef::new(1, 6)).is_none());
        assert_eq!(view.keyboard_height(MessageRef::new(1, 5)), 1);
        assert_eq!(view.keyboard_height(MessageRef::new(1, 6)), 0);
    }

    #[test]
    fn sync_rebuilds_on_markup_edit_and_drops_removed() {
        let mut chat = chat();
        let mut view = ViewState::default();
        view.sync(&chat);

        chat.replace_markup(
            MessageRef::new(1, 5),
            MarkupGrid::new(vec![vec![MarkupButton::new(ButtonKind::Default, "Only", Vec::new())]]),
            None,
        );
        view.sync(&chat);
        let keyboard = view.keyboard(MessageRef::new(1, 5)).expect("keyboard kept");
        assert_eq!(keyboard.grid_version(), 1);
        assert_eq!(keyboard.rows()[0].len(), 1);

        chat.remove_message(MessageRef::new(1, 5));
        view.sync(&chat);
        assert!(view.keyboard(MessageRef::new(1, 5)).is_none());
    }

    #[test]
    fn click_is_queued_not_dispatched() {
        let chat = chat();
        let mut view = placed_view(&chat);

        view.handle_pointer(PointerInput::new(PointerAction::Pressed, 12, 4), 0);
        let outcome = view.handle_pointer(PointerInput::new(PointerAction::Released, 12, 4), 30);

        assert_eq!(outcome, PointerOutcome::Clicked);
        let queued = view.take_pending_activations();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].coords(), ButtonCoords::new(0, 0));
        assert!(view.take_pending_activations().is_empty());
    }

    #[test]
    fn release_off_button_does_not_click() {
        let chat = chat();
        let mut view = placed_view(&chat);

        view.handle_pointer(PointerInput::new(PointerAction::Pressed, 12, 4), 0);
        let outcome = view.handle_pointer(PointerInput::new(PointerAction::Released, 12, 9), 30);

        assert_eq!(outcome, PointerOutcome::Nothing);
        assert!(view.take_pending_activations().is_empty());
    }

    #[test]
    fn pointer_outside_viewport_misses() {
        let chat = chat();
        let mut view = placed_view(&chat);
        view.set_layout(
            Rect::new(0, 5, 60, 10),
            40,
            vec![KeyboardPlacement {
                message: MessageRef::new(1, 5),
                x: 10,
                top: 4,
                width: 30,
                height: 1,
            }],
        );

        view.handle_pointer(PointerInput::new(PointerAction::Pressed, 12, 4), 0);
        let outcome = view.handle_pointer(PointerInput::new(PointerAction::Released, 12, 4), 10);

        assert_eq!(outcome, PointerOutcome::Nothing);
    }

    #[test]
    fn hover_registers_with_driver_until_finished() {
        let chat = chat();
        let mut view = placed_view(&chat);

        view.handle_pointer(PointerInput::new(PointerAction::Moved, 12, 4), 0);
        assert!(view.is_animating());

        assert!(view.tick(100));
        assert!(!view.tick(1_000));
        assert!(!view.is_animating());
    }

    #[test]
    fn scroll_wheel_maps_to_scroll_outcome() {
        let mut view = ViewState::default();

        assert_eq!(
            view.handle_pointer(PointerInput::new(PointerAction::ScrollDown, 0, 0), 0),
            PointerOutcome::Scroll(SCROLL_STEP)
        );
        assert_eq!(
            view.handle_pointer(PointerInput::new(PointerAction::ScrollUp, 0, 0), 0),
            PointerOutcome::Scroll(-SCROLL_STEP)
        );
    }

    #[test]
    fn context_press_returns_hovered_binding() {
        let chat = chat();
        let mut view = placed_view(&chat);

        let outcome = view.handle_pointer(PointerInput::new(PointerAction::ContextPressed, 30, 4), 0);

        match outcome {
            PointerOutcome::Context(binding) => assert_eq!(binding.coords(), ButtonCoords::new(0, 1)),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn rekey_keeps_keyboard_and_retargets_bindings() {
        let chat = chat();
        let mut view = placed_view(&chat);
        view.handle_pointer(PointerInput::new(PointerAction::Pressed, 12, 4), 0);
        let to = MessageRef::new(1, 50);

        view.apply_requests(vec![ViewRequest::Rekeyed {
            from: MessageRef::new(1, 5),
            to,
        }]);
        view.set_layout(
            Rect::new(0, 0, 60, 20),
            40,
            vec![KeyboardPlacement {
                message: to,
                x: 10,
                top: 4,
                width: 30,
                height: 1,
            }],
        );
        view.handle_pointer(PointerInput::new(PointerAction::Released, 12, 4), 20);

        let queued = view.take_pending_activations();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].message(), to);
        assert!(view.keyboard(MessageRef::new(1, 5)).is_none());
        assert_eq!(view.keyboard(to).map(ReplyKeyboard::message), Some(to));
    }

    #[test]
    fn clear_selection_request_stops_animations() {
        let chat = chat();
        let mut view = placed_view(&chat);
        view.handle_pointer(PointerInput::new(PointerAction::Moved, 12, 4), 0);

        view.apply_requests(vec![ViewRequest::ClearSelection]);

        assert!(!view.is_animating());
        assert_eq!(view.tooltip(&chat), None);
    }

    #[test]
    fn tooltip_appears_for_truncated_button() {
        let chat = OpenChatState::open(
            ChatId(1),
            "Bots",
            vec![keyboard_message(5, &["An unusually long button label"])],
        );
        let message = MessageRef::new(1, 5);
        let mut view = ViewState::default();
        view.sync(&chat);
        view.keyboard_mut(message).expect("keyboard").layout(10);
        view.set_layout(
            Rect::new(0, 0, 10, 5),
            5,
            vec![KeyboardPlacement {
                message,
                x: 0,
                top: 0,
                width: 10,
                height: 1,
            }],
        );

        view.handle_pointer(PointerInput::new(PointerAction::Moved, 3, 0), 0);

        assert_eq!(view.tooltip(&chat).as_deref(), Some("An unusually long button label"));
    }

    #[test]
    fn press_without_release_is_let_go_on_next_press() {
        let chat = chat();
        let mut view = placed_view(&chat);

        view.handle_pointer(PointerInput::new(PointerAction::Pressed, 12, 4), 0);
        view.handle_pointer(PointerInput::new(PointerAction::Pressed, 12, 9), 10);
        let outcome = view.handle_pointer(PointerInput::new(PointerAction::Released, 12, 9), 20);

        assert_eq!(outcome, PointerOutcome::Nothing);
        assert!(!view.tick(10_000_000));
        assert!(!view.is_animating());
        assert!(view.take_pending_activations().is_empty());
    }

    #[test]
    fn clear_selection_while_pressed_goes_idle() {
        let chat = chat();
        let mut view = placed_view(&chat);
        view.handle_pointer(PointerInput::new(PointerAction::Pressed, 12, 4), 0);

        view.clear_selection();

        assert!(!view.tick(10_000_000));
        let message = MessageRef::new(1, 5);
        let keyboard = view.keyboard(message).expect("keyboard");
        assert!(keyboard.rows()[0][0].ripple().is_none());
    }

    #[test]
    fn narrow_keyboard_switches_to_compact_style() {
        let message = MessageRef::new(1, 5);
        let chat = OpenChatState::open(
            ChatId(1),
            "Bots",
            vec![keyboard_message(5, &["One", "Two", "Six", "Ten"])],
        );
        let mut view = ViewState::default();
        view.sync(&chat);
        let keyboard = view.keyboard_mut(message).expect("keyboard");
        keyboard.layout(20);
        assert_eq!(keyboard.rows()[0][1].rect().x, 8);

        let keyboard = view.fitted_keyboard(message, 20).expect("keyboard");
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = ratatui::buffer::Buffer::empty(area);
        keyboard.paint(&mut buf, area, area, 0, &chat);

        assert_eq!(keyboard.rows()[0][1].rect().x, 6);
    }

    #[test]
    fn wide_keyboard_keeps_regular_style() {
        let message = MessageRef::new(1, 5);
        let chat = OpenChatState::open(
            ChatId(1),
            "Bots",
            vec![keyboard_message(5, &["One", "Two", "Six", "Ten"])],
        );
        let mut view = ViewState::default();
        view.sync(&chat);

        let keyboard = view.fitted_keyboard(message, 40).expect("keyboard");
        keyboard.layout(40);

        // Minimum of 7 cells each, then 9 cells of slack spread from the left.
        assert_eq!(keyboard.rows()[0][1].rect().x, 11);
    }

    #[test]
    fn tooltip_follows_relayout() {
        let message = MessageRef::new(1, 5);
        let chat = OpenChatState::open(
            ChatId(1),
            "Bots",
            vec![keyboard_message(5, &["An unusually long button label"])],
        );
        let mut view = ViewState::default();
        view.sync(&chat);
        view.keyboard_mut(message).expect("keyboard").layout(10);
        view.set_layout(
            Rect::new(0, 0, 60, 5),
            5,
            vec![KeyboardPlacement {
                message,
                x: 0,
                top: 0,
                width: 10,
                height: 1,
            }],
        );
        view.handle_pointer(PointerInput::new(PointerAction::Moved, 3, 0), 0);
        assert!(view.tooltip(&chat).is_some());

        view.keyboard_mut(message).expect("keyboard").layout(60);

        assert_eq!(view.tooltip(&chat), None);
    }
}
