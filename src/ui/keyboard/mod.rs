//! Interactive inline keyboard drawn under a message.

pub mod animation;
pub mod layout;
pub mod style;

use std::{borrow::Cow, rc::Rc};

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
};

use crate::domain::{
    click_binding::ClickBinding,
    markup::{ButtonCoords, ButtonKind, MarkupGrid, MarkupResolver},
    message::MessageRef,
    text::{display_width, elide},
};

use self::{
    animation::{AnimationState, Direction, Ripple, TimeMs},
    layout::{KeyboardSize, label_width},
    style::{Canvas, KeyboardStyle},
};

/// Durations of keyboard feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardTimings {
    pub hover_ms: TimeMs,
    pub ripple_ms: TimeMs,
}

impl Default for KeyboardTimings {
    fn default() -> Self {
        Self {
            hover_ms: 200,
            ripple_ms: 300,
        }
    }
}

#[derive(Debug)]
pub struct LaidOutButton {
    kind: ButtonKind,
    label: String,
    rect: Rect,
    // Label width in cells; labels no wider than the text area skip eliding.
    characters: u16,
    how_much_over: f64,
    binding: Rc<ClickBinding>,
    ripple: Option<Ripple>,
}

impl LaidOutButton {
    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Keyboard-relative rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn binding(&self) -> &Rc<ClickBinding> {
        &self.binding
    }

    #[cfg(test)]
    pub fn how_much_over(&self) -> f64 {
        self.how_much_over
    }

    #[cfg(test)]
    pub fn ripple(&self) -> Option<&Ripple> {
        self.ripple.as_ref()
    }
}

pub struct ReplyKeyboard {
    message: MessageRef,
    grid_version: u64,
    rows: Vec<Vec<LaidOutButton>>,
    // Markup snapshot the buttons were built from; layout reads kinds and labels here.
    grid: MarkupGrid,
    style: Rc<dyn KeyboardStyle>,
    timings: KeyboardTimings,
    width: u16,
    size: KeyboardSize,
    dirty: bool,
    animations: AnimationState,
    hovered: Option<ButtonCoords>,
    pressed: Option<ButtonCoords>,
}

impl std::fmt::Debug for ReplyKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyKeyboard")
            .field("message", &self.message)
            .field("grid_version", &self.grid_version)
            .field("width", &self.width)
            .field("dirty", &self.dirty)
            .field("hovered", &self.hovered)
            .field("pressed", &self.pressed)
            .finish_non_exhaustive()
    }
}

impl ReplyKeyboard {
    pub fn new(
        message: MessageRef,
        grid: &MarkupGrid,
        grid_version: u64,
        style: Rc<dyn KeyboardStyle>,
        timings: KeyboardTimings,
    ) -> Self {
        let mut keyboard = Self {
            message,
            grid_version,
            rows: Vec::new(),
            grid: MarkupGrid::default(),
            style,
            timings,
            width: 0,
            size: KeyboardSize::default(),
            dirty: true,
            animations: AnimationState::default(),
            hovered: None,
            pressed: None,
        };
        keyboard.rebuild(grid, grid_version);
        keyboard
    }

    #[cfg(test)]
    pub fn message(&self) -> MessageRef {
        self.message
    }

    pub fn grid_version(&self) -> u64 {
        self.grid_version
    }

    pub fn rows(&self) -> &[Vec<LaidOutButton>] {
        &self.rows
    }

    pub fn button(&self, coords: ButtonCoords) -> Option<&LaidOutButton> {
        self.rows.get(coords.row)?.get(coords.column)
    }

    pub fn hovered(&self) -> Option<ButtonCoords> {
        self.hovered
    }

    /// Replaces the buttons with a new markup. Running animations and ripples
    /// are dropped without notice.
    pub fn rebuild(&mut self, grid: &MarkupGrid, grid_version: u64) {
        self.grid = grid.clone();
        self.grid_version = grid_version;
        self.animations.clear();
        self.hovered = None;
        self.pressed = None;
        self.rows = grid
            .rows()
            .iter()
            .enumerate()
            .map(|(row, buttons)| {
                buttons
                    .iter()
                    .enumerate()
                    .map(|(column, button)| LaidOutButton {
                        kind: button.kind(),
                        label: button.label().to_owned(),
                        rect: Rect::default(),
                        characters: label_width(button.label()),
                        how_much_over: 0.0,
                        binding: Rc::new(ClickBinding::new(
                            ButtonCoords::new(row, column),
                            self.message,
                            true,
                        )),
                        ripple: None,
                    })
                    .collect()
            })
            .collect();
        self.dirty = true;
        tracing::debug!(
            message = ?self.message,
            version = grid_version,
            rows = self.rows.len(),
            "keyboard rebuilt"
        );
    }

    /// Swaps the painting style. The next `paint` lays the buttons out again.
    pub fn set_style(&mut self, style: Rc<dyn KeyboardStyle>) {
        if Rc::ptr_eq(&self.style, &style) {
            return;
        }
        self.style = style;
        self.dirty = true;
    }

    pub fn is_enough_space(&self, width: u16, metrics: style::ButtonMetrics) -> bool {
        layout::is_enough_space(self.grid.rows(), width, metrics)
    }

    /// Computes geometry for `width` and returns the natural size.
    pub fn layout(&mut self, width: u16) -> KeyboardSize {
        let rects = layout::layout_grid(self.grid.rows(), width, self.style.as_ref());
        for (row, (buttons, row_rects)) in self.rows.iter_mut().zip(rects).enumerate() {
            for (column, (button, rect)) in buttons.iter_mut().zip(row_rects).enumerate() {
                let full_displayed = rect.right() <= width;
                button.rect = rect;
                button.binding = Rc::new(ClickBinding::new(
                    ButtonCoords::new(row, column),
                    self.message,
                    full_displayed,
                ));
            }
        }
        self.width = width;
        self.size = layout::natural_size(self.grid.rows(), self.style.as_ref());
        self.dirty = false;
        self.size
    }

    pub fn natural_size(&self) -> KeyboardSize {
        layout::natural_size(self.grid.rows(), self.style.as_ref())
    }

    /// Height occupied once laid out, rows plus skips.
    pub fn height(&self) -> u16 {
        self.natural_size().height
    }

    /// Points every binding at a new message id.
    pub fn update_message_ref(&mut self, message: MessageRef) {
        self.message = message;
        for button in self.rows.iter().flatten() {
            button.binding.set_message(message);
        }
    }

    fn coords_at(&self, point: Position) -> Option<ButtonCoords> {
        self.rows.iter().enumerate().find_map(|(row, buttons)| {
            buttons
                .iter()
                .position(|button| button.rect.contains(point))
                .map(|column| ButtonCoords::new(row, column))
        })
    }

    /// Binding of the button under a keyboard-relative point. Moving onto or
    /// off a button starts its hover transition.
    pub fn hit_test(&mut self, point: Position, now: TimeMs) -> Option<Rc<ClickBinding>> {
        let found = self.coords_at(point);
        if found != self.hovered {
            if let Some(previous) = self.hovered {
                self.animations.start(previous, Direction::Leave, now);
            }
            if let Some(current) = found {
                self.animations.start(current, Direction::Enter, now);
            }
            self.hovered = found;
        }
        found
            .and_then(|coords| self.button(coords))
            .map(|button| Rc::clone(&button.binding))
    }

    /// Pointer left the keyboard area.
    pub fn leave(&mut self, now: TimeMs) {
        if let Some(previous) = self.hovered.take() {
            self.animations.start(previous, Direction::Leave, now);
        }
    }

    /// Starts press feedback. Returns whether a button was hit. A press still
    /// held from before, whose release never arrived, is let go first.
    pub fn press(&mut self, point: Position, now: TimeMs) -> bool {
        self.cancel_press(now);
        self.hit_test(point, now);
        let Some(coords) = self.hovered else {
            return false;
        };
        if let Some(button) = self.button_mut(coords) {
            button.ripple = Some(Ripple::pressed());
        }
        self.pressed = Some(coords);
        true
    }

    /// Ends the press. Yields the binding when released over the pressed button.
    pub fn release(&mut self, now: TimeMs) -> Option<Rc<ClickBinding>> {
        let pressed = self.end_press(now)?;
        if self.hovered != Some(pressed) {
            return None;
        }
        self.button(pressed).map(|button| Rc::clone(&button.binding))
    }

    /// Lets go of the held button without clicking it; its ripple fades out.
    pub fn cancel_press(&mut self, now: TimeMs) {
        self.end_press(now);
    }

    fn end_press(&mut self, now: TimeMs) -> Option<ButtonCoords> {
        let pressed = self.pressed.take()?;
        if let Some(ripple) = self
            .button_mut(pressed)
            .and_then(|button| button.ripple.as_mut())
        {
            ripple.release(now);
        }
        Some(pressed)
    }

    pub fn clear_selection(&mut self) {
        for button in self.rows.iter_mut().flatten() {
            button.how_much_over = 0.0;
            button.ripple = None;
        }
        self.animations.clear();
        self.hovered = None;
        self.pressed = None;
    }

    pub fn is_animating(&self) -> bool {
        !self.animations.is_empty()
            || self
                .rows
                .iter()
                .flatten()
                .any(|button| button.ripple.is_some())
    }

    /// Advances hover transitions and ripples. Returns whether anything still animates.
    pub fn step_animations(&mut self, now: TimeMs) -> bool {
        let rows = &mut self.rows;
        self.animations.step(now, self.timings.hover_ms, |coords, value| {
            if let Some(button) = rows.get_mut(coords.row).and_then(|row| row.get_mut(coords.column)) {
                button.how_much_over = value;
            }
        });

        let ripple_ms = self.timings.ripple_ms;
        for button in self.rows.iter_mut().flatten() {
            if button
                .ripple
                .is_some_and(|ripple| ripple.is_finished(now, ripple_ms))
            {
                button.ripple = None;
            }
        }

        self.is_animating()
    }

    /// Draws the keyboard with its top-left at `area`'s origin. Only cells
    /// inside `clip` are touched; buttons overflowing `area` are cut there.
    pub fn paint(
        &mut self,
        buf: &mut Buffer,
        area: Rect,
        clip: Rect,
        now: TimeMs,
        resolver: &dyn MarkupResolver,
    ) {
        if self.dirty || self.width != area.width {
            self.layout(area.width);
        }

        let clip = clip.intersection(area);
        let mut canvas = Canvas::new(buf, clip);
        let metrics = self.style.metrics();

        for button in self.rows.iter().flatten() {
            let rect = Rect::new(
                area.x.saturating_add(button.rect.x),
                area.y.saturating_add(button.rect.y),
                button.rect.width,
                button.rect.height,
            );
            if rect.top() >= clip.bottom() {
                break;
            }
            if rect.bottom() <= clip.top() {
                continue;
            }

            self.style.paint_button_bg(&mut canvas, rect, button.how_much_over);
            if let Some(ripple) = &button.ripple {
                self.style
                    .paint_ripple(&mut canvas, rect, ripple.opacity(now, self.timings.ripple_ms));
            }
            self.style.paint_button_icon(&mut canvas, rect, button.kind);
            if button.kind.issues_request()
                && button
                    .binding
                    .button(resolver)
                    .is_some_and(|current| current.pending_request().is_some())
            {
                self.style.paint_button_loading(&mut canvas, rect);
            }

            let icon = self.style.icon_width(button.kind);
            let text_width = rect
                .width
                .saturating_sub(metrics.padding * 2)
                .saturating_sub(icon);
            let label = if button.characters <= text_width {
                Cow::Borrowed(button.label.as_str())
            } else {
                Cow::Owned(elide(&button.label, text_width))
            };
            let label_cells = display_width(&label);
            let text_x = rect.x + metrics.padding + (text_width.saturating_sub(label_cells)) / 2;
            let text_y = rect.y + rect.height.saturating_sub(1) / 2;
            canvas.put_str(text_x, text_y, &label, self.style.text_style());
        }
    }

    fn button_mut(&mut self, coords: ButtonCoords) -> Option<&mut LaidOutButton> {
        self.rows.get_mut(coords.row)?.get_mut(coords.column)
    }
}
