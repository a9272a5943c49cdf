//! Keyboard metrics and the painting primitives a keyboard style provides.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
};
use unicode_width::UnicodeWidthChar;

use crate::{domain::markup::ButtonKind, ui::styles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonMetrics {
    pub height: u16,
    pub padding: u16,
    pub skip: u16,
    pub radius: u16,
}

impl Default for ButtonMetrics {
    fn default() -> Self {
        Self {
            height: 1,
            padding: 1,
            skip: 1,
            radius: 0,
        }
    }
}

/// Draw target clipped to a rectangle. Writes outside the clip are dropped.
pub struct Canvas<'a> {
    buf: &'a mut Buffer,
    clip: Rect,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut Buffer, clip: Rect) -> Self {
        let clip = clip.intersection(buf.area);
        Self { buf, clip }
    }

    #[cfg(test)]
    pub fn clip(&self) -> Rect {
        self.clip
    }

    pub fn fill(&mut self, rect: Rect, style: Style) {
        let visible = rect.intersection(self.clip);
        if visible.is_empty() {
            return;
        }
        for y in visible.top()..visible.bottom() {
            for x in visible.left()..visible.right() {
                if let Some(cell) = self.buf.cell_mut(Position::new(x, y)) {
                    cell.set_symbol(" ").set_style(style);
                }
            }
        }
    }

    /// Restyles cells without touching their symbols.
    pub fn patch_style(&mut self, rect: Rect, style: Style) {
        let visible = rect.intersection(self.clip);
        if !visible.is_empty() {
            self.buf.set_style(visible, style);
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let mut x = u32::from(x);
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as u32;
            if width == 0 {
                continue;
            }
            let Ok(column) = u16::try_from(x) else {
                return;
            };
            let fits = (0..width).all(|offset| {
                u16::try_from(x + offset)
                    .is_ok_and(|column| self.clip.contains(Position::new(column, y)))
            });
            if fits {
                if let Some(cell) = self.buf.cell_mut(Position::new(column, y)) {
                    let mut symbol = [0u8; 4];
                    cell.set_symbol(ch.encode_utf8(&mut symbol)).set_style(style);
                }
                for offset in 1..width {
                    if let Some(cell) = self.buf.cell_mut(Position::new(column + offset as u16, y)) {
                        cell.reset();
                    }
                }
            }
            x += width;
        }
    }
}

/// Painting and sizing rules of a keyboard.
pub trait KeyboardStyle {
    fn metrics(&self) -> ButtonMetrics;

    fn text_style(&self) -> Style;

    /// Width of everything but the label: paddings plus the icon column.
    fn min_button_width(&self, kind: ButtonKind) -> u16;

    /// Cells reserved on the right for the kind icon.
    fn icon_width(&self, kind: ButtonKind) -> u16;

    fn paint_button_bg(&self, canvas: &mut Canvas<'_>, rect: Rect, how_much_over: f64);

    fn paint_button_icon(&self, canvas: &mut Canvas<'_>, rect: Rect, kind: ButtonKind);

    fn paint_button_loading(&self, canvas: &mut Canvas<'_>, rect: Rect);

    /// `opacity` is 1 while the button is held and fades to 0 after release.
    fn paint_ripple(&self, canvas: &mut Canvas<'_>, rect: Rect, opacity: f64);
}

/// Keyboard style for the terminal shell.
#[derive(Debug, Clone)]
pub struct TerminalKeyboardStyle {
    metrics: ButtonMetrics,
}

const ICON_COLUMNS: u16 = 2;

impl TerminalKeyboardStyle {
    pub fn new(metrics: ButtonMetrics) -> Self {
        Self { metrics }
    }

    fn icon(kind: ButtonKind) -> Option<char> {
        match kind {
            ButtonKind::Default | ButtonKind::Callback => None,
            ButtonKind::Url => Some('↗'),
            ButtonKind::SwitchInline | ButtonKind::SwitchInlineSame => Some('↪'),
            ButtonKind::RequestPhone => Some('☎'),
            ButtonKind::RequestLocation => Some('⌖'),
            ButtonKind::Game => Some('▶'),
            ButtonKind::Buy => Some('$'),
        }
    }

    fn corner_column(&self, rect: Rect) -> u16 {
        rect.right().saturating_sub(self.metrics.padding + 1).max(rect.left())
    }

    fn text_row(&self, rect: Rect) -> u16 {
        rect.top() + rect.height.saturating_sub(1) / 2
    }

    fn paint_rounded_border(&self, canvas: &mut Canvas<'_>, rect: Rect, style: Style) {
        if rect.width < 2 || rect.height < 3 {
            return;
        }
        let (left, right) = (rect.left(), rect.right() - 1);
        let (top, bottom) = (rect.top(), rect.bottom() - 1);
        let horizontal = "─".repeat(usize::from(rect.width - 2));

        canvas.put_str(left, top, "╭", style);
        canvas.put_str(left + 1, top, &horizontal, style);
        canvas.put_str(right, top, "╮", style);
        for y in top + 1..bottom {
            canvas.put_str(left, y, "│", style);
            canvas.put_str(right, y, "│", style);
        }
        canvas.put_str(left, bottom, "╰", style);
        canvas.put_str(left + 1, bottom, &horizontal, style);
        canvas.put_str(right, bottom, "╯", style);
    }
}

impl KeyboardStyle for TerminalKeyboardStyle {
    fn metrics(&self) -> ButtonMetrics {
        self.metrics
    }

    fn text_style(&self) -> Style {
        styles::keyboard_button_text_style()
    }

    fn min_button_width(&self, kind: ButtonKind) -> u16 {
        self.metrics.padding * 2 + self.icon_width(kind)
    }

    fn icon_width(&self, kind: ButtonKind) -> u16 {
        if kind == ButtonKind::Default {
            0
        } else {
            ICON_COLUMNS
        }
    }

    fn paint_button_bg(&self, canvas: &mut Canvas<'_>, rect: Rect, how_much_over: f64) {
        let bg = blend(
            styles::KEYBOARD_BUTTON_BG,
            styles::KEYBOARD_BUTTON_BG_OVER,
            how_much_over,
        );
        canvas.fill(rect, Style::default().bg(bg));
        if self.metrics.radius > 0 {
            self.paint_rounded_border(canvas, rect, styles::keyboard_button_border_style().bg(bg));
        }
    }

    fn paint_button_icon(&self, canvas: &mut Canvas<'_>, rect: Rect, kind: ButtonKind) {
        if let Some(icon) = Self::icon(kind) {
            let mut symbol = [0u8; 4];
            canvas.put_str(
                self.corner_column(rect),
                self.text_row(rect),
                icon.encode_utf8(&mut symbol),
                styles::keyboard_button_icon_style(),
            );
        }
    }

    fn paint_button_loading(&self, canvas: &mut Canvas<'_>, rect: Rect) {
        canvas.put_str(
            self.corner_column(rect),
            self.text_row(rect),
            "⋯",
            styles::keyboard_button_icon_style(),
        );
    }

    fn paint_ripple(&self, canvas: &mut Canvas<'_>, rect: Rect, opacity: f64) {
        let bg = blend(
            styles::KEYBOARD_BUTTON_BG_OVER,
            styles::KEYBOARD_RIPPLE,
            opacity,
        );
        canvas.patch_style(rect, Style::default().bg(bg));
    }
}

/// Linear mix of two RGB colors; other colors snap at the midpoint.
pub fn blend(from: Color, to: Color, amount: f64) -> Color {
    let amount = amount.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| {
                (f64::from(a) + (f64::from(b) - f64::from(a)) * amount).round() as u8
            };
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if amount < 0.5 => from,
        _ => to,
    }
}
