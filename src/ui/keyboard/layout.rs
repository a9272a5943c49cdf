//! Button geometry for a keyboard grid.
//!
//! Every button gets at least its minimum width (chrome from the style plus
//! the label). When a row has room to spare the slack is split evenly, so
//! the row exactly fills the usable width. When it does not, buttons keep
//! their minimum and the row runs past the right edge; the painter clips.

use ratatui::layout::Rect;

use crate::domain::{markup::MarkupButton, text::display_width};

use super::style::{ButtonMetrics, KeyboardStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardSize {
    pub width: u16,
    pub height: u16,
}

/// Label width used for sizing; never zero so empty labels still get a cell.
pub fn label_width(label: &str) -> u16 {
    display_width(label).max(1)
}

pub fn min_button_width(button: &MarkupButton, style: &dyn KeyboardStyle) -> u16 {
    style
        .min_button_width(button.kind())
        .saturating_add(label_width(button.label()))
}

/// Horizontal placement `(x, width)` of each button of one row.
pub fn layout_row(min_widths: &[u16], width: u16, skip: u16) -> Vec<(u16, u16)> {
    let count = min_widths.len();
    if count == 0 {
        return Vec::new();
    }

    let gaps = skip.saturating_mul(u16::try_from(count - 1).unwrap_or(u16::MAX));
    let usable = u32::from(width.saturating_sub(gaps));
    let required: u32 = min_widths.iter().map(|&min| u32::from(min)).sum();

    let (share, remainder) = if usable > required {
        let slack = usable - required;
        (slack / count as u32, slack % count as u32)
    } else {
        (0, 0)
    };

    let mut x: u32 = 0;
    min_widths
        .iter()
        .enumerate()
        .map(|(index, &min)| {
            let extra = share + u32::from((index as u32) < remainder);
            let button_width = clamp_u16(u32::from(min) + extra);
            let placed = (clamp_u16(x), button_width);
            x += u32::from(button_width) + u32::from(skip);
            placed
        })
        .collect()
}

/// Lays out the whole grid. Rects are relative to the keyboard's top-left.
pub fn layout_grid(rows: &[Vec<MarkupButton>], width: u16, style: &dyn KeyboardStyle) -> Vec<Vec<Rect>> {
    let metrics = style.metrics();
    rows.iter()
        .enumerate()
        .map(|(row_index, row)| {
            let mins: Vec<u16> = row.iter().map(|button| min_button_width(button, style)).collect();
            let y = row_top(row_index, metrics);
            layout_row(&mins, width, metrics.skip)
                .into_iter()
                .map(|(x, button_width)| Rect::new(x, y, button_width, metrics.height))
                .collect()
        })
        .collect()
}

pub fn row_top(row_index: usize, metrics: ButtonMetrics) -> u16 {
    let pitch = u32::from(metrics.height) + u32::from(metrics.skip);
    clamp_u16(pitch.saturating_mul(u32::try_from(row_index).unwrap_or(u32::MAX)))
}

/// Size that fits every row with equally wide buttons.
pub fn natural_size(rows: &[Vec<MarkupButton>], style: &dyn KeyboardStyle) -> KeyboardSize {
    if rows.is_empty() {
        return KeyboardSize::default();
    }
    let metrics = style.metrics();

    let width = rows
        .iter()
        .map(|row| {
            let widest = row
                .iter()
                .map(|button| u32::from(min_button_width(button, style)))
                .max()
                .unwrap_or(0);
            let count = row.len() as u32;
            widest * count + u32::from(metrics.skip) * count.saturating_sub(1)
        })
        .max()
        .unwrap_or(0);

    let row_count = rows.len() as u32;
    let height = u32::from(metrics.height) * row_count + u32::from(metrics.skip) * (row_count - 1);

    KeyboardSize {
        width: clamp_u16(width),
        height: clamp_u16(height),
    }
}

/// Whether labels fit at `width` with the given metrics. Only rows of more
/// than three buttons can make the keyboard not fit; shorter rows may
/// squeeze their labels instead.
pub fn is_enough_space(rows: &[Vec<MarkupButton>], width: u16, metrics: ButtonMetrics) -> bool {
    rows.iter().all(|row| {
        let count = row.len() as i64;
        let chrome = (count - 1) * i64::from(metrics.skip) + count * 2 * i64::from(metrics.padding);
        let labels: i64 = row.iter().map(|button| i64::from(label_width(button.label()))).sum();
        count <= 3 || i64::from(width) - chrome - labels >= 0
    })
}

fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
