use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::{
    domain::events::{AppEvent, KeyInput, PointerAction, PointerInput},
    usecases::contracts::AppEventSource,
};

#[derive(Default)]
pub struct CrosstermEventSource;

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<AppEvent>> {
        if !event::poll(timeout)? {
            return Ok(Some(AppEvent::Tick));
        }

        Ok(match event::read()? {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => map_mouse(mouse),
            Event::Resize(..) => Some(AppEvent::Tick),
            _ => None,
        })
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.code == KeyCode::Char('q')
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(AppEvent::QuitRequested);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char(ch) => Some(AppEvent::InputKey(KeyInput::new(ch.to_string(), ctrl))),
        KeyCode::Up => Some(AppEvent::InputKey(KeyInput::new("up", ctrl))),
        KeyCode::Down => Some(AppEvent::InputKey(KeyInput::new("down", ctrl))),
        KeyCode::Esc => Some(AppEvent::InputKey(KeyInput::new("esc", ctrl))),
        _ => None,
    }
}

fn map_mouse(mouse: MouseEvent) -> Option<AppEvent> {
    let action = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerAction::Pressed,
        MouseEventKind::Up(MouseButton::Left) => PointerAction::Released,
        MouseEventKind::Down(MouseButton::Right) => PointerAction::ContextPressed,
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => PointerAction::Moved,
        MouseEventKind::ScrollUp => PointerAction::ScrollUp,
        MouseEventKind::ScrollDown => PointerAction::ScrollDown,
        _ => return None,
    };
    Some(AppEvent::Pointer(PointerInput::new(action, mouse.column, mouse.row)))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self, _timeout: Duration) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}
