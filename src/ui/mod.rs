//! UI layer: keyboard widget, message rendering and the TUI shell.

mod event_source;
pub mod keyboard;
pub mod layout_report;
mod message_rendering;
pub mod shell;
mod state;
mod styles;
mod terminal;
mod view;

pub(crate) use event_source::CrosstermEventSource;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
