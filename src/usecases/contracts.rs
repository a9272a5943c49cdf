use std::time::Duration;

use anyhow::Result;

use crate::domain::{
    click_binding::ClickBinding,
    events::{AppEvent, TimeMs},
    markup::RequestId,
    message::MessageRef,
    shell_state::ShellState,
};

use super::activate_button::ButtonAction;

pub trait AppEventSource {
    /// Waits up to `timeout` for input; a quiet period yields `Tick`.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;

    /// Runs clock-driven work once per loop turn.
    fn on_frame(&mut self, now: TimeMs) -> Result<()>;

    fn activate_button(&mut self, binding: &ClickBinding) -> Result<()>;
    fn copy_button_link(&mut self, binding: &ClickBinding) -> Result<()>;
}

/// Receives the actions of activated keyboard buttons.
pub trait ButtonActionSink {
    fn dispatch(&mut self, message: MessageRef, action: &ButtonAction) -> Result<()>;
}

/// Request layer handing out ids for callback and game queries.
pub trait RequestIssuer {
    fn issue(&mut self, message: MessageRef, payload: &[u8]) -> Result<RequestId>;
}
