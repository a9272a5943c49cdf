use anyhow::Result;

use crate::{
    domain::{
        click_binding::ClickBinding,
        events::{AppEvent, KeyInput, TimeMs, ViewRequest},
        markup::{MarkupGrid, MarkupResolver, RequestId},
        message::MessageId,
        shell_state::ShellState,
    },
    infra::contracts::ClipboardAdapter,
};

use super::{
    activate_button::{activate, ActivationOutcome},
    contracts::{ButtonActionSink, RequestIssuer, ShellOrchestrator},
};

const VIEWS_STEP: u32 = 250;
const VOICE_SEEK_STEP: f64 = 0.1;

/// Callback or game query waiting for its simulated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingAnswer {
    request: RequestId,
    due_at: TimeMs,
}

pub struct DefaultShellOrchestrator<S, I, C>
where
    S: ButtonActionSink,
    I: RequestIssuer,
    C: ClipboardAdapter,
{
    state: ShellState,
    sink: S,
    issuer: I,
    clipboard: C,
    answer_latency_ms: TimeMs,
    now: TimeMs,
    pending_answers: Vec<PendingAnswer>,
}

impl<S, I, C> DefaultShellOrchestrator<S, I, C>
where
    S: ButtonActionSink,
    I: RequestIssuer,
    C: ClipboardAdapter,
{
    pub fn new(state: ShellState, sink: S, issuer: I, clipboard: C, answer_latency_ms: u64) -> Self {
        Self {
            state,
            sink,
            issuer,
            clipboard,
            answer_latency_ms: TimeMs::try_from(answer_latency_ms).unwrap_or(TimeMs::MAX),
            now: 0,
            pending_answers: Vec::new(),
        }
    }

    fn handle_key(&mut self, key: &KeyInput) {
        if key.ctrl {
            return;
        }
        match key.key.as_str() {
            "e" => self.edit_first_keyboard(),
            "d" => self.delete_first_keyboard(),
            "u" => self.rekey_first_keyboard(),
            "c" => {
                self.state.request_view(ViewRequest::ClearSelection);
                self.state.clear_status();
            }
            "n" => {
                self.state.open_chat_mut().add_unread(1);
                self.state.set_status("New message arrived");
            }
            "r" => {
                if self.state.open_chat_mut().freeze_unread_bar() {
                    self.state.set_status("Unread messages marked as seen");
                }
            }
            "v" => {
                let changed = self.state.open_chat_mut().add_views(VIEWS_STEP);
                tracing::debug!(changed, "view counters bumped");
            }
            "[" => self.seek_voice(-VOICE_SEEK_STEP),
            "]" => self.seek_voice(VOICE_SEEK_STEP),
            _ => {}
        }
    }

    /// Rotates every row of the first keyboard by one button, so buttons
    /// change places while keeping the grid shape.
    fn edit_first_keyboard(&mut self) {
        let chat = self.state.open_chat_mut();
        let Some(reference) = chat.first_with_markup() else {
            self.state.set_status("No keyboard to edit");
            return;
        };
        let Some(grid) = chat.markup(reference) else {
            return;
        };
        let rows = grid
            .rows()
            .iter()
            .map(|row| {
                let mut row = row.clone();
                if !row.is_empty() {
                    row.rotate_right(1);
                }
                row
            })
            .collect();

        chat.replace_markup(reference, MarkupGrid::new(rows), None);
        tracing::debug!(message = ?reference, "keyboard edited");
        self.state.set_status("Keyboard edited");
    }

    fn delete_first_keyboard(&mut self) {
        let chat = self.state.open_chat_mut();
        let Some(reference) = chat.first_with_markup() else {
            self.state.set_status("No keyboard to delete");
            return;
        };
        chat.remove_message(reference);
        tracing::debug!(message = ?reference, "message removed");
        self.state.set_status("Message deleted");
    }

    fn seek_voice(&mut self, delta: f64) {
        if self.state.open_chat_mut().seek_voice(delta).is_none() {
            self.state.set_status("No voice message to seek");
        }
    }

    /// Gives the first keyboard message the next free id.
    fn rekey_first_keyboard(&mut self) {
        let chat = self.state.open_chat_mut();
        let Some(from) = chat.first_with_markup() else {
            self.state.set_status("No keyboard to move");
            return;
        };
        let next_id = chat
            .messages()
            .iter()
            .map(|message| message.reference.message_id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        if let Some(to) = chat.rekey_message(from, MessageId(next_id)) {
            self.state.request_view(ViewRequest::Rekeyed { from, to });
            tracing::debug!(?from, ?to, "message rekeyed");
            self.state.set_status(format!("Message moved to id {next_id}"));
        }
    }
}

impl<S, I, C> ShellOrchestrator for DefaultShellOrchestrator<S, I, C>
where
    S: ButtonActionSink,
    I: RequestIssuer,
    C: ClipboardAdapter,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick | AppEvent::Pointer(_) => {}
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => self.handle_key(&key),
        }

        Ok(())
    }

    fn on_frame(&mut self, now: TimeMs) -> Result<()> {
        self.now = now;

        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_answers)
            .into_iter()
            .partition(|pending| pending.due_at <= now);
        self.pending_answers = waiting;

        for pending in due {
            if let Some(message) = self.state.open_chat_mut().complete_request(pending.request) {
                tracing::debug!(request = ?pending.request, ?message, "bot answered");
                self.state.set_status("Bot answered");
            }
        }

        Ok(())
    }

    fn activate_button(&mut self, binding: &ClickBinding) -> Result<()> {
        let outcome = activate(binding, self.state.open_chat_mut(), &mut self.sink, &mut self.issuer)?;

        match outcome {
            ActivationOutcome::ButtonNotFound => {
                self.state.set_status("Button is no longer available");
            }
            ActivationOutcome::RequestAlreadyPending => {
                self.state.set_status("Still waiting for the bot");
            }
            ActivationOutcome::Dispatched { action, request } => {
                if let Some(request) = request {
                    self.pending_answers.push(PendingAnswer {
                        request,
                        due_at: self.now.saturating_add(self.answer_latency_ms),
                    });
                }
                self.state.set_status(action.describe());
            }
        }

        Ok(())
    }

    fn copy_button_link(&mut self, binding: &ClickBinding) -> Result<()> {
        let chat = self.state.open_chat();
        let Some(text) = binding.clipboard_text(chat) else {
            return Ok(());
        };
        let label = binding.clipboard_context_label(chat).unwrap_or("Copy");

        self.clipboard.set_text(&text)?;
        tracing::debug!(message = ?binding.message(), coords = ?binding.coords(), "button text copied");
        self.state.set_status(format!("{label}: {text}"));
        Ok(())
    }
}
