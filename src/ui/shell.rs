use std::time::{Duration, Instant};

use anyhow::Result;

use crate::{
    domain::{
        click_binding::ClickBinding,
        events::{AppEvent, KeyInput, TimeMs},
        shell_state::ShellState,
    },
    infra::config::KeyboardConfig,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
    },
};

use super::{
    keyboard::{style::ButtonMetrics, KeyboardTimings},
    state::{PointerOutcome, ViewState},
    terminal::TerminalSession,
    view,
};

/// Poll timeout while something animates, roughly 60 frames per second.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        chat_id = orchestrator.state().open_chat().chat_id().0,
        chat = orchestrator.state().open_chat().chat_title(),
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::new()?;
    let mut view_state = view_state_for(&context.config.keyboard);
    let started = Instant::now();

    run_loop(
        &mut view_state,
        event_source,
        orchestrator,
        || elapsed_ms(started),
        |state, view_state, now| terminal.draw(|frame| view::render(frame, state, view_state, now)),
    )
}

pub fn button_metrics(config: &KeyboardConfig) -> ButtonMetrics {
    ButtonMetrics {
        height: config.button_height,
        padding: config.button_padding,
        skip: config.button_skip,
        radius: config.button_radius,
    }
}

pub fn view_state_for(config: &KeyboardConfig) -> ViewState {
    let timings = KeyboardTimings {
        hover_ms: TimeMs::try_from(config.hover_duration_ms).unwrap_or(TimeMs::MAX),
        ripple_ms: TimeMs::try_from(config.ripple_duration_ms).unwrap_or(TimeMs::MAX),
    };
    ViewState::new(button_metrics(config), timings)
}

fn elapsed_ms(started: Instant) -> TimeMs {
    TimeMs::try_from(started.elapsed().as_millis()).unwrap_or(TimeMs::MAX)
}

/// One turn: activate clicks queued last turn, advance clocks, mirror the
/// chat into the view, draw, then wait for the next event.
fn run_loop(
    view_state: &mut ViewState,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    mut clock: impl FnMut() -> TimeMs,
    mut draw: impl FnMut(&ShellState, &mut ViewState, TimeMs) -> Result<()>,
) -> Result<()> {
    while orchestrator.state().is_running() {
        let now = clock();

        for binding in view_state.take_pending_activations() {
            if let Err(error) = orchestrator.activate_button(&binding) {
                report_action_failure(orchestrator, &binding, &error);
            }
        }
        orchestrator.on_frame(now)?;

        let requests = orchestrator.state_mut().take_view_requests();
        view_state.apply_requests(requests);
        view_state.sync(orchestrator.state().open_chat());
        let animating = view_state.tick(now);

        draw(orchestrator.state(), view_state, now)?;

        let timeout = if animating {
            FRAME_INTERVAL
        } else {
            IDLE_POLL_INTERVAL
        };
        if let Some(event) = event_source.next_event(timeout)? {
            dispatch(event, view_state, orchestrator, clock())?;
        }
    }

    tracing::info!("TUI shell stopped");
    Ok(())
}

fn dispatch(
    event: AppEvent,
    view_state: &mut ViewState,
    orchestrator: &mut dyn ShellOrchestrator,
    now: TimeMs,
) -> Result<()> {
    match event {
        AppEvent::Pointer(input) => match view_state.handle_pointer(input, now) {
            PointerOutcome::Scroll(delta) => scroll(view_state, orchestrator, delta),
            PointerOutcome::Context(binding) => {
                if let Err(error) = orchestrator.copy_button_link(&binding) {
                    report_action_failure(orchestrator, &binding, &error);
                }
            }
            PointerOutcome::Clicked | PointerOutcome::Nothing => {}
        },
        AppEvent::InputKey(key) => match view_key(&key) {
            Some(ViewKey::Scroll(delta)) => scroll(view_state, orchestrator, delta),
            Some(ViewKey::ClearSelection) => view_state.clear_selection(),
            None => orchestrator.handle_event(AppEvent::InputKey(key))?,
        },
        other => orchestrator.handle_event(other)?,
    }

    Ok(())
}

enum ViewKey {
    Scroll(i32),
    ClearSelection,
}

fn view_key(key: &KeyInput) -> Option<ViewKey> {
    if key.ctrl {
        return None;
    }
    match key.key.as_str() {
        "up" | "k" => Some(ViewKey::Scroll(-1)),
        "down" | "j" => Some(ViewKey::Scroll(1)),
        "esc" => Some(ViewKey::ClearSelection),
        _ => None,
    }
}

fn scroll(view_state: &ViewState, orchestrator: &mut dyn ShellOrchestrator, delta: i32) {
    let content_height = view_state.content_height();
    let viewport_height = view_state.viewport().height;
    orchestrator
        .state_mut()
        .open_chat_mut()
        .scroll_by(delta, content_height, viewport_height);
}

fn report_action_failure(orchestrator: &mut dyn ShellOrchestrator, binding: &ClickBinding, error: &anyhow::Error) {
    tracing::warn!(
        message = ?binding.message(),
        coords = ?binding.coords(),
        error = ?error,
        "button action failed"
    );
    orchestrator
        .state_mut()
        .set_status(format!("Action failed: {error}"));
}
