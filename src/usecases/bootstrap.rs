use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    domain::shell_state::ShellState,
    infra::{
        self,
        actions::{OpenerActionSink, SequentialRequestIssuer},
        clipboard::SystemClipboard,
        config::FileConfigAdapter,
        contracts::ConfigAdapter,
        opener::SystemOpener,
    },
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        shell::DefaultShellOrchestrator,
    },
};

/// How logs leave the process for the current command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Rolling file; the TUI owns the terminal.
    File,
    Stderr,
}

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

/// Loads config and the chat fixture, then starts logging. The guard must
/// outlive the run when logging to a file.
pub fn bootstrap(
    config_path: Option<&Path>,
    chat_path: Option<&Path>,
    log_target: LogTarget,
) -> Result<(AppContext, Option<WorkerGuard>)> {
    let context = build_context(config_path, chat_path)?;

    let guard = match log_target {
        LogTarget::File => Some(infra::logging::init(&context.config.logging)?),
        LogTarget::Stderr => {
            infra::logging::init_stderr(&context.config.logging)?;
            None
        }
    };
    tracing::debug!(
        messages = context.chat.messages().len(),
        chat = context.chat.chat_title(),
        "context ready"
    );

    Ok((context, guard))
}

fn build_context(config_path: Option<&Path>, chat_path: Option<&Path>) -> Result<AppContext> {
    let config = FileConfigAdapter::new(config_path).load()?;
    let chat = infra::fixture::load_chat(chat_path)?;

    Ok(AppContext::new(config, chat))
}

pub fn compose_shell(context: &AppContext) -> ShellComposition {
    let orchestrator = DefaultShellOrchestrator::new(
        ShellState::new(context.chat.clone()),
        OpenerActionSink::new(SystemOpener),
        SequentialRequestIssuer::default(),
        SystemClipboard::default(),
        context.config.demo.callback_latency_ms,
    );

    ShellComposition {
        event_source: Box::new(CrosstermEventSource),
        orchestrator: Box::new(orchestrator),
    }
}
