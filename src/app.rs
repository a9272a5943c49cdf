use anyhow::Result;

use crate::{
    cli::{Cli, Command},
    domain, infra,
    ui::{self, layout_report},
    usecases::{
        self,
        bootstrap::{self, LogTarget},
        context::AppContext,
    },
};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command_or_default() {
        Command::Run { chat } => {
            let (context, _log_guard) = bootstrap::bootstrap(cli.config.as_deref(), chat.as_deref(), LogTarget::File)?;
            log_module_boundaries();

            let mut shell = bootstrap::compose_shell(&context);
            ui::shell::start(&context, shell.event_source.as_mut(), shell.orchestrator.as_mut())?;
        }
        Command::Layout { width, chat } => {
            let (context, _) = bootstrap::bootstrap(cli.config.as_deref(), chat.as_deref(), LogTarget::Stderr)?;
            log_module_boundaries();

            for line in layout_lines(&context, width) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn log_module_boundaries() {
    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );
}

fn layout_lines(context: &AppContext, width: u16) -> Vec<String> {
    let metrics = ui::shell::button_metrics(&context.config.keyboard);
    layout_report::keyboard_report(&context.chat, width, metrics)
}
