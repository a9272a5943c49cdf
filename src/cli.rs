use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "replykb", about = "Terminal chat view with inline reply keyboards")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start TUI shell
    Run {
        /// Chat fixture to open instead of the built-in demo chat
        #[arg(long)]
        chat: Option<PathBuf>,
    },
    /// Print keyboard geometry for a given width
    Layout {
        /// Available width in terminal cells
        #[arg(long)]
        width: u16,
        /// Chat fixture to lay out instead of the built-in demo chat
        #[arg(long)]
        chat: Option<PathBuf>,
    },
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run { chat: None })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn defaults_to_run_when_command_is_missing() {
        let cli = Cli::parse_from(["replykb"]);

        assert!(matches!(cli.command_or_default(), Command::Run { chat: None }));
    }

    #[test]
    fn parses_explicit_run_command() {
        let cli = Cli::parse_from(["replykb", "run", "--config", "custom.toml", "--chat", "chat.toml"]);

        match cli.command_or_default() {
            Command::Run { chat } => assert_eq!(chat.as_deref(), Some(Path::new("chat.toml"))),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(
            cli.config
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("custom.toml".to_owned())
        );
    }

    #[test]
    fn layout_requires_width() {
        assert!(Cli::try_parse_from(["replykb", "layout"]).is_err());

        let cli = Cli::parse_from(["replykb", "layout", "--width", "48"]);
        assert!(matches!(
            cli.command_or_default(),
            Command::Layout { width: 48, chat: None }
        ));
    }
}
