//! Command-line surface

use clap::{ArgAction, Parser, Subcommand};
use maru_common::MaruConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "maructl")]
#[command(about = "Maru - route natural-language commands to local functions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $MARU_CONFIG or ~/.config/maru/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Model used for routing decisions
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// OpenAI-compatible endpoint base URL
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Reasoning service timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive shell (default)
    Repl,

    /// Route a single instruction and exit
    Ask {
        /// Instruction text
        #[arg(required = true, num_args = 1..)]
        instruction: Vec<String>,
    },

    /// List the registered operations
    Operations {
        /// Print the declaration payload sent to the reasoning service
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn selected_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Repl)
    }

    /// Command-line flags win over the config file
    pub fn apply_overrides(&self, config: &mut MaruConfig) {
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.llm.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.llm.timeout_secs = timeout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_repl() {
        let cli = Cli::parse_from(["maructl"]);
        assert_eq!(cli.selected_command(), Commands::Repl);
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::parse_from(["maructl", "ask", "서울", "날씨", "어때?"]);
        assert_eq!(
            cli.selected_command(),
            Commands::Ask {
                instruction: vec!["서울".into(), "날씨".into(), "어때?".into()]
            }
        );
        assert!(Cli::try_parse_from(["maructl", "ask"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "maructl",
            "operations",
            "--model",
            "gpt-4o",
            "--timeout",
            "5",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);

        let mut config = MaruConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.timeout_secs, 5);
        assert_eq!(config.llm.endpoint, "https://api.openai.com");
    }
}
