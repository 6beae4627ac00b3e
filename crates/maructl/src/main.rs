//! maructl - interactive shell for Maru
//!
//! Reads natural-language commands, lets the reasoning service pick one of
//! the built-in functions, and prints the decision and its result.

use anyhow::{Context, Result};
use clap::Parser;
use maru_common::config::API_KEY_ENV;
use maru_common::schema::declarations;
use maru_common::{
    builtin_registry, ConfigError, HttpReasoningClient, IntentRouter, MaruConfig, Registry,
};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use maructl::cli::{Cli, Commands};
use maructl::errors::{EXIT_CONFIG, EXIT_GENERAL_ERROR, EXIT_NOT_HANDLED, EXIT_SUCCESS};
use maructl::logging;
use maructl::output::Ui;
use maructl::shell::Shell;

fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            if let Some(config_error) = e.downcast_ref::<ConfigError>() {
                report_config_error(config_error);
                return ExitCode::from(EXIT_CONFIG);
            }
            eprintln!("오류: {:#}", e);
            ExitCode::from(EXIT_GENERAL_ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let mut config = MaruConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let catalog = config.load_catalog()?;
    let registry = Arc::new(builtin_registry(catalog).context("Failed to register operations")?);
    info!("{} operations registered", registry.len());

    match cli.selected_command() {
        Commands::Operations { json } => {
            print_operations(&registry, json)?;
            Ok(EXIT_SUCCESS)
        }
        Commands::Ask { instruction } => {
            let shell = build_shell(config, registry)?;
            let outcome = shell.handle_line(&instruction.join(" "), &mut io::stdout())?;
            Ok(if outcome.is_success() {
                EXIT_SUCCESS
            } else {
                EXIT_NOT_HANDLED
            })
        }
        Commands::Repl => {
            let shell = build_shell(config, registry)?;
            let stdin = io::stdin();
            shell.run(stdin.lock(), &mut io::stdout())?;
            Ok(EXIT_SUCCESS)
        }
    }
}

fn build_shell(config: MaruConfig, registry: Arc<Registry>) -> Result<Shell<HttpReasoningClient>> {
    let config = config.with_api_key_from_env()?;
    let system_prompt = config.llm.system_prompt.clone();
    info!("Using model {} at {}", config.llm.model, config.llm.endpoint);

    let client = HttpReasoningClient::new(config.llm)?;
    let router = IntentRouter::new(client, system_prompt, registry);
    Ok(Shell::new(router, Ui::auto()))
}

fn print_operations(registry: &Registry, json: bool) -> Result<()> {
    if json {
        let payload = declarations(registry.describe_all());
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", Ui::auto().operations(registry));
    }
    Ok(())
}

fn report_config_error(error: &ConfigError) {
    match error {
        ConfigError::MissingApiKey(_) => {
            eprintln!("오류: {} 환경 변수가 설정되지 않았습니다.", API_KEY_ENV);
            eprintln!(
                "'.env' 파일을 생성하고 '{}=your_api_key'를 추가하세요.",
                API_KEY_ENV
            );
        }
        other => eprintln!("설정 오류: {}", other),
    }
}
