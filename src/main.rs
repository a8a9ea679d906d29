#![allow(non_snake_case)]

use std::env;
use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scheduleBot::cli::{Cli, Commands, describe_parse};
use scheduleBot::config::{AppConfig, LogFormat, RunMode, Settings};
use scheduleBot::handlers::commands::CommandTable;
use scheduleBot::handlers::console::run_console;
use scheduleBot::handlers::state::BotState;
use scheduleBot::runtime;

const DEFAULT_CONSOLE_USER: &str = "local";

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match cli.config.clone().or_else(|| env::var("CONFIG_FILE").ok()) {
        Some(path) => AppConfig::from_file(&path)?,
        None => AppConfig::default(),
    };
    let settings = Settings::from_config(&config)?;
    init_logging(settings.log_format);

    let command = cli.command.unwrap_or(match settings.run_mode {
        RunMode::Bot => Commands::Run,
        RunMode::Console => Commands::Console {
            user: DEFAULT_CONSOLE_USER.to_string(),
        },
    });

    let state = BotState::from_settings(&settings);
    let table = Arc::new(CommandTable::standard());

    match command {
        Commands::Run => runtime::run_bot(&settings, state, table).await?,
        Commands::Console { user } => run_console(state, table, &user).await,
        Commands::ParseTime { text } => println!("{}", describe_parse(&text, settings.timezone)),
    }
    Ok(())
}
