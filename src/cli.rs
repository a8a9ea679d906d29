use chrono_tz::Tz;
use clap::{Parser, Subcommand};

use crate::config::local_now;
use crate::service::time_parser::parse_time;

#[derive(Parser, Debug)]
#[command(name = "scheduleBot", about = "Discord bot for pings, a kanban board and meetings")]
pub struct Cli {
    /// Env-style config file; falls back to CONFIG_FILE.
    #[arg(long)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Connect to Discord and serve slash commands.
    Run,
    /// Drive the same commands from the terminal.
    Console {
        #[arg(long, default_value = "local")]
        user: String,
    },
    /// Show how a time string would be read.
    ParseTime { text: String },
}

pub fn describe_parse(text: &str, timezone: Tz) -> String {
    match parse_time(text, local_now(timezone)) {
        Ok(value) => value.format("%Y-%m-%d %H:%M").to_string(),
        Err(err) => err.to_string(),
    }
}
