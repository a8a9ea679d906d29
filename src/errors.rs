use thiserror::Error;

use crate::models::meeting::MeetingId;
use crate::models::ticket::TicketId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("start must be before end")]
    InvalidInterval,
    #[error("unrecognized time format: {0:?}")]
    Parse(String),
    #[error("start time must come before end time")]
    Ordering,
    #[error("no meeting with id {0}")]
    NotFound(MeetingId),
    #[error("no busy block at position {0}")]
    NoSuchCommitment(usize),
}

impl ScheduleError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInterval | Self::Ordering => "Start time must come before end time.",
            Self::Parse(_) => "Invalid format - see hint in description.",
            Self::NotFound(_) => "No such meeting.",
            Self::NoSuchCommitment(_) => {
                "No busy block at that position. Meetings are left with the Decline button."
            }
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KanbanError {
    #[error("no ticket with id {0}")]
    NotFound(TicketId),
    #[error("unknown ticket status {0:?}")]
    UnknownStatus(String),
}

impl KanbanError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "No such ticket.",
            Self::UnknownStatus(_) => "Unknown status. Use New, In progress, In review or Done.",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    Syntax { line: usize, content: String },
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("discord client failed: {0}")]
    Discord(#[from] serenity::Error),
}
