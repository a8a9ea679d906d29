use std::fmt;
use std::str::FromStr;

use crate::errors::KanbanError;

pub type TicketId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    New,
    InProgress,
    InReview,
    Done,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::New,
        TicketStatus::InProgress,
        TicketStatus::InReview,
        TicketStatus::Done,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::InProgress => "In progress",
            TicketStatus::InReview => "In review",
            TicketStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TicketStatus {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| KanbanError::UnknownStatus(wanted.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub name: String,
    pub description: String,
    pub status: TicketStatus,
    pub assignee: Option<String>,
}

impl Ticket {
    pub fn new(id: TicketId, name: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            status: TicketStatus::New,
            assignee: None,
        }
    }

    pub fn assignee_label(&self) -> &str {
        self.assignee.as_deref().unwrap_or("None")
    }

    pub fn heading(&self) -> String {
        format!("{} - {}", self.id, self.name)
    }
}
