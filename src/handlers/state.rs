use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::events::queue::RsvpSessions;
use crate::service::kanban::KanbanBoard;
use crate::service::registry::MeetingRegistry;

/// Everything command handlers share; built once at startup.
#[derive(Clone)]
pub struct BotState {
    pub meetings: Arc<Mutex<MeetingRegistry>>,
    pub kanban: Arc<Mutex<KanbanBoard>>,
    pub sessions: RsvpSessions,
    pub timezone: Tz,
    pub rsvp_timeout: Duration,
}

impl BotState {
    pub fn new(timezone: Tz, rsvp_timeout: Duration) -> Self {
        Self {
            meetings: Arc::new(Mutex::new(MeetingRegistry::new())),
            kanban: Arc::new(Mutex::new(KanbanBoard::new())),
            sessions: RsvpSessions::new(),
            timezone,
            rsvp_timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.timezone, settings.rsvp_timeout)
    }
}
