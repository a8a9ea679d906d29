use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use inquire::Text;
use serenity::model::id::UserId;
use tracing::info;

use crate::config::local_now;
use crate::handlers::commands::{CommandTable, Outcome};
use crate::handlers::invocation::Caller;
use crate::handlers::meeting::meeting_card;
use crate::handlers::state::BotState;
use crate::models::meeting::MeetingId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleStep {
    Output(String),
    Quit,
}

/// Drives the command table from a terminal, one line at a time.
pub struct ConsoleDriver {
    state: BotState,
    table: Arc<CommandTable>,
    users: HashMap<String, UserId>,
    current: String,
}

impl ConsoleDriver {
    pub fn new(state: BotState, table: Arc<CommandTable>, user: &str) -> Self {
        let mut driver = Self {
            state,
            table,
            users: HashMap::new(),
            current: String::new(),
        };
        driver.switch_user(user);
        driver
    }

    pub fn current_user(&self) -> &str {
        &self.current
    }

    fn switch_user(&mut self, name: &str) -> UserId {
        let next_id = self.users.len() as u64 + 1;
        let id = *self
            .users
            .entry(name.to_string())
            .or_insert_with(|| UserId::new(next_id));
        self.current = name.to_string();
        id
    }

    fn current_id(&self) -> UserId {
        self.users[&self.current]
    }

    pub async fn execute(&mut self, line: &str) -> ConsoleStep {
        let now = local_now(self.state.timezone);
        self.execute_at(line, now).await
    }

    pub async fn execute_at(&mut self, line: &str, now: NaiveDateTime) -> ConsoleStep {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let output = match (words.next(), words.next(), words.next()) {
            (None, _, _) => String::new(),
            (Some("quit" | "exit"), None, _) => return ConsoleStep::Quit,
            (Some("help"), None, _) => format!(
                "Commands: {}. Also: user <name>, accept <id>, decline <id>, quit.",
                self.table.names().join(", ")
            ),
            (Some("user"), Some(name), None) => {
                let id = self.switch_user(name);
                format!("Now acting as {} ({})", name, id)
            }
            (Some(verb @ ("accept" | "decline")), Some(raw), None) => match raw.parse::<MeetingId>() {
                Ok(id) => self.rsvp(verb == "accept", id, now).await,
                Err(_) => "No such meeting.".to_string(),
            },
            _ => self.run_command(line, now).await,
        };
        ConsoleStep::Output(output)
    }

    async fn run_command(&self, line: &str, now: NaiveDateTime) -> String {
        let invocation = match self.table.parse_line(line) {
            Ok(invocation) => invocation,
            Err(message) => return message,
        };
        let caller = Caller {
            user_id: self.current_id(),
            display_name: self.current.clone(),
            now,
            latency: None,
        };
        match self.table.dispatch(&self.state, &invocation, &caller).await {
            Outcome::Reply(reply) => reply.to_text(),
            Outcome::Rsvp(id) => format!(
                "{}\n(use `accept {}` or `decline {}`)",
                self.render_meeting(id, now).await,
                id,
                id
            ),
        }
    }

    async fn rsvp(&self, accept: bool, id: MeetingId, now: NaiveDateTime) -> String {
        let result = {
            let mut registry = self.state.meetings.lock().await;
            if accept {
                registry.accept(id, self.current_id(), &self.current)
            } else {
                registry.decline(id, self.current_id(), &self.current)
            }
        };
        match result {
            Ok(_) => self.render_meeting(id, now).await,
            Err(err) => err.user_message().to_string(),
        }
    }

    async fn render_meeting(&self, id: MeetingId, now: NaiveDateTime) -> String {
        let registry = self.state.meetings.lock().await;
        match registry.view(id) {
            Ok(snapshot) => meeting_card(&snapshot, now).to_text(),
            Err(err) => err.user_message().to_string(),
        }
    }
}

pub async fn run_console(state: BotState, table: Arc<CommandTable>, user: &str) {
    info!(user, "console session started");
    let mut driver = ConsoleDriver::new(state, table, user);
    println!("Type `help` for commands, `quit` to leave.");
    loop {
        let prompt = format!("{}>", driver.current_user());
        let line = match Text::new(&prompt).prompt() {
            Ok(line) => line,
            Err(_) => break,
        };
        match driver.execute(&line).await {
            ConsoleStep::Output(output) if output.is_empty() => {}
            ConsoleStep::Output(output) => println!("{}", output),
            ConsoleStep::Quit => break,
        }
    }
    info!("console session ended");
}
