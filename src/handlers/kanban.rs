use crate::errors::KanbanError;
use crate::handlers::commands::{CommandSpec, HandlerFuture, OptionSpec, Outcome, SubcommandSpec};
use crate::handlers::invocation::{Caller, Invocation};
use crate::handlers::reply::{Card, EmbedField, Reply};
use crate::handlers::state::BotState;
use crate::models::ticket::{Ticket, TicketId, TicketStatus};

pub fn spec() -> CommandSpec {
    let id = || OptionSpec::integer("id", "Ticket id");
    CommandSpec {
        name: "kanban",
        description: "Kanban board commands",
        options: Vec::new(),
        subcommands: vec![
            SubcommandSpec::new(
                "add",
                "Add a ticket",
                vec![
                    OptionSpec::text("name", "Ticket name"),
                    OptionSpec::text("description", "What needs doing"),
                ],
            ),
            SubcommandSpec::new("remove", "Remove a ticket", vec![id()]),
            SubcommandSpec::new(
                "assign",
                "Assign a ticket",
                vec![id(), OptionSpec::text("name", "Who is working on it")],
            ),
            SubcommandSpec::new(
                "move",
                "Move a ticket",
                vec![
                    id(),
                    OptionSpec::text("status", "New status")
                        .choices(TicketStatus::ALL.iter().map(TicketStatus::label).collect()),
                ],
            ),
            SubcommandSpec::new("get", "Get info about a ticket", vec![id()]),
            SubcommandSpec::new("list", "List all tickets", Vec::new()),
        ],
        handler: handle,
    }
}

fn handle<'a>(state: &'a BotState, invocation: &'a Invocation, _caller: &'a Caller) -> HandlerFuture<'a> {
    Box::pin(async move { Outcome::Reply(run(state, invocation).await) })
}

async fn run(state: &BotState, invocation: &Invocation) -> Reply {
    let mut board = state.kanban.lock().await;
    match invocation.subcommand.as_deref() {
        Some("add") => {
            let (Some(name), Some(description)) =
                (invocation.get_str("name"), invocation.get_str("description"))
            else {
                return missing("name` and `description");
            };
            let id = board.add(name, description);
            Reply::text(format!("Ticket added! Id: {}", id))
        }
        Some("remove") => match ticket_id(invocation).and_then(|id| board.remove(id)) {
            Ok(_) => Reply::text("Ticket removed!"),
            Err(err) => failure(err),
        },
        Some("assign") => {
            let Some(name) = invocation.get_str("name") else {
                return missing("name");
            };
            match ticket_id(invocation).and_then(|id| board.assign(id, name).map(|_| ())) {
                Ok(()) => Reply::text("Ticket updated!"),
                Err(err) => failure(err),
            }
        }
        Some("move") => {
            let status = invocation
                .get_str("status")
                .ok_or_else(|| KanbanError::UnknownStatus(String::new()))
                .and_then(|raw| raw.parse::<TicketStatus>());
            match status.and_then(|status| {
                ticket_id(invocation).and_then(|id| board.move_to(id, status).map(|_| ()))
            }) {
                Ok(()) => Reply::text("Ticket updated!"),
                Err(err) => failure(err),
            }
        }
        Some("get") => match ticket_id(invocation).and_then(|id| board.get(id)) {
            Ok(ticket) => Reply::cards(vec![ticket_card(ticket)]),
            Err(err) => failure(err),
        },
        Some("list") => {
            let tickets = board.list();
            if tickets.is_empty() {
                return Reply::text("No tickets yet.");
            }
            Reply::cards(Card::paginate(
                "Tickets",
                tickets.into_iter().map(ticket_field).collect(),
            ))
        }
        _ => Reply::ephemeral("Try `/kanban add`, `remove`, `assign`, `move`, `get` or `list`."),
    }
}

fn ticket_id(invocation: &Invocation) -> Result<TicketId, KanbanError> {
    let raw = invocation.get_int("id").unwrap_or(-1);
    TicketId::try_from(raw).map_err(|_| KanbanError::NotFound(0))
}

fn failure(err: KanbanError) -> Reply {
    Reply::ephemeral(err.user_message())
}

fn missing(name: &str) -> Reply {
    Reply::ephemeral(format!("Missing `{}` argument for /kanban", name))
}

pub fn ticket_card(ticket: &Ticket) -> Card {
    Card::new(ticket.heading())
        .field(EmbedField::new("Description", ticket.description.as_str()))
        .field(EmbedField::new("Status", ticket.status.label()))
        .field(EmbedField::new("Assignee", ticket.assignee_label()))
}

pub fn ticket_field(ticket: &Ticket) -> EmbedField {
    EmbedField::new(
        ticket.heading(),
        format!(
            "Status: {}\nAssignee: {}",
            ticket.status.label(),
            ticket.assignee_label()
        ),
    )
}
