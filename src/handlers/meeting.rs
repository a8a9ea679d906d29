use chrono::NaiveDateTime;

use crate::errors::ScheduleError;
use crate::handlers::commands::{CommandSpec, HandlerFuture, OptionSpec, Outcome, SubcommandSpec};
use crate::handlers::invocation::{Caller, Invocation};
use crate::handlers::reply::{Card, EmbedField, Reply};
use crate::handlers::state::BotState;
use crate::models::meeting::MeetingId;
use crate::models::meeting_user::CommitmentSource;
use crate::service::registry::{AgendaEntry, MeetingSnapshot};
use crate::service::time_parser::TIME_HINT;

pub fn spec() -> CommandSpec {
    let window = || {
        vec![
            OptionSpec::text("start", TIME_HINT),
            OptionSpec::text("end", TIME_HINT),
        ]
    };
    let id = || vec![OptionSpec::integer("id", "Meeting id")];
    CommandSpec {
        name: "meeting",
        description: "Meeting commands",
        options: Vec::new(),
        subcommands: vec![
            SubcommandSpec::new("schedule", "Schedule a meeting", window()),
            SubcommandSpec::new("cancel", "Cancel a meeting", id()),
            SubcommandSpec::new(
                "busy",
                "Mark yourself as busy for a given time period",
                window(),
            ),
            SubcommandSpec::new("view", "View info about a meeting", id()),
            SubcommandSpec::new("agenda", "List your meetings and busy blocks", Vec::new()),
            SubcommandSpec::new(
                "free",
                "Remove one of your busy blocks",
                vec![OptionSpec::integer("position", "Position shown by /meeting agenda")],
            ),
        ],
        handler: handle,
    }
}

fn handle<'a>(state: &'a BotState, invocation: &'a Invocation, caller: &'a Caller) -> HandlerFuture<'a> {
    Box::pin(async move { run(state, invocation, caller).await })
}

async fn run(state: &BotState, invocation: &Invocation, caller: &Caller) -> Outcome {
    let reply = match invocation.subcommand.as_deref() {
        Some("schedule") => {
            let Some((start, end)) = window_args(invocation) else {
                return Outcome::Reply(missing("start` and `end"));
            };
            let mut registry = state.meetings.lock().await;
            match registry.schedule(start, end, caller.now) {
                Ok((id, block)) => {
                    Reply::text(format!("Added meeting {}: {}", id, block.display(caller.now)))
                }
                Err(err) => failure(err),
            }
        }
        Some("cancel") => {
            let mut registry = state.meetings.lock().await;
            match meeting_id(invocation).and_then(|id| registry.cancel(id)) {
                Ok(()) => Reply::text("Meeting canceled!"),
                Err(err) => failure(err),
            }
        }
        Some("busy") => {
            let Some((start, end)) = window_args(invocation) else {
                return Outcome::Reply(missing("start` and `end"));
            };
            let mut registry = state.meetings.lock().await;
            match registry.mark_busy(caller.user_id, &caller.display_name, start, end, caller.now) {
                Ok(block) => Reply::text(format!("You are now busy from {}", block.display(caller.now))),
                Err(err) => failure(err),
            }
        }
        Some("view") => {
            let registry = state.meetings.lock().await;
            match meeting_id(invocation).and_then(|id| registry.view(id)) {
                Ok(snapshot) => return Outcome::Rsvp(snapshot.id),
                Err(err) => failure(err),
            }
        }
        Some("agenda") => {
            let registry = state.meetings.lock().await;
            Reply {
                ephemeral: true,
                ..Reply::cards(agenda_cards(&registry.agenda(caller.user_id), caller.now))
            }
        }
        Some("free") => {
            let position = invocation
                .get_int("position")
                .and_then(|raw| usize::try_from(raw).ok())
                .unwrap_or(0);
            let mut registry = state.meetings.lock().await;
            match registry.free(caller.user_id, position) {
                Ok(block) => Reply::ephemeral(format!("You are no longer busy from {}", block.display(caller.now))),
                Err(err) => failure(err),
            }
        }
        _ => Reply::ephemeral(
            "Try `/meeting schedule`, `cancel`, `busy`, `view`, `agenda` or `free`.",
        ),
    };
    Outcome::Reply(reply)
}

fn window_args(invocation: &Invocation) -> Option<(&str, &str)> {
    Some((invocation.get_str("start")?, invocation.get_str("end")?))
}

fn meeting_id(invocation: &Invocation) -> Result<MeetingId, ScheduleError> {
    let raw = invocation.get_int("id").unwrap_or(-1);
    MeetingId::try_from(raw).map_err(|_| ScheduleError::NotFound(0))
}

fn failure(err: ScheduleError) -> Reply {
    Reply::ephemeral(err.user_message())
}

fn missing(name: &str) -> Reply {
    Reply::ephemeral(format!("Missing `{}` argument for /meeting", name))
}

pub fn meeting_title(id: MeetingId, block: String) -> String {
    format!("Meeting {}: {}", id, block)
}

/// One inline field per attendee, under the meeting's time.
pub fn meeting_card(snapshot: &MeetingSnapshot, now: NaiveDateTime) -> Card {
    Card::capped(
        meeting_title(snapshot.id, snapshot.block.display(now)),
        snapshot
            .attendees
            .iter()
            .map(|name| EmbedField::inline(name.as_str(), ""))
            .collect(),
    )
}

pub fn canceled_card(id: MeetingId) -> Card {
    Card::new(format!("Meeting {} was canceled", id))
}

pub fn agenda_cards(entries: &[AgendaEntry], now: NaiveDateTime) -> Vec<Card> {
    if entries.is_empty() {
        return vec![Card::new("Your agenda is empty")];
    }
    let fields = entries
        .iter()
        .map(|entry| {
            let label = match entry.source {
                CommitmentSource::Meeting(id) => format!("{}. Meeting {}", entry.position, id),
                CommitmentSource::Busy => format!("{}. Busy", entry.position),
            };
            EmbedField::new(label, entry.block.display(now))
        })
        .collect();
    Card::paginate("Your agenda", fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::reply::MAX_FIELDS_PER_CARD;
    use crate::models::time_block::TimeBlock;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn meeting_card_lists_attendees_inline() {
        let snapshot = MeetingSnapshot {
            id: 3,
            block: TimeBlock::new(at(10), at(11)).unwrap(),
            attendees: vec!["ana".to_string(), "bo".to_string()],
        };
        let card = meeting_card(&snapshot, at(8));
        assert_eq!(card.title, "Meeting 3: 10:00 AM - 11:00 AM");
        assert_eq!(card.fields.len(), 2);
        assert!(card.fields.iter().all(|f| f.inline && f.value.is_empty()));
        assert_eq!(card.fields[1].name, "bo");
    }

    #[test]
    fn agenda_card_labels_sources() {
        let block = TimeBlock::new(at(10), at(11)).unwrap();
        let entries = vec![
            AgendaEntry {
                position: 1,
                source: CommitmentSource::Meeting(4),
                block,
            },
            AgendaEntry {
                position: 2,
                source: CommitmentSource::Busy,
                block,
            },
        ];
        let cards = agenda_cards(&entries, at(8));
        assert_eq!(cards.len(), 1);
        let names: Vec<&str> = cards[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["1. Meeting 4", "2. Busy"]);
        assert_eq!(agenda_cards(&[], at(8))[0].title, "Your agenda is empty");
    }

    #[test]
    fn long_agenda_spills_onto_more_cards() {
        let block = TimeBlock::new(at(10), at(11)).unwrap();
        let entries: Vec<AgendaEntry> = (1..=30)
            .map(|position| AgendaEntry {
                position,
                source: CommitmentSource::Busy,
                block,
            })
            .collect();
        let cards = agenda_cards(&entries, at(8));
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title, "Your agenda (1/2)");
        assert_eq!(cards[1].fields[4].name, "30. Busy");
    }

    #[test]
    fn crowded_meeting_card_stays_within_field_cap() {
        let snapshot = MeetingSnapshot {
            id: 3,
            block: TimeBlock::new(at(10), at(11)).unwrap(),
            attendees: (0..30).map(|i| format!("user{i}")).collect(),
        };
        let card = meeting_card(&snapshot, at(8));
        assert_eq!(card.fields.len(), MAX_FIELDS_PER_CARD);
        assert_eq!(card.fields[23].name, "user23");
        assert_eq!(card.fields[24].value, "and 6 more not shown");
    }
}
