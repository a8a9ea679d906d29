use std::fs;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use scheduleBot::handlers::commands::CommandTable;
use scheduleBot::handlers::console::{ConsoleDriver, ConsoleStep};
use scheduleBot::handlers::state::BotState;

#[derive(Deserialize)]
struct ScriptLine {
    input: String,
    #[serde(default)]
    expect: Option<String>,
    #[serde(default)]
    contains: Option<String>,
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn script_drives_console_session() {
    let temp_dir = std::env::temp_dir().join(format!("schedulebot_script_{}", uuid::Uuid::new_v4()));
    let script_path = temp_dir.join("script.jsonl");
    fs::create_dir_all(&temp_dir).unwrap();
    fs::write(
        &script_path,
        r#"{"input":"meeting schedule \"10:00 AM\" \"11:00 AM\"","expect":"Added meeting 1: 10:00 AM - 11:00 AM"}
{"input":"meeting view 1","contains":"(use `accept 1` or `decline 1`)"}
{"input":"accept 1","expect":"Meeting 1: 10:00 AM - 11:00 AM\n  ana"}
{"input":"user bo","expect":"Now acting as bo (2)"}
{"input":"meeting busy 10:30 12:00","expect":"You are now busy from 10:30 AM - 12:00 PM"}
{"input":"accept 1","expect":"Meeting 1: 10:00 AM - 11:00 AM\n  ana"}
{"input":"user ana","expect":"Now acting as ana (1)"}
{"input":"meeting agenda","expect":"Your agenda\n  1. Meeting 1: 10:00 AM - 11:00 AM"}
{"input":"decline 1","expect":"Meeting 1: 10:00 AM - 11:00 AM"}
{"input":"kanban add Docs \"Write the readme\"","expect":"Ticket added! Id: 1"}
{"input":"kanban move 1 done","expect":"Ticket updated!"}
{"input":"kanban list","expect":"Tickets\n  1 - Docs: Status: Done, Assignee: None"}
{"input":"meeting cancel 1","expect":"Meeting canceled!"}
{"input":"accept 1","expect":"No such meeting."}
{"input":"meeting schedule 10:00","expect":"Usage: meeting schedule <start> <end>"}"#,
    )
    .unwrap();

    let state = BotState::new(chrono_tz::UTC, Duration::from_secs(60));
    let mut driver = ConsoleDriver::new(state, Arc::new(CommandTable::standard()), "ana");

    let content = fs::read_to_string(&script_path).unwrap();
    for line in content.lines() {
        let step: ScriptLine = serde_json::from_str(line).unwrap();
        let output = match driver.execute_at(&step.input, now()).await {
            ConsoleStep::Output(output) => output,
            ConsoleStep::Quit => panic!("script should not quit on {:?}", step.input),
        };
        if let Some(expected) = step.expect {
            assert_eq!(output, expected, "input: {}", step.input);
        }
        if let Some(fragment) = step.contains {
            assert!(output.contains(&fragment), "input: {}, output: {}", step.input, output);
        }
    }

    assert_eq!(driver.execute_at("quit", now()).await, ConsoleStep::Quit);
    let _ = fs::remove_dir_all(&temp_dir);
}
