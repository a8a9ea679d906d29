use std::time::Duration;

use crate::handlers::commands::{CommandSpec, HandlerFuture, Outcome};
use crate::handlers::invocation::{Caller, Invocation};
use crate::handlers::reply::Reply;
use crate::handlers::state::BotState;

pub fn spec() -> CommandSpec {
    CommandSpec {
        name: "ping",
        description: "Ping the bot to get latency",
        options: Vec::new(),
        subcommands: Vec::new(),
        handler: handle,
    }
}

fn handle<'a>(_state: &'a BotState, _invocation: &'a Invocation, caller: &'a Caller) -> HandlerFuture<'a> {
    Box::pin(async move { Outcome::Reply(pong(caller.latency)) })
}

pub fn pong(latency: Option<Duration>) -> Reply {
    match latency {
        Some(latency) => Reply::ephemeral(format!("Pong: {:.2} ms", latency.as_secs_f64() * 1000.0)),
        None => Reply::ephemeral("Pong: latency unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pong_reports_milliseconds() {
        let reply = pong(Some(Duration::from_micros(42_500)));
        assert_eq!(reply.content.as_deref(), Some("Pong: 42.50 ms"));
        assert!(reply.ephemeral);
        assert_eq!(pong(None).content.as_deref(), Some("Pong: latency unknown"));
    }
}
