use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDateTime;
use serenity::all::{CommandData, CommandDataOption, CommandDataOptionValue};
use serenity::model::id::UserId;

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
}

/// A slash command reduced to names and typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: String,
    pub subcommand: Option<String>,
    pub args: HashMap<String, ArgValue>,
}

impl Invocation {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            subcommand: None,
            args: HashMap::new(),
        }
    }

    pub fn sub(mut self, subcommand: &str) -> Self {
        self.subcommand = Some(subcommand.to_string());
        self
    }

    pub fn arg(mut self, name: &str, value: ArgValue) -> Self {
        self.args.insert(name.to_string(), value);
        self
    }

    pub fn str_arg(self, name: &str, value: &str) -> Self {
        self.arg(name, ArgValue::Str(value.to_string()))
    }

    pub fn int_arg(self, name: &str, value: i64) -> Self {
        self.arg(name, ArgValue::Int(value))
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.args.get(name) {
            Some(ArgValue::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.args.get(name) {
            Some(ArgValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn from_command(data: &CommandData) -> Self {
        let mut invocation = Invocation::new(&data.name);
        collect_args(&mut invocation, &data.options);
        invocation
    }
}

fn collect_args(invocation: &mut Invocation, options: &[CommandDataOption]) {
    for option in options {
        match &option.value {
            CommandDataOptionValue::SubCommand(nested) => {
                invocation.subcommand = Some(option.name.clone());
                collect_args(invocation, nested);
            }
            CommandDataOptionValue::String(value) => {
                invocation
                    .args
                    .insert(option.name.clone(), ArgValue::Str(value.clone()));
            }
            CommandDataOptionValue::Integer(value) => {
                invocation
                    .args
                    .insert(option.name.clone(), ArgValue::Int(*value));
            }
            _ => {}
        }
    }
}

/// Who invoked a command and when, as seen by the bot.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: UserId,
    pub display_name: String,
    pub now: NaiveDateTime,
    pub latency: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_exposes_typed_args() {
        let invocation = Invocation::new("kanban")
            .sub("assign")
            .int_arg("id", 3)
            .str_arg("name", "ana");
        assert_eq!(invocation.subcommand.as_deref(), Some("assign"));
        assert_eq!(invocation.get_int("id"), Some(3));
        assert_eq!(invocation.get_str("name"), Some("ana"));
        assert_eq!(invocation.get_str("id"), None);
        assert_eq!(invocation.get_int("missing"), None);
    }
}
