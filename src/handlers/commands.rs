use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serenity::all::CommandOptionType;
use serenity::builder::{CreateCommand, CreateCommandOption};

use crate::handlers::invocation::{ArgValue, Caller, Invocation};
use crate::handlers::reply::Reply;
use crate::handlers::state::BotState;
use crate::handlers::{kanban, meeting, ping};
use crate::models::meeting::MeetingId;

#[derive(Debug)]
pub enum Outcome {
    Reply(Reply),
    /// Open the interactive attendance view for a meeting.
    Rsvp(MeetingId),
}

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Outcome> + Send + 'a>>;
pub type Handler = for<'a> fn(&'a BotState, &'a Invocation, &'a Caller) -> HandlerFuture<'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Text,
    Integer,
}

#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub choices: Vec<&'static str>,
}

impl OptionSpec {
    pub fn text(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: OptionKind::Text,
            choices: Vec::new(),
        }
    }

    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self {
            kind: OptionKind::Integer,
            ..Self::text(name, description)
        }
    }

    pub fn choices(mut self, choices: Vec<&'static str>) -> Self {
        self.choices = choices;
        self
    }

    fn to_option(&self) -> CreateCommandOption {
        let kind = match self.kind {
            OptionKind::Text => CommandOptionType::String,
            OptionKind::Integer => CommandOptionType::Integer,
        };
        self.choices.iter().fold(
            CreateCommandOption::new(kind, self.name, self.description).required(true),
            |option, choice| option.add_string_choice(*choice, *choice),
        )
    }

    fn parse(&self, raw: &str) -> Result<ArgValue, String> {
        match self.kind {
            OptionKind::Integer => raw
                .parse::<i64>()
                .map(ArgValue::Int)
                .map_err(|_| format!("`{}` must be a whole number.", self.name)),
            OptionKind::Text if self.choices.is_empty() => Ok(ArgValue::Str(raw.to_string())),
            OptionKind::Text => self
                .choices
                .iter()
                .find(|choice| choice.eq_ignore_ascii_case(raw))
                .map(|choice| ArgValue::Str(choice.to_string()))
                .ok_or_else(|| {
                    format!("`{}` must be one of: {}.", self.name, self.choices.join(", "))
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubcommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<OptionSpec>,
}

impl SubcommandSpec {
    pub fn new(name: &'static str, description: &'static str, options: Vec<OptionSpec>) -> Self {
        Self {
            name,
            description,
            options,
        }
    }
}

pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<OptionSpec>,
    pub subcommands: Vec<SubcommandSpec>,
    pub handler: Handler,
}

impl CommandSpec {
    pub fn to_registration(&self) -> CreateCommand {
        let command = self.options.iter().fold(
            CreateCommand::new(self.name).description(self.description),
            |command, option| command.add_option(option.to_option()),
        );
        self.subcommands.iter().fold(command, |command, sub| {
            let option = sub.options.iter().fold(
                CreateCommandOption::new(CommandOptionType::SubCommand, sub.name, sub.description),
                |parent, option| parent.add_sub_option(option.to_option()),
            );
            command.add_option(option)
        })
    }

    fn usage(&self, sub: Option<&SubcommandSpec>) -> String {
        let mut usage = format!("Usage: {}", self.name);
        let options = match sub {
            Some(sub) => {
                usage.push_str(&format!(" {}", sub.name));
                &sub.options
            }
            None => &self.options,
        };
        for option in options {
            usage.push_str(&format!(" <{}>", option.name));
        }
        usage
    }
}

/// Maps command names to their definitions and handlers.
pub struct CommandTable {
    commands: Vec<CommandSpec>,
    by_name: HashMap<&'static str, usize>,
}

impl CommandTable {
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        let by_name = commands
            .iter()
            .enumerate()
            .map(|(idx, spec)| (spec.name, idx))
            .collect();
        Self { commands, by_name }
    }

    pub fn standard() -> Self {
        Self::new(vec![ping::spec(), kanban::spec(), meeting::spec()])
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.by_name.get(name).map(|idx| &self.commands[*idx])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|spec| spec.name).collect()
    }

    pub fn registrations(&self) -> Vec<CreateCommand> {
        self.commands.iter().map(CommandSpec::to_registration).collect()
    }

    pub async fn dispatch(&self, state: &BotState, invocation: &Invocation, caller: &Caller) -> Outcome {
        match self.get(&invocation.command) {
            Some(spec) => (spec.handler)(state, invocation, caller).await,
            None => Outcome::Reply(Reply::ephemeral(format!(
                "Unknown command `/{}`.",
                invocation.command
            ))),
        }
    }

    /// Parses a console line such as `meeting schedule "3/15 10:00" "3/15 11:00"`.
    pub fn parse_line(&self, line: &str) -> Result<Invocation, String> {
        let tokens = tokenize(line)?;
        let Some((head, rest)) = tokens.split_first() else {
            return Err("Empty command.".to_string());
        };
        let name = head.trim_start_matches('/');
        let spec = self
            .get(name)
            .ok_or_else(|| format!("Unknown command `{}`. Try one of: {}.", name, self.names().join(", ")))?;

        let mut invocation = Invocation::new(spec.name);
        let (sub, options, values) = if spec.subcommands.is_empty() {
            (None, &spec.options, rest)
        } else {
            let sub_names: Vec<&str> = spec.subcommands.iter().map(|sub| sub.name).collect();
            let Some((sub_name, values)) = rest.split_first() else {
                return Err(format!("Missing subcommand. Try one of: {}.", sub_names.join(", ")));
            };
            let sub = spec
                .subcommands
                .iter()
                .find(|sub| sub.name.eq_ignore_ascii_case(sub_name))
                .ok_or_else(|| {
                    format!("Unknown subcommand `{}`. Try one of: {}.", sub_name, sub_names.join(", "))
                })?;
            invocation = invocation.sub(sub.name);
            (Some(sub), &sub.options, values)
        };

        if values.len() != options.len() {
            return Err(spec.usage(sub));
        }
        for (option, raw) in options.iter().zip(values) {
            invocation = invocation.arg(option.name, option.parse(raw)?);
        }
        Ok(invocation)
    }
}

/// Whitespace-separated words; double quotes group words.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err("Unterminated quote.".to_string());
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}
