use std::sync::Arc;
use std::time::Duration;

use serenity::all::{
    ActivityData, Command, CommandInteraction, ComponentInteraction, Interaction as DiscordInteraction,
};
use serenity::async_trait;
use serenity::gateway::ShardManager;
use serenity::model::gateway::Ready;
use serenity::model::id::UserId;
use serenity::prelude::*;
use tracing::{debug, info, warn};

use crate::config::local_now;
use crate::events::queue::{RsvpAction, RsvpPress};
use crate::handlers::commands::{CommandTable, Outcome};
use crate::handlers::discord_responder::{InteractionResponder, SerenityResponder};
use crate::handlers::invocation::{Caller, Invocation};
use crate::handlers::reply::Reply;
use crate::handlers::rsvp::{RsvpEnd, RsvpPresenter, RsvpView};
use crate::handlers::state::BotState;
use crate::models::meeting::MeetingId;

pub const EXPIRED_VIEW: &str = "This meeting view has expired.";

pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

pub struct BotHandler {
    state: BotState,
    table: Arc<CommandTable>,
}

impl BotHandler {
    pub fn new(state: BotState, table: Arc<CommandTable>) -> Self {
        BotHandler { state, table }
    }

    pub fn state(&self) -> &BotState {
        &self.state
    }

    /// Runs a command and, for `/meeting view`, the attendance loop that follows.
    pub async fn handle_command_with<R>(
        &self,
        responder: &R,
        invocation: &Invocation,
        caller: &Caller,
    ) -> Option<RsvpEnd>
    where
        R: InteractionResponder + RsvpPresenter + ?Sized,
    {
        debug!(
            command = %invocation.command,
            subcommand = ?invocation.subcommand,
            user_id = %caller.user_id,
            "command received"
        );
        match self.table.dispatch(&self.state, invocation, caller).await {
            Outcome::Reply(reply) => {
                responder.reply(&reply).await;
                None
            }
            Outcome::Rsvp(meeting) => Some(self.run_rsvp_with(responder, meeting).await),
        }
    }

    async fn run_rsvp_with<P: RsvpPresenter + ?Sized>(&self, presenter: &P, meeting: MeetingId) -> RsvpEnd {
        let (session, mut presses) = self.state.sessions.open().await;
        let view = RsvpView {
            meeting,
            session,
            window: self.state.rsvp_timeout,
            timezone: self.state.timezone,
        };
        let end = view.run(&self.state.meetings, &mut presses, presenter).await;
        self.state.sessions.close(&view.session).await;
        end
    }

    /// Forwards an Accept/Decline press to the view that owns it.
    pub async fn handle_press_with<R: InteractionResponder + ?Sized>(
        &self,
        responder: &R,
        custom_id: &str,
        user_id: UserId,
        display_name: &str,
    ) -> bool {
        let routed = match RsvpAction::parse_custom_id(custom_id) {
            Some((action, session)) => {
                let press = RsvpPress {
                    action,
                    user_id,
                    display_name: display_name.to_string(),
                };
                self.state.sessions.route(session, press).await
            }
            None => false,
        };
        if routed {
            responder.acknowledge().await;
        } else {
            responder.reply(&Reply::ephemeral(EXPIRED_VIEW)).await;
        }
        routed
    }

    async fn caller_for_command(&self, ctx: &Context, command: &CommandInteraction) -> Caller {
        let display_name = command
            .member
            .as_ref()
            .map(|member| member.display_name().to_string())
            .unwrap_or_else(|| command.user.display_name().to_string());
        Caller {
            user_id: command.user.id,
            display_name,
            now: local_now(self.state.timezone),
            latency: shard_latency(ctx).await,
        }
    }
}

fn component_display_name(component: &ComponentInteraction) -> String {
    component
        .member
        .as_ref()
        .map(|member| member.display_name().to_string())
        .unwrap_or_else(|| component.user.display_name().to_string())
}

async fn shard_latency(ctx: &Context) -> Option<Duration> {
    let manager = {
        let data = ctx.data.read().await;
        data.get::<ShardManagerContainer>()?.clone()
    };
    let runners = manager.runners.lock().await;
    runners.get(&ctx.shard_id).and_then(|runner| runner.latency)
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "client connected");
        ctx.set_activity(Some(ActivityData::playing("with code")));

        match Command::set_global_commands(&ctx.http, self.table.registrations()).await {
            Ok(commands) => info!(count = commands.len(), "slash commands registered"),
            Err(err) => warn!(error = %err, "failed to register slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: DiscordInteraction) {
        match interaction {
            DiscordInteraction::Command(command) => {
                let invocation = Invocation::from_command(&command.data);
                let caller = self.caller_for_command(&ctx, &command).await;
                let responder = SerenityResponder::for_command(&ctx, &command);
                self.handle_command_with(&responder, &invocation, &caller).await;
            }
            DiscordInteraction::Component(component) => {
                let display_name = component_display_name(&component);
                let responder = SerenityResponder::for_component(&ctx, &component);
                self.handle_press_with(
                    &responder,
                    &component.data.custom_id,
                    component.user.id,
                    &display_name,
                )
                .await;
            }
            _ => {}
        }
    }
}
