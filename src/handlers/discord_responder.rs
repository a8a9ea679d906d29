use std::sync::atomic::{AtomicBool, Ordering};

use serenity::all::{CommandInteraction, ComponentInteraction};
use serenity::async_trait;
use serenity::builder::{
    CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::prelude::Context;
use tracing::warn;

use crate::handlers::reply::{Card, Reply};
use crate::handlers::rsvp::{rsvp_buttons, RsvpPresenter};

#[async_trait]
pub trait InteractionResponder: Send + Sync {
    async fn reply(&self, reply: &Reply);
    /// Accepts a button press without changing the message it came from.
    async fn acknowledge(&self);
}

pub struct SerenityResponder<'a> {
    ctx: &'a Context,
    command: Option<&'a CommandInteraction>,
    component: Option<&'a ComponentInteraction>,
    responded: AtomicBool,
}

impl<'a> SerenityResponder<'a> {
    pub fn for_command(ctx: &'a Context, command: &'a CommandInteraction) -> Self {
        Self {
            ctx,
            command: Some(command),
            component: None,
            responded: AtomicBool::new(false),
        }
    }

    pub fn for_component(ctx: &'a Context, component: &'a ComponentInteraction) -> Self {
        Self {
            ctx,
            command: None,
            component: Some(component),
            responded: AtomicBool::new(false),
        }
    }

    async fn respond(&self, response: CreateInteractionResponse) {
        self.responded.store(true, Ordering::SeqCst);
        let result = if let Some(command) = self.command {
            command.create_response(&self.ctx.http, response).await
        } else if let Some(component) = self.component {
            component.create_response(&self.ctx.http, response).await
        } else {
            return;
        };
        if let Err(err) = result {
            warn!(error = %err, "failed to respond to interaction");
        }
    }
}

#[async_trait]
impl InteractionResponder for SerenityResponder<'_> {
    async fn reply(&self, reply: &Reply) {
        self.respond(CreateInteractionResponse::Message(reply.to_message()))
            .await;
    }

    async fn acknowledge(&self) {
        self.respond(CreateInteractionResponse::Acknowledge).await;
    }
}

#[async_trait]
impl RsvpPresenter for SerenityResponder<'_> {
    async fn present(&self, card: &Card, session: Option<&str>) {
        let components = session.map(|s| vec![rsvp_buttons(s)]).unwrap_or_default();
        let Some(command) = self.command else {
            return;
        };
        if !self.responded.load(Ordering::SeqCst) {
            self.respond(CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(card.to_embed())
                    .components(components),
            ))
            .await;
            return;
        }
        let edit = EditInteractionResponse::new()
            .embed(card.to_embed())
            .components(components);
        if let Err(err) = command.edit_response(&self.ctx.http, edit).await {
            warn!(error = %err, "failed to refresh meeting view");
        }
    }
}
