use std::sync::Arc;

use serenity::model::gateway::GatewayIntents;
use tracing::{info, warn};

use crate::config::Settings;
use crate::errors::StartupError;
use crate::handlers::commands::CommandTable;
use crate::handlers::discord::{BotHandler, ShardManagerContainer};
use crate::handlers::state::BotState;

pub async fn run_bot(
    settings: &Settings,
    state: BotState,
    table: Arc<CommandTable>,
) -> Result<(), StartupError> {
    let token = settings.require_token()?;
    // Slash commands and button presses arrive without any gateway intents.
    let intents = GatewayIntents::empty();
    let mut client = serenity::Client::builder(token, intents)
        .event_handler(BotHandler::new(state, table))
        .await?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("ctrl-c received, shutting down");
                shard_manager.shutdown_all().await;
            }
            Err(err) => warn!(error = %err, "failed to listen for ctrl-c"),
        }
    });

    info!(
        timezone = %settings.timezone,
        rsvp_timeout_secs = settings.rsvp_timeout.as_secs(),
        "starting discord client"
    );
    client.start().await?;
    info!("discord client stopped");
    Ok(())
}
