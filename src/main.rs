mod background;
mod consts;
mod core;
mod events;

use anyhow::Result;
use tracing::{error, info};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt};

use crate::core::{
    app_state::{AppState, EnvConfig},
    config::RewardConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Load Config...");
    let env = EnvConfig {
        discord_token: std::env::var("DISCORD_TOKEN")?,
        libsql_url: std::env::var("LIBSQL_URL")?,
        libsql_auth_token: std::env::var("LIBSQL_AUTH_TOKEN")?,
    };
    let config = RewardConfig::from_env()?;

    let app = AppState::new(env, config).await;
    background::run(app.clone());

    let intents = Intents::GUILD_MESSAGES | Intents::GUILD_VOICE_STATES;
    let mut shard = Shard::new(ShardId::ONE, app.env.discord_token.clone(), intents);
    let wanted_event_types =
        EventTypeFlags::READY | EventTypeFlags::MESSAGE_CREATE | EventTypeFlags::VOICE_STATE_UPDATE;

    while let Some(item) = shard.next_event(wanted_event_types).await {
        let Ok(event) = item else {
            error!(source = ?item.unwrap_err(), "Error receiving event");
            continue;
        };

        let app = app.clone();
        tokio::spawn(async move {
            let Err(err) = events::event_handler(app, event).await else {
                return;
            };
            error!(?err, "Error handling event");
        });
    }

    Ok(())
}
