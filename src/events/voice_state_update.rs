use anyhow::Result;
use twilight_model::gateway::payload::incoming::VoiceStateUpdate;

use crate::core::{app_state::AppState, store::CooldownType};

pub async fn handle(state: AppState, update: Box<VoiceStateUpdate>) -> Result<()> {
    // Leaving a channel carries no channel id and earns nothing.
    if update.channel_id.is_none() {
        return Ok(());
    }

    let Some(rule) = state.config.rule_for(CooldownType::Voice) else {
        return Ok(());
    };

    let now = std::time::UNIX_EPOCH.elapsed().unwrap().as_millis() as u64;
    state
        .rewards
        .evaluate(update.user_id, CooldownType::Voice, rule, now)
        .await?;

    Ok(())
}
