use anyhow::Result;
use twilight_model::gateway::payload::incoming::MessageCreate;
use twilight_util::snowflake::Snowflake;

use crate::core::{app_state::AppState, store::CooldownType};

pub async fn handle(state: AppState, msg: Box<MessageCreate>) -> Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let Some(rule) = state.config.rule_for(CooldownType::Message) else {
        return Ok(());
    };

    // The snowflake carries the creation instant in ms.
    let now = msg.id.timestamp() as u64;
    state
        .rewards
        .evaluate(msg.author.id, CooldownType::Message, rule, now)
        .await?;

    Ok(())
}
