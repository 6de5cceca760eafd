mod message_create;
mod ready;
mod voice_state_update;

use anyhow::Result;
use twilight_gateway::Event;

use crate::core::app_state::AppState;

pub async fn event_handler(state: AppState, event: Event) -> Result<()> {
    match event {
        Event::MessageCreate(msg) => message_create::handle(state, msg).await,
        Event::VoiceStateUpdate(update) => voice_state_update::handle(state, update).await,
        Event::Ready(ready) => ready::handle(ready),
        _ => Ok(()), // Ignore other events
    }
}
