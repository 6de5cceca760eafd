use anyhow::Result;
use tracing::info;
use twilight_model::gateway::payload::incoming::Ready;

pub fn handle(ready: Box<Ready>) -> Result<()> {
    info!("Logged in as {}", ready.user.name);
    Ok(())
}
