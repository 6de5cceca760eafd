use std::time::Duration;

use tracing::debug;

use crate::{consts::MINUTE_IN_MS, core::app_state::AppState};

const GATE_PRUNE_PERIOD: Duration = Duration::from_millis(5 * MINUTE_IN_MS);

pub fn run(state: AppState) {
    tokio::spawn(prune_gate(state));
}

async fn prune_gate(state: AppState) {
    loop {
        tokio::time::sleep(GATE_PRUNE_PERIOD).await;

        let removed = state.rewards.prune_idle();
        if removed > 0 {
            debug!(removed, "Pruned idle cooldown locks");
        }
    }
}
