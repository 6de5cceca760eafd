use tracing::debug;
use twilight_model::id::{Id, marker::UserMarker};

use crate::core::{
    config::RewardRule,
    error::Result,
    gate::KeyGate,
    store::{CooldownType, UserStore},
};

/// Cooldown-gated reward evaluator. One instance serves every user; the
/// gate serializes the read-check-write cycle per (user, kind) pair.
#[derive(Debug)]
pub struct Rewards<S> {
    store: S,
    gate: KeyGate,
}

impl<S: UserStore> Rewards<S> {
    pub fn new(store: S) -> Rewards<S> {
        Rewards {
            store,
            gate: KeyGate::default(),
        }
    }

    /// Credits `rule.points` to the user if the `kind` cooldown has run
    /// out, stamping the cooldown with `now_ms`. Otherwise does nothing.
    pub async fn evaluate(
        &self,
        user_id: Id<UserMarker>,
        kind: CooldownType,
        rule: RewardRule,
        now_ms: u64,
    ) -> Result<()> {
        let lock = self.gate.acquire(user_id, kind);
        let _guard = lock.lock().await;

        self.store.get_or_create(user_id).await?;

        let cooldown = self.store.cooldown(user_id, kind).await?;
        if !cooldown.is_finished(rule.cooldown_ms, now_ms) {
            return Ok(());
        }

        self.store.grant(user_id, kind, rule.points, now_ms).await?;
        debug!(%user_id, kind = kind.as_str(), points = rule.points, "Reward granted");

        Ok(())
    }

    pub fn prune_idle(&self) -> usize {
        self.gate.prune()
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use futures::future::join_all;

    use super::*;
    use crate::{consts::MINUTE_IN_MS, core::store::MemoryStore};

    const RULE: RewardRule = RewardRule {
        cooldown_ms: MINUTE_IN_MS,
        points: 10,
    };

    fn user(n: u64) -> Id<UserMarker> {
        Id::new(n)
    }

    async fn points_of(rewards: &Rewards<MemoryStore>, id: Id<UserMarker>) -> u64 {
        rewards.store().get_or_create(id).await.unwrap().points
    }

    #[tokio::test]
    async fn first_action_creates_the_user_and_grants() {
        let rewards = Rewards::new(MemoryStore::default());

        rewards
            .evaluate(user(1), CooldownType::Message, RULE, 0)
            .await
            .unwrap();

        let record = rewards.store().get_or_create(user(1)).await.unwrap();
        assert_eq!(record.points, 10);
        assert_eq!(record.cooldowns.get(&CooldownType::Message), Some(&0));
    }

    #[tokio::test]
    async fn a_message_inside_the_window_grants_nothing() {
        let rewards = Rewards::new(MemoryStore::default());

        for now in [0, 30_000] {
            rewards
                .evaluate(user(1), CooldownType::Message, RULE, now)
                .await
                .unwrap();
        }

        let record = rewards.store().get_or_create(user(1)).await.unwrap();
        assert_eq!(record.points, 10);
        assert_eq!(record.cooldowns.get(&CooldownType::Message), Some(&0));
    }

    #[tokio::test]
    async fn a_message_after_the_window_grants_again() {
        let rewards = Rewards::new(MemoryStore::default());

        for (now, expected) in [(0, 10), (30_000, 10), (61_000, 20)] {
            rewards
                .evaluate(user(1), CooldownType::Message, RULE, now)
                .await
                .unwrap();
            assert_eq!(points_of(&rewards, user(1)).await, expected);
        }

        let record = rewards.store().get_or_create(user(1)).await.unwrap();
        assert_eq!(record.cooldowns.get(&CooldownType::Message), Some(&61_000));
    }

    #[tokio::test]
    async fn the_window_boundary_is_inclusive() {
        let rewards = Rewards::new(MemoryStore::default());

        for now in [0, 60_000] {
            rewards
                .evaluate(user(1), CooldownType::Message, RULE, now)
                .await
                .unwrap();
        }

        assert_eq!(points_of(&rewards, user(1)).await, 20);
    }

    #[tokio::test]
    async fn a_zero_threshold_grants_every_time() {
        let rewards = Rewards::new(MemoryStore::default());
        let rule = RewardRule {
            cooldown_ms: 0,
            points: 10,
        };

        for _ in 0..3 {
            rewards
                .evaluate(user(1), CooldownType::Message, rule, 5_000)
                .await
                .unwrap();
        }

        assert_eq!(points_of(&rewards, user(1)).await, 30);
    }

    #[tokio::test]
    async fn kinds_keep_separate_cooldowns() {
        let rewards = Rewards::new(MemoryStore::default());

        rewards
            .evaluate(user(1), CooldownType::Message, RULE, 0)
            .await
            .unwrap();
        rewards
            .evaluate(user(1), CooldownType::Voice, RULE, 0)
            .await
            .unwrap();

        assert_eq!(points_of(&rewards, user(1)).await, 20);
    }

    #[tokio::test]
    async fn users_keep_separate_cooldowns() {
        let rewards = Rewards::new(MemoryStore::default());

        rewards
            .evaluate(user(1), CooldownType::Message, RULE, 0)
            .await
            .unwrap();
        rewards
            .evaluate(user(2), CooldownType::Message, RULE, 0)
            .await
            .unwrap();

        assert_eq!(points_of(&rewards, user(1)).await, 10);
        assert_eq!(points_of(&rewards, user(2)).await, 10);
    }

    #[tokio::test]
    async fn concurrent_evaluations_grant_once() {
        let rewards = Rewards::new(MemoryStore::default());

        let results = join_all(
            (0..8).map(|_| rewards.evaluate(user(1), CooldownType::Message, RULE, 0)),
        )
        .await;

        for result in results {
            result.unwrap();
        }
        assert_eq!(points_of(&rewards, user(1)).await, 10);
    }
}
