use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::Mutex as AsyncMutex;
use twilight_model::id::{Id, marker::UserMarker};

use crate::core::store::CooldownType;

type Key = (Id<UserMarker>, CooldownType);

/// Hands out one async lock per (user, action kind) pair. Evaluations for
/// the same pair queue behind each other; every other pair stays open.
#[derive(Debug, Default)]
pub struct KeyGate {
    locks: Mutex<HashMap<Key, Arc<AsyncMutex<()>>>>,
}

impl KeyGate {
    pub fn acquire(&self, user_id: Id<UserMarker>, kind: CooldownType) -> Arc<AsyncMutex<()>> {
        self.locks
            .lock()
            .unwrap()
            .entry((user_id, kind))
            .or_default()
            .clone()
    }

    /// Drops locks nobody currently holds. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let mut locks = self.locks.lock().unwrap();
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }
}
