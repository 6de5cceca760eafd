use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use twilight_model::id::{Id, marker::UserMarker};

use crate::core::error::{Error, Result};

/// Action kinds that earn points, each with its own cooldown per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CooldownType {
    Message,
    Voice,
}

impl CooldownType {
    /// Stable form used as the storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            CooldownType::Message => "message",
            CooldownType::Voice => "voice",
        }
    }
}

impl FromStr for CooldownType {
    type Err = Error;

    fn from_str(raw: &str) -> Result<CooldownType> {
        match raw {
            "message" => Ok(CooldownType::Message),
            "voice" => Ok(CooldownType::Voice),
            _ => Err(Error::UnknownCooldownKind(raw.to_string())),
        }
    }
}

/// Last recorded trigger for one (user, kind) pair. No record means the
/// cooldown has already run out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownState {
    pub last_triggered_at: Option<u64>,
}

impl CooldownState {
    pub fn is_finished(self, threshold_ms: u64, now_ms: u64) -> bool {
        match self.last_triggered_at {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= threshold_ms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: Id<UserMarker>,
    pub points: u64,
    pub cooldowns: HashMap<CooldownType, u64>,
}

/// Storage seam for user records. The persistent implementation lives in
/// `core::database`; tests run against `MemoryStore`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the existing record, or creates one with zero points.
    async fn get_or_create(&self, user_id: Id<UserMarker>) -> Result<UserRecord>;

    async fn cooldown(&self, user_id: Id<UserMarker>, kind: CooldownType) -> Result<CooldownState>;

    async fn add_points(&self, user_id: Id<UserMarker>, amount: u64) -> Result<()>;

    async fn set_cooldown(
        &self,
        user_id: Id<UserMarker>,
        kind: CooldownType,
        at_ms: u64,
    ) -> Result<()>;

    /// Credits points and stamps the cooldown as a single write, so an
    /// abandoned caller can never leave one without the other.
    async fn grant(
        &self,
        user_id: Id<UserMarker>,
        kind: CooldownType,
        amount: u64,
        at_ms: u64,
    ) -> Result<()>;
}

#[cfg(test)]
pub use memory::MemoryStore;
