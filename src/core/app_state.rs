use std::{ops::Deref, sync::Arc};

use tracing::info;

use crate::core::{
    config::RewardConfig,
    database::{ConnectionWrapper, DatabaseClient},
    rewards::Rewards,
};

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub discord_token: String,
    pub libsql_url: String,
    pub libsql_auth_token: String,
}

#[derive(Debug)]
pub struct AppStateInner {
    pub env: EnvConfig,
    pub config: RewardConfig,
    pub db: DatabaseClient,
    pub rewards: Rewards<ConnectionWrapper>,
}

#[derive(Debug, Clone)]
pub struct AppState(Arc<AppStateInner>);

impl AppState {
    pub async fn new(env: EnvConfig, config: RewardConfig) -> AppState {
        info!("Initializing AppState contents...");

        let db = DatabaseClient::new(&env.libsql_url, &env.libsql_auth_token)
            .await
            .expect("Failed to connect to database");
        info!("Database client initialized.");

        let rewards = Rewards::new(db.conn());
        info!("Reward evaluator initialized.");

        AppState(Arc::new(AppStateInner {
            env,
            config,
            db,
            rewards,
        }))
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
