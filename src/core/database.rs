use std::{collections::HashMap, fmt::Debug, sync::Arc};

use async_trait::async_trait;
use futures::{TryFutureExt, future::join_all};
use libsql::{Connection, Database, Row, Statement, named_params};
use tokio::sync::Mutex;
use twilight_model::id::{Id, marker::UserMarker};

use crate::core::{
    error::{Error, Result},
    store::{CooldownState, CooldownType, UserRecord, UserStore},
};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS users(
    user_id INTEGER PRIMARY KEY,
    points INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS cooldowns(
    user_id INTEGER NOT NULL,
    kind TEXT NOT NULL,
    last_triggered_at INTEGER NOT NULL,
    PRIMARY KEY(user_id, kind)
);";

const CREATE_USER: &str = "INSERT OR IGNORE INTO users(user_id, points) VALUES(:user_id, 0)";
const FETCH_POINTS: &str = "SELECT points FROM users WHERE user_id = :user_id";
const FETCH_USER_COOLDOWNS: &str =
    "SELECT kind, last_triggered_at FROM cooldowns WHERE user_id = :user_id";
const FETCH_COOLDOWN: &str =
    "SELECT last_triggered_at FROM cooldowns WHERE user_id = :user_id AND kind = :kind";
const ADD_POINTS: &str = "INSERT INTO users(user_id, points) VALUES(:user_id, :amount) \
    ON CONFLICT(user_id) DO UPDATE SET points = points + excluded.points";
const SET_COOLDOWN: &str = "INSERT OR REPLACE INTO cooldowns(user_id, kind, last_triggered_at) \
    VALUES(:user_id, :kind, :at)";

#[derive(Debug)]
pub struct DatabaseClient {
    database: Database,
    connection: ConnectionWrapper,
}

#[derive(Debug, Clone)]
pub struct ConnectionWrapper {
    connection: Connection,
    prep_stmts: Arc<PrepStmts>,
}

type PrepStmt = Mutex<Statement>;

pub struct PrepStmts {
    create_user: PrepStmt,
    fetch_points: PrepStmt,
    fetch_user_cooldowns: PrepStmt,
    fetch_cooldown: PrepStmt,
    add_points: PrepStmt,
    set_cooldown: PrepStmt,
}

impl Debug for PrepStmts {
    fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl PrepStmts {
    async fn new(connection: &Connection) -> Result<PrepStmts> {
        let stmts = join_all(
            [
                CREATE_USER,
                FETCH_POINTS,
                FETCH_USER_COOLDOWNS,
                FETCH_COOLDOWN,
                ADD_POINTS,
                SET_COOLDOWN,
            ]
            .map(|raw| connection.prepare(raw).map_ok(Mutex::new)),
        )
        .await
        .into_iter()
        .collect::<std::result::Result<Vec<PrepStmt>, _>>()?;

        let [
            create_user,
            fetch_points,
            fetch_user_cooldowns,
            fetch_cooldown,
            add_points,
            set_cooldown,
        ]: [PrepStmt; 6] = stmts.try_into().map_err(|_| Error::PrepareStatements)?;

        Ok(PrepStmts {
            create_user,
            fetch_points,
            fetch_user_cooldowns,
            fetch_cooldown,
            add_points,
            set_cooldown,
        })
    }
}

impl DatabaseClient {
    pub async fn new(
        url: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<DatabaseClient> {
        let database =
            libsql::Builder::new_remote_replica("./local.db", url.into(), auth_token.into())
                .build()
                .await?;
        let connection = ConnectionWrapper::new(&database).await?;

        Ok(DatabaseClient {
            database,
            connection,
        })
    }

    pub fn conn(&self) -> ConnectionWrapper {
        self.connection.clone()
    }
}

impl ConnectionWrapper {
    pub async fn new(database: &Database) -> Result<ConnectionWrapper> {
        let connection = database.connect()?;
        connection.execute_batch(SCHEMA).await?;

        let prep_stmts = Arc::new(PrepStmts::new(&connection).await?);
        Ok(ConnectionWrapper {
            connection,
            prep_stmts,
        })
    }
}

#[async_trait]
impl UserStore for ConnectionWrapper {
    async fn get_or_create(&self, user_id: Id<UserMarker>) -> Result<UserRecord> {
        {
            let mut stmt = self.prep_stmts.create_user.lock().await;
            stmt.reset();
            stmt.execute(named_params! {":user_id": user_id.get()}).await?;
        }

        let row = {
            let mut stmt = self.prep_stmts.fetch_points.lock().await;
            stmt.reset();
            stmt.query_row(named_params! {":user_id": user_id.get()}).await?
        };
        let points = row_u64(&row, "points")?;

        let mut cooldowns = HashMap::new();
        let mut stmt = self.prep_stmts.fetch_user_cooldowns.lock().await;
        stmt.reset();
        let mut rows = stmt.query(named_params! {":user_id": user_id.get()}).await?;
        while let Some(row) = rows.next().await? {
            let kind: String = row.get(0)?;
            let at: u64 = row.get(1)?;
            cooldowns.insert(kind.parse::<CooldownType>()?, at);
        }

        Ok(UserRecord {
            user_id,
            points,
            cooldowns,
        })
    }

    async fn cooldown(&self, user_id: Id<UserMarker>, kind: CooldownType) -> Result<CooldownState> {
        let rs = {
            let mut stmt = self.prep_stmts.fetch_cooldown.lock().await;
            stmt.reset();
            stmt.query_row(named_params! {":user_id": user_id.get(), ":kind": kind.as_str()})
                .await
        };

        let row = match rs {
            Ok(row) => row,
            Err(libsql::Error::QueryReturnedNoRows) => return Ok(CooldownState::default()),
            Err(err) => return Err(err.into()),
        };
        let at = row_u64(&row, "last_triggered_at")?;

        Ok(CooldownState {
            last_triggered_at: Some(at),
        })
    }

    async fn add_points(&self, user_id: Id<UserMarker>, amount: u64) -> Result<()> {
        {
            let mut stmt = self.prep_stmts.add_points.lock().await;
            stmt.reset();
            stmt.execute(named_params! {":user_id": user_id.get(), ":amount": amount})
                .await?;
        }

        Ok(())
    }

    async fn set_cooldown(
        &self,
        user_id: Id<UserMarker>,
        kind: CooldownType,
        at_ms: u64,
    ) -> Result<()> {
        {
            let mut stmt = self.prep_stmts.set_cooldown.lock().await;
            stmt.reset();
            stmt.execute(
                named_params! {":user_id": user_id.get(), ":kind": kind.as_str(), ":at": at_ms},
            )
            .await?;
        }

        Ok(())
    }

    async fn grant(
        &self,
        user_id: Id<UserMarker>,
        kind: CooldownType,
        amount: u64,
        at_ms: u64,
    ) -> Result<()> {
        let tx = self.connection.transaction().await?;

        tx.execute(
            ADD_POINTS,
            named_params! {":user_id": user_id.get(), ":amount": amount},
        )
        .await?;
        tx.execute(
            SET_COOLDOWN,
            named_params! {":user_id": user_id.get(), ":kind": kind.as_str(), ":at": at_ms},
        )
        .await?;
        tx.commit().await?;

        Ok(())
    }
}

fn row_u64(row: &Row, name: &'static str) -> Result<u64> {
    let idx = (0..row.column_count())
        .find(|&idx| row.column_name(idx) == Some(name))
        .ok_or(Error::MissingColumn(name))?;
    let value = row.get(idx)?;

    Ok(value)
}
