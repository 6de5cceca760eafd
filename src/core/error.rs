pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing configuration key {0}")]
    MissingConfig(&'static str),

    #[error("invalid value for {key}: expected a non-negative integer, got `{value}`")]
    InvalidConfig { key: &'static str, value: String },

    #[error("database error: {0}")]
    Storage(#[from] libsql::Error),

    #[error("unable to prepare database statements")]
    PrepareStatements,

    #[error("missing column `{0}` in result row")]
    MissingColumn(&'static str),

    #[error("unknown cooldown kind `{0}`")]
    UnknownCooldownKind(String),
}
