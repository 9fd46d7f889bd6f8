//! Failure modes of the FundMe indexer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("sqlite: {0}")]
    Database(#[from] sqlx::Error),

    #[error("applying migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("rpc transport: {0}")]
    Http(#[from] reqwest::Error),

    /// `getEvents` refused the request itself; retrying the same request
    /// cannot succeed.
    #[error("getEvents rejected with code {code}: {message}")]
    RpcRejected { code: i64, message: String },

    /// A JSON-RPC envelope carrying neither `result` nor `error`.
    #[error("getEvents returned neither a result nor an error")]
    EmptyResponse,

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IndexerError>;
