//! Typed errors for the database helper.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The connection could not be established. Never retried.
    #[error("Connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("No value supplied for named parameter :{0}")]
    MissingParameter(String),

    #[error("Cannot decode column {column}: {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::Connection(_))
    }
}
