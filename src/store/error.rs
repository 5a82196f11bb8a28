//! Store error taxonomy
//!
//! Two failure classes, and only two: bad call input (caught before any
//! connection is acquired) and database failure (pool or statement, surfaced
//! once to the caller, never retried here).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed call input: missing data, empty column set, missing
    /// primary key on update. Never reaches the database.
    #[error("validation error: {0}")]
    Validation(String),

    /// Any failure from the pool or statement execution, propagated with
    /// the driver's own message.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }
}
