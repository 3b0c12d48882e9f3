//! Error types for the SQLite map backend.

use mail_map::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl From<Error> for BackendError {
    fn from(err: Error) -> Self {
        match err {
            Error::Runtime(io) => BackendError::Io(io),
            Error::Sql(sqlx::Error::Io(io)) => BackendError::Io(io),
            Error::Sql(sql) => BackendError::other(sql),
        }
    }
}
