//! Error types for map registry and dispatch operations.

use thiserror::Error;

use crate::map::MapId;
use crate::query::QueryKind;

#[derive(Debug, Error)]
pub enum Error {
    /// Broken configuration or programming contract. Embedding applications
    /// are expected to abort on these.
    #[error(transparent)]
    Fatal(#[from] FatalError),

    #[error("invalid argument: no map with id {0}")]
    MapNotFound(MapId),

    #[error("unknown map backend \"{0}\"")]
    UnknownBackend(String),

    #[error("map \"{map}\": can't open {config}: {cause}")]
    BackendUnavailable {
        map: String,
        config: String,
        #[source]
        cause: BackendError,
    },

    #[error("map \"{map}\": {cause}")]
    Backend {
        map: String,
        #[source]
        cause: BackendError,
    },
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Fatal(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Backend,
    Name,
    Config,
    Key,
    Value,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Field::Backend => "map backend",
            Field::Name => "map name",
            Field::Config => "map config",
            Field::Key => "key",
            Field::Value => "value",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum FatalError {
    #[error("map \"{0}\" already defined")]
    DuplicateName(String),

    #[error("map name \"{0}\" is reserved for unnamed maps")]
    ReservedName(String),

    #[error("too many maps defined")]
    IdsExhausted,

    #[error("{field} too long: {len} bytes, limit is {max}")]
    TooLong { field: Field, len: usize, max: usize },

    #[error("cannot {op} map \"{map}\": backend \"{backend}\" is not static")]
    NotStatic {
        op: &'static str,
        map: String,
        backend: String,
    },

    #[error("map backend \"{0}\" registered twice")]
    DuplicateBackend(String),
}

/// Failure reported by a backend implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("operation not supported")]
    Unsupported,

    #[error("query kind {0} not supported")]
    UnsupportedKind(QueryKind),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Cause reported when a backend fails without naming one.
impl Default for BackendError {
    fn default() -> Self {
        BackendError::Unsupported
    }
}

impl BackendError {
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        BackendError::Other(Box::new(err))
    }
}
