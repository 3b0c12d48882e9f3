//! Error types for loading and querying maps from the command line.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("map \"{map}\": entry {index} has {len} fields, expected a key and an optional value")]
    Entry { map: String, index: usize, len: usize },

    #[error("no map named or numbered \"{0}\"")]
    UnknownMap(String),

    #[error(transparent)]
    Map(#[from] mail_map::Error),

    #[error("db backend: {0}")]
    Db(#[from] mail_map_db::Error),
}

impl Error {
    /// Whether the process should stop rather than carry on with a partial
    /// configuration.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Read { .. } | Error::Parse(_) | Error::Entry { .. } | Error::Db(_) => true,
            Error::Map(err) => err.is_fatal(),
            Error::UnknownMap(_) => false,
        }
    }
}

impl From<mail_map::FatalError> for Error {
    fn from(err: mail_map::FatalError) -> Self {
        Error::Map(err.into())
    }
}
