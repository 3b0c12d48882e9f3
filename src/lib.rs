//! Load mail lookup tables from a TOML file and query them.
//!
//! The `mapd` binary is a thin front end over [`Context`], which owns the
//! [`mail_map::MapService`] with the `static`, `file` and `db` backends
//! registered.

pub mod config;
pub mod context;
mod error;

pub use config::{Config, MapConfig};
pub use context::Context;
pub use error::Error;
