//! SQLite backend for `mail-map`.
//!
//! Maps bound to the `db` backend name an SQLite database in their config
//! string. Each database holds one table, `entries(key, value, updated)`;
//! [`DbBackend::import`] fills it.
//!
//! ```no_run
//! use mail_map::{BackendRegistry, MapService, QueryKind};
//! use mail_map_db::DbBackend;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = DbBackend::new()?;
//!     db.import("/var/db/virtual.db", [("example.org", "vhost")])?;
//!
//!     let mut backends = BackendRegistry::with_builtins();
//!     backends.register(db)?;
//!
//!     let mut maps = MapService::new(backends);
//!     let id = maps.create("db", Some("virtual"), Some("/var/db/virtual.db"))?;
//!     assert_eq!(maps.lookup(id, "example.org", QueryKind::Virtual)?.as_deref(), Some("vhost"));
//!     Ok(())
//! }
//! ```

mod backend;
pub mod db;
mod error;
mod storage;

pub use backend::{DB_BACKEND, DbBackend};
pub use error::Error;
pub use storage::Storage;
