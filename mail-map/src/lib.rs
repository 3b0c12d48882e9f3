//! Named lookup tables for a mail transfer daemon.
//!
//! `mail-map` keeps every table the daemon consults (aliases, virtual
//! domains, access rules, ...) in a [`MapRegistry`] and answers queries
//! through a [`MapService`] that dispatches to the backend each map is bound
//! to. Backends are interchangeable behind the [`Backend`] / [`Handle`]
//! contract; `static` (in memory) and `file` (plain-text tables) ship here,
//! `db` lives in the `mail-map-db` crate.
//!
//! # Errors
//!
//! Configuration mistakes (duplicate names, oversized fields, mutating a
//! map that is not static) are [`Error::Fatal`]. They are returned rather
//! than aborting so the embedding application decides how to stop.
//! Query-time problems (unknown map id, unreachable backend) are ordinary
//! errors, and a key that is simply not there is `Ok(None)`.
//!
//! # Example
//!
//! ```
//! use mail_map::{BackendRegistry, MapService, QueryKind};
//!
//! # fn main() -> Result<(), mail_map::Error> {
//! let mut maps = MapService::new(BackendRegistry::with_builtins());
//!
//! let aliases = maps.create("static", Some("aliases"), None)?;
//! maps.add(aliases, "root", Some("admin"))?;
//! maps.add(aliases, "admin", None)?;
//!
//! assert_eq!(maps.lookup(aliases, "root", QueryKind::Exact)?.as_deref(), Some("admin"));
//! assert_eq!(maps.lookup(aliases, "admin", QueryKind::Exact)?.as_deref(), Some(""));
//! assert_eq!(maps.lookup(aliases, "nobody", QueryKind::Exact)?, None);
//! # Ok(())
//! # }
//! ```

pub mod backend;
mod element;
mod error;
mod map;
pub mod query;
mod registry;
mod service;

pub use backend::{Backend, BackendRegistry, FileBackend, Handle, StaticBackend};
pub use element::{MAX_ELEMENT_LEN, MapElement};
pub use error::{BackendError, Error, FatalError, Field};
pub use map::{MAX_BACKEND_LEN, MAX_CONFIG_LEN, MAX_NAME_LEN, Map, MapId, STATIC_BACKEND};
pub use query::{Predicate, QueryKind};
pub use registry::{DEFAULT_ID_LIMIT, MapRegistry};
pub use service::{Comparison, MapService};
