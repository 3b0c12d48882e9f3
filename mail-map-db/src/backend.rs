//! `db` backend: maps stored in SQLite databases.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use mail_map::{Backend, BackendError, Handle, Map, Predicate, QueryKind};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::db::{self, DbPool};
use crate::error::Error;
use crate::storage::Storage;

pub const DB_BACKEND: &str = "db";

/// Serves maps whose config is an SQLite path or URL.
///
/// The map contract is synchronous, so the backend owns a runtime and
/// blocks on every database call. Pools are kept per config string until
/// `update` reconnects them.
pub struct DbBackend {
    // Dropped before the runtime they were created on.
    pools: Mutex<HashMap<String, DbPool>>,
    rt: Runtime,
}

impl DbBackend {
    pub fn new() -> Result<Self, Error> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            pools: Mutex::new(HashMap::new()),
            rt,
        })
    }

    /// Writes `entries` into the database at `config`, creating it if needed.
    /// Existing keys are overwritten. Returns how many entries were written.
    pub fn import<'e>(
        &self,
        config: &str,
        entries: impl IntoIterator<Item = (&'e str, &'e str)>,
    ) -> Result<usize, Error> {
        let url = db::database_url(config);
        self.rt.block_on(async {
            let pool = db::init_pool(&url).await?;
            let storage = Storage::new(pool);

            let mut written = 0;
            for (key, value) in entries {
                storage.put(key, value).await?;
                written += 1;
            }
            storage.close().await;

            debug!(config, written, "imported map entries");
            Ok::<_, Error>(written)
        })
    }

    fn pool(&self, config: &str) -> Result<DbPool, Error> {
        let mut pools = self.pools.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pool) = pools.get(config) {
            return Ok(pool.clone());
        }

        let pool = self.rt.block_on(db::connect(&db::database_url(config)))?;
        pools.insert(config.to_owned(), pool.clone());
        Ok(pool)
    }
}

impl Backend for DbBackend {
    fn name(&self) -> &str {
        DB_BACKEND
    }

    fn open<'a>(&'a self, map: &'a Map) -> Result<Box<dyn Handle + 'a>, BackendError> {
        if map.config().is_empty() {
            return Err(BackendError::Unsupported);
        }
        let pool = self.pool(map.config())?;
        Ok(Box::new(DbHandle {
            rt: &self.rt,
            storage: Storage::new(pool),
        }))
    }

    fn update(&self, map: &Map) -> Result<(), BackendError> {
        let stale = self
            .pools
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(map.config());
        if let Some(pool) = stale {
            self.rt.block_on(pool.close());
        }

        self.pool(map.config())?;
        debug!(map = map.name(), config = map.config(), "database reconnected");
        Ok(())
    }
}

struct DbHandle<'a> {
    rt: &'a Runtime,
    storage: Storage,
}

impl Handle for DbHandle<'_> {
    fn lookup(&mut self, key: &str, kind: QueryKind) -> Result<Option<String>, BackendError> {
        if kind == QueryKind::NetAddr {
            return Err(BackendError::UnsupportedKind(kind));
        }
        let value = self.rt.block_on(self.storage.get(key)).map_err(Error::from)?;
        Ok(value)
    }

    fn compare(
        &mut self,
        key: &str,
        _kind: QueryKind,
        predicate: Predicate<'_>,
    ) -> Result<bool, BackendError> {
        let keys = self.rt.block_on(self.storage.keys()).map_err(Error::from)?;
        Ok(keys.iter().any(|candidate| predicate(candidate, key)))
    }
}
