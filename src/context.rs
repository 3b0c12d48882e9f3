//! Application state: the map service with every compiled-in backend.

use mail_map::{BackendRegistry, MapId, MapService};
use mail_map_db::DbBackend;
use tracing::info;

use crate::config::{Config, MapConfig};
use crate::Error;

pub struct Context {
    maps: MapService,
}

impl Context {
    /// Context with the `static`, `file` and `db` backends and no maps.
    pub fn new() -> Result<Self, Error> {
        let mut backends = BackendRegistry::with_builtins();
        backends.register(DbBackend::new()?)?;
        Ok(Self {
            maps: MapService::new(backends),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let mut ctx = Self::new()?;
        ctx.load(config)?;
        Ok(ctx)
    }

    /// Creates every configured map, stopping at the first error.
    pub fn load(&mut self, config: &Config) -> Result<(), Error> {
        for map in &config.maps {
            self.create(map)?;
        }
        info!(maps = config.maps.len(), "configuration loaded");
        Ok(())
    }

    fn create(&mut self, def: &MapConfig) -> Result<MapId, Error> {
        let id = self
            .maps
            .create(&def.backend, def.name.as_deref(), def.config.as_deref())?;

        for (index, entry) in def.entries.iter().enumerate() {
            let (key, value) = match entry.as_slice() {
                [key] => (key, None),
                [key, value] => (key, Some(value.as_str())),
                _ => {
                    return Err(Error::Entry {
                        map: def.display_name().to_owned(),
                        index,
                        len: entry.len(),
                    });
                }
            };
            self.maps.add(id, key, value)?;
        }
        Ok(id)
    }

    pub fn maps(&self) -> &MapService {
        &self.maps
    }

    /// Finds a map by name, falling back to reading `map` as a numeric id.
    pub fn resolve(&self, map: &str) -> Result<MapId, Error> {
        let registry = self.maps.maps();
        if let Some(found) = registry.find_by_name(map) {
            return Ok(found.id());
        }
        map.parse::<MapId>()
            .ok()
            .and_then(|id| registry.find_by_id(id))
            .map(|found| found.id())
            .ok_or_else(|| Error::UnknownMap(map.to_owned()))
    }
}
