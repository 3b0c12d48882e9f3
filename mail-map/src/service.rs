//! Uniform query surface over every registered map and backend.

use tracing::{debug, warn};

use crate::backend::{BackendRegistry, Handle};
use crate::element::bounded;
use crate::error::{Error, Field};
use crate::map::{MAX_CONFIG_LEN, Map, MapId};
use crate::query::{Predicate, QueryKind};
use crate::registry::MapRegistry;

/// Outcome of [`MapService::compare`].
#[derive(Debug)]
pub enum Comparison {
    /// The backend answered; `true` when some stored key satisfied the predicate.
    Found(bool),
    MapNotFound(MapId),
    /// The map's backend is unknown or could not be opened.
    BackendUnavailable(Error),
    /// The backend was opened but failed while comparing.
    Failed(Error),
}

impl Comparison {
    pub fn matched(&self) -> bool {
        matches!(self, Comparison::Found(true))
    }

    pub fn into_result(self) -> Result<bool, Error> {
        match self {
            Comparison::Found(found) => Ok(found),
            Comparison::MapNotFound(id) => Err(Error::MapNotFound(id)),
            Comparison::BackendUnavailable(err) | Comparison::Failed(err) => Err(err),
        }
    }
}

/// Owns the map registry and dispatches queries to each map's backend.
///
/// Every query opens a fresh handle and closes it before returning, whatever
/// the backend answered. Callers issuing many queries against one map can
/// hold a handle from [`open`](Self::open) instead; while it is alive the
/// service is borrowed, so the map cannot be mutated or destroyed under it.
#[derive(Debug)]
pub struct MapService {
    maps: MapRegistry,
    backends: BackendRegistry,
}

impl MapService {
    pub fn new(backends: BackendRegistry) -> Self {
        Self::with_registry(MapRegistry::new(), backends)
    }

    pub fn with_registry(maps: MapRegistry, backends: BackendRegistry) -> Self {
        Self { maps, backends }
    }

    pub fn maps(&self) -> &MapRegistry {
        &self.maps
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    pub fn create(
        &mut self,
        backend: &str,
        name: Option<&str>,
        config: Option<&str>,
    ) -> Result<MapId, Error> {
        if let Some(config) = config {
            bounded(Field::Config, config, MAX_CONFIG_LEN)?;
        }
        let map = self.maps.create(backend, name)?;
        if let Some(config) = config {
            map.set_config(config)?;
        }
        Ok(map.id())
    }

    pub fn destroy(&mut self, id: MapId) -> Result<(), Error> {
        match self.maps.destroy(id)? {
            Some(_) => Ok(()),
            None => Err(Error::MapNotFound(id)),
        }
    }

    pub fn add(&mut self, id: MapId, key: &str, value: Option<&str>) -> Result<(), Error> {
        self.map_mut(id)?.add(key, value)?;
        Ok(())
    }

    /// Removes the first element keyed `key`; `Ok(false)` when there was none.
    pub fn delete(&mut self, id: MapId, key: &str) -> Result<bool, Error> {
        Ok(self.map_mut(id)?.delete(key)?)
    }

    /// Looks `key` up in map `id`. `Ok(None)` means the key is absent.
    pub fn lookup(&self, id: MapId, key: &str, kind: QueryKind) -> Result<Option<String>, Error> {
        let (map, mut handle) = self.open_map(id)?;
        let result = handle.lookup(key, kind);
        handle.close();

        result.map_err(|cause| Error::Backend {
            map: map.name().to_owned(),
            cause,
        })
    }

    pub fn compare(
        &self,
        id: MapId,
        key: &str,
        kind: QueryKind,
        predicate: Predicate<'_>,
    ) -> Comparison {
        let (map, mut handle) = match self.open_map(id) {
            Ok(opened) => opened,
            Err(Error::MapNotFound(id)) => return Comparison::MapNotFound(id),
            Err(err) => return Comparison::BackendUnavailable(err),
        };
        let result = handle.compare(key, kind, predicate);
        handle.close();

        match result {
            Ok(found) => Comparison::Found(found),
            Err(cause) => Comparison::Failed(Error::Backend {
                map: map.name().to_owned(),
                cause,
            }),
        }
    }

    /// Opens a handle on map `id`. Hand it back to [`close`](Self::close)
    /// once the query sequence is over.
    pub fn open(&self, id: MapId) -> Result<Box<dyn Handle + '_>, Error> {
        self.open_map(id).map(|(_, handle)| handle)
    }

    pub fn close(&self, handle: Box<dyn Handle + '_>) {
        handle.close();
    }

    /// Asks the map's backend to refresh its view of the map.
    pub fn update(&self, id: MapId) -> Result<(), Error> {
        let map = self.map(id)?;
        let backend = self
            .backends
            .resolve(map.backend())
            .ok_or_else(|| Error::UnknownBackend(map.backend().to_owned()))?;

        backend.update(map).map_err(|cause| Error::Backend {
            map: map.name().to_owned(),
            cause,
        })?;
        debug!(map = map.name(), backend = map.backend(), "map updated");
        Ok(())
    }

    fn map(&self, id: MapId) -> Result<&Map, Error> {
        self.maps.find_by_id(id).ok_or(Error::MapNotFound(id))
    }

    fn map_mut(&mut self, id: MapId) -> Result<&mut Map, Error> {
        self.maps.find_by_id_mut(id).ok_or(Error::MapNotFound(id))
    }

    fn open_map(&self, id: MapId) -> Result<(&Map, Box<dyn Handle + '_>), Error> {
        let map = self.map(id)?;
        let backend = self
            .backends
            .resolve(map.backend())
            .ok_or_else(|| Error::UnknownBackend(map.backend().to_owned()))?;

        match backend.open(map) {
            Ok(handle) => Ok((map, handle)),
            Err(cause) => {
                warn!(map = map.name(), config = map.config(), error = %cause, "can't open map");
                Err(Error::BackendUnavailable {
                    map: map.name().to_owned(),
                    config: map.config().to_owned(),
                    cause,
                })
            }
        }
    }
}
