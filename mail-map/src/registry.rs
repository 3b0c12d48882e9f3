//! Ordered collection of every map known to the process.

use tracing::debug;

use crate::error::FatalError;
use crate::map::{Map, MapId};

/// Ids stop being handed out once the counter reaches this value.
pub const DEFAULT_ID_LIMIT: u32 = i32::MAX as u32;

/// Owns all maps, in creation order.
///
/// Names are unique among explicitly named maps; unnamed maps are called
/// `<dynamic:ID>` and can never collide because ids are never reused and
/// explicit names may not take that form.
#[derive(Debug)]
pub struct MapRegistry {
    maps: Vec<Map>,
    last_id: u32,
    id_limit: u32,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::with_id_limit(DEFAULT_ID_LIMIT)
    }

    /// Creates a registry whose id space ends before `limit`.
    pub fn with_id_limit(limit: u32) -> Self {
        Self {
            maps: Vec::new(),
            last_id: 0,
            id_limit: limit,
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Map> {
        self.maps.iter().find(|m| m.name() == name)
    }

    pub fn find_by_id(&self, id: MapId) -> Option<&Map> {
        self.maps.iter().find(|m| m.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: MapId) -> Option<&mut Map> {
        self.maps.iter_mut().find(|m| m.id() == id)
    }

    /// Creates a map bound to `backend` and appends it to the registry.
    pub fn create(&mut self, backend: &str, name: Option<&str>) -> Result<&mut Map, FatalError> {
        if let Some(name) = name {
            if self.find_by_name(name).is_some() {
                return Err(FatalError::DuplicateName(name.to_owned()));
            }
        }
        Map::validate(backend, name)?;

        let next = self.last_id + 1;
        if next >= self.id_limit {
            return Err(FatalError::IdsExhausted);
        }
        let id = MapId::new(next).ok_or(FatalError::IdsExhausted)?;
        self.last_id = next;

        let map = Map::new(id, backend, name);
        debug!(id = %id, name = map.name(), backend, "map created");
        self.maps.push(map);

        let idx = self.maps.len() - 1;
        Ok(&mut self.maps[idx])
    }

    /// Removes a static map and everything it holds.
    ///
    /// Returns `Ok(None)` when no map has this id.
    pub fn destroy(&mut self, id: MapId) -> Result<Option<Map>, FatalError> {
        let Some(pos) = self.maps.iter().position(|m| m.id() == id) else {
            return Ok(None);
        };
        self.maps[pos].ensure_static("destroy")?;

        let map = self.maps.remove(pos);
        debug!(id = %id, name = map.name(), elements = map.elements().len(), "map destroyed");
        Ok(Some(map))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Map> {
        self.maps.iter()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl Default for MapRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::STATIC_BACKEND;

    #[test]
    fn create_then_find() {
        let mut reg = MapRegistry::new();
        let id = reg.create(STATIC_BACKEND, Some("aliases")).unwrap().id();
        let other = reg.create("file", Some("virtual")).unwrap().id();

        assert_ne!(id, other);
        assert_eq!(id.get(), 1);
        assert_eq!(reg.find_by_name("aliases").unwrap().id(), id);
        assert_eq!(reg.find_by_id(other).unwrap().name(), "virtual");
        assert!(reg.find_by_name("nope").is_none());
    }

    #[test]
    fn duplicate_name_is_fatal() {
        let mut reg = MapRegistry::new();
        reg.create(STATIC_BACKEND, Some("aliases")).unwrap();

        let err = reg.create("file", Some("aliases")).unwrap_err();
        assert!(matches!(err, FatalError::DuplicateName(name) if name == "aliases"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unnamed_maps_never_collide() {
        let mut reg = MapRegistry::new();
        let a = reg.create(STATIC_BACKEND, None).unwrap().name().to_owned();
        let b = reg.create(STATIC_BACKEND, None).unwrap().name().to_owned();

        assert_eq!(a, "<dynamic:1>");
        assert_eq!(b, "<dynamic:2>");
    }

    #[test]
    fn dynamic_names_are_reserved() {
        let mut reg = MapRegistry::new();
        reg.create(STATIC_BACKEND, None).unwrap();

        let err = reg.create(STATIC_BACKEND, Some("<dynamic:2>")).unwrap_err();
        assert!(matches!(err, FatalError::ReservedName(name) if name == "<dynamic:2>"));
        assert_eq!(reg.len(), 1);

        let id = reg.create(STATIC_BACKEND, None).unwrap().id();
        assert_eq!(id.get(), 2);
        assert_eq!(reg.find_by_name("<dynamic:2>").unwrap().id(), id);
    }

    #[test]
    fn ids_are_not_reused_after_destroy() {
        let mut reg = MapRegistry::new();
        let first = reg.create(STATIC_BACKEND, Some("a")).unwrap().id();
        reg.destroy(first).unwrap();
        let second = reg.create(STATIC_BACKEND, Some("a")).unwrap().id();

        assert!(second > first);
    }

    #[test]
    fn id_space_exhaustion_is_fatal() {
        let mut reg = MapRegistry::with_id_limit(3);
        reg.create(STATIC_BACKEND, None).unwrap();
        reg.create(STATIC_BACKEND, None).unwrap();

        let err = reg.create(STATIC_BACKEND, None).unwrap_err();
        assert!(matches!(err, FatalError::IdsExhausted));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn oversized_name_is_fatal() {
        let mut reg = MapRegistry::new();
        let long = "n".repeat(crate::map::MAX_NAME_LEN + 1);

        assert!(matches!(
            reg.create(STATIC_BACKEND, Some(&long)),
            Err(FatalError::TooLong { .. })
        ));
        assert!(reg.is_empty());
    }

    #[test]
    fn destroy_static_map_releases_it() {
        let mut reg = MapRegistry::new();
        let map = reg.create(STATIC_BACKEND, Some("aliases")).unwrap();
        map.add("root", Some("admin")).unwrap();
        let id = map.id();

        let removed = reg.destroy(id).unwrap().unwrap();
        assert_eq!(removed.elements().len(), 1);
        assert!(reg.find_by_id(id).is_none());
        assert!(reg.find_by_name("aliases").is_none());
    }

    #[test]
    fn destroy_non_static_map_is_fatal_and_keeps_it() {
        let mut reg = MapRegistry::new();
        let id = reg.create("db", Some("virtual")).unwrap().id();

        assert!(matches!(reg.destroy(id), Err(FatalError::NotStatic { .. })));
        assert!(reg.find_by_id(id).is_some());
    }

    #[test]
    fn iter_follows_creation_order() {
        let mut reg = MapRegistry::new();
        for name in ["c", "a", "b"] {
            reg.create(STATIC_BACKEND, Some(name)).unwrap();
        }

        let names: Vec<_> = reg.iter().map(Map::name).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }
}
