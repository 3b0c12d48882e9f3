//! Backend serving the elements a static map holds in memory.

use crate::backend::{Backend, Handle};
use crate::element::MapElement;
use crate::error::BackendError;
use crate::map::{Map, STATIC_BACKEND};
use crate::query::{Predicate, QueryKind};

pub struct StaticBackend;

impl Backend for StaticBackend {
    fn name(&self) -> &str {
        STATIC_BACKEND
    }

    fn open<'a>(&'a self, map: &'a Map) -> Result<Box<dyn Handle + 'a>, BackendError> {
        Ok(Box::new(TableHandle {
            elements: map.elements(),
        }))
    }
}

struct TableHandle<'a> {
    elements: &'a [MapElement],
}

impl Handle for TableHandle<'_> {
    fn lookup(&mut self, key: &str, kind: QueryKind) -> Result<Option<String>, BackendError> {
        table_lookup(self.elements, key, kind)
    }

    fn compare(
        &mut self,
        key: &str,
        _kind: QueryKind,
        predicate: Predicate<'_>,
    ) -> Result<bool, BackendError> {
        Ok(table_compare(self.elements, key, predicate))
    }
}

/// First element whose key is exactly `key`. Network lookups only make
/// sense through `compare`.
pub(crate) fn table_lookup(
    elements: &[MapElement],
    key: &str,
    kind: QueryKind,
) -> Result<Option<String>, BackendError> {
    if kind == QueryKind::NetAddr {
        return Err(BackendError::UnsupportedKind(kind));
    }
    Ok(elements
        .iter()
        .find(|el| el.key() == key)
        .map(|el| el.value().to_owned()))
}

pub(crate) fn table_compare(elements: &[MapElement], key: &str, predicate: Predicate<'_>) -> bool {
    elements.iter().any(|el| predicate(el.key(), key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapId;
    use crate::query;

    fn map_with(pairs: &[(&str, &str)]) -> Map {
        let mut map = Map::new(MapId::new(1).unwrap(), STATIC_BACKEND, Some("t"));
        for (k, v) in pairs {
            map.add(k, Some(v)).unwrap();
        }
        map
    }

    #[test]
    fn lookup_returns_first_match() {
        let map = map_with(&[("k", "v1"), ("k", "v2")]);
        let backend = StaticBackend;
        let mut handle = backend.open(&map).unwrap();

        assert_eq!(handle.lookup("k", QueryKind::Alias).unwrap().as_deref(), Some("v1"));
        assert_eq!(handle.lookup("x", QueryKind::Exact).unwrap(), None);
        handle.close();
    }

    #[test]
    fn netaddr_lookup_is_unsupported() {
        let map = map_with(&[("127.0.0.1", "")]);
        let backend = StaticBackend;
        let mut handle = backend.open(&map).unwrap();

        assert!(matches!(
            handle.lookup("127.0.0.1", QueryKind::NetAddr),
            Err(BackendError::UnsupportedKind(QueryKind::NetAddr))
        ));
    }

    #[test]
    fn compare_applies_predicate_to_stored_keys() {
        let map = map_with(&[("10.0.0.0/8", ""), ("192.168.1.0/24", "")]);
        let backend = StaticBackend;
        let mut handle = backend.open(&map).unwrap();

        assert!(handle.compare("192.168.1.7", QueryKind::NetAddr, &query::netaddr).unwrap());
        assert!(!handle.compare("172.16.0.1", QueryKind::NetAddr, &query::netaddr).unwrap());
    }
}
