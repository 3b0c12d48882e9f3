//! Named lookup tables and their identifiers.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::element::{MapElement, bounded};
use crate::error::{Field, FatalError};

/// Backend kind whose contents live in memory and may be mutated.
pub const STATIC_BACKEND: &str = "static";

pub const MAX_NAME_LEN: usize = 2047;
pub const MAX_BACKEND_LEN: usize = 2047;
pub const MAX_CONFIG_LEN: usize = 1023;

/// Prefix of the names given to unnamed maps.
const DYNAMIC_PREFIX: &str = "<dynamic:";

/// Process-unique map identifier. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(NonZeroU32);

impl MapId {
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for MapId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<NonZeroU32>().map(Self)
    }
}

/// A lookup table bound to one backend.
///
/// Static maps own their elements directly. Every other backend keeps its
/// data elsewhere and only reads `config` (a path, a database URL, ...) when
/// a handle is opened.
#[derive(Debug)]
pub struct Map {
    id: MapId,
    name: String,
    backend: String,
    config: String,
    elements: Vec<MapElement>,
}

impl Map {
    /// Validates the bounded fields before an id is spent on them.
    pub(crate) fn validate(backend: &str, name: Option<&str>) -> Result<(), FatalError> {
        bounded(Field::Backend, backend, MAX_BACKEND_LEN)?;
        if let Some(name) = name {
            bounded(Field::Name, name, MAX_NAME_LEN)?;
            if name.starts_with(DYNAMIC_PREFIX) {
                return Err(FatalError::ReservedName(name.to_owned()));
            }
        }
        Ok(())
    }

    pub(crate) fn new(id: MapId, backend: &str, name: Option<&str>) -> Self {
        let name = match name {
            Some(name) => name.to_owned(),
            None => format!("{DYNAMIC_PREFIX}{id}>"),
        };
        Self {
            id,
            name,
            backend: backend.to_owned(),
            config: String::new(),
            elements: Vec::new(),
        }
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn elements(&self) -> &[MapElement] {
        &self.elements
    }

    pub fn is_static(&self) -> bool {
        self.backend == STATIC_BACKEND
    }

    pub fn set_config(&mut self, config: &str) -> Result<(), FatalError> {
        self.config = bounded(Field::Config, config, MAX_CONFIG_LEN)?;
        Ok(())
    }

    /// Returns the value of the first element whose key equals `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|el| el.key() == key)
            .map(MapElement::value)
    }

    /// Appends an element. Duplicate keys are kept; lookups see the first.
    pub fn add(&mut self, key: &str, value: Option<&str>) -> Result<(), FatalError> {
        self.ensure_static("add to")?;
        self.elements.push(MapElement::new(key, value)?);
        Ok(())
    }

    /// Removes the first element whose key equals `key`, reporting whether
    /// one was found. A missing key is not an error.
    pub fn delete(&mut self, key: &str) -> Result<bool, FatalError> {
        self.ensure_static("delete from")?;
        match self.elements.iter().position(|el| el.key() == key) {
            Some(pos) => {
                self.elements.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub(crate) fn ensure_static(&self, op: &'static str) -> Result<(), FatalError> {
        if self.is_static() {
            return Ok(());
        }
        Err(FatalError::NotStatic {
            op,
            map: self.name.clone(),
            backend: self.backend.clone(),
        })
    }
}
