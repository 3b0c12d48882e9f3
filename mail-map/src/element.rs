//! Key/value pairs held by static maps.

use crate::error::{Field, FatalError};

/// Longest key or value a static element may hold, in bytes.
pub const MAX_ELEMENT_LEN: usize = 2047;

/// Rejects `s` when it exceeds `max` bytes. Never truncates.
pub(crate) fn bounded(field: Field, s: &str, max: usize) -> Result<String, FatalError> {
    if s.len() > max {
        return Err(FatalError::TooLong {
            field,
            len: s.len(),
            max,
        });
    }
    Ok(s.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapElement {
    key: String,
    value: String,
}

impl MapElement {
    /// Builds an element. A missing value is stored as the empty string.
    pub fn new(key: &str, value: Option<&str>) -> Result<Self, FatalError> {
        let key = bounded(Field::Key, key, MAX_ELEMENT_LEN)?;
        let value = match value {
            Some(v) => bounded(Field::Value, v, MAX_ELEMENT_LEN)?,
            None => String::new(),
        };
        Ok(Self { key, value })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
