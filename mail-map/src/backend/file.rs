//! Backend reading plain-text tables from disk.
//!
//! One entry per line, either `key value` or `key: value`. The key runs to
//! the first whitespace, so keys may contain colons (IPv6 addresses). A single
//! trailing `:` is dropped from the key unless the key ends in `::`. Blank
//! lines and lines starting with `#` are skipped; a key alone maps to the
//! empty string.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::backend::static_table::{table_compare, table_lookup};
use crate::backend::{Backend, Handle};
use crate::element::MapElement;
use crate::error::BackendError;
use crate::map::Map;
use crate::query::{Predicate, QueryKind};

pub const FILE_BACKEND: &str = "file";

type Table = Arc<[MapElement]>;

/// Parsed tables are kept per path until `update` reloads them.
pub struct FileBackend {
    tables: RwLock<HashMap<PathBuf, Table>>,
}

impl FileBackend {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    fn cached(&self, path: &Path) -> Option<Table> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    fn load(&self, path: &Path) -> Result<Table, BackendError> {
        let content = std::fs::read_to_string(path)?;
        let table: Table = parse_table(&content)?.into();
        debug!(path = %path.display(), entries = table.len(), "loaded map file");

        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for FileBackend {
    fn name(&self) -> &str {
        FILE_BACKEND
    }

    fn open<'a>(&'a self, map: &'a Map) -> Result<Box<dyn Handle + 'a>, BackendError> {
        if map.config().is_empty() {
            return Err(BackendError::Unsupported);
        }
        let path = Path::new(map.config());
        let table = match self.cached(path) {
            Some(table) => table,
            None => self.load(path)?,
        };
        Ok(Box::new(FileHandle { table }))
    }

    fn update(&self, map: &Map) -> Result<(), BackendError> {
        let path = Path::new(map.config());
        match self.load(path) {
            Ok(_) => Ok(()),
            Err(err) => {
                self.tables
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(path);
                Err(err)
            }
        }
    }
}

struct FileHandle {
    table: Table,
}

impl Handle for FileHandle {
    fn lookup(&mut self, key: &str, kind: QueryKind) -> Result<Option<String>, BackendError> {
        table_lookup(&self.table, key, kind)
    }

    fn compare(
        &mut self,
        key: &str,
        _kind: QueryKind,
        predicate: Predicate<'_>,
    ) -> Result<bool, BackendError> {
        Ok(table_compare(&self.table, key, predicate))
    }
}

/// Parses the contents of a map file into elements, in file order.
pub fn parse_table(content: &str) -> Result<Vec<MapElement>, BackendError> {
    let mut elements = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        let key = match key.strip_suffix(':') {
            Some(stripped) if !key.ends_with("::") => stripped,
            _ => key,
        };
        if key.is_empty() {
            return Err(BackendError::Parse {
                line: idx + 1,
                reason: "missing key".to_owned(),
            });
        }
        let value = value.trim();

        let element = MapElement::new(key, Some(value)).map_err(|err| BackendError::Parse {
            line: idx + 1,
            reason: err.to_string(),
        })?;
        elements.push(element);
    }

    Ok(elements)
}
