//! The contract every map backend satisfies, and the table of backends the
//! service dispatches to.

use crate::error::{BackendError, FatalError};
use crate::map::Map;
use crate::query::{Predicate, QueryKind};

mod file;
mod static_table;

pub use file::{FILE_BACKEND, FileBackend, parse_table};
pub use static_table::StaticBackend;

/// A source of map contents.
///
/// `open` is called once per query sequence and may block on I/O. A backend
/// that cannot say why it failed returns `BackendError::Unsupported`.
pub trait Backend: Send + Sync {
    /// Kind name matched against `Map::backend`.
    fn name(&self) -> &str;

    fn open<'a>(&'a self, map: &'a Map) -> Result<Box<dyn Handle + 'a>, BackendError>;

    /// Refreshes whatever the backend caches for `map`. No-op by default.
    fn update(&self, _map: &Map) -> Result<(), BackendError> {
        Ok(())
    }
}

/// An open view of one map, valid until `close`.
pub trait Handle {
    /// `Ok(None)` means the key is absent; errors are reserved for the
    /// backend failing to answer.
    fn lookup(&mut self, key: &str, kind: QueryKind) -> Result<Option<String>, BackendError>;

    /// True when some stored key `candidate` satisfies `predicate(candidate, key)`.
    fn compare(
        &mut self,
        key: &str,
        kind: QueryKind,
        predicate: Predicate<'_>,
    ) -> Result<bool, BackendError>;

    fn close(self: Box<Self>) {}
}

/// Compiled-in backends, looked up by exact name.
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the `static` and `file` backends.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.backends.push(Box::new(StaticBackend));
        registry.backends.push(Box::new(FileBackend::new()));
        registry
    }

    pub fn register(&mut self, backend: impl Backend + 'static) -> Result<(), FatalError> {
        if self.resolve(backend.name()).is_some() {
            return Err(FatalError::DuplicateBackend(backend.name().to_owned()));
        }
        self.backends.push(Box::new(backend));
        Ok(())
    }

    pub fn resolve(&self, kind: &str) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .find(|b| b.name() == kind)
            .map(|b| b.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.iter().map(|b| b.name())
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
