//! Session-wide cache of remote repository indexes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::RepositoryIndex;
use crate::error::Result;

/// Shared, read-only index handle.
pub type SharedIndex = Arc<dyn RepositoryIndex>;

type Slot = Arc<Mutex<Option<SharedIndex>>>;

/// Cache key of a repository: `id|url`.
#[must_use]
pub fn repository_key(id: &str, url: &str) -> String {
    format!("{id}|{url}")
}

/// Build-session cache of remote repository indexes.
///
/// Each index is loaded at most once per session, even when modules
/// resolve in parallel. Every key has its own slot, so a slow load only
/// holds back callers asking for the same repository.
#[derive(Default)]
pub struct IndexCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl IndexCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached index for `key`, loading it with `load` on a miss.
    ///
    /// A failed load is not cached.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `load`.
    pub fn get_or_try_insert<F>(&self, key: &str, load: F) -> Result<SharedIndex>
    where
        F: FnOnce() -> Result<SharedIndex>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };
        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = entry.as_ref() {
            return Ok(Arc::clone(index));
        }
        let index = load()?;
        debug!(key, entries = index.len(), "cached repository index");
        *entry = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Number of cached indexes.
    #[must_use]
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        slots
            .iter()
            .filter(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
