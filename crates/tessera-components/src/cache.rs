//! Optional invalidate-on-write cache over a [`ComponentStore`].

use std::sync::{Arc, RwLock};

use crate::context::RenderContext;
use crate::store::{self, ComponentDescriptor, ComponentStore, Fragment, StoreError};

/// A component store that can keep the last directory read in memory.
///
/// With caching off every call goes to disk. With caching on the fragment
/// batch is kept until [`CachedStore::invalidate`] is called, typically from
/// a file watcher. Callers always get their own copies.
#[derive(Debug)]
pub struct CachedStore {
    store: ComponentStore,
    enabled: bool,
    snapshot: RwLock<Option<Arc<Option<Vec<Fragment>>>>>,
}

impl CachedStore {
    /// Wrap `store`. `enabled = false` keeps the always-read-from-disk behavior.
    pub fn new(store: ComponentStore, enabled: bool) -> Self {
        Self {
            store,
            enabled,
            snapshot: RwLock::new(None),
        }
    }

    /// The wrapped store.
    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Drop the cached batch so the next call re-reads the directory.
    pub fn invalidate(&self) {
        if !self.enabled {
            return;
        }
        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        if guard.take().is_some() {
            tracing::debug!("Invalidated fragment cache for {}", self.store.dir().display());
        }
    }

    /// See [`ComponentStore::discover`].
    pub fn discover(&self) -> Result<Vec<ComponentDescriptor>, StoreError> {
        match self.fragments()?.as_ref() {
            Some(fragments) => store::descriptors(fragments),
            None => Err(StoreError::NotFound(
                self.store.dir().display().to_string(),
            )),
        }
    }

    /// See [`ComponentStore::load_context`].
    pub fn load_context(&self) -> Result<RenderContext, StoreError> {
        match self.fragments()?.as_ref() {
            Some(fragments) => store::context(fragments),
            None => Ok(RenderContext::new()),
        }
    }

    fn fragments(&self) -> Result<Arc<Option<Vec<Fragment>>>, StoreError> {
        if !self.enabled {
            return Ok(Arc::new(self.store.read_fragments()?));
        }

        {
            let guard = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
            if let Some(snapshot) = guard.as_ref() {
                return Ok(Arc::clone(snapshot));
            }
        }

        let fresh = Arc::new(self.store.read_fragments()?);
        // A missing directory is rechecked on every call until it appears
        if fresh.is_some() {
            let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
            *guard = Some(Arc::clone(&fresh));
        }

        Ok(fresh)
    }
}
