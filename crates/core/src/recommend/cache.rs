//! Opt-in memoization of built item vectors.
//!
//! Nothing is cached unless a [`ProfileCache`] is attached to the engine.
//! Writers to the interaction log must call [`ProfileCache::invalidate`]; the
//! next lookup then rebuilds from the complete event set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::profile::ItemVectors;

#[derive(Debug)]
struct CachedVectors {
    generation: u64,
    vectors: Arc<ItemVectors>,
}

#[derive(Debug, Default)]
pub struct ProfileCache {
    generation: AtomicU64,
    slot: RwLock<Option<CachedVectors>>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Vectors built for the current generation, if any.
    pub fn get(&self) -> Option<Arc<ItemVectors>> {
        let current = self.generation();
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|cached| cached.generation == current)
            .map(|cached| Arc::clone(&cached.vectors))
    }

    /// Store vectors built while `generation` was current. A build that raced
    /// with an invalidation is returned to the caller but not retained.
    pub fn store(&self, generation: u64, vectors: ItemVectors) -> Arc<ItemVectors> {
        let vectors = Arc::new(vectors);
        if generation == self.generation() {
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
            *slot = Some(CachedVectors { generation, vectors: Arc::clone(&vectors) });
        }
        vectors
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}
