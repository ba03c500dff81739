//! Capability cache.
//!
//! Memoizes the classification of every probed pair. Every classification is
//! tagged with the type registry generation it was computed against; once a
//! newer generation shows up the whole memo is dropped, since a newly
//! registered type can open paths that did not exist before. The cache can be
//! disabled (which also clears it) so tests can force re-probing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use typeshift_core::TypePair;

use crate::Capability;

/// Per-pair memo of [`Capability`] classifications.
pub struct CapabilityCache {
    entries: RwLock<Entries>,
    enabled: AtomicBool,
    probes: AtomicU64,
}

#[derive(Default)]
struct Entries {
    generation: u64,
    pairs: FxHashMap<TypePair, Arc<Capability>>,
}

impl Default for CapabilityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityCache {
    /// Create an enabled, empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::default(),
            enabled: AtomicBool::new(true),
            probes: AtomicU64::new(0),
        }
    }

    /// Look up a pair classified against registry `generation`.
    ///
    /// Always misses while disabled, and for entries from another generation.
    pub fn get(&self, pair: TypePair, generation: u64) -> Option<Arc<Capability>> {
        if !self.is_enabled() {
            return None;
        }
        let entries = self.entries.read();
        if entries.generation != generation {
            return None;
        }
        entries.pairs.get(&pair).cloned()
    }

    /// Store a classification computed against registry `generation` and
    /// return the one that ends up cached.
    ///
    /// When two callers race to probe the same pair, the first insert wins
    /// and both get the same entry back. Nothing is stored while disabled or
    /// when `generation` is older than the cached one. A newer generation
    /// drops every older entry first.
    pub fn insert(
        &self,
        pair: TypePair,
        capability: Arc<Capability>,
        generation: u64,
    ) -> Arc<Capability> {
        let mut entries = self.entries.write();
        // checked under the lock so a concurrent disable-and-clear wins
        if !self.is_enabled() || generation < entries.generation {
            return capability;
        }
        if generation > entries.generation {
            entries.pairs.clear();
            entries.generation = generation;
        }
        Arc::clone(entries.pairs.entry(pair).or_insert(capability))
    }

    /// Check if caching is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Turn caching on or off. Turning it off clears every entry.
    pub fn set_enabled(&self, enabled: bool) {
        let mut entries = self.entries.write();
        self.enabled.store(enabled, Ordering::Release);
        if !enabled {
            entries.pairs.clear();
        }
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().pairs.clear();
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.read().pairs.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().pairs.is_empty()
    }

    /// Count a probe that had to classify a pair from scratch.
    pub fn record_probe(&self) {
        self.probes.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of from-scratch probes since creation.
    pub fn probe_count(&self) -> u64 {
        self.probes.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for CapabilityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityCache")
            .field("enabled", &self.is_enabled())
            .field("entries", &self.len())
            .field("probes", &self.probe_count())
            .finish()
    }
}
