//! CastProber - classifies pairs and runs native casts.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use typeshift_cast::CastProber;
//! use typeshift_core::{CastFlag, Dynamic, TypePair, primitives};
//! use typeshift_registry::TypeRegistry;
//!
//! let prober = CastProber::new(Arc::new(TypeRegistry::with_primitives()));
//!
//! let widen = TypePair::new(primitives::INT32, primitives::INT64);
//! assert_eq!(prober.probe(widen).flag(), CastFlag::Implicit);
//!
//! let result = prober.cast(widen, &Dynamic::new(7i32));
//! assert_eq!(result.into_value().unwrap().downcast::<i64>().ok(), Some(7));
//! ```

use std::sync::Arc;

use tracing::trace;

use typeshift_core::{CastResult, Dynamic, TypePair};
use typeshift_registry::TypeRegistry;

use crate::{Capability, CapabilityCache, CastPlan, enums, nullable, primitive, user_defined};

/// Native cast prober backed by a [`CapabilityCache`].
pub struct CastProber {
    types: Arc<TypeRegistry>,
    cache: CapabilityCache,
}

impl CastProber {
    /// Create a prober with an enabled cache.
    pub fn new(types: Arc<TypeRegistry>) -> Self {
        Self {
            types,
            cache: CapabilityCache::new(),
        }
    }

    /// Type metadata used for probing.
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// The capability cache.
    pub fn cache(&self) -> &CapabilityCache {
        &self.cache
    }

    /// Classify a pair, consulting the cache first.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn probe(&self, pair: TypePair) -> Arc<Capability> {
        // read before resolving so a concurrent registration makes this
        // classification stale instead of cached under the newer generation
        let generation = self.types.generation();
        if let Some(hit) = self.cache.get(pair, generation) {
            trace!(%pair, flag = %hit.flag(), "capability cache hit");
            return hit;
        }

        self.cache.record_probe();
        // resolved without holding the cache lock
        let capability = Arc::new(self.resolve(pair));
        trace!(%pair, flag = %capability.flag(), generation, "probed pair");
        self.cache.insert(pair, capability, generation)
    }

    /// Convert a value along the pair's native path.
    ///
    /// A failure for this particular value is reported in the result and
    /// leaves the cached classification untouched.
    pub fn cast(&self, pair: TypePair, value: &Dynamic) -> CastResult {
        self.probe(pair).cast(value)
    }

    /// Classify a pair from scratch, bypassing the cache.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(&self, pair: TypePair) -> Capability {
        let TypePair { source, target } = pair;
        let types = &*self.types;

        // 1. Identity
        if pair.is_identity() {
            return Capability::Implicit(CastPlan::Identity);
        }

        // 2. Direct wrap/unwrap
        if let Some(capability) = nullable::find_wrapper(source, target, types) {
            return capability;
        }

        // 3. Implicit paths
        if let Some(plan) = primitive::find_implicit(source, target)
            .or_else(|| user_defined::find_implicit(source, target, types))
        {
            return Capability::Implicit(plan);
        }

        // 4. Lifting is classified once; implicit lifts win over explicit paths
        let lifted = nullable::find_lifted(source, target, types, |inner| self.resolve(inner));
        if let Some(capability @ Capability::Implicit(_)) = lifted {
            return capability;
        }

        // 5. Explicit paths
        if let Some(plan) = primitive::find_explicit(source, target)
            .or_else(|| enums::find_explicit(source, target, types))
            .or_else(|| user_defined::find_explicit(source, target, types))
        {
            return Capability::Explicit(plan);
        }

        // 6. Explicit lifts
        lifted.unwrap_or(Capability::NoConversion)
    }
}

impl std::fmt::Debug for CastProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CastProber")
            .field("types", &self.types)
            .field("cache", &self.cache)
            .finish()
    }
}
