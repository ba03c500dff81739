//! TypeRegistry - metadata for every type known to the engine.
//!
//! The resolution pipeline never inspects Rust types directly. Everything it
//! needs to know about a type ("is it an enum?", "what is its default?",
//! "does it wrap another type?") comes from the [`TypeEntry`] stored here.
//!
//! # Example
//!
//! ```
//! use typeshift_registry::TypeRegistry;
//! use typeshift_core::{Typed, primitives};
//!
//! let registry = TypeRegistry::with_primitives();
//! assert!(registry.get(primitives::INT32).is_some());
//! assert!(registry.contains(<Option<i32>>::type_hash()));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use typeshift_core::{
    CastFlag, ConversionOperator, Dynamic, EnumInfo, NullableInfo, RegistrationError, TypeEntry,
    TypeHash, Typed,
};

/// Registry of type metadata, keyed by [`TypeHash`].
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<FxHashMap<TypeHash, Arc<TypeEntry>>>,
    generation: AtomicU64,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every primitive, `String`, and their nullable
    /// wrappers pre-registered.
    pub fn with_primitives() -> Self {
        let registry = Self::new();
        registry.register_all_primitives();
        registry
    }

    /// Register every primitive, `String`, and their nullable wrappers.
    pub fn register_all_primitives(&self) {
        self.register_primitive::<bool>();
        self.register_primitive::<char>();
        self.register_primitive::<i8>();
        self.register_primitive::<i16>();
        self.register_primitive::<i32>();
        self.register_primitive::<i64>();
        self.register_primitive::<u8>();
        self.register_primitive::<u16>();
        self.register_primitive::<u32>();
        self.register_primitive::<u64>();
        self.register_primitive::<f32>();
        self.register_primitive::<f64>();
        self.register_primitive::<String>();
    }

    // Primitive names are distinct, so these inserts cannot collide.
    fn register_primitive<T: Typed>(&self) {
        let mut types = self.types.write();
        let before = types.len();
        types
            .entry(T::type_hash())
            .or_insert_with(|| Arc::new(TypeEntry::of::<T>()));
        types
            .entry(<Option<T>>::type_hash())
            .or_insert_with(|| Arc::new(TypeEntry::of::<Option<T>>()));
        if types.len() != before {
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register `T` and `Option<T>`, along with every type they reference.
    pub fn register<T: Typed>(&self) -> Result<Arc<TypeEntry>, RegistrationError> {
        let entry = self.register_entry(TypeEntry::of::<T>())?;
        self.register_entry(TypeEntry::of::<Option<T>>())?;
        Ok(entry)
    }

    /// Register `T` unless its hash is already present.
    ///
    /// Cheaper than [`register`](Self::register) on the hot path: only a
    /// read lock is taken when the type is known.
    pub fn ensure<T: Typed>(&self) -> Result<(), RegistrationError> {
        if self.contains(T::type_hash()) {
            return Ok(());
        }
        self.register::<T>().map(|_| ())
    }

    /// Register a prepared entry and its companions.
    ///
    /// Registering an entry whose name is already present under the same hash
    /// is a no-op that returns the existing entry. A different name under the
    /// same hash fails with [`RegistrationError::HashCollision`].
    pub fn register_entry(&self, entry: TypeEntry) -> Result<Arc<TypeEntry>, RegistrationError> {
        let hash = entry.type_hash;
        let inserted = {
            let mut types = self.types.write();
            if let Some(existing) = types.get(&hash) {
                if existing.name != entry.name {
                    return Err(RegistrationError::HashCollision {
                        existing: existing.name.clone(),
                        incoming: entry.name,
                    });
                }
                return Ok(Arc::clone(existing));
            }
            let entry = Arc::new(entry);
            types.insert(hash, Arc::clone(&entry));
            self.generation.fetch_add(1, Ordering::AcqRel);
            entry
        };
        trace!(name = %inserted.name, hash = %hash, "registered type");

        // Companions are registered outside the lock; cycles end at the
        // already-registered check above.
        for companion in &inserted.companions {
            self.register_entry(companion())?;
        }
        Ok(inserted)
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get a type entry by hash.
    pub fn get(&self, hash: TypeHash) -> Option<Arc<TypeEntry>> {
        self.types.read().get(&hash).cloned()
    }

    /// Check if a type is registered.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.read().contains_key(&hash)
    }

    /// Counter bumped every time a new type is inserted.
    ///
    /// Anything derived from the registry's contents (such as cached cast
    /// classifications) is stale once this moves on.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Check if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Name of a type, or its hash when it is not registered.
    pub fn name_of(&self, hash: TypeHash) -> String {
        self.types
            .read()
            .get(&hash)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| hash.to_string())
    }

    /// Zero/default value of a type, if it has one.
    pub fn default_value(&self, hash: TypeHash) -> Option<Dynamic> {
        self.get(hash).and_then(|entry| entry.default_value())
    }

    /// Variant table of an enumeration, or `None` for any other type.
    pub fn enum_info(&self, hash: TypeHash) -> Option<EnumInfo> {
        self.types.read().get(&hash).and_then(|e| e.enum_info.clone())
    }

    /// Check if a type is textual.
    pub fn is_text(&self, hash: TypeHash) -> bool {
        self.types.read().get(&hash).is_some_and(|e| e.is_text())
    }

    /// Wrapper metadata of a nullable type, or `None` if `hash` is not a
    /// nullable wrapper.
    pub fn nullable(&self, hash: TypeHash) -> Option<NullableInfo> {
        self.types.read().get(&hash).and_then(|e| e.nullable.clone())
    }

    /// Find a user-defined operator converting `source` into `target`.
    ///
    /// Operators declared on the source type win over converting
    /// constructors declared on the target type.
    pub fn find_operator(
        &self,
        source: TypeHash,
        target: TypeHash,
        flag: CastFlag,
    ) -> Option<ConversionOperator> {
        let types = self.types.read();
        [source, target]
            .iter()
            .filter_map(|hash| types.get(hash))
            .find_map(|entry| entry.find_operator(source, target, flag).cloned())
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}
