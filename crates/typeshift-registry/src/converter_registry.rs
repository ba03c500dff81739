//! ConverterRegistry - user-supplied converters keyed by `(source, target)`.
//!
//! A binding maps a [`TypePair`] to a *factory*. Every lookup invokes the
//! factory again and hands out a fresh converter instance; nothing is cached
//! at this layer.
//!
//! # Example
//!
//! ```
//! use typeshift_registry::{Converter, ConverterRegistry};
//!
//! #[derive(Default)]
//! struct Shout;
//!
//! impl Converter<String, String> for Shout {
//!     fn convert(&self, value: String) -> String {
//!         value.to_uppercase()
//!     }
//! }
//!
//! let registry = ConverterRegistry::new();
//! registry.register_type::<String, String, Shout>().unwrap();
//!
//! let converter = registry.get::<String, String>().unwrap();
//! assert_eq!(converter.convert("hi".to_string()).as_deref(), Some("HI"));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use typeshift_core::{ConversionError, Dynamic, TypeHash, TypePair, Typed};

use crate::TypeRegistry;

/// Converts a `S` into a `T`.
pub trait Converter<S, T> {
    /// Convert the value.
    fn convert(&self, value: S) -> T;
}

/// A [`Converter`] with its types erased.
pub trait DynConverter {
    /// The pair this converter handles.
    fn pair(&self) -> TypePair;

    /// Convert a dynamic value. Hands the value back when it is not of the
    /// converter's source type.
    fn convert_dynamic(&self, value: Dynamic) -> Result<Dynamic, Dynamic>;
}

/// Produces a fresh converter instance, or `None` when the binding cannot
/// serve its pair.
pub type ConverterFactory = Arc<dyn Fn() -> Option<Box<dyn DynConverter>> + Send + Sync>;

struct Erased<C, S, T> {
    inner: C,
    _marker: PhantomData<fn(S) -> T>,
}

impl<C, S, T> Erased<C, S, T> {
    fn new(inner: C) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<C, S, T> DynConverter for Erased<C, S, T>
where
    C: Converter<S, T>,
    S: Typed,
    T: Typed,
{
    fn pair(&self) -> TypePair {
        TypePair::new(S::type_hash(), T::type_hash())
    }

    fn convert_dynamic(&self, value: Dynamic) -> Result<Dynamic, Dynamic> {
        let value = value.downcast::<S>()?;
        Ok(Dynamic::new(self.inner.convert(value)))
    }
}

/// Adapts a closure into a [`Converter`].
pub struct FnConverter<F>(pub F);

impl<S, T, F> Converter<S, T> for FnConverter<F>
where
    F: Fn(S) -> T,
{
    fn convert(&self, value: S) -> T {
        (self.0)(value)
    }
}

// ==========================================================================
// Converter types
// ==========================================================================

type Constructor = fn() -> Box<dyn DynConverter>;

fn construct<C, S, T>() -> Box<dyn DynConverter>
where
    C: Converter<S, T> + Default + 'static,
    S: Typed,
    T: Typed,
{
    Box::new(Erased::<C, S, T>::new(C::default()))
}

/// Describes a default-constructible converter implementation and the pairs
/// it implements.
///
/// Binding a converter type to a pair it does not implement is accepted; the
/// failure surfaces later, when the factory is asked for an instance and
/// yields none.
#[derive(Clone)]
pub struct ConverterType {
    name: &'static str,
    constructors: FxHashMap<TypePair, Constructor>,
}

impl ConverterType {
    /// Start describing the implementation type `C`.
    pub fn of<C: Default + 'static>() -> ConverterTypeBuilder<C> {
        ConverterTypeBuilder {
            ty: ConverterType {
                name: std::any::type_name::<C>(),
                constructors: FxHashMap::default(),
            },
            _marker: PhantomData,
        }
    }

    /// Rust name of the implementation type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check if the type implements the pair.
    pub fn implements(&self, pair: TypePair) -> bool {
        self.constructors.contains_key(&pair)
    }

    /// Construct an instance for the pair, if the type implements it.
    pub fn instantiate(&self, pair: TypePair) -> Option<Box<dyn DynConverter>> {
        self.constructors.get(&pair).map(|construct| construct())
    }
}

impl fmt::Debug for ConverterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterType")
            .field("name", &self.name)
            .field("pairs", &self.constructors.len())
            .finish()
    }
}

/// Builder for [`ConverterType`].
pub struct ConverterTypeBuilder<C> {
    ty: ConverterType,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Default + 'static> ConverterTypeBuilder<C> {
    /// Record that `C` converts `S` into `T`.
    pub fn implements<S: Typed, T: Typed>(mut self) -> Self
    where
        C: Converter<S, T>,
    {
        self.ty.constructors.insert(
            TypePair::new(S::type_hash(), T::type_hash()),
            construct::<C, S, T>,
        );
        self
    }

    /// Finish the descriptor.
    pub fn build(self) -> ConverterType {
        self.ty
    }
}

// ==========================================================================
// Registry
// ==========================================================================

/// Registry of converter bindings.
#[derive(Default)]
pub struct ConverterRegistry {
    bindings: RwLock<FxHashMap<TypePair, ConverterFactory>>,
    types: Option<Arc<TypeRegistry>>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry that names types through `types` in errors.
    pub fn with_types(types: Arc<TypeRegistry>) -> Self {
        Self {
            bindings: RwLock::default(),
            types: Some(types),
        }
    }

    /// Bind a factory to a pair.
    ///
    /// Fails with [`ConversionError::DuplicateRegistration`] when the pair is
    /// already bound; bindings are never overwritten.
    pub fn register_factory(
        &self,
        pair: TypePair,
        factory: ConverterFactory,
    ) -> Result<(), ConversionError> {
        if pair.source.is_empty() {
            return Err(ConversionError::argument_null("source"));
        }
        if pair.target.is_empty() {
            return Err(ConversionError::argument_null("target"));
        }

        let mut bindings = self.bindings.write();
        if bindings.contains_key(&pair) {
            drop(bindings);
            return Err(ConversionError::DuplicateRegistration {
                source_type: self.name_of(pair.source),
                target_type: self.name_of(pair.target),
            });
        }
        bindings.insert(pair, factory);
        drop(bindings);

        debug!(%pair, "registered converter");
        Ok(())
    }

    /// Bind a typed factory to `(S, T)`.
    pub fn register<S, T, C, F>(&self, factory: F) -> Result<(), ConversionError>
    where
        S: Typed,
        T: Typed,
        C: Converter<S, T> + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let factory: ConverterFactory = Arc::new(move || {
            Some(Box::new(Erased::<C, S, T>::new(factory())) as Box<dyn DynConverter>)
        });
        self.register_factory(TypePair::new(S::type_hash(), T::type_hash()), factory)
    }

    /// Bind a closure to `(S, T)`.
    pub fn register_fn<S, T, F>(&self, f: F) -> Result<(), ConversionError>
    where
        S: Typed,
        T: Typed,
        F: Fn(S) -> T + Clone + Send + Sync + 'static,
    {
        self.register::<S, T, _, _>(move || FnConverter(f.clone()))
    }

    /// Bind a default-constructible converter type to `(S, T)`.
    pub fn register_type<S, T, C>(&self) -> Result<(), ConversionError>
    where
        S: Typed,
        T: Typed,
        C: Converter<S, T> + Default + 'static,
    {
        self.register::<S, T, C, _>(C::default)
    }

    /// Bind a converter type descriptor to a pair.
    ///
    /// The descriptor is not checked against the pair here. If it does not
    /// implement the pair, every lookup yields no converter.
    pub fn register_converter_type(
        &self,
        pair: TypePair,
        converter_type: ConverterType,
    ) -> Result<(), ConversionError> {
        let converter_type = Arc::new(converter_type);
        let factory: ConverterFactory = Arc::new(move || {
            let instance = converter_type.instantiate(pair);
            if instance.is_none() {
                warn!(
                    converter = converter_type.name(),
                    %pair,
                    "converter type does not implement the requested pair"
                );
            }
            instance
        });
        self.register_factory(pair, factory)
    }

    /// Get a fresh converter instance for the pair.
    pub fn get_converter(&self, pair: TypePair) -> Option<Box<dyn DynConverter>> {
        // the factory runs outside the lock
        let factory = self.bindings.read().get(&pair).cloned()?;
        factory()
    }

    /// Get a fresh typed converter for `(S, T)`.
    pub fn get<S: Typed, T: Typed>(&self) -> Option<ResolvedConverter<S, T>> {
        self.get_converter(TypePair::new(S::type_hash(), T::type_hash()))
            .map(|inner| ResolvedConverter {
                inner,
                _marker: PhantomData,
            })
    }

    /// Check if the pair is bound.
    pub fn contains(&self, pair: TypePair) -> bool {
        self.bindings.read().contains_key(&pair)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    /// Check if no bindings exist.
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Remove every binding.
    pub fn reset(&self) {
        self.bindings.write().clear();
        debug!("converter registry reset");
    }

    fn name_of(&self, hash: TypeHash) -> String {
        match &self.types {
            Some(types) => types.name_of(hash),
            None => hash.to_string(),
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("bindings", &self.len())
            .finish()
    }
}

/// Typed handle around a converter instance from the registry.
pub struct ResolvedConverter<S, T> {
    inner: Box<dyn DynConverter>,
    _marker: PhantomData<fn(S) -> T>,
}

impl<S: Typed, T: Typed> ResolvedConverter<S, T> {
    /// Convert a value. Returns `None` when the bound converter does not
    /// actually produce a `T` from a `S`.
    pub fn convert(&self, value: S) -> Option<T> {
        self.inner
            .convert_dynamic(Dynamic::new(value))
            .ok()?
            .downcast::<T>()
            .ok()
    }
}
