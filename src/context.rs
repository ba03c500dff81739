//! ConversionContext - the resolution pipeline and its shared state.
//!
//! A context owns one [`TypeRegistry`], one [`ConverterRegistry`] and one
//! [`CastProber`]. Contexts are independent: tests that need isolation build
//! their own instead of resetting a global.
//!
//! # Example
//!
//! ```
//! use typeshift::{ConversionContext, FailureMode};
//!
//! let ctx = ConversionContext::new();
//! assert_eq!(ctx.convert::<i32, i64>(7).unwrap(), 7);
//! assert_eq!(ctx.convert::<u16, String>(42).unwrap(), "42");
//! assert_eq!(ctx.try_convert_or::<i32, u8>(i32::MAX, 9), 9);
//! ```

use std::sync::Arc;

use tracing::debug;

use typeshift_cast::CastProber;
use typeshift_core::{ConversionError, Dynamic, RegistrationError, TypeHash, TypePair, Typed};
use typeshift_registry::{ConverterRegistry, ConverterType, DynConverter, TypeRegistry};

use crate::{Coerce, ContextOptions, ConversionRequest, Converter, FailureMode, ScalarCoercer};

type RegisterFn = fn(&TypeRegistry) -> Result<(), RegistrationError>;

/// The conversion engine.
pub struct ConversionContext {
    types: Arc<TypeRegistry>,
    converters: ConverterRegistry,
    prober: CastProber,
    coercer: Box<dyn Coerce>,
    options: ContextOptions,
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionContext {
    /// Create a context with primitives registered and default options.
    pub fn new() -> Self {
        Self::with_options(ContextOptions::default())
    }

    /// Create a context with primitives registered.
    pub fn with_options(options: ContextOptions) -> Self {
        Self::assemble(
            Arc::new(TypeRegistry::with_primitives()),
            Box::new(ScalarCoercer),
            options,
        )
    }

    /// Start building a customized context.
    pub fn builder() -> ConversionContextBuilder {
        ConversionContextBuilder::new()
    }

    fn assemble(types: Arc<TypeRegistry>, coercer: Box<dyn Coerce>, options: ContextOptions) -> Self {
        let prober = CastProber::new(Arc::clone(&types));
        prober.cache().set_enabled(options.cache_enabled);
        Self {
            converters: ConverterRegistry::with_types(Arc::clone(&types)),
            types,
            prober,
            coercer,
            options,
        }
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    /// Type metadata.
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// Registered converters.
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Native cast prober and its capability cache.
    pub fn prober(&self) -> &CastProber {
        &self.prober
    }

    /// The representation coercer used by the third strategy.
    pub fn coercer(&self) -> &dyn Coerce {
        &*self.coercer
    }

    /// Options the context was built with.
    pub fn options(&self) -> ContextOptions {
        self.options
    }

    /// Turn the capability cache on or off. Turning it off clears it.
    pub fn set_cache_enabled(&self, enabled: bool) {
        self.prober.cache().set_enabled(enabled);
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register metadata for `T` (and `Option<T>`).
    pub fn register_type<T: Typed>(&self) -> Result<(), ConversionError> {
        self.types.register::<T>()?;
        Ok(())
    }

    /// Bind a converter factory to `(S, T)`.
    pub fn register_converter<S, T, C, F>(&self, factory: F) -> Result<(), ConversionError>
    where
        S: Typed,
        T: Typed,
        C: Converter<S, T> + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.types.ensure::<S>()?;
        self.types.ensure::<T>()?;
        self.converters.register::<S, T, C, F>(factory)
    }

    /// Bind a closure to `(S, T)`.
    pub fn register_fn<S, T, F>(&self, f: F) -> Result<(), ConversionError>
    where
        S: Typed,
        T: Typed,
        F: Fn(S) -> T + Clone + Send + Sync + 'static,
    {
        self.types.ensure::<S>()?;
        self.types.ensure::<T>()?;
        self.converters.register_fn::<S, T, F>(f)
    }

    /// Bind a converter type descriptor to a runtime pair.
    pub fn register_converter_type(
        &self,
        source: TypeHash,
        target: TypeHash,
        converter_type: ConverterType,
    ) -> Result<(), ConversionError> {
        self.converters
            .register_converter_type(TypePair::new(source, target), converter_type)
    }

    /// A fresh converter instance for the pair, if one is bound.
    pub fn get_converter(&self, source: TypeHash, target: TypeHash) -> Option<Box<dyn DynConverter>> {
        self.converters.get_converter(TypePair::new(source, target))
    }

    /// Remove every converter binding.
    pub fn reset_converters(&self) {
        self.converters.reset();
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    /// Convert one value through the pipeline.
    ///
    /// `Ok(None)` is only produced in suppress mode, when neither the request
    /// nor the target type supplies a default value.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(&self, request: ConversionRequest) -> Result<Option<Dynamic>, ConversionError> {
        let mode = request.mode.unwrap_or(self.options.failure_mode);
        let pair = request.pair();

        let value = match request.value {
            Some(value) if !value.is_null() => value,
            _ => {
                return match mode {
                    FailureMode::Suppress => Ok(self.fallback(request.default, pair.target)),
                    FailureMode::Raise => Err(ConversionError::argument_null("value")),
                };
            }
        };
        if pair.source.is_empty() {
            return Err(ConversionError::argument_null("source"));
        }
        if pair.target.is_empty() {
            return Err(ConversionError::argument_null("target"));
        }

        if let Some(converted) = self.run_strategies(pair, &value) {
            return Ok(Some(converted));
        }

        debug!(%pair, ?mode, "no strategy converted the value");
        match mode {
            FailureMode::Raise => Err(self.not_supported(pair, &value)),
            FailureMode::Suppress => Ok(self.fallback(request.default, pair.target)),
        }
    }

    /// Convert a value, failing when no strategy applies.
    pub fn convert<S: Typed, T: Typed>(&self, value: S) -> Result<T, ConversionError> {
        let request = self
            .typed_request::<S, T>(value)?
            .with_mode(FailureMode::Raise);
        let pair = request.pair();
        match self.resolve(request)?.map(Dynamic::downcast::<T>) {
            Some(Ok(value)) => Ok(value),
            Some(Err(other)) => Err(self.not_supported(pair, &other)),
            // raise mode reports an absent value before producing nothing
            None => Err(ConversionError::argument_null("value")),
        }
    }

    /// Convert a value, falling back to `T`'s default value.
    ///
    /// `Ok(None)` is the null default: nothing converted the value and `T`
    /// has no default of its own. An unconvertible value never fails; only
    /// type registration can.
    pub fn try_convert<S: Typed, T: Typed>(&self, value: S) -> Result<Option<T>, ConversionError> {
        let request = self
            .typed_request::<S, T>(value)?
            .with_mode(FailureMode::Suppress);
        let pair = request.pair();
        match self.resolve(request)?.map(Dynamic::downcast::<T>) {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(other)) => {
                debug!(%pair, value = %other.to_text(), "converted to the wrong type, using default");
                Ok(self
                    .types
                    .default_value(pair.target)
                    .and_then(|default| default.downcast::<T>().ok()))
            }
            None => Ok(None),
        }
    }

    /// Convert a value, falling back to `default`. Never fails.
    pub fn try_convert_or<S: Typed, T: Typed>(&self, value: S, default: T) -> T {
        let request = match self.typed_request::<S, T>(value) {
            Ok(request) => request
                .with_mode(FailureMode::Suppress)
                .with_default(Dynamic::new(default.clone())),
            Err(e) => {
                debug!(error = %e, "type registration failed, using default");
                return default;
            }
        };
        match self.resolve(request) {
            Ok(Some(converted)) => converted.downcast::<T>().unwrap_or(default),
            _ => default,
        }
    }

    /// Convert a value between runtime types, failing when no strategy
    /// applies.
    pub fn convert_dynamic(
        &self,
        source: TypeHash,
        target: TypeHash,
        value: Dynamic,
    ) -> Result<Dynamic, ConversionError> {
        let request = ConversionRequest::new(source, target)
            .with_value(value)
            .with_mode(FailureMode::Raise);
        let pair = request.pair();
        let value_text = request.value.as_ref().map(Dynamic::to_text).unwrap_or_default();
        self.resolve(request)?.ok_or_else(|| ConversionError::NotSupported {
            source_type: self.types.name_of(pair.source),
            target_type: self.types.name_of(pair.target),
            value: value_text,
        })
    }

    /// Convert a value between runtime types in suppress mode.
    ///
    /// `Ok(None)` means neither `default` nor the target type supplied a
    /// fallback.
    pub fn try_convert_dynamic(
        &self,
        source: TypeHash,
        target: TypeHash,
        value: Option<Dynamic>,
        default: Option<Dynamic>,
    ) -> Result<Option<Dynamic>, ConversionError> {
        let request = ConversionRequest {
            source,
            target,
            value,
            default,
            mode: Some(FailureMode::Suppress),
        };
        self.resolve(request)
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn typed_request<S: Typed, T: Typed>(
        &self,
        value: S,
    ) -> Result<ConversionRequest, ConversionError> {
        self.types.ensure::<S>()?;
        self.types.ensure::<T>()?;
        Ok(ConversionRequest::new(S::type_hash(), T::type_hash()).with_value(Dynamic::new(value)))
    }

    fn fallback(&self, default: Option<Dynamic>, target: TypeHash) -> Option<Dynamic> {
        default.or_else(|| self.types.default_value(target))
    }

    fn not_supported(&self, pair: TypePair, value: &Dynamic) -> ConversionError {
        ConversionError::NotSupported {
            source_type: self.types.name_of(pair.source),
            target_type: self.types.name_of(pair.target),
            value: value.to_text(),
        }
    }
}

impl std::fmt::Debug for ConversionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionContext")
            .field("types", &self.types)
            .field("converters", &self.converters)
            .field("prober", &self.prober)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for a [`ConversionContext`].
///
/// ```
/// use typeshift::{ConversionContext, FailureMode};
///
/// let ctx = ConversionContext::builder()
///     .failure_mode(FailureMode::Suppress)
///     .cache_enabled(false)
///     .build()
///     .unwrap();
/// assert!(!ctx.prober().cache().is_enabled());
/// ```
pub struct ConversionContextBuilder {
    options: ContextOptions,
    coercer: Option<Box<dyn Coerce>>,
    registrations: Vec<RegisterFn>,
}

impl Default for ConversionContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionContextBuilder {
    /// Start from default options.
    pub fn new() -> Self {
        Self {
            options: ContextOptions::default(),
            coercer: None,
            registrations: Vec::new(),
        }
    }

    /// Replace every option at once.
    pub fn options(mut self, options: ContextOptions) -> Self {
        self.options = options;
        self
    }

    /// Use the capability cache or not.
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.options.cache_enabled = enabled;
        self
    }

    /// Default failure mode for requests that do not choose one.
    pub fn failure_mode(mut self, mode: FailureMode) -> Self {
        self.options.failure_mode = mode;
        self
    }

    /// Install a representation coercer in place of [`ScalarCoercer`].
    pub fn coercer<C: Coerce + 'static>(mut self, coercer: C) -> Self {
        self.coercer = Some(Box::new(coercer));
        self
    }

    /// Register metadata for `T` when the context is built.
    pub fn register_type<T: Typed>(mut self) -> Self {
        self.registrations.push(register_into::<T>);
        self
    }

    /// Build the context.
    pub fn build(self) -> Result<ConversionContext, ConversionError> {
        let types = TypeRegistry::with_primitives();
        for register in &self.registrations {
            register(&types)?;
        }
        let coercer = self.coercer.unwrap_or_else(|| Box::new(ScalarCoercer));
        Ok(ConversionContext::assemble(Arc::new(types), coercer, self.options))
    }
}

fn register_into<T: Typed>(types: &TypeRegistry) -> Result<(), RegistrationError> {
    types.register::<T>().map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoerceError, primitives};

    #[test]
    fn context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConversionContext>();
    }

    #[test]
    fn absent_value_raises_or_returns_default() {
        let ctx = ConversionContext::new();
        let request = ConversionRequest::new(primitives::INT32, primitives::INT64);

        let err = ctx.resolve(request.clone()).unwrap_err();
        assert_eq!(err, ConversionError::argument_null("value"));

        let suppressed = ctx
            .resolve(request.clone().with_mode(FailureMode::Suppress))
            .unwrap()
            .unwrap();
        assert_eq!(suppressed.downcast::<i64>().ok(), Some(0));

        let with_default = ctx
            .resolve(
                request
                    .with_mode(FailureMode::Suppress)
                    .with_default(Dynamic::new(-1i64)),
            )
            .unwrap()
            .unwrap();
        assert_eq!(with_default.downcast::<i64>().ok(), Some(-1));
    }

    #[test]
    fn empty_hashes_are_argument_errors_in_every_mode() {
        let ctx = ConversionContext::new();
        for mode in [FailureMode::Raise, FailureMode::Suppress] {
            let no_source = ConversionRequest::new(TypeHash::EMPTY, primitives::INT32)
                .with_value(Dynamic::new(1i32))
                .with_mode(mode);
            assert_eq!(
                ctx.resolve(no_source).unwrap_err(),
                ConversionError::argument_null("source")
            );

            let no_target = ConversionRequest::new(primitives::INT32, TypeHash::EMPTY)
                .with_value(Dynamic::new(1i32))
                .with_mode(mode);
            assert_eq!(
                ctx.resolve(no_target).unwrap_err(),
                ConversionError::argument_null("target")
            );
        }
    }

    #[test]
    fn options_reach_the_prober() {
        let ctx = ConversionContext::with_options(ContextOptions::default().with_cache_enabled(false));
        assert!(!ctx.prober().cache().is_enabled());
        ctx.convert::<i32, i64>(1).unwrap();
        assert!(ctx.prober().cache().is_empty());

        ctx.set_cache_enabled(true);
        ctx.convert::<i32, i64>(1).unwrap();
        assert_eq!(ctx.prober().cache().len(), 1);
    }

    #[test]
    fn configured_failure_mode_applies_to_requests_without_one() {
        let ctx = ConversionContext::builder()
            .failure_mode(FailureMode::Suppress)
            .build()
            .unwrap();
        let request = ConversionRequest::new(primitives::STRING, primitives::INT32)
            .with_value(Dynamic::new("twelve".to_string()));
        let value = ctx.resolve(request).unwrap().unwrap();
        assert_eq!(value.downcast::<i32>().ok(), Some(0));
    }

    struct Refuse;

    impl Coerce for Refuse {
        fn coerce(&self, value: &Dynamic, target: TypeHash) -> Result<Dynamic, CoerceError> {
            Err(CoerceError::Unsupported {
                from: value.type_name().into_owned(),
                to: target,
            })
        }
    }

    #[test]
    fn custom_coercer_is_used() {
        let ctx = ConversionContext::builder().coercer(Refuse).build().unwrap();
        // bool has no native cast, so only coercion could convert it
        assert!(ctx.convert::<bool, i32>(true).unwrap_err().is_not_supported());

        let default = ConversionContext::new();
        assert_eq!(default.convert::<bool, i32>(true).unwrap(), 1);
    }

    #[test]
    fn not_supported_names_both_types_and_the_value() {
        let ctx = ConversionContext::new();
        let err = ctx.convert::<String, i32>("abc".to_string()).unwrap_err();
        assert_eq!(
            err,
            ConversionError::NotSupported {
                source_type: "String".to_string(),
                target_type: "i32".to_string(),
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn dynamic_entry_points() {
        let ctx = ConversionContext::new();
        let out = ctx
            .convert_dynamic(primitives::UINT8, primitives::DOUBLE, Dynamic::new(3u8))
            .unwrap();
        assert_eq!(out.downcast::<f64>().ok(), Some(3.0));

        let missing = ctx
            .try_convert_dynamic(primitives::INT32, TypeHash::from_name("Unknown"), None, None)
            .unwrap();
        assert!(missing.is_none());

        let fallback = ctx
            .try_convert_dynamic(
                primitives::STRING,
                primitives::UINT8,
                Some(Dynamic::new("999".to_string())),
                Some(Dynamic::new(7u8)),
            )
            .unwrap()
            .unwrap();
        assert_eq!(fallback.downcast::<u8>().ok(), Some(7));
    }

    #[test]
    fn builder_registers_types() {
        #[derive(Debug, Clone, PartialEq)]
        struct Meters(f64);

        impl Typed for Meters {
            fn type_hash() -> TypeHash {
                TypeHash::from_name("Meters")
            }

            fn type_name() -> std::borrow::Cow<'static, str> {
                "Meters".into()
            }

            fn describe(builder: &mut crate::TypeBuilder<Self>) {
                builder.implicit_to(|m: &Meters| m.0);
            }

            fn to_text(&self) -> String {
                format!("{}m", self.0)
            }
        }

        let ctx = ConversionContext::builder()
            .register_type::<Meters>()
            .build()
            .unwrap();
        assert!(ctx.types().contains(Meters::type_hash()));
        assert!(ctx.types().contains(<Option<Meters>>::type_hash()));
        assert_eq!(ctx.convert::<Meters, f64>(Meters(2.5)).unwrap(), 2.5);
        assert_eq!(ctx.convert::<Meters, String>(Meters(2.5)).unwrap(), "2.5m");
    }
}
