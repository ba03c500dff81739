//! Typeshift
//!
//! Runtime conversion between types that are only known dynamically.
//!
//! A [`ConversionContext`] answers two questions for any `(source, target)`
//! pair: can a value be converted, and which strategy should do it. The
//! strategies are tried strictly in this order:
//!
//! 1. A converter registered for the exact pair ([`ConverterRegistry`])
//! 2. A native cast: widening, checked narrowing, enum discriminants,
//!    nullable wrap/unwrap and user-defined operators ([`CastProber`])
//! 3. Representation coercion ([`Coerce`], [`ScalarCoercer`])
//! 4. Enum names to and from text
//! 5. The target's parse hook, or the source's text
//!
//! Failures inside a strategy never escape. When every strategy declines,
//! [`FailureMode::Raise`] produces [`ConversionError::NotSupported`] and
//! [`FailureMode::Suppress`] produces a default value.
//!
//! # Example
//!
//! ```
//! use typeshift::{ConversionContext, Typed};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Typed)]
//! enum Level {
//!     Low = 1,
//!     High = 2,
//! }
//!
//! let ctx = ConversionContext::new();
//! assert_eq!(ctx.convert::<Level, String>(Level::High).unwrap(), "High");
//! assert_eq!(ctx.convert::<String, Level>("low".into()).unwrap(), Level::Low);
//! assert_eq!(ctx.convert::<Level, i64>(Level::High).unwrap(), 2);
//! ```

extern crate self as typeshift;

mod coerce;
mod context;
mod options;
mod request;
mod strategy;

pub use coerce::{Coerce, CoerceError, ScalarCoercer};
pub use context::{ConversionContext, ConversionContextBuilder};
pub use options::{ContextOptions, FailureMode};
pub use request::ConversionRequest;
pub use strategy::Strategy;

pub use typeshift_cast::{Capability, CapabilityCache, CastPlan, CastProber};
pub use typeshift_core::{
    CastFailure, CastFlag, CastResult, ConversionError, Dynamic, EnumInfo, EnumVariant,
    NullableInfo, PrimitiveKind, RegistrationError, TypeBuilder, TypeEntry, TypeFlags, TypeHash,
    TypePair, Typed, primitives,
};
pub use typeshift_macros::Typed;
pub use typeshift_registry::{
    Converter, ConverterFactory, ConverterRegistry, ConverterType, ConverterTypeBuilder,
    DynConverter, FnConverter, ResolvedConverter, TypeRegistry,
};

#[cfg(feature = "uuid")]
pub use uuid;
