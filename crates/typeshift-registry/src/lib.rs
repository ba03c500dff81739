//! Typeshift Registry
//!
//! The two shared lookup structures of the conversion engine:
//!
//! - [`TypeRegistry`]: metadata for every type the engine has seen
//!   (flags, default values, parse hooks, enum tables, nullable wrappers,
//!   conversion operators)
//! - [`ConverterRegistry`]: user-supplied converters keyed by
//!   `(source, target)`, consulted before any built-in strategy
//!
//! Both are safe to share between threads; mutation is guarded by a
//! `parking_lot::RwLock` per structure.

pub mod converter_registry;
pub mod type_registry;

pub use converter_registry::{
    Converter, ConverterFactory, ConverterRegistry, ConverterType, ConverterTypeBuilder,
    DynConverter, FnConverter, ResolvedConverter,
};
pub use type_registry::TypeRegistry;
