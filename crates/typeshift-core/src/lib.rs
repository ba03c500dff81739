//! Typeshift Core
//!
//! Shared building blocks for the typeshift conversion engine.
//!
//! ## Modules
//!
//! - [`type_hash`]: Deterministic type identity ([`TypeHash`], [`TypePair`])
//! - [`flags`]: Type classification ([`TypeFlags`])
//! - [`dynamic`]: Type-erased values ([`Dynamic`])
//! - [`typed`]: The [`Typed`] trait and its implementations for std types
//! - [`builder`]: [`TypeBuilder`], used by [`Typed::describe`]
//! - [`entries`]: Registry metadata ([`TypeEntry`], [`EnumInfo`], [`NullableInfo`])
//! - [`primitive_kind`]: Primitive classification and checked scalar writes
//! - [`cast_result`]: Outcome of a native cast
//! - [`error`]: Error types

pub mod builder;
pub mod cast_result;
pub mod dynamic;
pub mod entries;
pub mod error;
pub mod flags;
pub mod primitive_kind;
pub mod type_hash;
pub mod typed;

pub use builder::TypeBuilder;
pub use cast_result::{CastFlag, CastResult};
pub use dynamic::Dynamic;
pub use entries::{
    ConversionOperator, EnumInfo, EnumVariant, NullableInfo, OperatorFn, TypeEntry,
};
pub use error::{CastFailure, ConversionError, RegistrationError};
pub use flags::TypeFlags;
pub use primitive_kind::{PrimitiveKind, Scalar};
pub use type_hash::{TypeHash, TypePair, hash_constants, primitives};
pub use typed::Typed;
