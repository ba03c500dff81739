//! Typeshift Cast
//!
//! Decides whether a value of one type can be converted to another using
//! native conversion rules, and performs the conversion.
//!
//! ## Conversion Priority
//!
//! A pair is classified by checking, in order:
//! 1. Identity (same type)
//! 2. Nullable wrap (`T -> Option<T>`, implicit) and unwrap (`Option<T> -> T`, explicit)
//! 3. Implicit paths: lossless primitive widening, implicit user-defined operators
//! 4. Nullable lifting over an implicit inner path
//! 5. Explicit paths: checked primitive casts, enum/integer casts, explicit operators
//! 6. Nullable lifting over an explicit inner path
//!
//! The first match wins, so a pair never classifies as both implicit and
//! explicit. Classifications are cached per pair in a [`CapabilityCache`].
//!
//! ## Modules
//!
//! - [`plan`]: Executable cast plans and the [`Capability`] classification
//! - [`cache`]: Per-pair capability memoization
//! - [`prober`]: [`CastProber`], which classifies pairs and runs casts
//! - [`primitive`], [`enums`], [`user_defined`], [`nullable`]: path finders

pub mod cache;
pub mod enums;
pub mod nullable;
pub mod plan;
pub mod primitive;
pub mod prober;
pub mod user_defined;

pub use cache::CapabilityCache;
pub use plan::{Capability, CastPlan};
pub use prober::CastProber;
