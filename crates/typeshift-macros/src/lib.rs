//! Typeshift Proc Macros
//!
//! # Macros
//!
//! - `#[derive(Typed)]` - Implement the `Typed` trait for a struct or a
//!   unit-only enum
//!
//! # Example
//!
//! ```ignore
//! use typeshift::Typed;
//!
//! #[derive(Clone, Copy, Typed)]
//! #[typed(name = "Color")]
//! pub enum Color {
//!     Red = 1,
//!     Green = 2,
//! }
//! ```

use proc_macro::TokenStream;

mod attrs;
mod derive_typed;

/// Derive the `Typed` trait for a type.
///
/// Enums must have unit variants only. Each variant becomes a named
/// constant whose discriminant is the variant's `as i64` value, and the
/// variant with discriminant `0`, if any, becomes the default. The
/// textual representation of a value is its variant name. Enums with a
/// `u64`, `u128`, `i128` or `usize` repr are rejected, since their
/// discriminants may not fit in an `i64`.
///
/// Structs are plain objects; their textual representation comes from
/// `Display`, so they must implement it.
///
/// # Attributes
///
/// - `#[typed(name = "...")]` - Override the type name (default: Rust name)
/// - `#[typed(parse)]` - Use the type's `FromStr` impl as its parse hook
/// - `#[typed(default)]` - Use the type's `Default` impl as its default value
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Typed)]
/// #[typed(parse, default)]
/// pub struct Version(u32, u32);
/// ```
#[proc_macro_derive(Typed, attributes(typed))]
pub fn derive_typed(input: TokenStream) -> TokenStream {
    derive_typed::derive_typed_impl(input)
}
