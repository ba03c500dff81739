//! Enumeration metadata.
//!
//! Enumerations are integer-backed named constants. The entry keeps the
//! ordered `(name, discriminant)` table plus the two functions that move
//! between a discriminant and a live value of the enum type.

use std::fmt;
use std::sync::Arc;

use crate::Dynamic;

/// Builds an enum value from a discriminant, if one is defined.
pub type FromDiscriminantFn = Arc<dyn Fn(i64) -> Option<Dynamic> + Send + Sync>;
/// Reads the discriminant of an enum value.
pub type ToDiscriminantFn = Arc<dyn Fn(&Dynamic) -> Option<i64> + Send + Sync>;

/// A named enum constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Integer discriminant.
    pub value: i64,
}

/// Metadata for an enumeration type.
#[derive(Clone)]
pub struct EnumInfo {
    /// Variants in declaration order.
    pub variants: Vec<EnumVariant>,
    from_discriminant: FromDiscriminantFn,
    to_discriminant: ToDiscriminantFn,
}

impl EnumInfo {
    /// Create enum metadata.
    pub fn new(
        variants: Vec<EnumVariant>,
        from_discriminant: FromDiscriminantFn,
        to_discriminant: ToDiscriminantFn,
    ) -> Self {
        Self {
            variants,
            from_discriminant,
            to_discriminant,
        }
    }

    /// Look up a name by discriminant.
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.name.as_str())
    }

    /// Look up a discriminant by name, ignoring ASCII case.
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .map(|v| v.value)
    }

    /// Check if a discriminant names a variant.
    pub fn is_defined(&self, value: i64) -> bool {
        self.variants.iter().any(|v| v.value == value)
    }

    /// Build the enum value for a discriminant.
    pub fn from_discriminant(&self, value: i64) -> Option<Dynamic> {
        (self.from_discriminant)(value)
    }

    /// Read the discriminant of an enum value.
    pub fn discriminant(&self, value: &Dynamic) -> Option<i64> {
        (self.to_discriminant)(value)
    }

    /// Textual representation of an enum value: the variant name, or the
    /// discriminant's decimal text when no variant matches.
    pub fn text_of(&self, value: &Dynamic) -> Option<String> {
        let discriminant = self.discriminant(value)?;
        Some(
            self.name_of(discriminant)
                .map(str::to_string)
                .unwrap_or_else(|| discriminant.to_string()),
        )
    }

    /// Parse text into an enum value.
    ///
    /// Accepts a variant name (ASCII case-insensitive, surrounding whitespace
    /// ignored) or the decimal discriminant of a defined variant.
    pub fn parse(&self, text: &str) -> Option<Dynamic> {
        let text = text.trim();
        let value = match self.value_of(text) {
            Some(value) => value,
            None => text.parse::<i64>().ok().filter(|v| self.is_defined(*v))?,
        };
        self.from_discriminant(value)
    }
}

impl fmt::Debug for EnumInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumInfo")
            .field("variants", &self.variants)
            .finish_non_exhaustive()
    }
}
