//! Classification flags recorded for every registered type.

use bitflags::bitflags;

bitflags! {
    /// What kind of type an entry describes.
    ///
    /// The resolution pipeline only ever asks a handful of questions about a
    /// type ("is it an enumeration?", "is it textual?", "is it a nullable
    /// wrapper?"). The answers are precomputed into these flags at
    /// registration time.
    ///
    /// ```
    /// use typeshift_core::TypeFlags;
    ///
    /// let int32 = TypeFlags::INTEGER | TypeFlags::SIGNED;
    /// assert!(int32.intersects(TypeFlags::NUMERIC));
    /// assert!(!int32.contains(TypeFlags::FLOAT));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u32 {
        /// `bool`.
        const BOOL = 1 << 0;
        /// `char`.
        const CHAR = 1 << 1;
        /// Any integer type.
        const INTEGER = 1 << 2;
        /// Signed integer (combined with `INTEGER`).
        const SIGNED = 1 << 3;
        /// `f32` or `f64`.
        const FLOAT = 1 << 4;
        /// Textual type (`String`).
        const TEXT = 1 << 5;
        /// Enumeration with named discriminants.
        const ENUM = 1 << 6;
        /// Nullable wrapper around another type.
        const NULLABLE = 1 << 7;
        /// Any other user type.
        const OBJECT = 1 << 8;

        /// Integer or floating point.
        const NUMERIC = Self::INTEGER.bits() | Self::FLOAT.bits();
        /// Types the scalar coercion primitive understands.
        const SCALAR = Self::BOOL.bits()
            | Self::CHAR.bits()
            | Self::INTEGER.bits()
            | Self::FLOAT.bits()
            | Self::TEXT.bits();
    }
}

impl TypeFlags {
    /// Check for an integer or float type.
    #[inline]
    pub fn is_numeric(self) -> bool {
        self.intersects(Self::NUMERIC)
    }

    /// Check for the textual type.
    #[inline]
    pub fn is_text(self) -> bool {
        self.contains(Self::TEXT)
    }

    /// Check for a nullable wrapper.
    #[inline]
    pub fn is_nullable(self) -> bool {
        self.contains(Self::NULLABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_covers_integers_and_floats() {
        assert!(TypeFlags::INTEGER.is_numeric());
        assert!(TypeFlags::FLOAT.is_numeric());
        assert!(!TypeFlags::BOOL.is_numeric());
        assert!(!TypeFlags::TEXT.is_numeric());
    }

    #[test]
    fn scalar_excludes_user_types() {
        assert!(TypeFlags::SCALAR.contains(TypeFlags::TEXT));
        assert!(!TypeFlags::SCALAR.intersects(TypeFlags::ENUM | TypeFlags::OBJECT | TypeFlags::NULLABLE));
    }
}
