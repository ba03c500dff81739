//! Error types for the conversion engine.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ConversionError    - the only errors that leave the engine
//! ├── ArgumentNull           - a required input was absent
//! ├── DuplicateRegistration  - a converter is already bound to the pair
//! ├── NotSupported           - every strategy declined, raise mode
//! └── Registration           - type metadata could not be registered
//!
//! CastFailure        - why a native cast failed for one particular value;
//!                      carried inside a CastResult, never raised
//! ```

use thiserror::Error;

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors raised across the engine's public boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// A required argument was absent.
    #[error("argument '{name}' must not be null")]
    ArgumentNull {
        /// Name of the missing argument.
        name: &'static str,
    },

    /// A converter is already registered for this exact pair.
    #[error("a converter from '{source_type}' to '{target_type}' is already registered")]
    DuplicateRegistration {
        /// Source type name.
        source_type: String,
        /// Target type name.
        target_type: String,
    },

    /// No strategy could convert the value.
    #[error("cannot convert value '{value}' from '{source_type}' to '{target_type}'")]
    NotSupported {
        /// Source type name.
        source_type: String,
        /// Target type name.
        target_type: String,
        /// Textual representation of the value that failed to convert.
        value: String,
    },

    /// Type metadata could not be registered.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl ConversionError {
    /// Shorthand for [`ConversionError::ArgumentNull`].
    pub fn argument_null(name: &'static str) -> Self {
        ConversionError::ArgumentNull { name }
    }

    /// Check if this is an argument error.
    pub fn is_argument_null(&self) -> bool {
        matches!(self, ConversionError::ArgumentNull { .. })
    }

    /// Check if this is a total-failure error.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, ConversionError::NotSupported { .. })
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur while registering type metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Two different type names hash to the same identity.
    #[error("type '{incoming}' collides with already registered type '{existing}'")]
    HashCollision {
        /// Name already registered under the hash.
        existing: String,
        /// Name being registered.
        incoming: String,
    },
}

// ============================================================================
// Cast Failures
// ============================================================================

/// Why a native cast failed for a specific value.
///
/// A cast failure says nothing about whether the pair is convertible in
/// general: the same pair may succeed for another value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastFailure {
    /// No native conversion path exists for the pair.
    #[error("no native conversion exists")]
    NoConversion,

    /// The value does not fit the target's range.
    #[error("value {value} is out of range for {target}")]
    Overflow {
        /// Textual form of the offending value.
        value: String,
        /// Target type name.
        target: &'static str,
    },

    /// NaN or infinity cannot become an integer.
    #[error("non-finite value {value} cannot be converted to {target}")]
    NotFinite {
        /// The offending value.
        value: f64,
        /// Target type name.
        target: &'static str,
    },

    /// The discriminant names no variant of the target enumeration.
    #[error("{value} is not a defined value of enum '{target}'")]
    UndefinedEnumValue {
        /// The discriminant.
        value: i64,
        /// Enum type name.
        target: String,
    },

    /// An empty nullable wrapper was unwrapped.
    #[error("nullable value has no value")]
    NullValue,

    /// The value's runtime type is not the declared source type.
    #[error("expected a value of type '{expected}', found '{actual}'")]
    TypeMismatch {
        /// Declared type name.
        expected: String,
        /// Runtime type name.
        actual: String,
    },

    /// A user-defined conversion operator rejected the value.
    #[error("conversion operator failed: {0}")]
    Operator(String),
}
