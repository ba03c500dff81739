//! Representation coercion, the broad scalar fallback of the pipeline.
//!
//! Unlike native casts, coercion understands text and `bool`, and rounds
//! floats instead of truncating them:
//!
//! | From | To | Rule |
//! |---|---|---|
//! | number | number | float to integer rounds half to even; out of range fails |
//! | `bool` | number | `true` is 1 |
//! | number | `bool` | non-zero is `true` |
//! | integer | `char` | Unicode scalar value; invalid fails |
//! | any scalar | `String` | textual representation |
//! | `String` | scalar | trimmed `FromStr`; `char` needs exactly one character |

use thiserror::Error;

use typeshift_core::{CastFailure, Dynamic, PrimitiveKind, Scalar, TypeHash, primitives};

/// Why a coercion failed. Never leaves the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    /// The coercer does not handle this pair.
    #[error("cannot coerce a value of type '{from}' to '{to}'")]
    Unsupported {
        /// Source type name.
        from: String,
        /// Target type hash.
        to: TypeHash,
    },

    /// The value does not fit the target.
    #[error("value {value} is out of range for {target}")]
    OutOfRange {
        /// Textual form of the value.
        value: String,
        /// Target type name.
        target: &'static str,
    },

    /// The text is not a valid value of the target.
    #[error("cannot parse '{text}' as {target}: {reason}")]
    Parse {
        /// The rejected text.
        text: String,
        /// Target type name.
        target: &'static str,
        /// Parser message.
        reason: String,
    },
}

/// The host coercion primitive used by the pipeline's third strategy.
///
/// Install a custom implementation with
/// [`ConversionContextBuilder::coercer`](crate::ConversionContextBuilder::coercer).
pub trait Coerce: Send + Sync {
    /// Coerce a value to the target type.
    fn coerce(&self, value: &Dynamic, target: TypeHash) -> Result<Dynamic, CoerceError>;
}

/// Default [`Coerce`] implementation for primitives and `String`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarCoercer;

impl Coerce for ScalarCoercer {
    fn coerce(&self, value: &Dynamic, target: TypeHash) -> Result<Dynamic, CoerceError> {
        let unsupported = || CoerceError::Unsupported {
            from: value.type_name().into_owned(),
            to: target,
        };

        if let Some(text) = value.downcast_ref::<String>() {
            if target == primitives::STRING {
                return Ok(Dynamic::new(text.clone()));
            }
            let kind = PrimitiveKind::from_hash(target).ok_or_else(unsupported)?;
            return parse_scalar(text, kind);
        }

        let scalar = Scalar::read(value).ok_or_else(unsupported)?;
        if target == primitives::STRING {
            return Ok(Dynamic::new(value.to_text()));
        }
        let kind = PrimitiveKind::from_hash(target).ok_or_else(unsupported)?;
        coerce_scalar(scalar, kind).map_err(|failure| match failure {
            CastFailure::Overflow { value, target } => CoerceError::OutOfRange { value, target },
            CastFailure::NotFinite { value, target } => CoerceError::OutOfRange {
                value: value.to_string(),
                target,
            },
            _ => unsupported(),
        })
    }
}

fn coerce_scalar(scalar: Scalar, kind: PrimitiveKind) -> Result<Dynamic, CastFailure> {
    match scalar {
        Scalar::Float(f) if kind.is_integer() => Scalar::Float(f.round_ties_even()).write(kind),
        _ => scalar.write(kind),
    }
}

macro_rules! parse_as {
    ($text:expr, $ty:ty) => {
        $text
            .parse::<$ty>()
            .map(Dynamic::new)
            .map_err(|e| CoerceError::Parse {
                text: $text.to_string(),
                target: stringify!($ty),
                reason: e.to_string(),
            })
    };
}

fn parse_scalar(text: &str, kind: PrimitiveKind) -> Result<Dynamic, CoerceError> {
    let text = text.trim();
    match kind {
        PrimitiveKind::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Dynamic::new(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Dynamic::new(false))
            } else {
                Err(CoerceError::Parse {
                    text: text.to_string(),
                    target: "bool",
                    reason: "expected 'true' or 'false'".to_string(),
                })
            }
        }
        PrimitiveKind::Char => parse_as!(text, char),
        PrimitiveKind::Int8 => parse_as!(text, i8),
        PrimitiveKind::Int16 => parse_as!(text, i16),
        PrimitiveKind::Int32 => parse_as!(text, i32),
        PrimitiveKind::Int64 => parse_as!(text, i64),
        PrimitiveKind::Uint8 => parse_as!(text, u8),
        PrimitiveKind::Uint16 => parse_as!(text, u16),
        PrimitiveKind::Uint32 => parse_as!(text, u32),
        PrimitiveKind::Uint64 => parse_as!(text, u64),
        PrimitiveKind::Float => parse_as!(text, f32),
        PrimitiveKind::Double => parse_as!(text, f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce<T: typeshift_core::Typed>(value: Dynamic) -> Result<T, CoerceError> {
        ScalarCoercer
            .coerce(&value, T::type_hash())
            .map(|v| v.downcast::<T>().ok().unwrap())
    }

    #[test]
    fn float_to_int_rounds_half_to_even() {
        assert_eq!(coerce::<i32>(Dynamic::new(2.5f64)), Ok(2));
        assert_eq!(coerce::<i32>(Dynamic::new(3.5f64)), Ok(4));
        assert_eq!(coerce::<i32>(Dynamic::new(-2.5f64)), Ok(-2));
        assert_eq!(coerce::<u8>(Dynamic::new(254.6f32)), Ok(255));
    }

    #[test]
    fn out_of_range_fails() {
        assert!(matches!(
            coerce::<u8>(Dynamic::new(300i32)),
            Err(CoerceError::OutOfRange { target: "u8", .. })
        ));
        assert!(matches!(
            coerce::<i64>(Dynamic::new(f64::INFINITY)),
            Err(CoerceError::OutOfRange { .. })
        ));
    }

    #[test]
    fn bool_and_numbers() {
        assert_eq!(coerce::<i32>(Dynamic::new(true)), Ok(1));
        assert_eq!(coerce::<bool>(Dynamic::new(0.0f64)), Ok(false));
        assert_eq!(coerce::<bool>(Dynamic::new(-3i64)), Ok(true));
        assert_eq!(coerce::<f64>(Dynamic::new(false)), Ok(0.0));
    }

    #[test]
    fn scalars_to_text() {
        assert_eq!(coerce::<String>(Dynamic::new(42u16)), Ok("42".to_string()));
        assert_eq!(coerce::<String>(Dynamic::new(true)), Ok("true".to_string()));
        assert_eq!(coerce::<String>(Dynamic::new('x')), Ok("x".to_string()));
    }

    #[test]
    fn text_to_scalars() {
        assert_eq!(coerce::<i32>(Dynamic::new(" 12 ".to_string())), Ok(12));
        assert_eq!(coerce::<bool>(Dynamic::new("TRUE".to_string())), Ok(true));
        assert_eq!(coerce::<char>(Dynamic::new("z".to_string())), Ok('z'));
        assert_eq!(coerce::<f32>(Dynamic::new("1.5".to_string())), Ok(1.5));
        assert!(matches!(
            coerce::<char>(Dynamic::new("zz".to_string())),
            Err(CoerceError::Parse { target: "char", .. })
        ));
        assert!(matches!(
            coerce::<u8>(Dynamic::new("-1".to_string())),
            Err(CoerceError::Parse { .. })
        ));
    }

    #[test]
    fn non_scalars_are_unsupported() {
        let err = ScalarCoercer
            .coerce(&Dynamic::new(Some(1i32)), primitives::INT64)
            .unwrap_err();
        assert!(matches!(err, CoerceError::Unsupported { .. }));

        let err = ScalarCoercer
            .coerce(&Dynamic::new("x".to_string()), TypeHash::from_name("Uuid"))
            .unwrap_err();
        assert!(matches!(err, CoerceError::Unsupported { .. }));
    }

    #[test]
    fn char_from_integer() {
        assert_eq!(coerce::<char>(Dynamic::new(65u32)), Ok('A'));
        assert!(coerce::<char>(Dynamic::new(0xD800u32)).is_err());
        assert!(coerce::<char>(Dynamic::new(1.0f64)).is_err());
    }
}
