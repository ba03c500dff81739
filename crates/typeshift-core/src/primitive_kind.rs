//! Primitive type kinds and a checked scalar value representation.
//!
//! [`Scalar`] is the common currency for native numeric casts and for the
//! scalar coercion fallback: a primitive value is read out of a [`Dynamic`],
//! widened into a `Scalar`, and written back as the target primitive with a
//! range check. Nothing here wraps or saturates.

use std::fmt;

use crate::{CastFailure, Dynamic, TypeHash, primitives};

/// Built-in primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Every primitive kind.
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint8,
        PrimitiveKind::Uint16,
        PrimitiveKind::Uint32,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Get the TypeHash for this primitive type.
    pub const fn type_hash(self) -> TypeHash {
        match self {
            PrimitiveKind::Bool => primitives::BOOL,
            PrimitiveKind::Char => primitives::CHAR,
            PrimitiveKind::Int8 => primitives::INT8,
            PrimitiveKind::Int16 => primitives::INT16,
            PrimitiveKind::Int32 => primitives::INT32,
            PrimitiveKind::Int64 => primitives::INT64,
            PrimitiveKind::Uint8 => primitives::UINT8,
            PrimitiveKind::Uint16 => primitives::UINT16,
            PrimitiveKind::Uint32 => primitives::UINT32,
            PrimitiveKind::Uint64 => primitives::UINT64,
            PrimitiveKind::Float => primitives::FLOAT,
            PrimitiveKind::Double => primitives::DOUBLE,
        }
    }

    /// Find the primitive kind for a hash.
    pub fn from_hash(hash: TypeHash) -> Option<Self> {
        let kind = match hash {
            primitives::BOOL => PrimitiveKind::Bool,
            primitives::CHAR => PrimitiveKind::Char,
            primitives::INT8 => PrimitiveKind::Int8,
            primitives::INT16 => PrimitiveKind::Int16,
            primitives::INT32 => PrimitiveKind::Int32,
            primitives::INT64 => PrimitiveKind::Int64,
            primitives::UINT8 => PrimitiveKind::Uint8,
            primitives::UINT16 => PrimitiveKind::Uint16,
            primitives::UINT32 => PrimitiveKind::Uint32,
            primitives::UINT64 => PrimitiveKind::Uint64,
            primitives::FLOAT => PrimitiveKind::Float,
            primitives::DOUBLE => PrimitiveKind::Double,
            _ => return None,
        };
        Some(kind)
    }

    /// Rust name of the primitive type.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int8 => "i8",
            PrimitiveKind::Int16 => "i16",
            PrimitiveKind::Int32 => "i32",
            PrimitiveKind::Int64 => "i64",
            PrimitiveKind::Uint8 => "u8",
            PrimitiveKind::Uint16 => "u16",
            PrimitiveKind::Uint32 => "u32",
            PrimitiveKind::Uint64 => "u64",
            PrimitiveKind::Float => "f32",
            PrimitiveKind::Double => "f64",
        }
    }

    /// Width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            PrimitiveKind::Bool => 1,
            PrimitiveKind::Int8 | PrimitiveKind::Uint8 => 8,
            PrimitiveKind::Int16 | PrimitiveKind::Uint16 => 16,
            PrimitiveKind::Char
            | PrimitiveKind::Int32
            | PrimitiveKind::Uint32
            | PrimitiveKind::Float => 32,
            PrimitiveKind::Int64 | PrimitiveKind::Uint64 | PrimitiveKind::Double => 64,
        }
    }

    /// Check for an integer kind.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Uint8
                | PrimitiveKind::Uint16
                | PrimitiveKind::Uint32
                | PrimitiveKind::Uint64
        )
    }

    /// Check for a signed integer kind.
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8 | PrimitiveKind::Int16 | PrimitiveKind::Int32 | PrimitiveKind::Int64
        )
    }

    /// Check for a floating point kind.
    pub const fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    /// Check for an integer or floating point kind.
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive value widened to a common representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Char(char),
    /// Any integer; `i128` holds every `i64` and `u64` exactly.
    Int(i128),
    Float(f64),
}

// i128 bounds as f64, used to reject floats before truncating casts
const I128_BOUND: f64 = 1.7e38;

macro_rules! write_int {
    ($value:expr, $ty:ty) => {
        <$ty>::try_from($value)
            .map(Dynamic::new)
            .map_err(|_| CastFailure::Overflow {
                value: $value.to_string(),
                target: stringify!($ty),
            })
    };
}

impl Scalar {
    /// Read a primitive value out of a dynamic.
    ///
    /// Returns `None` when the value is not a primitive.
    pub fn read(value: &Dynamic) -> Option<Scalar> {
        let kind = PrimitiveKind::from_hash(value.type_hash())?;
        let scalar = match kind {
            PrimitiveKind::Bool => Scalar::Bool(*value.downcast_ref::<bool>()?),
            PrimitiveKind::Char => Scalar::Char(*value.downcast_ref::<char>()?),
            PrimitiveKind::Int8 => Scalar::Int(i128::from(*value.downcast_ref::<i8>()?)),
            PrimitiveKind::Int16 => Scalar::Int(i128::from(*value.downcast_ref::<i16>()?)),
            PrimitiveKind::Int32 => Scalar::Int(i128::from(*value.downcast_ref::<i32>()?)),
            PrimitiveKind::Int64 => Scalar::Int(i128::from(*value.downcast_ref::<i64>()?)),
            PrimitiveKind::Uint8 => Scalar::Int(i128::from(*value.downcast_ref::<u8>()?)),
            PrimitiveKind::Uint16 => Scalar::Int(i128::from(*value.downcast_ref::<u16>()?)),
            PrimitiveKind::Uint32 => Scalar::Int(i128::from(*value.downcast_ref::<u32>()?)),
            PrimitiveKind::Uint64 => Scalar::Int(i128::from(*value.downcast_ref::<u64>()?)),
            PrimitiveKind::Float => Scalar::Float(f64::from(*value.downcast_ref::<f32>()?)),
            PrimitiveKind::Double => Scalar::Float(*value.downcast_ref::<f64>()?),
        };
        Some(scalar)
    }

    /// Name of the variant, for diagnostics.
    pub const fn kind_name(self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Char(_) => "char",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
        }
    }

    /// Write this scalar as the target primitive.
    ///
    /// Floats are truncated toward zero when written as integers. Any value
    /// outside the target's range fails; nothing wraps or saturates.
    pub fn write(self, target: PrimitiveKind) -> Result<Dynamic, CastFailure> {
        match self {
            Scalar::Int(i) => write_integer(i, target),
            Scalar::Float(f) => write_float(f, target),
            Scalar::Char(c) => match target {
                PrimitiveKind::Char => Ok(Dynamic::new(c)),
                PrimitiveKind::Bool | PrimitiveKind::Float | PrimitiveKind::Double => {
                    Err(self.mismatch(target))
                }
                _ => write_integer(i128::from(u32::from(c)), target),
            },
            Scalar::Bool(b) => match target {
                PrimitiveKind::Bool => Ok(Dynamic::new(b)),
                PrimitiveKind::Char => Err(self.mismatch(target)),
                PrimitiveKind::Float => Ok(Dynamic::new(if b { 1.0f32 } else { 0.0f32 })),
                PrimitiveKind::Double => Ok(Dynamic::new(if b { 1.0f64 } else { 0.0f64 })),
                _ => write_integer(i128::from(b), target),
            },
        }
    }

    fn mismatch(self, target: PrimitiveKind) -> CastFailure {
        CastFailure::TypeMismatch {
            expected: target.name().to_string(),
            actual: self.kind_name().to_string(),
        }
    }
}

fn write_integer(i: i128, target: PrimitiveKind) -> Result<Dynamic, CastFailure> {
    match target {
        PrimitiveKind::Bool => Ok(Dynamic::new(i != 0)),
        PrimitiveKind::Char => u32::try_from(i)
            .ok()
            .and_then(char::from_u32)
            .map(Dynamic::new)
            .ok_or_else(|| CastFailure::Overflow {
                value: i.to_string(),
                target: "char",
            }),
        PrimitiveKind::Int8 => write_int!(i, i8),
        PrimitiveKind::Int16 => write_int!(i, i16),
        PrimitiveKind::Int32 => write_int!(i, i32),
        PrimitiveKind::Int64 => write_int!(i, i64),
        PrimitiveKind::Uint8 => write_int!(i, u8),
        PrimitiveKind::Uint16 => write_int!(i, u16),
        PrimitiveKind::Uint32 => write_int!(i, u32),
        PrimitiveKind::Uint64 => write_int!(i, u64),
        PrimitiveKind::Float => Ok(Dynamic::new(i as f32)),
        PrimitiveKind::Double => Ok(Dynamic::new(i as f64)),
    }
}

fn write_float(f: f64, target: PrimitiveKind) -> Result<Dynamic, CastFailure> {
    match target {
        PrimitiveKind::Double => Ok(Dynamic::new(f)),
        PrimitiveKind::Float => {
            if f.is_finite() && f.abs() > f64::from(f32::MAX) {
                Err(CastFailure::Overflow {
                    value: f.to_string(),
                    target: "f32",
                })
            } else {
                Ok(Dynamic::new(f as f32))
            }
        }
        PrimitiveKind::Bool => Ok(Dynamic::new(f != 0.0)),
        PrimitiveKind::Char => Err(Scalar::Float(f).mismatch(target)),
        _ => {
            if !f.is_finite() {
                return Err(CastFailure::NotFinite {
                    value: f,
                    target: target.name(),
                });
            }
            let truncated = f.trunc();
            if truncated.abs() > I128_BOUND {
                return Err(CastFailure::Overflow {
                    value: f.to_string(),
                    target: target.name(),
                });
            }
            write_integer(truncated as i128, target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_roundtrip_for_all_kinds() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_hash(kind.type_hash()), Some(kind));
            assert_eq!(TypeHash::from_name(kind.name()), kind.type_hash());
        }
        assert_eq!(PrimitiveKind::from_hash(primitives::STRING), None);
    }

    #[test]
    fn classification() {
        assert!(PrimitiveKind::Int8.is_signed());
        assert!(!PrimitiveKind::Uint8.is_signed());
        assert!(PrimitiveKind::Double.is_float());
        assert!(!PrimitiveKind::Char.is_numeric());
        assert!(!PrimitiveKind::Bool.is_numeric());
        assert_eq!(PrimitiveKind::Uint16.bits(), 16);
    }

    #[test]
    fn read_widens_to_scalar() {
        assert_eq!(Scalar::read(&Dynamic::new(u64::MAX)), Some(Scalar::Int(u64::MAX as i128)));
        assert_eq!(Scalar::read(&Dynamic::new(-3i8)), Some(Scalar::Int(-3)));
        assert_eq!(Scalar::read(&Dynamic::new(0.5f32)), Some(Scalar::Float(0.5)));
        assert_eq!(Scalar::read(&Dynamic::new('x')), Some(Scalar::Char('x')));
        assert_eq!(Scalar::read(&Dynamic::new(String::from("1"))), None);
    }

    #[test]
    fn integer_write_is_range_checked() {
        let ok = Scalar::Int(255).write(PrimitiveKind::Uint8).unwrap();
        assert_eq!(ok.downcast::<u8>().ok(), Some(255));

        let err = Scalar::Int(i128::from(i32::MAX))
            .write(PrimitiveKind::Uint8)
            .unwrap_err();
        assert!(matches!(err, CastFailure::Overflow { target: "u8", .. }));

        let err = Scalar::Int(-1).write(PrimitiveKind::Uint64).unwrap_err();
        assert!(matches!(err, CastFailure::Overflow { target: "u64", .. }));
    }

    #[test]
    fn float_to_integer_truncates_but_never_saturates() {
        let v = Scalar::Float(3.9).write(PrimitiveKind::Int32).unwrap();
        assert_eq!(v.downcast::<i32>().ok(), Some(3));

        let v = Scalar::Float(-3.9).write(PrimitiveKind::Int32).unwrap();
        assert_eq!(v.downcast::<i32>().ok(), Some(-3));

        assert!(matches!(
            Scalar::Float(1e10).write(PrimitiveKind::Int32),
            Err(CastFailure::Overflow { .. })
        ));
        assert!(matches!(
            Scalar::Float(f64::NAN).write(PrimitiveKind::Int64),
            Err(CastFailure::NotFinite { .. })
        ));
        assert!(matches!(
            Scalar::Float(1e300).write(PrimitiveKind::Uint64),
            Err(CastFailure::Overflow { .. })
        ));
    }

    #[test]
    fn double_to_float_overflow() {
        assert!(Scalar::Float(1e39).write(PrimitiveKind::Float).is_err());
        let inf = Scalar::Float(f64::INFINITY).write(PrimitiveKind::Float).unwrap();
        assert_eq!(inf.downcast::<f32>().ok(), Some(f32::INFINITY));
    }

    #[test]
    fn char_conversions() {
        let c = Scalar::Int(65).write(PrimitiveKind::Char).unwrap();
        assert_eq!(c.downcast::<char>().ok(), Some('A'));
        assert!(Scalar::Int(0xD800).write(PrimitiveKind::Char).is_err());
        let n = Scalar::Char('A').write(PrimitiveKind::Uint32).unwrap();
        assert_eq!(n.downcast::<u32>().ok(), Some(65));
        assert!(Scalar::Char('A').write(PrimitiveKind::Double).is_err());
    }

    #[test]
    fn bool_conversions() {
        let one = Scalar::Bool(true).write(PrimitiveKind::Int16).unwrap();
        assert_eq!(one.downcast::<i16>().ok(), Some(1));
        let t = Scalar::Int(7).write(PrimitiveKind::Bool).unwrap();
        assert_eq!(t.downcast::<bool>().ok(), Some(true));
        let f = Scalar::Float(0.0).write(PrimitiveKind::Bool).unwrap();
        assert_eq!(f.downcast::<bool>().ok(), Some(false));
    }
}
