//! Primitive type conversions.
//!
//! An implicit path exists exactly where Rust has a lossless `From`
//! conversion between the two primitives. Every other numeric pair, and
//! `char` to or from an integer, is an explicit checked cast.
//! `bool` has no native cast to or from anything.

use typeshift_core::{PrimitiveKind, TypeHash};

use crate::CastPlan;

/// Find a lossless primitive conversion.
pub fn find_implicit(from: TypeHash, to: TypeHash) -> Option<CastPlan> {
    let (from, to) = kinds(from, to)?;
    is_lossless(from, to).then_some(CastPlan::Primitive { from, to })
}

/// Find a checked primitive conversion.
pub fn find_explicit(from: TypeHash, to: TypeHash) -> Option<CastPlan> {
    let (from, to) = kinds(from, to)?;
    let allowed = (from.is_numeric() && to.is_numeric())
        || (from == PrimitiveKind::Char && to.is_integer())
        || (from.is_integer() && to == PrimitiveKind::Char);
    allowed.then_some(CastPlan::Primitive { from, to })
}

fn kinds(from: TypeHash, to: TypeHash) -> Option<(PrimitiveKind, PrimitiveKind)> {
    if from == to {
        return None;
    }
    Some((PrimitiveKind::from_hash(from)?, PrimitiveKind::from_hash(to)?))
}

/// Check for a lossless conversion, mirroring the std `From` impls.
pub fn is_lossless(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    use PrimitiveKind::*;

    match (from, to) {
        (Char, Uint32 | Uint64) => true,
        (Uint8, Char) => true,
        (Float, Double) => true,
        _ if from.is_integer() && to.is_integer() => is_integer_widening(from, to),
        _ if from.is_integer() && to.is_float() => {
            // every value fits the mantissa
            let mantissa = if to == Float { 24 } else { 53 };
            from.bits() < mantissa
        }
        _ => false,
    }
}

fn is_integer_widening(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    match (from.is_signed(), to.is_signed()) {
        (false, false) | (true, true) => to.bits() > from.bits(),
        // unsigned fits a strictly wider signed
        (false, true) => to.bits() > from.bits(),
        (true, false) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeshift_core::primitives;

    #[test]
    fn widening_is_implicit() {
        assert!(find_implicit(primitives::INT32, primitives::INT64).is_some());
        assert!(find_implicit(primitives::UINT8, primitives::INT16).is_some());
        assert!(find_implicit(primitives::UINT32, primitives::UINT64).is_some());
        assert!(find_implicit(primitives::FLOAT, primitives::DOUBLE).is_some());
        assert!(find_implicit(primitives::INT32, primitives::DOUBLE).is_some());
        assert!(find_implicit(primitives::INT16, primitives::FLOAT).is_some());
        assert!(find_implicit(primitives::UINT8, primitives::CHAR).is_some());
        assert!(find_implicit(primitives::CHAR, primitives::UINT32).is_some());
    }

    #[test]
    fn lossy_pairs_are_not_implicit() {
        assert!(find_implicit(primitives::INT64, primitives::INT32).is_none());
        assert!(find_implicit(primitives::INT8, primitives::UINT64).is_none());
        assert!(find_implicit(primitives::UINT32, primitives::INT32).is_none());
        assert!(find_implicit(primitives::INT32, primitives::FLOAT).is_none());
        assert!(find_implicit(primitives::INT64, primitives::DOUBLE).is_none());
        assert!(find_implicit(primitives::DOUBLE, primitives::FLOAT).is_none());
        assert!(find_implicit(primitives::CHAR, primitives::UINT16).is_none());
    }

    #[test]
    fn narrowing_is_explicit() {
        assert!(find_explicit(primitives::INT64, primitives::INT32).is_some());
        assert!(find_explicit(primitives::DOUBLE, primitives::UINT8).is_some());
        assert!(find_explicit(primitives::UINT32, primitives::CHAR).is_some());
        assert!(find_explicit(primitives::CHAR, primitives::INT8).is_some());
    }

    #[test]
    fn bool_and_text_have_no_native_cast() {
        assert!(find_implicit(primitives::BOOL, primitives::INT32).is_none());
        assert!(find_explicit(primitives::BOOL, primitives::INT32).is_none());
        assert!(find_explicit(primitives::INT32, primitives::BOOL).is_none());
        assert!(find_explicit(primitives::CHAR, primitives::DOUBLE).is_none());
        assert!(find_explicit(primitives::STRING, primitives::INT32).is_none());
    }

    #[test]
    fn same_kind_is_left_to_identity() {
        assert!(find_implicit(primitives::INT32, primitives::INT32).is_none());
        assert!(find_explicit(primitives::INT32, primitives::INT32).is_none());
    }

    #[test]
    fn lossless_table_matches_std_from() {
        // spot checks against `From` impls that exist in std
        let _: i64 = i64::from(0u32);
        let _: f64 = f64::from(0u32);
        let _: f32 = f32::from(0i16);
        let _: u64 = u64::from('a');
        assert!(is_lossless(PrimitiveKind::Uint32, PrimitiveKind::Int64));
        assert!(is_lossless(PrimitiveKind::Uint32, PrimitiveKind::Double));
        assert!(is_lossless(PrimitiveKind::Int16, PrimitiveKind::Float));
        assert!(is_lossless(PrimitiveKind::Char, PrimitiveKind::Uint64));
        // no `From<u64> for i64`, no `From<i32> for f32`
        assert!(!is_lossless(PrimitiveKind::Uint64, PrimitiveKind::Int64));
        assert!(!is_lossless(PrimitiveKind::Int32, PrimitiveKind::Float));
    }
}
