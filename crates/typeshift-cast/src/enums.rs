//! Enum conversions.
//!
//! Enums cast explicitly to any integer primitive through their discriminant,
//! and integers cast explicitly back. The reverse cast fails at execution
//! time for discriminants that name no variant.

use typeshift_core::{PrimitiveKind, TypeHash};
use typeshift_registry::TypeRegistry;

use crate::CastPlan;

/// Find an explicit enum/integer conversion.
pub fn find_explicit(source: TypeHash, target: TypeHash, types: &TypeRegistry) -> Option<CastPlan> {
    if let Some(info) = types.enum_info(source) {
        let to = PrimitiveKind::from_hash(target).filter(|k| k.is_integer())?;
        return Some(CastPlan::EnumToInt { info, to });
    }

    PrimitiveKind::from_hash(source).filter(|k| k.is_integer())?;
    let entry = types.get(target)?;
    let info = entry.enum_info.clone()?;
    Some(CastPlan::IntToEnum {
        info,
        name: entry.name.clone(),
    })
}
