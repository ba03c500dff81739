//! User-defined conversions.
//!
//! This module handles conversions declared by the types themselves:
//! - `implicit_to` / `explicit_to` - operators declared on the source type
//! - `implicit_from` / `explicit_from` - converting constructors declared on
//!   the target type

use typeshift_core::{CastFlag, TypeHash};
use typeshift_registry::TypeRegistry;

use crate::CastPlan;

/// Find an implicit user-defined conversion.
pub fn find_implicit(source: TypeHash, target: TypeHash, types: &TypeRegistry) -> Option<CastPlan> {
    types
        .find_operator(source, target, CastFlag::Implicit)
        .map(CastPlan::Operator)
}

/// Find an explicit user-defined conversion.
pub fn find_explicit(source: TypeHash, target: TypeHash, types: &TypeRegistry) -> Option<CastPlan> {
    types
        .find_operator(source, target, CastFlag::Explicit)
        .map(CastPlan::Operator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use typeshift_core::{CastFailure, Dynamic, TypeBuilder, Typed, primitives};

    #[derive(Debug, Clone, PartialEq)]
    struct Percent(u8);

    impl Typed for Percent {
        fn type_hash() -> TypeHash {
            TypeHash::from_name("Percent")
        }

        fn type_name() -> Cow<'static, str> {
            Cow::Borrowed("Percent")
        }

        fn describe(builder: &mut TypeBuilder<Self>) {
            builder
                .implicit_to(|p: &Percent| f64::from(p.0) / 100.0)
                .explicit_from(|v: &i32| {
                    u8::try_from(*v)
                        .ok()
                        .filter(|v| *v <= 100)
                        .map(Percent)
                        .ok_or("percent out of range")
                });
        }

        fn to_text(&self) -> String {
            format!("{}%", self.0)
        }
    }

    #[test]
    fn operator_on_source() {
        let types = TypeRegistry::with_primitives();
        types.register::<Percent>().unwrap();

        let plan = find_implicit(Percent::type_hash(), primitives::DOUBLE, &types).unwrap();
        let out = plan.execute(&Dynamic::new(Percent(25))).unwrap();
        assert_eq!(out.downcast::<f64>().ok(), Some(0.25));
        assert!(find_explicit(Percent::type_hash(), primitives::DOUBLE, &types).is_none());
    }

    #[test]
    fn constructor_on_target() {
        let types = TypeRegistry::with_primitives();
        types.register::<Percent>().unwrap();

        assert!(find_implicit(primitives::INT32, Percent::type_hash(), &types).is_none());
        let plan = find_explicit(primitives::INT32, Percent::type_hash(), &types).unwrap();
        let out = plan.execute(&Dynamic::new(40i32)).unwrap();
        assert_eq!(out.downcast::<Percent>().ok(), Some(Percent(40)));
        assert_eq!(
            plan.execute(&Dynamic::new(140i32)).unwrap_err(),
            CastFailure::Operator("percent out of range".into())
        );
    }
}
