//! Executable cast plans.
//!
//! A [`CastPlan`] is the reusable artifact produced when a pair is probed: it
//! performs the conversion for any value of the source type without probing
//! again. The plan says nothing about whether a *particular* value converts;
//! executing it can still fail (overflow, undefined enum value, an operator
//! rejecting its input).

use typeshift_core::{
    CastFailure, CastFlag, CastResult, ConversionOperator, Dynamic, EnumInfo, NullableInfo,
    PrimitiveKind, Scalar,
};

/// How to perform a native cast.
#[derive(Debug, Clone)]
pub enum CastPlan {
    /// Same type; the value is cloned.
    Identity,

    /// Primitive to primitive.
    Primitive {
        /// Source kind.
        from: PrimitiveKind,
        /// Target kind.
        to: PrimitiveKind,
    },

    /// Enum to an integer primitive, via the discriminant.
    EnumToInt {
        /// Source enum metadata.
        info: EnumInfo,
        /// Target kind.
        to: PrimitiveKind,
    },

    /// Integer primitive to enum. Fails for undefined discriminants.
    IntToEnum {
        /// Target enum metadata.
        info: EnumInfo,
        /// Target enum name, for diagnostics.
        name: String,
    },

    /// User-defined conversion operator.
    Operator(ConversionOperator),

    /// `T -> Option<T>`.
    Wrap(NullableInfo),

    /// `Option<T> -> T`. Fails for `None`.
    Unwrap(NullableInfo),

    /// `Option<A> -> Option<B>` through an `A -> B` plan; `None` maps to `None`.
    Lifted {
        /// Source wrapper.
        source: NullableInfo,
        /// Plan for the wrapped values.
        inner: Box<CastPlan>,
        /// Target wrapper.
        target: NullableInfo,
    },

    /// Steps run in order, each consuming the previous output.
    Chain(Vec<CastPlan>),
}

impl CastPlan {
    /// Run the plan on a value.
    pub fn execute(&self, value: &Dynamic) -> Result<Dynamic, CastFailure> {
        match self {
            CastPlan::Identity => Ok(value.clone()),
            CastPlan::Primitive { from, to } => {
                let scalar = Scalar::read(value).ok_or_else(|| mismatch(from.name(), value))?;
                scalar.write(*to)
            }
            CastPlan::EnumToInt { info, to } => {
                let discriminant = info
                    .discriminant(value)
                    .ok_or_else(|| mismatch("enum", value))?;
                Scalar::Int(i128::from(discriminant)).write(*to)
            }
            CastPlan::IntToEnum { info, name } => {
                let Some(Scalar::Int(raw)) = Scalar::read(value) else {
                    return Err(mismatch("integer", value));
                };
                let undefined = |value: i64| CastFailure::UndefinedEnumValue {
                    value,
                    target: name.clone(),
                };
                let discriminant = i64::try_from(raw).map_err(|_| CastFailure::Overflow {
                    value: raw.to_string(),
                    target: "i64",
                })?;
                if !info.is_defined(discriminant) {
                    return Err(undefined(discriminant));
                }
                info.from_discriminant(discriminant)
                    .ok_or_else(|| undefined(discriminant))
            }
            CastPlan::Operator(op) => op.apply(value),
            CastPlan::Wrap(nullable) => nullable.wrap(value),
            CastPlan::Unwrap(nullable) => nullable.unwrap(value),
            CastPlan::Lifted {
                source,
                inner,
                target,
            } => {
                if value.is_null() {
                    return Ok(target.null());
                }
                let unwrapped = source.unwrap(value)?;
                let converted = inner.execute(&unwrapped)?;
                target.wrap(&converted)
            }
            CastPlan::Chain(steps) => {
                let mut current = value.clone();
                for step in steps {
                    current = step.execute(&current)?;
                }
                Ok(current)
            }
        }
    }
}

fn mismatch(expected: &str, value: &Dynamic) -> CastFailure {
    CastFailure::TypeMismatch {
        expected: expected.to_string(),
        actual: value.type_name().into_owned(),
    }
}

/// Classification of a pair: whether a native path exists, and how.
///
/// Cached per pair. Records path existence only, never the outcome for a
/// particular value.
#[derive(Debug, Clone)]
pub enum Capability {
    /// No native conversion path.
    NoConversion,
    /// A lossless path that needs no intent from the caller.
    Implicit(CastPlan),
    /// A path that may lose information or fail.
    Explicit(CastPlan),
}

impl Capability {
    /// Check if any path exists.
    pub fn exists(&self) -> bool {
        !matches!(self, Capability::NoConversion)
    }

    /// The cast flag matching this classification.
    pub fn flag(&self) -> CastFlag {
        match self {
            Capability::NoConversion => CastFlag::Undefined,
            Capability::Implicit(_) => CastFlag::Implicit,
            Capability::Explicit(_) => CastFlag::Explicit,
        }
    }

    /// The plan, if a path exists.
    pub fn plan(&self) -> Option<&CastPlan> {
        match self {
            Capability::NoConversion => None,
            Capability::Implicit(plan) | Capability::Explicit(plan) => Some(plan),
        }
    }

    /// Run the plan on a value and report the outcome.
    pub fn cast(&self, value: &Dynamic) -> CastResult {
        let Some(plan) = self.plan() else {
            return CastResult::no_conversion();
        };
        match plan.execute(value) {
            Ok(converted) => CastResult::success(converted, self.flag()),
            Err(failure) => CastResult::failure(self.flag(), failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeshift_core::{TypeEntry, Typed};

    fn nullable_of<T: Typed>() -> NullableInfo {
        TypeEntry::of::<Option<T>>().nullable.unwrap()
    }

    #[test]
    fn identity_clones() {
        let out = CastPlan::Identity.execute(&Dynamic::new(3u8)).unwrap();
        assert_eq!(out.downcast::<u8>().ok(), Some(3));
    }

    #[test]
    fn primitive_checked() {
        let plan = CastPlan::Primitive {
            from: PrimitiveKind::Int32,
            to: PrimitiveKind::Uint8,
        };
        let ok = plan.execute(&Dynamic::new(200i32)).unwrap();
        assert_eq!(ok.downcast::<u8>().ok(), Some(200));
        assert!(matches!(
            plan.execute(&Dynamic::new(i32::MAX)),
            Err(CastFailure::Overflow { target: "u8", .. })
        ));
    }

    #[test]
    fn lifted_maps_none_to_none() {
        let plan = CastPlan::Lifted {
            source: nullable_of::<i32>(),
            inner: Box::new(CastPlan::Primitive {
                from: PrimitiveKind::Int32,
                to: PrimitiveKind::Int64,
            }),
            target: nullable_of::<i64>(),
        };
        let none = plan.execute(&Dynamic::new(None::<i32>)).unwrap();
        assert_eq!(none.downcast::<Option<i64>>().ok(), Some(None));
        let some = plan.execute(&Dynamic::new(Some(4i32))).unwrap();
        assert_eq!(some.downcast::<Option<i64>>().ok(), Some(Some(4)));
    }

    #[test]
    fn chain_stops_at_first_failure() {
        let plan = CastPlan::Chain(vec![
            CastPlan::Unwrap(nullable_of::<i64>()),
            CastPlan::Primitive {
                from: PrimitiveKind::Int64,
                to: PrimitiveKind::Int8,
            },
        ]);
        let ok = plan.execute(&Dynamic::new(Some(-5i64))).unwrap();
        assert_eq!(ok.downcast::<i8>().ok(), Some(-5));
        assert_eq!(
            plan.execute(&Dynamic::new(None::<i64>)).unwrap_err(),
            CastFailure::NullValue
        );
    }

    #[test]
    fn capability_cast_reports_flag() {
        let cap = Capability::Explicit(CastPlan::Primitive {
            from: PrimitiveKind::Double,
            to: PrimitiveKind::Int32,
        });
        let result = cap.cast(&Dynamic::new(2.9f64));
        assert!(result.is_successful());
        assert_eq!(result.flag, CastFlag::Explicit);
        assert_eq!(result.into_value().unwrap().downcast::<i32>().ok(), Some(2));

        let failed = cap.cast(&Dynamic::new(f64::NAN));
        assert!(!failed.is_successful());
        assert_eq!(failed.flag, CastFlag::Explicit);
        assert!(matches!(failed.error, Some(CastFailure::NotFinite { .. })));

        let none = Capability::NoConversion.cast(&Dynamic::new(1i32));
        assert_eq!(none.flag, CastFlag::Undefined);
        assert_eq!(none.error, Some(CastFailure::NoConversion));
    }
}
