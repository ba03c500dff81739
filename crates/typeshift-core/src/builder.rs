//! Builder used by [`Typed::describe`] to fill in a [`TypeEntry`].

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use crate::entries::{
    ConversionOperator, EnumInfo, EnumVariant, FromDiscriminantFn, NullFn, NullableFn,
    NullableInfo, OperatorFn, ToDiscriminantFn, TypeEntry,
};
use crate::{CastFailure, CastFlag, Dynamic, TypeFlags, Typed};

/// Collects metadata for the type `T`.
///
/// # Example
///
/// ```
/// use typeshift_core::{TypeBuilder, TypeEntry, TypeFlags, TypeHash, Typed};
/// use std::borrow::Cow;
///
/// #[derive(Clone)]
/// struct Meters(f64);
///
/// impl Typed for Meters {
///     fn type_hash() -> TypeHash {
///         TypeHash::from_name("Meters")
///     }
///
///     fn type_name() -> Cow<'static, str> {
///         Cow::Borrowed("Meters")
///     }
///
///     fn describe(builder: &mut TypeBuilder<Self>) {
///         builder
///             .flags(TypeFlags::OBJECT)
///             .implicit_to(|m: &Meters| m.0)
///             .implicit_from(|v: &f64| Meters(*v));
///     }
///
///     fn to_text(&self) -> String {
///         format!("{}m", self.0)
///     }
/// }
///
/// let entry = TypeEntry::of::<Meters>();
/// assert_eq!(entry.operators.len(), 2);
/// ```
pub struct TypeBuilder<T> {
    entry: TypeEntry,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Typed> Default for TypeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Typed> TypeBuilder<T> {
    /// Start describing `T`.
    pub fn new() -> Self {
        Self {
            entry: TypeEntry::new(T::type_name(), T::type_hash(), TypeFlags::empty()),
            _marker: PhantomData,
        }
    }

    /// Add classification flags.
    pub fn flags(&mut self, flags: TypeFlags) -> &mut Self {
        self.entry.flags.insert(flags);
        self
    }

    /// Use `T::default()` as the type's default value.
    pub fn default_value(&mut self) -> &mut Self
    where
        T: Default,
    {
        self.default_with(T::default)
    }

    /// Use a custom function for the type's default value.
    pub fn default_with<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.entry.default_value = Some(Arc::new(move || Dynamic::new(f())));
        self
    }

    /// Use `T`'s [`FromStr`] implementation as its parse hook.
    pub fn parse_from_str(&mut self) -> &mut Self
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.parse_with(|text: &str| text.parse::<T>())
    }

    /// Install a parse hook.
    pub fn parse_with<F, E>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.entry.parse = Some(Arc::new(move |text: &str| {
            f(text).map(Dynamic::new).map_err(|e| e.to_string())
        }));
        self
    }

    /// Describe `T` as an enumeration.
    ///
    /// When no default has been set and discriminant `0` is defined, that
    /// variant becomes the default.
    pub fn enumeration(
        &mut self,
        variants: &[(&str, i64)],
        from: fn(i64) -> Option<T>,
        to: fn(&T) -> i64,
    ) -> &mut Self {
        let variants = variants
            .iter()
            .map(|(name, value)| EnumVariant {
                name: (*name).to_string(),
                value: *value,
            })
            .collect();
        let from_discriminant: FromDiscriminantFn =
            Arc::new(move |value: i64| from(value).map(Dynamic::new));
        let to_discriminant: ToDiscriminantFn =
            Arc::new(move |value: &Dynamic| value.downcast_ref::<T>().map(to));

        if self.entry.default_value.is_none()
            && let Some(zero) = from(0)
        {
            self.entry.default_value = Some(Arc::new(move || Dynamic::new(zero.clone())));
        }

        self.entry.flags.insert(TypeFlags::ENUM);
        self.entry.enum_info = Some(EnumInfo::new(variants, from_discriminant, to_discriminant));
        self
    }

    /// Declare an implicit conversion from `T` to `U`.
    pub fn implicit_to<U, F>(&mut self, f: F) -> &mut Self
    where
        U: Typed,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.push_operator::<T, U, Infallible, _>(CastFlag::Implicit, move |v| Ok(f(v)))
    }

    /// Declare an explicit, fallible conversion from `T` to `U`.
    pub fn explicit_to<U, E, F>(&mut self, f: F) -> &mut Self
    where
        U: Typed,
        E: fmt::Display,
        F: Fn(&T) -> Result<U, E> + Send + Sync + 'static,
    {
        self.push_operator::<T, U, E, _>(CastFlag::Explicit, f)
    }

    /// Declare an implicit converting constructor from `U`.
    pub fn implicit_from<U, F>(&mut self, f: F) -> &mut Self
    where
        U: Typed,
        F: Fn(&U) -> T + Send + Sync + 'static,
    {
        self.push_operator::<U, T, Infallible, _>(CastFlag::Implicit, move |v| Ok(f(v)))
    }

    /// Declare an explicit, fallible converting constructor from `U`.
    pub fn explicit_from<U, E, F>(&mut self, f: F) -> &mut Self
    where
        U: Typed,
        E: fmt::Display,
        F: Fn(&U) -> Result<T, E> + Send + Sync + 'static,
    {
        self.push_operator::<U, T, E, _>(CastFlag::Explicit, f)
    }

    /// Finish the entry. Types that declared no flags are plain objects.
    pub fn build(mut self) -> TypeEntry {
        if self.entry.flags.is_empty() {
            self.entry.flags = TypeFlags::OBJECT;
        }
        self.entry
    }

    fn push_operator<A, B, E, F>(&mut self, flag: CastFlag, f: F) -> &mut Self
    where
        A: Typed,
        B: Typed,
        E: fmt::Display,
        F: Fn(&A) -> Result<B, E> + Send + Sync + 'static,
    {
        let convert: OperatorFn = Arc::new(move |value: &Dynamic| {
            let input = value
                .downcast_ref::<A>()
                .ok_or_else(|| mismatch::<A>(value))?;
            f(input)
                .map(Dynamic::new)
                .map_err(|e| CastFailure::Operator(e.to_string()))
        });
        self.entry.operators.push(ConversionOperator::new(
            A::type_hash(),
            B::type_hash(),
            flag,
            convert,
        ));

        // the other side of the operator must be known to the registry too
        if A::type_hash() == T::type_hash() {
            self.entry.companions.push(TypeEntry::of::<B>);
        } else {
            self.entry.companions.push(TypeEntry::of::<A>);
        }
        self
    }
}

impl<U: Typed> TypeBuilder<Option<U>> {
    /// Describe `Option<U>` as a nullable wrapper of `U`.
    pub fn nullable(&mut self) -> &mut Self {
        let wrap: NullableFn = Arc::new(|value: &Dynamic| {
            value
                .downcast_ref::<U>()
                .map(|v| Dynamic::new(Some(v.clone())))
                .ok_or_else(|| mismatch::<U>(value))
        });
        let unwrap: NullableFn = Arc::new(|value: &Dynamic| match value.downcast_ref::<Option<U>>() {
            Some(Some(v)) => Ok(Dynamic::new(v.clone())),
            Some(None) => Err(CastFailure::NullValue),
            None => Err(mismatch::<Option<U>>(value)),
        });
        let null: NullFn = Arc::new(|| Dynamic::new(None::<U>));

        self.entry.flags.insert(TypeFlags::NULLABLE);
        self.entry.nullable = Some(NullableInfo::new(U::type_hash(), wrap, unwrap, null));
        self.entry.companions.push(TypeEntry::of::<U>);
        self
    }
}

fn mismatch<E: Typed>(value: &Dynamic) -> CastFailure {
    CastFailure::TypeMismatch {
        expected: E::type_name().into_owned(),
        actual: value.type_name().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;

    #[test]
    fn primitive_entry() {
        let entry = TypeEntry::of::<i32>();
        assert_eq!(entry.name, "i32");
        assert_eq!(entry.type_hash, primitives::INT32);
        assert!(entry.flags.contains(TypeFlags::INTEGER | TypeFlags::SIGNED));
        assert_eq!(
            entry.default_value().and_then(|v| v.downcast::<i32>().ok()),
            Some(0)
        );
        let parsed = entry.parse("17").unwrap().unwrap();
        assert_eq!(parsed.downcast::<i32>().ok(), Some(17));
        assert!(entry.parse("x").unwrap().is_err());
    }

    #[test]
    fn nullable_entry_wraps_and_unwraps() {
        let entry = TypeEntry::of::<Option<i32>>();
        assert!(entry.is_nullable());
        assert_eq!(entry.companions.len(), 1);

        let info = entry.nullable.as_ref().unwrap();
        assert_eq!(info.inner, primitives::INT32);

        let wrapped = info.wrap(&Dynamic::new(5i32)).unwrap();
        assert_eq!(wrapped.type_hash(), <Option<i32>>::type_hash());
        assert_eq!(wrapped.downcast_ref::<Option<i32>>(), Some(&Some(5)));

        let unwrapped = info.unwrap(&Dynamic::new(Some(9i32))).unwrap();
        assert_eq!(unwrapped.downcast::<i32>().ok(), Some(9));

        assert_eq!(
            info.unwrap(&Dynamic::new(None::<i32>)).unwrap_err(),
            CastFailure::NullValue
        );
        assert!(info.null().is_null());
        assert!(entry.default_value().unwrap().is_null());
    }

    #[test]
    fn wrap_rejects_wrong_type() {
        let entry = TypeEntry::of::<Option<i32>>();
        let info = entry.nullable.unwrap();
        assert!(matches!(
            info.wrap(&Dynamic::new(1u8)),
            Err(CastFailure::TypeMismatch { .. })
        ));
    }

    #[test]
    fn object_flag_when_nothing_declared() {
        #[derive(Clone)]
        struct Opaque;

        impl Typed for Opaque {
            fn type_hash() -> crate::TypeHash {
                crate::TypeHash::from_name("Opaque")
            }

            fn type_name() -> std::borrow::Cow<'static, str> {
                "Opaque".into()
            }

            fn to_text(&self) -> String {
                "opaque".into()
            }
        }

        let entry = TypeEntry::of::<Opaque>();
        assert_eq!(entry.flags, TypeFlags::OBJECT);
        assert!(entry.default_value.is_none());
        assert!(entry.parse.is_none());
    }

    #[test]
    fn operators_record_both_sides() {
        #[derive(Clone)]
        struct Celsius(f64);

        impl Typed for Celsius {
            fn type_hash() -> crate::TypeHash {
                crate::TypeHash::from_name("Celsius")
            }

            fn type_name() -> std::borrow::Cow<'static, str> {
                "Celsius".into()
            }

            fn describe(builder: &mut TypeBuilder<Self>) {
                builder
                    .implicit_to(|c: &Celsius| c.0)
                    .explicit_from(|v: &i64| {
                        if *v < -273 {
                            Err("below absolute zero")
                        } else {
                            Ok(Celsius(*v as f64))
                        }
                    });
            }

            fn to_text(&self) -> String {
                format!("{}C", self.0)
            }
        }

        let entry = TypeEntry::of::<Celsius>();
        let celsius = Celsius::type_hash();

        let to_double = entry
            .find_operator(celsius, primitives::DOUBLE, CastFlag::Implicit)
            .unwrap();
        let out = to_double.apply(&Dynamic::new(Celsius(21.5))).unwrap();
        assert_eq!(out.downcast::<f64>().ok(), Some(21.5));

        let from_long = entry
            .find_operator(primitives::INT64, celsius, CastFlag::Explicit)
            .unwrap();
        assert!(from_long.apply(&Dynamic::new(10i64)).is_ok());
        assert_eq!(
            from_long.apply(&Dynamic::new(-300i64)).unwrap_err(),
            CastFailure::Operator("below absolute zero".into())
        );

        assert!(
            entry
                .find_operator(celsius, primitives::DOUBLE, CastFlag::Explicit)
                .is_none()
        );
        assert_eq!(entry.companions.len(), 2);
    }
}
