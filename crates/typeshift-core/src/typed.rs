//! The [`Typed`] trait: static identity for values that can be converted.

use std::borrow::Cow;

use crate::{TypeBuilder, TypeFlags, TypeHash, primitives};

/// A Rust type known to the conversion engine.
///
/// `type_hash` and `type_name` give the type its runtime identity; `describe`
/// fills in the metadata the resolution pipeline consults (flags, default
/// value, parse hook, enum table, conversion operators).
///
/// Use `#[derive(Typed)]` for enums and plain structs; implement it by hand
/// when the type declares conversion operators.
pub trait Typed: Clone + Send + Sync + 'static {
    /// Deterministic identity of the type.
    fn type_hash() -> TypeHash;

    /// Human-readable type name.
    fn type_name() -> Cow<'static, str>;

    /// Record metadata for the type. The default records nothing, which
    /// makes the type a plain object.
    fn describe(builder: &mut TypeBuilder<Self>) {
        let _ = builder;
    }

    /// Textual representation of the value.
    fn to_text(&self) -> String;

    /// Check for an empty nullable value.
    fn is_null(&self) -> bool {
        false
    }
}

macro_rules! impl_typed_primitive {
    ($($ty:ty => $hash:expr, $flags:expr;)*) => {
        $(
            impl Typed for $ty {
                #[inline]
                fn type_hash() -> TypeHash {
                    $hash
                }

                fn type_name() -> Cow<'static, str> {
                    Cow::Borrowed(stringify!($ty))
                }

                fn describe(builder: &mut TypeBuilder<Self>) {
                    builder.flags($flags).default_value().parse_from_str();
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_typed_primitive! {
    bool => primitives::BOOL, TypeFlags::BOOL;
    char => primitives::CHAR, TypeFlags::CHAR;
    i8 => primitives::INT8, TypeFlags::INTEGER.union(TypeFlags::SIGNED);
    i16 => primitives::INT16, TypeFlags::INTEGER.union(TypeFlags::SIGNED);
    i32 => primitives::INT32, TypeFlags::INTEGER.union(TypeFlags::SIGNED);
    i64 => primitives::INT64, TypeFlags::INTEGER.union(TypeFlags::SIGNED);
    u8 => primitives::UINT8, TypeFlags::INTEGER;
    u16 => primitives::UINT16, TypeFlags::INTEGER;
    u32 => primitives::UINT32, TypeFlags::INTEGER;
    u64 => primitives::UINT64, TypeFlags::INTEGER;
    f32 => primitives::FLOAT, TypeFlags::FLOAT;
    f64 => primitives::DOUBLE, TypeFlags::FLOAT;
}

impl Typed for String {
    #[inline]
    fn type_hash() -> TypeHash {
        primitives::STRING
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("String")
    }

    fn describe(builder: &mut TypeBuilder<Self>) {
        builder
            .flags(TypeFlags::TEXT)
            .default_value()
            .parse_with(|text: &str| Ok::<_, std::convert::Infallible>(text.to_string()));
    }

    fn to_text(&self) -> String {
        self.clone()
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_hash() -> TypeHash {
        TypeHash::from_template_instance(primitives::NULLABLE, &[T::type_hash()])
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Option<{}>", T::type_name()))
    }

    fn describe(builder: &mut TypeBuilder<Self>) {
        builder.nullable().default_with(|| None);
    }

    fn to_text(&self) -> String {
        self.as_ref().map(T::to_text).unwrap_or_default()
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }
}

#[cfg(feature = "uuid")]
impl Typed for uuid::Uuid {
    fn type_hash() -> TypeHash {
        TypeHash::from_name("Uuid")
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("Uuid")
    }

    fn describe(builder: &mut TypeBuilder<Self>) {
        builder
            .flags(TypeFlags::OBJECT)
            .default_with(uuid::Uuid::nil)
            .parse_with(|text: &str| uuid::Uuid::parse_str(text.trim()));
    }

    fn to_text(&self) -> String {
        self.hyphenated().to_string()
    }
}
