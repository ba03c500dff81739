//! Type-erased values.
//!
//! [`Dynamic`] carries a value whose concrete type is only known at runtime,
//! together with its [`TypeHash`]. Every value moving through the resolution
//! pipeline is a `Dynamic`.
//!
//! Downcasting always goes through [`std::any::Any`], so a hash collision can
//! never hand out a value of the wrong Rust type.

use std::any::Any as StdAny;
use std::borrow::Cow;
use std::fmt;

use crate::{TypeHash, Typed};

type Erased = dyn StdAny + Send + Sync;

/// A boxed value plus the identity and behavior needed to handle it
/// without knowing its type.
pub struct Dynamic {
    type_hash: TypeHash,
    value: Box<Erased>,
    vtable: &'static DynVTable,
}

/// Per-type function table, monomorphized once per `T`.
struct DynVTable {
    type_name: fn() -> Cow<'static, str>,
    to_text: fn(&Erased) -> String,
    is_null: fn(&Erased) -> bool,
    clone: fn(&Erased) -> Box<Erased>,
}

fn text_of<T: Typed>(value: &Erased) -> String {
    value.downcast_ref::<T>().map(T::to_text).unwrap_or_default()
}

fn null_of<T: Typed>(value: &Erased) -> bool {
    value.downcast_ref::<T>().is_some_and(T::is_null)
}

fn clone_of<T: Typed>(value: &Erased) -> Box<Erased> {
    match value.downcast_ref::<T>() {
        Some(v) => Box::new(v.clone()),
        // unreachable: the vtable is always paired with a T
        None => Box::new(()),
    }
}

impl Dynamic {
    /// Wrap a value.
    pub fn new<T: Typed>(value: T) -> Self {
        Self {
            type_hash: T::type_hash(),
            value: Box::new(value),
            vtable: &DynVTable {
                type_name: T::type_name,
                to_text: text_of::<T>,
                is_null: null_of::<T>,
                clone: clone_of::<T>,
            },
        }
    }

    /// Runtime type identity of the wrapped value.
    #[inline]
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Runtime type name of the wrapped value.
    pub fn type_name(&self) -> Cow<'static, str> {
        (self.vtable.type_name)()
    }

    /// Check if the wrapped value is a `T`.
    #[inline]
    pub fn is<T: Typed>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the wrapped value as a `T`.
    #[inline]
    pub fn downcast_ref<T: Typed>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the wrapped value out as a `T`, or get `self` back.
    pub fn downcast<T: Typed>(self) -> Result<T, Self> {
        let Dynamic {
            type_hash,
            value,
            vtable,
        } = self;
        match value.downcast::<T>() {
            Ok(v) => Ok(*v),
            Err(value) => Err(Dynamic {
                type_hash,
                value,
                vtable,
            }),
        }
    }

    /// Textual representation of the wrapped value.
    pub fn to_text(&self) -> String {
        (self.vtable.to_text)(&*self.value)
    }

    /// Check if the wrapped value is an empty nullable.
    pub fn is_null(&self) -> bool {
        (self.vtable.is_null)(&*self.value)
    }
}

impl Clone for Dynamic {
    fn clone(&self) -> Self {
        Self {
            type_hash: self.type_hash,
            value: (self.vtable.clone)(&*self.value),
            vtable: self.vtable,
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dynamic")
            .field("type", &self.type_name())
            .field("value", &self.to_text())
            .finish()
    }
}
