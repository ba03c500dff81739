//! Nullable wrapper metadata.

use std::fmt;
use std::sync::Arc;

use crate::{CastFailure, Dynamic, TypeHash};

/// Wraps an inner value, or unwraps a nullable one.
pub type NullableFn = Arc<dyn Fn(&Dynamic) -> Result<Dynamic, CastFailure> + Send + Sync>;
/// Produces the empty nullable.
pub type NullFn = Arc<dyn Fn() -> Dynamic + Send + Sync>;

/// How to move between `Option<T>` and `T` without knowing `T`.
#[derive(Clone)]
pub struct NullableInfo {
    /// Hash of the wrapped type.
    pub inner: TypeHash,
    wrap: NullableFn,
    unwrap: NullableFn,
    null: NullFn,
}

impl NullableInfo {
    /// Create nullable metadata.
    pub fn new(inner: TypeHash, wrap: NullableFn, unwrap: NullableFn, null: NullFn) -> Self {
        Self {
            inner,
            wrap,
            unwrap,
            null,
        }
    }

    /// `T` -> `Some(T)`.
    pub fn wrap(&self, value: &Dynamic) -> Result<Dynamic, CastFailure> {
        (self.wrap)(value)
    }

    /// `Some(T)` -> `T`; an empty wrapper fails with [`CastFailure::NullValue`].
    pub fn unwrap(&self, value: &Dynamic) -> Result<Dynamic, CastFailure> {
        (self.unwrap)(value)
    }

    /// The empty wrapper, `None`.
    pub fn null(&self) -> Dynamic {
        (self.null)()
    }

    /// Shared handles, for building cast plans.
    pub fn functions(&self) -> (NullableFn, NullableFn, NullFn) {
        (
            Arc::clone(&self.wrap),
            Arc::clone(&self.unwrap),
            Arc::clone(&self.null),
        )
    }
}

impl fmt::Debug for NullableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullableInfo")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
