//! A single conversion request.

use typeshift_core::{Dynamic, TypeHash, TypePair};

use crate::FailureMode;

/// Everything [`ConversionContext::resolve`](crate::ConversionContext::resolve)
/// needs to convert one value.
///
/// ```
/// use typeshift::{ConversionRequest, Dynamic, FailureMode, primitives};
///
/// let request = ConversionRequest::new(primitives::INT32, primitives::STRING)
///     .with_value(Dynamic::new(5i32))
///     .with_mode(FailureMode::Suppress);
/// assert!(request.value.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Declared source type.
    pub source: TypeHash,
    /// Target type.
    pub target: TypeHash,
    /// Value to convert. `None`, or an empty nullable, counts as absent.
    pub value: Option<Dynamic>,
    /// Returned instead of the target's default value on suppressed failure.
    pub default: Option<Dynamic>,
    /// Failure mode; `None` uses the context's configured mode.
    pub mode: Option<FailureMode>,
}

impl ConversionRequest {
    /// Create a request with no value.
    pub fn new(source: TypeHash, target: TypeHash) -> Self {
        Self {
            source,
            target,
            value: None,
            default: None,
            mode: None,
        }
    }

    /// Set the value.
    pub fn with_value(mut self, value: Dynamic) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the fallback value.
    pub fn with_default(mut self, default: Dynamic) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the failure mode.
    pub fn with_mode(mut self, mode: FailureMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// The `(source, target)` key.
    pub fn pair(&self) -> TypePair {
        TypePair::new(self.source, self.target)
    }
}
