//! Outcome of a single native cast attempt.

use std::fmt;

use crate::{CastFailure, Dynamic};

/// Which branch of the native cast machinery produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CastFlag {
    /// No branch applied.
    #[default]
    Undefined,
    /// An implicit (lossless) conversion path.
    Implicit,
    /// An explicit conversion path that may fail or lose information.
    Explicit,
}

impl fmt::Display for CastFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CastFlag::Undefined => "undefined",
            CastFlag::Implicit => "implicit",
            CastFlag::Explicit => "explicit",
        };
        f.write_str(s)
    }
}

/// Result of executing a native cast for one value.
///
/// Transient: produced and consumed inside a single resolution call.
#[derive(Debug, Clone)]
pub struct CastResult {
    /// The converted value, on success.
    pub value: Option<Dynamic>,
    /// Branch that produced this result.
    pub flag: CastFlag,
    /// Why the cast failed, if it did.
    pub error: Option<CastFailure>,
}

impl CastResult {
    /// A successful cast.
    pub fn success(value: Dynamic, flag: CastFlag) -> Self {
        Self {
            value: Some(value),
            flag,
            error: None,
        }
    }

    /// A path existed but failed for this value.
    pub fn failure(flag: CastFlag, error: CastFailure) -> Self {
        Self {
            value: None,
            flag,
            error: Some(error),
        }
    }

    /// No conversion path exists.
    pub fn no_conversion() -> Self {
        Self {
            value: None,
            flag: CastFlag::Undefined,
            error: Some(CastFailure::NoConversion),
        }
    }

    /// Check if the cast produced a value.
    #[inline]
    pub fn is_successful(&self) -> bool {
        self.value.is_some()
    }

    /// Take the converted value.
    pub fn into_value(self) -> Option<Dynamic> {
        self.value
    }
}
