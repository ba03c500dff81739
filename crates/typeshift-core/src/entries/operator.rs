//! User-defined conversion operators.

use std::fmt;
use std::sync::Arc;

use crate::{CastFailure, CastFlag, Dynamic, TypeHash};

/// Type-erased conversion function of an operator.
pub type OperatorFn = Arc<dyn Fn(&Dynamic) -> Result<Dynamic, CastFailure> + Send + Sync>;

/// A conversion a type declares for itself.
///
/// Operators are stored on the type that declares them: conversions *to*
/// another type live on the source entry, converting constructors *from*
/// another type live on the target entry. The prober consults both.
#[derive(Clone)]
pub struct ConversionOperator {
    /// Type the operator accepts.
    pub source: TypeHash,
    /// Type the operator produces.
    pub target: TypeHash,
    /// Implicit or explicit.
    pub flag: CastFlag,
    convert: OperatorFn,
}

impl ConversionOperator {
    /// Create an operator.
    pub fn new(source: TypeHash, target: TypeHash, flag: CastFlag, convert: OperatorFn) -> Self {
        Self {
            source,
            target,
            flag,
            convert,
        }
    }

    /// Check if this operator converts `source` into `target` with the given flag.
    #[inline]
    pub fn matches(&self, source: TypeHash, target: TypeHash, flag: CastFlag) -> bool {
        self.source == source && self.target == target && self.flag == flag
    }

    /// Run the operator.
    pub fn apply(&self, value: &Dynamic) -> Result<Dynamic, CastFailure> {
        (self.convert)(value)
    }

    /// Shared handle to the conversion function.
    pub fn function(&self) -> OperatorFn {
        Arc::clone(&self.convert)
    }
}

impl fmt::Debug for ConversionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionOperator")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("flag", &self.flag)
            .finish_non_exhaustive()
    }
}
