//! Type metadata entries.

mod enum_info;
mod nullable;
mod operator;
mod type_entry;

pub use enum_info::{EnumInfo, EnumVariant, FromDiscriminantFn, ToDiscriminantFn};
pub use nullable::{NullFn, NullableFn, NullableInfo};
pub use operator::{ConversionOperator, OperatorFn};
pub use type_entry::{ParseFn, TypeEntry, ValueFn};
