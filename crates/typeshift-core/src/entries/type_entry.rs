//! Registry entry describing one type.

use std::fmt;
use std::sync::Arc;

use crate::{CastFlag, Dynamic, TypeBuilder, TypeFlags, TypeHash, Typed};

use super::{ConversionOperator, EnumInfo, NullableInfo};

/// Produces the default value of a type.
pub type ValueFn = Arc<dyn Fn() -> Dynamic + Send + Sync>;
/// Conventional `parse(text) -> T` hook.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Dynamic, String> + Send + Sync>;

/// Everything the conversion engine knows about a type.
///
/// Entries answer the metadata questions of the resolution pipeline
/// ("is this an enumeration?", "does it have a parse hook?", "what does it
/// wrap?") without reflection.
#[derive(Clone)]
pub struct TypeEntry {
    /// Type name.
    pub name: String,
    /// Type identity.
    pub type_hash: TypeHash,
    /// Classification.
    pub flags: TypeFlags,
    /// Zero/default value, if the type has one.
    pub default_value: Option<ValueFn>,
    /// Parse hook, if the type has one.
    pub parse: Option<ParseFn>,
    /// Wrapped type, for nullable wrappers.
    pub nullable: Option<NullableInfo>,
    /// Variant table, for enumerations.
    pub enum_info: Option<EnumInfo>,
    /// Conversion operators this type declares.
    pub operators: Vec<ConversionOperator>,
    /// Entries that must be registered alongside this one.
    pub companions: Vec<fn() -> TypeEntry>,
}

impl TypeEntry {
    /// Create a bare entry.
    pub fn new(name: impl Into<String>, type_hash: TypeHash, flags: TypeFlags) -> Self {
        Self {
            name: name.into(),
            type_hash,
            flags,
            default_value: None,
            parse: None,
            nullable: None,
            enum_info: None,
            operators: Vec::new(),
            companions: Vec::new(),
        }
    }

    /// Describe a Rust type through its [`Typed`] implementation.
    pub fn of<T: Typed>() -> Self {
        let mut builder = TypeBuilder::<T>::new();
        T::describe(&mut builder);
        builder.build()
    }

    /// Produce the default value.
    pub fn default_value(&self) -> Option<Dynamic> {
        self.default_value.as_ref().map(|f| f())
    }

    /// Run the parse hook, if any.
    pub fn parse(&self, text: &str) -> Option<Result<Dynamic, String>> {
        self.parse.as_ref().map(|f| f(text))
    }

    /// Check for the textual type.
    #[inline]
    pub fn is_text(&self) -> bool {
        self.flags.is_text()
    }

    /// Check for a nullable wrapper.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.flags.is_nullable()
    }

    /// Find a declared operator for `source -> target` with the given flag.
    pub fn find_operator(
        &self,
        source: TypeHash,
        target: TypeHash,
        flag: CastFlag,
    ) -> Option<&ConversionOperator> {
        self.operators
            .iter()
            .find(|op| op.matches(source, target, flag))
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("type_hash", &self.type_hash)
            .field("flags", &self.flags)
            .field("has_default", &self.default_value.is_some())
            .field("has_parse", &self.parse.is_some())
            .field("nullable", &self.nullable)
            .field("enum_info", &self.enum_info)
            .field("operators", &self.operators)
            .finish()
    }
}
