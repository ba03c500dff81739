//! Attribute parsing for `#[typed(...)]`.

use syn::{Attribute, LitStr};

/// Parsed `#[typed(...)]` attributes on a type.
#[derive(Debug, Default)]
pub struct TypeAttrs {
    /// Override name (default: Rust type name)
    pub name: Option<String>,
    /// Use `FromStr` as the parse hook
    pub parse: bool,
    /// Use `Default` as the default value
    pub default: bool,
}

impl TypeAttrs {
    /// Parse attributes from a list of `#[typed(...)]` attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("typed") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.name = Some(value.value());
                } else if meta.path.is_ident("parse") {
                    result.parse = true;
                } else if meta.path.is_ident("default") {
                    result.default = true;
                } else {
                    return Err(meta.error(format!(
                        "unknown typed attribute: {}",
                        meta.path.get_ident().map(|i| i.to_string()).unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}
