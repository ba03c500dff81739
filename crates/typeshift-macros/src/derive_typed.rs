//! Implementation of the `#[derive(Typed)]` macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DataEnum, DeriveInput, Fields, Meta, Token, parse_macro_input};

use crate::attrs::TypeAttrs;

pub fn derive_typed_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_typed_inner(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_typed_inner(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Typed)] does not support generic types",
        ));
    }

    let name = &input.ident;
    let attrs = TypeAttrs::from_attrs(&input.attrs)?;
    let type_name = attrs.name.clone().unwrap_or_else(|| name.to_string());

    let (describe, to_text) = match &input.data {
        Data::Enum(data) => {
            check_repr(&input.attrs)?;
            generate_enum(data)?
        }
        Data::Struct(_) => generate_struct(),
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Typed)] does not support unions",
            ));
        }
    };

    let parse = attrs.parse.then(|| quote! { builder.parse_from_str(); });
    let default = attrs.default.then(|| quote! { builder.default_value(); });

    Ok(quote! {
        impl ::typeshift::Typed for #name {
            fn type_hash() -> ::typeshift::TypeHash {
                ::typeshift::TypeHash::from_name(#type_name)
            }

            fn type_name() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(#type_name)
            }

            fn describe(builder: &mut ::typeshift::TypeBuilder<Self>) {
                #describe
                #parse
                #default
            }

            fn to_text(&self) -> ::std::string::String {
                #to_text
            }
        }
    })
}

/// Discriminants are read `as i64`, so reprs that can exceed `i64::MAX`
/// would wrap silently.
const WIDE_REPRS: [&str; 4] = ["u64", "u128", "i128", "usize"];

fn check_repr(attrs: &[Attribute]) -> syn::Result<()> {
    for attr in attrs.iter().filter(|a| a.path().is_ident("repr")) {
        let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        let wide = metas.iter().any(|meta| match meta {
            Meta::Path(path) => WIDE_REPRS.iter().any(|repr| path.is_ident(repr)),
            _ => false,
        });
        if wide {
            return Err(syn::Error::new_spanned(
                attr,
                "#[derive(Typed)] enums need discriminants that fit in i64; use a repr of i64 or narrower",
            ));
        }
    }
    Ok(())
}

/// Variant table, discriminant conversions and variant-name text.
fn generate_enum(data: &DataEnum) -> syn::Result<(TokenStream2, TokenStream2)> {
    let mut idents = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "#[derive(Typed)] enums must have unit variants only",
            ));
        }
        idents.push(&variant.ident);
    }
    let names: Vec<String> = idents.iter().map(|i| i.to_string()).collect();

    let describe = quote! {
        builder.enumeration(
            &[#((#names, Self::#idents as i64)),*],
            |value: i64| {
                #(
                    if value == Self::#idents as i64 {
                        return ::std::option::Option::Some(Self::#idents);
                    }
                )*
                ::std::option::Option::None
            },
            |value: &Self| match *value {
                #(Self::#idents => Self::#idents as i64,)*
            },
        );
    };

    let to_text = quote! {
        match *self {
            #(Self::#idents => ::std::string::String::from(#names),)*
        }
    };

    Ok((describe, to_text))
}

/// Plain object whose text comes from `Display`.
fn generate_struct() -> (TokenStream2, TokenStream2) {
    let describe = quote! {
        builder.flags(::typeshift::TypeFlags::OBJECT);
    };
    let to_text = quote! {
        ::std::string::ToString::to_string(self)
    };
    (describe, to_text)
}
