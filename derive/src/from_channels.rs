use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, Path, PathArguments, Result, Type};

pub(crate) fn expand_from_channels(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`FromChannels` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new_spanned(
            input,
            "`FromChannels` may only be derived on structs with named fields.",
        ))?
    };

    let Some(attr) = input.attrs.iter().find(|a| a.path().is_ident("channels")) else {
        Err(Error::new_spanned(
            input,
            "`FromChannels` requires a `#[channels(Enum)]` attribute naming the channel enum.",
        ))?
    };

    let channels: Path = attr.parse_args()?;

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    for field in &fields {
        if !seen.insert(field.variant.to_string()) {
            Err(Error::new_spanned(
                &field.variant,
                "Each channel must be assigned to one attribute.",
            ))?;
        }
    }

    let cases = fields.iter().map(|FieldMetadata { name, variant }| {
        quote! { #channels::#variant => &mut self.#name, }
    });

    let name = &input.ident;

    // No wildcard arm: the compiler rejects channels left without an
    // attribute.
    let expanded = quote! {
        impl FromChannels for #name {
            fn add_reading(&mut self, channel: u8, reading: Reading) -> bool {
                let Ok(channel) = <#channels as ::core::convert::TryFrom<u8>>::try_from(channel) else {
                    return false;
                };

                let attribute = match channel {
                    #(#cases)*
                };

                *attribute = Some(reading);
                true
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    variant: Ident,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let Some(name) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("channel")) else {
            return Ok(None);
        };

        let variant: Ident = attr.parse_args()?;

        let Type::Path(path) = &field.ty else {
            Err(Error::new_spanned(
                &field.ty,
                "Field must have type `Option<Reading>`.",
            ))?
        };

        let Some(segment) = path.path.segments.last() else {
            Err(Error::new_spanned(
                &path.path.segments,
                "Field must have type `Option<Reading>`.",
            ))?
        };

        if segment.ident != "Option" || matches!(segment.arguments, PathArguments::None) {
            Err(Error::new_spanned(
                &segment.ident,
                "Field must have type `Option<Reading>`.",
            ))?;
        }

        Ok(Some(Self { name, variant }))
    }
}
