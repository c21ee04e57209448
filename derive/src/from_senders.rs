use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, Path, Result};

pub(crate) fn expand_from_senders(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`FromSenders` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new_spanned(
            input,
            "`FromSenders` may only be derived on structs with named fields.",
        ))?
    };

    let Some(attr) = input.attrs.iter().find(|a| a.path().is_ident("senders")) else {
        Err(Error::new_spanned(
            input,
            "`FromSenders` requires a `#[senders(Enum)]` attribute naming the sender enum.",
        ))?
    };

    let senders: Path = attr.parse_args()?;

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
                "Each sender must be assigned to one container.",
            ))?;
        }
    }

    let cases = fields.iter().map(|FieldMetadata { name, variant }| {
        quote! { #senders::#variant => &mut self.#name, }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromSenders for #name {
            fn add_sender(&mut self, sender: u8) -> Option<&mut dyn FromChannels> {
                let sender = <#senders as ::core::convert::TryFrom<u8>>::try_from(sender).ok()?;

                let container: &mut dyn FromChannels = match sender {
                    #(#cases)*
                };

                Some(container)
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

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("sender")) else {
            return Ok(None);
        };

        let variant: Ident = attr.parse_args()?;

        Ok(Some(Self { name, variant }))
    }
}
