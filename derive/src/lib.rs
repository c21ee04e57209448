use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_channels;
mod from_senders;

#[proc_macro_derive(FromChannels, attributes(channels, channel))]
pub fn derive_from_channels(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_channels::expand_from_channels(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}

#[proc_macro_derive(FromSenders, attributes(senders, sender))]
pub fn derive_from_senders(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_senders::expand_from_senders(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
