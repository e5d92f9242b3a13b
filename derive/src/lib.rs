use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attribute;
mod composite;
mod field;

#[proc_macro_derive(Composite, attributes(bits))]
pub fn derive_composite(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match composite::expand_composite(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}

#[proc_macro_derive(Field, attributes(bits))]
pub fn derive_field(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match field::expand_field(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
