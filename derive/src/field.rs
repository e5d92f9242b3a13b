use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Index, Member, Result, parse_quote};

use crate::{attribute::ContainerAttribute, composite::bounded};

pub(crate) fn expand_field(input: &DeriveInput) -> Result<TokenStream> {
    let container = ContainerAttribute::parse(&input.attrs)?;

    let (slot, generics) = if container.custom {
        let slot = quote! { ::bitbuffer::Slot::Custom(self) };
        let generics = bounded(
            &input.generics,
            core::iter::empty(),
            Some(parse_quote!(::bitbuffer::CustomDecode)),
        );

        (slot, generics)
    } else {
        let Data::Struct(data) = &input.data else {
            return Err(Error::new_spanned(
                input,
                "`Field` may only be derived on enums with `#[bits(custom)]`.",
            ));
        };

        let mut fields = data.fields.iter();

        let (Some(inner), None) = (fields.next(), fields.next()) else {
            return Err(Error::new_spanned(
                input,
                "`Field` may only be derived on structs with exactly one field, or with `#[bits(custom)]`.",
            ));
        };

        let member = match &inner.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(0)),
        };

        let slot = quote! { ::bitbuffer::Field::slot(&mut self.#member) };
        let generics = bounded(&input.generics, core::iter::once(&inner.ty), None);

        (slot, generics)
    };

    let validator = if container.validate {
        quote! {
            fn validator(&self) -> ::core::option::Option<&dyn ::bitbuffer::Validate> {
                ::core::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    let generics = if container.validate {
        bounded(
            &generics,
            core::iter::empty(),
            Some(parse_quote!(::bitbuffer::Validate)),
        )
    } else {
        generics
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let name = &input.ident;

    let expanded = quote! {
        impl #impl_generics ::bitbuffer::Field for #name #ty_generics #where_clause {
            fn slot(&mut self) -> ::bitbuffer::Slot<'_> {
                #slot
            }

            #validator
        }
    };

    Ok(expanded.into())
}
