use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Fields, Generics, Result, Type, ext::IdentExt, parse_quote,
};

use crate::attribute::{ContainerAttribute, FieldAttribute};

pub(crate) fn expand_composite(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            input,
            "`Composite` may only be derived on structs.",
        ));
    };

    let Fields::Named(fields) = &data.fields else {
        return Err(Error::new_spanned(
            input,
            "`Composite` may only be derived on structs with named fields.",
        ));
    };

    let container = ContainerAttribute::parse(&input.attrs)?;

    if container.custom {
        return Err(Error::new_spanned(
            input,
            "A custom-decoded type should derive `Field`, not `Composite`.",
        ));
    }

    let fields = fields
        .named
        .iter()
        .map(|f| -> Result<_> {
            let ident = f.ident.clone().unwrap();
            Ok((ident, &f.ty, FieldAttribute::parse(&f.attrs)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let descriptors = fields.iter().map(|(ident, _, attribute)| {
        let name = ident.unraw().to_string();
        let width = attribute.width_tokens();
        let validate = attribute.validate_tokens();

        quote! {
            ::bitbuffer::FieldDescriptor {
                name: #name,
                annotation: ::bitbuffer::Annotation::new(#width, #validate),
            }
        }
    });

    let visits = fields.iter().enumerate().map(|(i, (ident, ..))| {
        quote! {
            visitor.visit(&SCHEMA.fields[#i], &mut self.#ident)?;
        }
    });

    let validator = if container.validate {
        quote! {
            fn validator(&self) -> ::core::option::Option<&dyn ::bitbuffer::Validate> {
                ::core::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    let generics = bounded(
        &input.generics,
        fields.iter().map(|(_, ty, _)| *ty),
        container.validate.then(|| parse_quote!(::bitbuffer::Validate)),
    );
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let name = &input.ident;
    let schema_name = name.unraw().to_string();

    let expanded = quote! {
        const _: () = {
            static SCHEMA: ::bitbuffer::Schema = ::bitbuffer::Schema {
                name: #schema_name,
                fields: &[#(#descriptors),*],
            };

            impl #impl_generics ::bitbuffer::Composite for #name #ty_generics #where_clause {
                fn schema(&self) -> &'static ::bitbuffer::Schema {
                    &SCHEMA
                }

                fn visit_fields(
                    &mut self,
                    visitor: &mut dyn ::bitbuffer::FieldVisitor,
                ) -> ::core::result::Result<(), ::bitbuffer::Error> {
                    #(#visits)*
                    ::core::result::Result::Ok(())
                }
            }

            impl #impl_generics ::bitbuffer::Field for #name #ty_generics #where_clause {
                fn slot(&mut self) -> ::bitbuffer::Slot<'_> {
                    ::bitbuffer::Slot::Composite(self)
                }

                #validator
            }
        };
    };

    Ok(expanded.into())
}

/// Add `Field` bounds for field types, and a bound on `Self`, to a generic
/// type. Non-generic types are returned unchanged.
pub(crate) fn bounded<'a>(
    generics: &Generics,
    field_types: impl Iterator<Item = &'a Type>,
    self_bound: Option<syn::Path>,
) -> Generics {
    let mut generics = generics.clone();

    if generics.params.is_empty() {
        return generics;
    }

    let where_clause = generics.make_where_clause();

    for ty in field_types {
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::bitbuffer::Field));
    }

    if let Some(bound) = self_bound {
        where_clause.predicates.push(parse_quote!(Self: #bound));
    }

    generics
}
