use quote::{ToTokens, quote};
use syn::{Attribute, Error, Lit, Result, Token};

/// Annotation text of one field of a composite, from `#[bits(...)]`.
///
/// Values are kept as text so that malformed annotations surface when
/// decoding, attributed to their field.
#[derive(Debug, Default)]
pub(crate) struct FieldAttribute {
    pub(crate) width: Option<String>,
    pub(crate) validate: Option<String>,
}

impl FieldAttribute {
    pub(crate) fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("bits")) {
            attr.parse_nested_meta(|meta| {
                let is_validate = meta.path.is_ident("validate");

                let slot = if meta.path.is_ident("width") {
                    &mut parsed.width
                } else if is_validate {
                    &mut parsed.validate
                } else {
                    return Err(meta.error("Unknown key, expected `width` or `validate`."));
                };

                if slot.is_some() {
                    return Err(meta.error("Duplicate key."));
                }

                let text = if meta.input.peek(Token![=]) {
                    literal_text(&meta.value()?.parse()?)?
                } else if is_validate {
                    // A bare `validate` reads as `validate = true`.
                    "true".to_string()
                } else {
                    return Err(meta.error("`width` requires a value."));
                };

                *slot = Some(text);
                Ok(())
            })?;
        }

        Ok(parsed)
    }

    pub(crate) fn width_tokens(&self) -> impl ToTokens {
        option_tokens(self.width.as_deref())
    }

    pub(crate) fn validate_tokens(&self) -> impl ToTokens {
        option_tokens(self.validate.as_deref())
    }
}

/// Flags on the deriving type itself, from `#[bits(...)]`.
#[derive(Debug, Default)]
pub(crate) struct ContainerAttribute {
    /// Expose the type's `Validate` implementation.
    pub(crate) validate: bool,
    /// Route decoding to the type's `CustomDecode` implementation.
    pub(crate) custom: bool,
}

impl ContainerAttribute {
    pub(crate) fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("bits")) {
            attr.parse_nested_meta(|meta| {
                let flag = if meta.path.is_ident("validate") {
                    &mut parsed.validate
                } else if meta.path.is_ident("custom") {
                    &mut parsed.custom
                } else {
                    return Err(meta.error("Unknown flag, expected `validate` or `custom`."));
                };

                if meta.input.peek(Token![=]) {
                    return Err(meta.error("Type-level flags do not take a value."));
                }

                if *flag {
                    return Err(meta.error("Duplicate flag."));
                }

                *flag = true;
                Ok(())
            })?;
        }

        Ok(parsed)
    }
}

fn literal_text(lit: &Lit) -> Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => Ok(i.base10_digits().to_string()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        _ => Err(Error::new_spanned(
            lit,
            "Expected a string, integer, or boolean literal.",
        )),
    }
}

fn option_tokens(text: Option<&str>) -> impl ToTokens {
    match text {
        Some(text) => quote! { ::core::option::Option::Some(#text) },
        None => quote! { ::core::option::Option::None },
    }
}
