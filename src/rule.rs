//! Resolution of per-field annotations into decoding rules.
//!
//! A field may carry two annotation keys, both as raw text:
//!
//! - [`WIDTH_KEY`]: a decimal bit width in `1..=255`, overriding the natural
//!   width of the field's type.
//! - [`VALIDATE_KEY`]: `true` or `false`, requesting the field's validation
//!   hook be run directly after it is decoded.
//!
//! Text is parsed at decode time, and errors carry the offending text so they
//! can be attributed to a field.

use core::num::NonZeroU8;

use alloc::string::{String, ToString};
use thiserror::Error;

/// Annotation key overriding a field's bit width.
pub const WIDTH_KEY: &str = "width";
/// Annotation key requesting post-decode validation.
pub const VALIDATE_KEY: &str = "validate";

/// An error resolving a field's annotation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The width annotation is not an integer in `0..=255`.
    #[error("Invalid bit width \"{0}\".")]
    InvalidWidthSyntax(String),
    /// The width annotation is explicitly zero.
    #[error("Bit width must be greater than zero.")]
    ZeroWidthNotAllowed,
    /// The validate annotation is not a boolean.
    #[error("Invalid validate flag \"{0}\".")]
    InvalidValidateSyntax(String),
}

/// Raw annotation text attached to a field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Annotation<'a> {
    /// Text of the [`WIDTH_KEY`] annotation, if present.
    pub width: Option<&'a str>,
    /// Text of the [`VALIDATE_KEY`] annotation, if present.
    pub validate: Option<&'a str>,
}

impl<'a> Annotation<'a> {
    /// An annotation with neither key present.
    pub const NONE: Self = Self {
        width: None,
        validate: None,
    };

    pub const fn new(width: Option<&'a str>, validate: Option<&'a str>) -> Self {
        Self { width, validate }
    }

    /// Look up the text of an annotation key by name.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        match key {
            WIDTH_KEY => self.width,
            VALIDATE_KEY => self.validate,
            _ => None,
        }
    }
}

/// The parsed rule for decoding one field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Explicitly requested bit width, if any.
    pub width: Option<NonZeroU8>,
    /// Whether the validation hook should run after decoding.
    pub validate: bool,
}

impl FieldRule {
    /// Parse both keys of an annotation.
    pub fn resolve(annotation: &Annotation<'_>) -> Result<Self, Error> {
        Ok(Self {
            width: parse_width(annotation.width)?,
            validate: resolve_validate(annotation.validate)?,
        })
    }

    /// The number of bits to consume for a field of the given natural width.
    pub fn effective_width(&self, natural: u32) -> u32 {
        self.width.map_or(natural, |w| u32::from(w.get()))
    }
}

/// Resolve the width to consume for a field, given its annotation text and
/// its natural width.
pub fn resolve_width(text: Option<&str>, natural: u32) -> Result<u32, Error> {
    Ok(parse_width(text)?.map_or(natural, |w| u32::from(w.get())))
}

/// Resolve whether a field requests validation.
pub fn resolve_validate(text: Option<&str>) -> Result<bool, Error> {
    let Some(text) = text else {
        return Ok(false);
    };

    text.parse()
        .map_err(|_| Error::InvalidValidateSyntax(text.to_string()))
}

fn parse_width(text: Option<&str>) -> Result<Option<NonZeroU8>, Error> {
    let Some(text) = text else {
        return Ok(None);
    };

    let width: u8 = text
        .parse()
        .map_err(|_| Error::InvalidWidthSyntax(text.to_string()))?;

    // Zero is never a silent "unset".
    NonZeroU8::new(width)
        .map(Some)
        .ok_or(Error::ZeroWidthNotAllowed)
}
