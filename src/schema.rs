//! Field descriptors and the capabilities a decodable type advertises.
//!
//! Every type that can appear as a field of a composite implements [`Field`],
//! which reports how it is decoded through a [`Slot`]:
//!
//! - [`Slot::Scalar`]: the field consumes a run of bits from the stream. Its
//!   natural width may be overridden by the field's annotation.
//! - [`Slot::Composite`]: the field is itself a composite, decoded
//!   recursively with no padding or alignment between composites.
//! - [`Slot::Custom`]: the field decodes itself from the cursor.
//!
//! Scalar implementations are provided for `bool` and the unsigned integers.
//! Composites and wrapper types are usually derived. See the
//! [`Composite`](macro@Composite) and [`Field`](macro@Field) macros.

use crate::{
    cursor::BitCursor,
    error::{Cause, Error},
    rule::Annotation,
};

/// Derive [`Composite`] (and [`Field`]) for a struct with named fields.
///
/// _Requires Cargo feature `derive`._
///
/// Fields are decoded in declaration order. Each may carry a `bits`
/// attribute with a `width` override and a `validate` flag. Values are kept
/// as written and parsed at decode time.
///
/// ```
/// #[derive(Debug, Default, Composite)]
/// struct Header {
///     #[bits(width = 3)]
///     version: u8,
///     #[bits(width = 1)]
///     encrypted: bool,
///     #[bits(width = 4, validate = true)]
///     kind: Kind,
/// }
/// ```
///
/// Add `#[bits(validate)]` to the struct itself to expose its [`Validate`]
/// implementation when it is nested as a validated field.
#[cfg(feature = "derive")]
pub use bitbuffer_derive::Composite;

/// Derive [`Field`] for a wrapper or custom-decoded type.
///
/// _Requires Cargo feature `derive`._
///
/// A struct holding a single field decodes exactly as that field. Add
/// `#[bits(validate)]` to expose the type's [`Validate`] implementation.
///
/// ```
/// #[derive(Debug, Default, Field)]
/// #[bits(validate)]
/// struct Kind(u8);
///
/// impl Validate for Kind {
///     fn validate(&self) -> Result<(), Cause> {
///         if self.0 > 8 {
///             Err("unknown kind")?;
///         }
///         Ok(())
///     }
/// }
/// ```
///
/// For types with an irregular encoding, add `#[bits(custom)]` and implement
/// [`CustomDecode`]. This also applies to enumerations.
#[cfg(feature = "derive")]
pub use bitbuffer_derive::Field;

/// Static description of one field of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The field's name, used to attribute errors.
    pub name: &'static str,
    /// The field's raw annotation text.
    pub annotation: Annotation<'static>,
}

/// The ordered fields of a composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// The composite type's name.
    pub name: &'static str,
    /// Fields in declaration order.
    pub fields: &'static [FieldDescriptor],
}

impl Schema {
    /// Find a field's descriptor by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The decoding strategy of a field, borrowed from the field itself.
pub enum Slot<'a> {
    Scalar(&'a mut dyn Scalar),
    Composite(&'a mut dyn Composite),
    Custom(&'a mut dyn CustomDecode),
}

/// A type that can be decoded as a field of a composite.
pub trait Field {
    /// Borrow the field through its decoding strategy.
    fn slot(&mut self) -> Slot<'_>;

    /// The field's validation hook, if it has one.
    ///
    /// A field annotated with `validate = true` must return `Some`.
    fn validator(&self) -> Option<&dyn Validate> {
        None
    }
}

/// A value stored in a fixed number of bits.
pub trait Scalar {
    /// The number of bits the type occupies absent any override.
    fn natural_width(&self) -> u32;
    /// Store bits read from the stream, already narrowed to the natural width.
    fn assign(&mut self, bits: u64);
}

/// A type made of an ordered list of fields.
pub trait Composite {
    fn schema(&self) -> &'static Schema;

    /// Pass each field, with its descriptor, to a visitor in schema order,
    /// stopping at the first error.
    fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), Error>;
}

/// Receiver for the fields of a [`Composite`].
pub trait FieldVisitor {
    fn visit(
        &mut self,
        descriptor: &'static FieldDescriptor,
        field: &mut dyn Field,
    ) -> Result<(), Error>;
}

/// A type that decodes itself rather than following default packing.
///
/// The decoder is responsible for advancing the cursor, and may consume any
/// number of bits. Cursor errors convert into [`Cause`] with `?`.
pub trait CustomDecode {
    fn decode(
        &mut self,
        cursor: &mut BitCursor<'_>,
        descriptor: &FieldDescriptor,
    ) -> Result<(), Cause>;
}

/// A check run on a value directly after it is decoded.
pub trait Validate {
    /// Return an error describing why the value is invalid, if it is.
    fn validate(&self) -> Result<(), Cause>;
}

impl Scalar for bool {
    fn natural_width(&self) -> u32 {
        1
    }

    fn assign(&mut self, bits: u64) {
        *self = bits != 0;
    }
}

impl Field for bool {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

macro_rules! unsigned_scalar {
    ($($t:ident),*) => {
        $(
            impl Scalar for $t {
                fn natural_width(&self) -> u32 {
                    $t::BITS
                }

                fn assign(&mut self, bits: u64) {
                    // Narrowed by the caller, so this never discards set bits.
                    *self = bits as $t;
                }
            }

            impl Field for $t {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::Scalar(self)
                }
            }
        )*
    };
}

unsigned_scalar!(u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_widths() {
        fn width(f: &mut dyn Field) -> u32 {
            match f.slot() {
                Slot::Scalar(s) => s.natural_width(),
                _ => unreachable!(),
            }
        }

        assert_eq!(width(&mut false), 1);
        assert_eq!(width(&mut 0u8), 8);
        assert_eq!(width(&mut 0u16), 16);
        assert_eq!(width(&mut 0u32), 32);
        assert_eq!(width(&mut 0u64), 64);
    }

    #[test]
    fn bool_is_nonzero() {
        let mut b = false;
        b.assign(0b1000_0000);
        assert!(b);
        b.assign(0);
        assert!(!b);
    }

    #[test]
    fn lookup_field() {
        static SCHEMA: Schema = Schema {
            name: "Pair",
            fields: &[
                FieldDescriptor {
                    name: "a",
                    annotation: Annotation::NONE,
                },
                FieldDescriptor {
                    name: "b",
                    annotation: Annotation::new(Some("4"), None),
                },
            ],
        };

        assert_eq!(SCHEMA.field("b").unwrap().annotation.width, Some("4"));
        assert!(SCHEMA.field("c").is_none());
    }
}
