//! Walking a composite's schema over a bit stream.

use tracing::{debug, trace};

use crate::{
    cursor::BitCursor,
    error::{Error, FieldPath},
    rule::FieldRule,
    schema::{Composite, Field, FieldDescriptor, FieldVisitor, Slot},
};

/// Decode a composite from the start of a byte slice into `target`.
///
/// Bits left over after the composite are ignored. On error, `target` is left
/// untouched.
pub fn decode<T: Composite + Default>(bytes: &[u8], target: &mut T) -> Result<(), Error> {
    *target = from_bytes(bytes)?;
    Ok(())
}

/// Decode a composite from a byte slice into `target`, requiring every bit of
/// the slice to be consumed.
///
/// On error, `target` is left untouched.
pub fn decode_exact<T: Composite + Default>(bytes: &[u8], target: &mut T) -> Result<(), Error> {
    *target = from_bytes_exact(bytes)?;
    Ok(())
}

/// Decode a composite from the start of a byte slice.
pub fn from_bytes<T: Composite + Default>(bytes: &[u8]) -> Result<T, Error> {
    let mut cursor = BitCursor::new(bytes);
    let mut value = T::default();
    decode_into(&mut cursor, &mut value)?;
    Ok(value)
}

/// Decode a composite from a byte slice, requiring every bit of the slice to
/// be consumed.
pub fn from_bytes_exact<T: Composite + Default>(bytes: &[u8]) -> Result<T, Error> {
    let mut cursor = BitCursor::new(bytes);
    let mut value = T::default();
    decode_into(&mut cursor, &mut value)?;

    // Checked once, for the top-level composite only.
    let remaining = cursor.remaining_bits();

    if remaining != 0 {
        debug!(
            composite = value.schema().name,
            remaining, "bits left over after strict decode"
        );
        Err(Error::TrailingData(remaining))?;
    }

    Ok(value)
}

/// Decode each field of `target` in place, in schema order, from the
/// cursor's current position.
///
/// Decoding stops at the first error, which is attributed to the failing
/// field. Fields before it will already have been assigned. Use this from a
/// [`CustomDecode`](crate::schema::CustomDecode) implementation to decode a
/// nested composite.
pub fn decode_into(cursor: &mut BitCursor<'_>, target: &mut dyn Composite) -> Result<(), Error> {
    target.visit_fields(&mut Walker { cursor })
}

struct Walker<'c, 'a> {
    cursor: &'c mut BitCursor<'a>,
}

impl FieldVisitor for Walker<'_, '_> {
    fn visit(
        &mut self,
        descriptor: &'static FieldDescriptor,
        field: &mut dyn Field,
    ) -> Result<(), Error> {
        decode_field(self.cursor, descriptor, field).map_err(|err| err.within(descriptor.name))
    }
}

/// Decode a single field. Errors are returned with a path relative to the
/// field, which the caller extends with the field's name.
fn decode_field(
    cursor: &mut BitCursor<'_>,
    descriptor: &FieldDescriptor,
    field: &mut dyn Field,
) -> Result<(), Error> {
    let rule = FieldRule::resolve(&descriptor.annotation).map_err(|source| Error::Rule {
        path: FieldPath::default(),
        source,
    })?;

    match field.slot() {
        Slot::Custom(custom) => {
            custom
                .decode(cursor, descriptor)
                .map_err(|cause| Error::CustomDecodeFailed {
                    path: FieldPath::default(),
                    cause,
                })?;

            trace!(
                field = descriptor.name,
                position = cursor.position(),
                "decoded custom field"
            );
        }
        Slot::Composite(composite) => decode_into(cursor, composite)?,
        Slot::Scalar(scalar) => {
            let natural = scalar.natural_width();
            let width = rule.effective_width(natural);

            // Wider than natural: keep the low-order, earliest-read bits.
            let bits = cursor
                .read_truncated(width as usize, natural)
                .map_err(|source| Error::Stream {
                    path: FieldPath::default(),
                    source,
                })?;

            trace!(field = descriptor.name, width, bits, "decoded scalar field");

            scalar.assign(bits);
        }
    }

    if rule.validate {
        let validator = field.validator().ok_or_else(|| Error::MissingValidator {
            path: FieldPath::default(),
        })?;

        validator
            .validate()
            .map_err(|cause| Error::ValidationFailed {
                path: FieldPath::default(),
                cause,
            })?;
    }

    Ok(())
}
