#![no_std]

//! A schema-driven decoder for bit-packed binary payloads.
//!
//! Bitbuffer converts a byte slice into a strongly typed composite by walking
//! the composite's fields in declaration order and consuming a run of bits
//! for each. Bits are read least-significant-bit first: the lowest bit of the
//! first byte is read first, and each later bit becomes a higher-order bit of
//! the field being read. Fields pack contiguously, across byte boundaries and
//! across nested composites alike.
//!
//! Most users should derive [`Composite`](macro@Composite) for their payload
//! type and call [`decode`] or [`decode_exact`]. A field's width can be
//! overridden, and a field can request validation, with the `bits`
//! attribute:
//!
//! ```
//! #[derive(Debug, Default, Composite)]
//! struct Advertisement {
//!     #[bits(validate = true)]
//!     product: ProductType,
//!     serial_number: u32,
//!     #[bits(width = 13)]
//!     raw_temperature: u16,
//!     #[bits(width = 3)]
//!     color: u8,
//! }
//!
//! let advertisement: Advertisement = bitbuffer::from_bytes_exact(&payload)?;
//! ```
//!
//! Types that do not follow the default packing implement
//! [`CustomDecode`] and read from the [`BitCursor`] directly.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable `std` support in the `tracing` facade (default).

extern crate alloc;

pub mod cursor;
pub mod decode;
pub mod error;
pub mod rule;
pub mod schema;

pub use cursor::BitCursor;
pub use decode::{decode, decode_exact, decode_into, from_bytes, from_bytes_exact};
pub use error::{Cause, Error, FieldPath};
pub use rule::{Annotation, FieldRule};
pub use schema::{
    Composite, CustomDecode, Field, FieldDescriptor, FieldVisitor, Scalar, Schema, Slot, Validate,
};
