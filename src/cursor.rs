//! Least-significant-bit-first reader over an immutable byte buffer.
//!
//! Bits are consumed starting from the lowest bit of the first byte. Each
//! successive bit becomes the next-higher-order bit of the accumulated value,
//! so a field spanning a byte boundary takes its low bits from the earlier
//! byte and its high bits from the later one.
//!
//! Whole-byte reads ([`BitCursor::read_byte_aligned`] and
//! [`BitCursor::read_aligned`]) are a separate path: they require the cursor
//! to sit on a byte boundary and return bytes in their stored order.

use thiserror::Error;
use zerocopy::FromBytes;

/// An error reading from a [`BitCursor`].
///
/// A failed read never advances the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Fewer bits remain than were requested.
    #[error("Requested {requested} bits at bit {position}, but only {remaining} remain.")]
    OutOfData {
        position: usize,
        requested: usize,
        remaining: usize,
    },
    /// More bits were requested than fit in the accumulator.
    #[error("Cannot read {requested} bits at once (at most 64).")]
    TooWide { requested: usize },
    /// A whole-byte read was attempted off a byte boundary.
    #[error("Whole-byte read at bit {position}, which is not on a byte boundary.")]
    Unaligned { position: usize },
}

/// A read cursor over a borrowed byte buffer.
///
/// The position is measured in bits, never exceeds `8 * len`, and only moves
/// forward.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitCursor<'a> {
    /// Create a cursor positioned at the first bit of `data`.
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The number of bits consumed so far.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The number of bits not yet consumed.
    pub const fn remaining_bits(&self) -> usize {
        self.data.len() * 8 - self.position
    }

    /// Whether the cursor sits on a byte boundary.
    pub const fn is_aligned(&self) -> bool {
        self.position % 8 == 0
    }

    /// Consume the next `n` bits (at most 64), least-significant-bit first.
    ///
    /// Reading zero bits always succeeds and yields zero.
    pub fn read_bits(&mut self, n: u32) -> Result<u64, Error> {
        if n > 64 {
            Err(Error::TooWide {
                requested: n as usize,
            })?;
        }

        self.ensure(n as usize)?;

        let mut value = 0u64;
        let mut read = 0;

        while read < n {
            let byte = self.data[self.position / 8];
            let offset = (self.position % 8) as u32;

            // Take the rest of this byte, or fewer if the read ends inside it.
            let take = (8 - offset).min(n - read);
            let bits = u64::from(byte >> offset) & ((1 << take) - 1);

            value |= bits << read;
            read += take;
            self.position += take as usize;
        }

        Ok(value)
    }

    /// Advance past `n` bits without producing a value.
    pub fn skip_bits(&mut self, n: usize) -> Result<(), Error> {
        self.ensure(n)?;
        self.position += n;
        Ok(())
    }

    /// Consume `width` bits, which may exceed 64, and return only the
    /// low-order `keep` bits of the consumed span.
    ///
    /// Earlier-read bits occupy the low-order positions, so the retained value
    /// always comes from the start of the span. The whole span is checked for
    /// availability before anything is consumed.
    pub fn read_truncated(&mut self, width: usize, keep: u32) -> Result<u64, Error> {
        if keep > 64 {
            Err(Error::TooWide {
                requested: keep as usize,
            })?;
        }

        self.ensure(width)?;

        let head = width.min(64) as u32;
        let value = self.read_bits(head)?;
        self.skip_bits(width - head as usize)?;

        Ok(value & mask(keep))
    }

    /// Consume `width_bytes` (at most 8) whole bytes, assembling them
    /// most-significant byte first.
    pub fn read_byte_aligned(&mut self, width_bytes: usize) -> Result<u64, Error> {
        if width_bytes > 8 {
            Err(Error::TooWide {
                requested: width_bytes * 8,
            })?;
        }

        if !self.is_aligned() {
            Err(Error::Unaligned {
                position: self.position,
            })?;
        }

        self.ensure(width_bytes * 8)?;

        let start = self.position / 8;
        let value = self.data[start..start + width_bytes]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

        self.position += width_bytes * 8;

        Ok(value)
    }

    /// Consume a plain-data value from whole bytes without copying through
    /// the bit accumulator.
    ///
    /// Byte order is that of `T`; use the types in [`zerocopy::byteorder`] to
    /// read multi-byte integers of a fixed order.
    pub fn read_aligned<T: FromBytes>(&mut self) -> Result<T, Error> {
        if !self.is_aligned() {
            Err(Error::Unaligned {
                position: self.position,
            })?;
        }

        let (value, _) = T::read_from_prefix(&self.data[self.position / 8..]).map_err(|_| {
            Error::OutOfData {
                position: self.position,
                requested: size_of::<T>() * 8,
                remaining: self.remaining_bits(),
            }
        })?;

        self.position += size_of::<T>() * 8;

        Ok(value)
    }

    fn ensure(&self, n: usize) -> Result<(), Error> {
        let remaining = self.remaining_bits();

        if n > remaining {
            Err(Error::OutOfData {
                position: self.position,
                requested: n,
                remaining,
            })?;
        }

        Ok(())
    }
}

/// A mask selecting the low `bits` bits of a `u64`.
pub(crate) const fn mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use zerocopy::byteorder::{big_endian, little_endian};

    #[test]
    fn whole_bytes() {
        let mut c = BitCursor::new(&[0x45, 0x54]);
        assert_eq!(c.read_byte_aligned(1).unwrap(), 0x45);
        assert_eq!(c.read_bits(8).unwrap(), 0x54);
        assert_eq!(c.remaining_bits(), 0);
    }

    #[test]
    fn all_ones() {
        let mut c = BitCursor::new(&[0b1111_1111]);
        assert_eq!(c.read_bits(3).unwrap(), 0b111);
        assert_eq!(c.read_bits(1).unwrap(), 0b1);
        assert_eq!(c.read_bits(4).unwrap(), 0b1111);
    }

    #[test]
    fn low_bits_first() {
        let mut c = BitCursor::new(&[0b0100_0101]);
        assert_eq!(c.read_bits(3).unwrap(), 0b101);
        assert_eq!(c.read_bits(1).unwrap(), 0b0);
        assert_eq!(c.read_bits(4).unwrap(), 0b0100);
    }

    #[test]
    fn across_byte_boundary() {
        let mut c = BitCursor::new(&[0b1010_0000, 0b0000_0011]);
        c.skip_bits(5).unwrap();
        // Low three bits from the first byte, high two from the second.
        assert_eq!(c.read_bits(5).unwrap(), 0b11_101);
        assert_eq!(c.position(), 10);
    }

    #[test]
    fn natural_multi_byte_is_little_endian() {
        let mut c = BitCursor::new(&[0x34, 0x12]);
        assert_eq!(c.read_bits(16).unwrap(), 0x1234);
    }

    #[test]
    fn full_accumulator() {
        let bytes = 0x0123_4567_89AB_CDEFu64.to_le_bytes();
        let mut c = BitCursor::new(&bytes);
        assert_eq!(c.read_bits(64).unwrap(), 0x0123_4567_89AB_CDEF);
    }

    #[test]
    fn zero_bits() {
        let mut c = BitCursor::new(&[]);
        assert_eq!(c.read_bits(0).unwrap(), 0);
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn out_of_data_leaves_position() {
        let mut c = BitCursor::new(&[0xFF]);
        c.read_bits(3).unwrap();

        let err = c.read_bits(6).unwrap_err();
        assert_eq!(
            err,
            Error::OutOfData {
                position: 3,
                requested: 6,
                remaining: 5
            }
        );
        assert_eq!(c.position(), 3);
        assert_eq!(c.read_bits(5).unwrap(), 0b11111);
    }

    #[test]
    fn too_wide() {
        let mut c = BitCursor::new(&[0; 16]);
        assert_eq!(c.read_bits(65), Err(Error::TooWide { requested: 65 }));
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn truncated_keeps_earliest_bits() {
        let bytes = [11, 22, 33, 44, 55, 66, 77, 88, 99, 111];
        let mut c = BitCursor::new(&bytes);
        assert_eq!(c.read_truncated(65, 8).unwrap(), 11);
        assert_eq!(c.position(), 65);
        assert_eq!(c.read_truncated(7, 8).unwrap(), 99 >> 1);
        assert_eq!(c.read_truncated(8, 8).unwrap(), 111);
    }

    #[test]
    fn truncated_checks_whole_span() {
        let mut c = BitCursor::new(&[0; 8]);
        assert!(matches!(
            c.read_truncated(65, 8),
            Err(Error::OutOfData { requested: 65, .. })
        ));
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn byte_aligned_is_big_endian() {
        let mut c = BitCursor::new(&[0x12, 0x34, 0x56]);
        assert_eq!(c.read_byte_aligned(2).unwrap(), 0x1234);
        assert_eq!(c.read_byte_aligned(1).unwrap(), 0x56);
    }

    #[test]
    fn byte_aligned_off_boundary() {
        let mut c = BitCursor::new(&[0x12, 0x34]);
        c.read_bits(1).unwrap();
        assert_eq!(
            c.read_byte_aligned(1),
            Err(Error::Unaligned { position: 1 })
        );
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn aligned_plain_data() {
        let mut c = BitCursor::new(&[0x12, 0x34, 0x78, 0x56, 0x00]);
        assert_eq!(c.read_aligned::<big_endian::U16>().unwrap().get(), 0x1234);
        assert_eq!(c.read_aligned::<little_endian::U16>().unwrap().get(), 0x5678);
        assert!(matches!(
            c.read_aligned::<[u8; 2]>(),
            Err(Error::OutOfData { requested: 16, .. })
        ));
        assert_eq!(c.position(), 32);
    }
}
