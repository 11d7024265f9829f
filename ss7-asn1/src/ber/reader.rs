//! Positional BER reader
//!
//! [`BerReader`] walks a byte buffer reading TLV triplets. The reader holds
//! a borrowed view of the *whole* original buffer plus an absolute position,
//! so byte ranges handed to the output tree index the capture buffer
//! directly. Advancing never mutates shared state: the reader is `Copy`, and
//! taking a copy yields an independent cursor (used for pointer-indirection
//! reads that must not advance the primary cursor).

use core::ops::Range;

use ss7_core::error::{SigError, SigResult};

use crate::ber::types::{BerLength, BerTag};

/// Interpret big-endian two's-complement bytes as an i64
///
/// Field lengths seen on the wire are small (invoke IDs and opcodes fit in
/// one or two bytes), but the advertised length is honored up to 8 bytes;
/// anything wider fails rather than silently truncating.
pub fn integer_from_bytes(bytes: &[u8], at: usize) -> SigResult<i64> {
    if bytes.is_empty() {
        return Err(SigError::MalformedParameter {
            offset: at,
            reason: "Empty INTEGER encoding".to_string(),
        });
    }
    if bytes.len() > 8 {
        return Err(SigError::MalformedParameter {
            offset: at,
            reason: format!("INTEGER too wide: {} octets (max 8)", bytes.len()),
        });
    }

    let mut value = 0i64;
    for &byte in bytes {
        value = (value << 8) | (byte as i64);
    }

    // Sign extend
    if bytes[0] & 0x80 != 0 {
        let shift = 64 - bytes.len() * 8;
        value = (value << shift) >> shift;
    }

    Ok(value)
}

/// BER reader over a borrowed buffer
///
/// # Position tracking
///
/// The position is an absolute offset into the original buffer and advances
/// as values are read, allowing sequential decoding of sibling TLVs. Every
/// read either returns data and advances, or fails without side effects.
#[derive(Debug, Clone, Copy)]
pub struct BerReader<'a> {
    buffer: &'a [u8],
    position: usize,
    /// Exclusive upper bound; reads never touch bytes at or past this
    limit: usize,
}

impl<'a> BerReader<'a> {
    /// Create a reader over `buffer` starting at `offset`
    pub fn new(buffer: &'a [u8], offset: usize) -> Self {
        Self {
            buffer,
            position: offset.min(buffer.len()),
            limit: buffer.len(),
        }
    }

    /// Create a reader confined to `[offset, offset + length)`
    ///
    /// Decoders are handed slice-scoped readers so they cannot read outside
    /// their declared extent even when the underlying buffer has more bytes.
    pub fn bounded(buffer: &'a [u8], offset: usize, length: usize) -> Self {
        let limit = offset.saturating_add(length).min(buffer.len());
        Self {
            buffer,
            position: offset.min(limit),
            limit,
        }
    }

    /// Current absolute position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes remaining before the limit
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.position)
    }

    pub fn has_remaining(&self) -> bool {
        self.position < self.limit
    }

    /// Read one byte, advancing the position
    pub fn read_byte(&mut self) -> SigResult<u8> {
        if self.position >= self.limit {
            return Err(SigError::TruncatedInput {
                offset: self.position,
                needed: 1,
                available: 0,
            });
        }
        let byte = self.buffer[self.position];
        self.position += 1;
        Ok(byte)
    }

    /// Peek one byte without advancing
    pub fn peek_byte(&self) -> Option<u8> {
        (self.position < self.limit).then(|| self.buffer[self.position])
    }

    /// Read `count` bytes as a borrowed slice, advancing the position
    pub fn read_bytes(&mut self, count: usize) -> SigResult<&'a [u8]> {
        if self.remaining() < count {
            return Err(SigError::TruncatedInput {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..start + count])
    }

    /// Decode a tag header, advancing past it
    pub fn read_tag(&mut self) -> SigResult<BerTag> {
        let (tag, consumed) = BerTag::decode(&self.buffer[self.position..self.limit], self.position)?;
        self.position += consumed;
        Ok(tag)
    }

    /// Decode a definite length, advancing past it
    pub fn read_length(&mut self) -> SigResult<usize> {
        let (length, consumed) =
            BerLength::decode(&self.buffer[self.position..self.limit], self.position)?;
        self.position += consumed;
        Ok(length.value())
    }

    /// Decode one full TLV triplet
    ///
    /// # Returns
    /// Returns `(tag, value_slice, value_range)` where `value_range` holds
    /// the absolute offsets of the value bytes in the original buffer.
    pub fn read_tlv(&mut self) -> SigResult<(BerTag, &'a [u8], Range<usize>)> {
        let tag = self.read_tag()?;
        let length = self.read_length()?;
        let start = self.position;
        let value = self.read_bytes(length)?;
        Ok((tag, value, start..start + length))
    }

    /// Decode a universal INTEGER TLV
    pub fn read_integer_tlv(&mut self) -> SigResult<(i64, Range<usize>)> {
        let at = self.position;
        let (tag, value, range) = self.read_tlv()?;
        if !tag.is_universal_primitive(2) {
            return Err(SigError::MalformedParameter {
                offset: at,
                reason: format!("Expected INTEGER tag, got {:?}", tag),
            });
        }
        Ok((integer_from_bytes(value, range.start)?, range))
    }

    /// Decode a universal NULL TLV (used by TCAP for "invoke ID absent")
    pub fn read_null(&mut self) -> SigResult<Range<usize>> {
        let at = self.position;
        let (tag, value, range) = self.read_tlv()?;
        if !tag.is_universal_primitive(5) || !value.is_empty() {
            return Err(SigError::MalformedParameter {
                offset: at,
                reason: format!("Expected NULL tag, got {:?}", tag),
            });
        }
        Ok(range)
    }

    /// Skip one TLV, returning the bytes consumed
    pub fn skip_tlv(&mut self) -> SigResult<usize> {
        let start = self.position;
        self.read_tlv()?;
        Ok(self.position - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_tlv_integer() {
        let data = [0x02, 0x02, 0x30, 0x39]; // INTEGER 12345
        let mut reader = BerReader::new(&data, 0);
        let (value, range) = reader.read_integer_tlv().unwrap();
        assert_eq!(value, 12345);
        assert_eq!(range, 2..4);
        assert!(!reader.has_remaining());
    }

    #[test]
    fn test_read_negative_integer() {
        let data = [0x02, 0x01, 0xFF]; // INTEGER -1
        let mut reader = BerReader::new(&data, 0);
        let (value, _) = reader.read_integer_tlv().unwrap();
        assert_eq!(value, -1);
    }

    #[test]
    fn test_integer_too_wide_fails() {
        let err = integer_from_bytes(&[0u8; 9], 3).unwrap_err();
        assert!(matches!(err, SigError::MalformedParameter { offset: 3, .. }));
    }

    #[test]
    fn test_read_null() {
        let data = [0x05, 0x00];
        let mut reader = BerReader::new(&data, 0);
        assert_eq!(reader.read_null().unwrap(), 2..2);
    }

    #[test]
    fn test_bounded_reader_never_reads_past_limit() {
        // Buffer has more bytes than the bounded extent
        let data = [0x02, 0x03, 0x01, 0x02, 0x03, 0xAA, 0xBB];
        let mut reader = BerReader::bounded(&data, 0, 4);
        // TLV declares 3 value bytes but only 2 fit inside the bound
        let err = reader.read_tlv().unwrap_err();
        assert!(matches!(
            err,
            SigError::TruncatedInput {
                needed: 3,
                available: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_copy_gives_independent_cursor() {
        let data = [0x02, 0x01, 0x07, 0x02, 0x01, 0x08];
        let mut reader = BerReader::new(&data, 0);
        let side = reader; // independent cursor
        reader.read_integer_tlv().unwrap();
        assert_eq!(reader.position(), 3);
        assert_eq!(side.position(), 0);
    }

    #[test]
    fn test_absolute_positions_with_offset() {
        let data = [0xFF, 0xFF, 0x02, 0x01, 0x2A];
        let mut reader = BerReader::new(&data, 2);
        let (value, range) = reader.read_integer_tlv().unwrap();
        assert_eq!(value, 42);
        assert_eq!(range, 4..5);
    }
}
