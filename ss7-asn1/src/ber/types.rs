//! BER header types (tag and length), decode-only

use ss7_core::error::{SigError, SigResult};

/// BER tag class
///
/// ASN.1 defines four tag classes. CAMEL/TCAP component decoding uses
/// Universal (INTEGER, NULL, OCTET STRING, SEQUENCE) and Context-specific
/// (component CHOICE alternatives, argument members); Application and
/// Private are decoded but only ever reported, never dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Extract the tag class from the leading tag octet (bits 8-7)
    pub fn from_bits(bits: u8) -> Self {
        match (bits >> 6) & 0x03 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }
}

/// A decoded BER tag header
///
/// Consists of the class, the constructed/primitive flag, and the tag
/// number. Created fresh for every element encountered and consumed
/// immediately by the caller that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: BerTagClass,
    constructed: bool,
    number: u32,
}

impl BerTag {
    pub fn new(class: BerTagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    pub fn class(&self) -> BerTagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Whether this is a primitive universal tag with the given number
    pub fn is_universal_primitive(&self, number: u32) -> bool {
        self.class == BerTagClass::Universal && !self.constructed && self.number == number
    }

    /// Whether this is a constructed universal tag with the given number
    pub fn is_universal_constructed(&self, number: u32) -> bool {
        self.class == BerTagClass::Universal && self.constructed && self.number == number
    }

    /// Whether this is a context-specific tag with the given number
    pub fn is_context(&self, number: u32) -> bool {
        self.class == BerTagClass::ContextSpecific && self.number == number
    }

    /// Decode a tag from `data`
    ///
    /// `at` is the absolute offset of `data[0]` in the original buffer and
    /// is used only for error reporting.
    ///
    /// # Returns
    /// Returns `Ok((tag, bytes_consumed))` on success.
    pub fn decode(data: &[u8], at: usize) -> SigResult<(Self, usize)> {
        let first = *data.first().ok_or(SigError::TruncatedInput {
            offset: at,
            needed: 1,
            available: 0,
        })?;

        let class = BerTagClass::from_bits(first);
        let constructed = (first & 0x20) != 0;
        let tag_bits = first & 0x1F;

        if tag_bits < 31 {
            return Ok((Self::new(class, constructed, tag_bits as u32), 1));
        }

        // Extended form: base-128 continuation bytes, high bit marks "more"
        let mut number = 0u32;
        let mut pos = 1;
        loop {
            // 5 continuation bytes already overflow u32
            if pos > 5 {
                return Err(SigError::MalformedParameter {
                    offset: at,
                    reason: "BER tag number too large".to_string(),
                });
            }
            let byte = *data.get(pos).ok_or(SigError::TruncatedInput {
                offset: at + pos,
                needed: 1,
                available: 0,
            })?;
            number = (number << 7) | ((byte & 0x7F) as u32);
            pos += 1;
            if byte & 0x80 == 0 {
                break;
            }
        }

        Ok((Self::new(class, constructed, number), pos))
    }
}

/// A decoded BER length (definite form only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerLength(usize);

impl BerLength {
    pub fn value(&self) -> usize {
        self.0
    }

    /// Decode a length from `data`
    ///
    /// `at` is the absolute offset of `data[0]` in the original buffer.
    /// Indefinite-length encoding (0x80) is rejected: CAMEL/TCAP encoders
    /// emit definite lengths only.
    ///
    /// # Returns
    /// Returns `Ok((length, bytes_consumed))` on success.
    pub fn decode(data: &[u8], at: usize) -> SigResult<(Self, usize)> {
        let first = *data.first().ok_or(SigError::TruncatedInput {
            offset: at,
            needed: 1,
            available: 0,
        })?;

        if first & 0x80 == 0 {
            return Ok((BerLength(first as usize), 1));
        }

        let num_bytes = (first & 0x7F) as usize;
        if num_bytes == 0 {
            return Err(SigError::MalformedParameter {
                offset: at,
                reason: "Indefinite BER length not supported".to_string(),
            });
        }
        if num_bytes > 4 {
            return Err(SigError::MalformedParameter {
                offset: at,
                reason: format!("BER length-of-length too large: {} octets", num_bytes),
            });
        }
        if data.len() < 1 + num_bytes {
            return Err(SigError::TruncatedInput {
                offset: at,
                needed: 1 + num_bytes,
                available: data.len(),
            });
        }

        let mut length = 0usize;
        for &byte in &data[1..1 + num_bytes] {
            length = (length << 8) | (byte as usize);
        }

        Ok((BerLength(length), 1 + num_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_short_form() {
        let (tag, consumed) = BerTag::decode(&[0x02], 0).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(tag.class(), BerTagClass::Universal);
        assert!(!tag.is_constructed());
        assert_eq!(tag.number(), 2);
        assert!(tag.is_universal_primitive(2));
    }

    #[test]
    fn test_tag_context_constructed() {
        // TCAP Invoke component tag
        let (tag, _) = BerTag::decode(&[0xA1], 0).unwrap();
        assert_eq!(tag.class(), BerTagClass::ContextSpecific);
        assert!(tag.is_constructed());
        assert_eq!(tag.number(), 1);
    }

    #[test]
    fn test_tag_extended_form() {
        // Tag number 0x123 = continuation bytes 0x82 0x23
        let (tag, consumed) = BerTag::decode(&[0x1F, 0x82, 0x23], 0).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(tag.number(), 0x123);
    }

    #[test]
    fn test_tag_extended_truncated() {
        let err = BerTag::decode(&[0x1F, 0x82], 4).unwrap_err();
        assert!(matches!(err, SigError::TruncatedInput { offset: 6, .. }));
    }

    #[test]
    fn test_length_short_form() {
        let (len, consumed) = BerLength::decode(&[0x64], 0).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(len.value(), 100);
    }

    #[test]
    fn test_length_long_form() {
        let (len, consumed) = BerLength::decode(&[0x82, 0x03, 0xE8], 0).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(len.value(), 1000);
    }

    #[test]
    fn test_length_indefinite_rejected() {
        let err = BerLength::decode(&[0x80], 0).unwrap_err();
        assert!(matches!(err, SigError::MalformedParameter { .. }));
    }

    #[test]
    fn test_length_truncated_long_form() {
        let err = BerLength::decode(&[0x82, 0x01], 0).unwrap_err();
        assert!(matches!(err, SigError::TruncatedInput { .. }));
    }
}
