//! ISUP and BICC message decoding (ITU-T Q.763, Q.1902.3)
//!
//! Entry point is [`decode_message`]: hand it a capture buffer, the offset
//! where the circuit identity starts, and the [`IsupVariant`], and it returns
//! the decoded field tree. ISUP carries a 12-bit circuit identification code
//! in two octets; BICC replaces it with a 32-bit call instance code in four.
//! Everything after that routing header is identical between the two, so both
//! share the message-type dispatch in [`message`].
//!
//! Decoding is strictly read-only over the input and keeps no state between
//! calls.

pub mod message;
pub mod optional;
pub mod params;

use ss7_core::error::{SigError, SigResult};
use ss7_core::field::{DecodedField, FieldValue, MessageOutput};

pub use message::{MessageType, MAX_NESTING_DEPTH};

/// Circuit-header flavour of the message framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsupVariant {
    /// ISUP: 12-bit circuit identification code in 2 octets (little-endian)
    Isup,
    /// BICC: 32-bit call instance code in 4 octets (little-endian)
    Bicc,
}

impl IsupVariant {
    /// Size of the circuit header in octets
    pub fn cic_len(&self) -> usize {
        match self {
            IsupVariant::Isup => 2,
            IsupVariant::Bicc => 4,
        }
    }
}

/// Decode one complete ISUP or BICC message
///
/// # Arguments
///
/// * `buf` - capture buffer
/// * `offset` - offset of the circuit header within `buf`
/// * `variant` - circuit-header flavour
///
/// # Error Handling
///
/// Fails with [`SigError::TruncatedInput`] only when the buffer is too short
/// to hold the circuit header and the message-type octet. All other problems
/// are reported in-band through the output status so that partially decoded
/// fields survive.
pub fn decode_message(buf: &[u8], offset: usize, variant: IsupVariant) -> SigResult<MessageOutput> {
    let cic_len = variant.cic_len();
    let available = buf.len().saturating_sub(offset);
    if available < cic_len + 1 {
        return Err(SigError::TruncatedInput {
            offset,
            needed: cic_len + 1,
            available,
        });
    }

    let cic_bytes = &buf[offset..offset + cic_len];
    let (cic, cic_name) = match variant {
        IsupVariant::Isup => {
            let raw = u16::from_le_bytes([cic_bytes[0], cic_bytes[1]]);
            ((raw & 0x0FFF) as u64, "CIC")
        }
        IsupVariant::Bicc => {
            let raw = u32::from_le_bytes([cic_bytes[0], cic_bytes[1], cic_bytes[2], cic_bytes[3]]);
            (raw as u64, "Call instance code")
        }
    };

    let mut output = message::decode_body(buf, offset + cic_len, 0)?;
    log::debug!("decoded {} message on circuit {}", output.summary, cic);

    output.fields.insert(
        0,
        DecodedField::new(cic_name, offset, offset + cic_len, format!("{}: {}", cic_name, cic))
            .with_value(FieldValue::Unsigned(cic)),
    );
    output.consumed += cic_len;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ss7_core::field::DecodeStatus;

    #[test]
    fn test_isup_cic_is_twelve_bits() {
        // Release complete on CIC 0x234; upper nibble of the second octet
        // is spare and masked off.
        let buf = [0x34, 0xF2, 0x10, 0x00];
        let output = decode_message(&buf, 0, IsupVariant::Isup).unwrap();
        assert_eq!(output.summary, "Release complete");
        assert_eq!(output.fields[0].value, Some(FieldValue::Unsigned(0x234)));
        assert_eq!(output.consumed, 4);
    }

    #[test]
    fn test_bicc_cic_is_four_octets() {
        let buf = [0x78, 0x56, 0x34, 0x12, 0x10, 0x00];
        let output = decode_message(&buf, 0, IsupVariant::Bicc).unwrap();
        assert_eq!(output.fields[0].name, "Call instance code");
        assert_eq!(output.fields[0].value, Some(FieldValue::Unsigned(0x12345678)));
        assert_eq!(output.consumed, 6);
    }

    #[test]
    fn test_too_short_for_header_is_hard_error() {
        let buf = [0x34, 0xF2];
        let err = decode_message(&buf, 0, IsupVariant::Isup).unwrap_err();
        assert_eq!(
            err,
            SigError::TruncatedInput {
                offset: 0,
                needed: 3,
                available: 2,
            }
        );
    }

    #[test]
    fn test_decode_at_offset() {
        let mut buf = vec![0xAA; 3];
        buf.extend_from_slice(&[0x01, 0x00, 0x10, 0x00]); // RLC on CIC 1
        let output = decode_message(&buf, 3, IsupVariant::Isup).unwrap();
        assert_eq!(output.summary, "Release complete");
        assert_eq!(output.fields[0].start, 3);
        assert_eq!(output.status, DecodeStatus::Ok);
    }
}
