//! SS7 CAMEL/ISUP signaling decoder
//!
//! Decode-only library for the application layer of SS7 telephony signaling:
//! CAMEL (CAP) components carried over TCAP, and ISUP/BICC call-control
//! messages. Input is an in-memory byte buffer plus an offset; output is a
//! structured tree of decoded fields with byte ranges, display strings and
//! a best-effort status. The decoder never does I/O and keeps no state
//! between calls.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `ss7-core`: Error taxonomy, decoded-field data model, digit codec
//! - `ss7-asn1`: BER (ITU-T X.690) tag/length/value reader
//! - `ss7-isup`: ISUP/BICC message layouts and Q.763 parameter decoders
//! - `ss7-camel`: CAP component CHOICE, opcodes, per-phase argument tables
//!
//! # Example
//!
//! ```
//! use ss7::{ProtocolVariant, dissect};
//!
//! // ISUP Release complete on CIC 5
//! let buf = [0x05, 0x00, 0x10, 0x00];
//! let output = dissect(&buf, 0, ProtocolVariant::Isup).unwrap();
//! assert_eq!(output.summary, "Release complete");
//! ```

pub use ss7_camel::{CamelVersion, opcode_name};
pub use ss7_core::{DecodeStatus, DecodedField, FieldValue, MessageOutput, SigError, SigResult};
pub use ss7_isup::IsupVariant;

/// Protocol variant selector for [`dissect`]
///
/// CAMEL opcodes keep their numbers across phases while their argument
/// shapes change, so the phase is part of the decode context rather than
/// something inferred from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVariant {
    CamelV1,
    CamelV2,
    CamelV3,
    Isup,
    Bicc,
}

/// Decode one signaling message at `offset`
///
/// Dispatches to the CAMEL component decoder or the ISUP/BICC message
/// decoder according to `variant`. Fails outright only when the buffer is
/// too short for the fixed header (or, for CAMEL, when the component CHOICE
/// tag is unrecognized); all other problems are reported through the output
/// status alongside the fields decoded before the problem.
pub fn dissect(buf: &[u8], offset: usize, variant: ProtocolVariant) -> SigResult<MessageOutput> {
    match variant {
        ProtocolVariant::CamelV1 => ss7_camel::decode_component(buf, offset, CamelVersion::V1),
        ProtocolVariant::CamelV2 => ss7_camel::decode_component(buf, offset, CamelVersion::V2),
        ProtocolVariant::CamelV3 => ss7_camel::decode_component(buf, offset, CamelVersion::V3),
        ProtocolVariant::Isup => ss7_isup::decode_message(buf, offset, IsupVariant::Isup),
        ProtocolVariant::Bicc => ss7_isup::decode_message(buf, offset, IsupVariant::Bicc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dissect_isup() {
        let buf = [0x01, 0x00, 0x10, 0x00]; // RLC on CIC 1
        let output = dissect(&buf, 0, ProtocolVariant::Isup).unwrap();
        assert_eq!(output.summary, "Release complete");
        assert_eq!(output.consumed, 4);
    }

    #[test]
    fn test_dissect_camel() {
        let buf = [0xA1, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x1F];
        let output = dissect(&buf, 0, ProtocolVariant::CamelV2).unwrap();
        assert_eq!(output.summary, "Invoke continue");
        assert_eq!(output.status, DecodeStatus::Ok);
    }

    #[test]
    fn test_dissect_variants_are_independent() {
        // Same bytes under different variants: no state leaks between calls
        let camel = [0xA1, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x00];
        let isup = [0x02, 0x00, 0x09, 0x00];

        let a = dissect(&camel, 0, ProtocolVariant::CamelV3).unwrap();
        let b = dissect(&isup, 0, ProtocolVariant::Isup).unwrap();
        let c = dissect(&camel, 0, ProtocolVariant::CamelV3).unwrap();

        assert_eq!(a, c);
        assert_eq!(a.summary, "Invoke initialDP");
        assert_eq!(b.summary, "Answer");
    }
}
