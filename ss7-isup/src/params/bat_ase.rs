//! Application transport parameter (BAT-ASE, ITU-T Q.765.5)
//!
//! The application transport parameter encapsulates a second, simpler TLV
//! grammar: a run of elements `(identifier, length, compatibility octet,
//! content)` repeated until the parameter's declared length is exhausted.
//! It has its own identifier space and its own end condition (length
//! exhaustion, not an end-marker octet), so it is driven by its own dispatch
//! loop rather than the outer optional-parameter walker.

use core::ops::Range;

use ss7_core::field::{DecodeStatus, DecodedField, FieldValue};

use super::{hex_string, malformed_field};

/// BAT-ASE element identifiers
mod element {
    pub const ACTION_INDICATOR: u8 = 1;
    pub const BACKBONE_NETWORK_CONNECTION_IDENTIFIER: u8 = 2;
    pub const INTERWORKING_FUNCTION_ADDRESS: u8 = 3;
    pub const CODEC_LIST: u8 = 4;
    pub const CODEC: u8 = 5;
    pub const BAT_COMPATIBILITY_REPORT: u8 = 6;
    pub const BEARER_NETWORK_CONNECTION_CHARACTERISTICS: u8 = 7;
    pub const BEARER_CONTROL_INFORMATION: u8 = 8;
    pub const BEARER_CONTROL_TUNNELLING: u8 = 9;
    pub const BEARER_CONTROL_UNIT_IDENTIFIER: u8 = 10;
    pub const SIGNAL: u8 = 11;
    pub const BEARER_REDIRECTION_CAPABILITY: u8 = 12;
    pub const BEARER_REDIRECTION_INDICATORS: u8 = 13;
    pub const SIGNAL_TYPE: u8 = 14;
    pub const DURATION: u8 = 15;
}

fn element_name(id: u8) -> Option<&'static str> {
    use element::*;
    match id {
        ACTION_INDICATOR => Some("Action indicator"),
        BACKBONE_NETWORK_CONNECTION_IDENTIFIER => Some("Backbone network connection identifier"),
        INTERWORKING_FUNCTION_ADDRESS => Some("Interworking function address"),
        CODEC_LIST => Some("Codec list"),
        CODEC => Some("Codec"),
        BAT_COMPATIBILITY_REPORT => Some("BAT compatibility report"),
        BEARER_NETWORK_CONNECTION_CHARACTERISTICS => Some("Bearer network connection characteristics"),
        BEARER_CONTROL_INFORMATION => Some("Bearer control information"),
        BEARER_CONTROL_TUNNELLING => Some("Bearer control tunnelling"),
        BEARER_CONTROL_UNIT_IDENTIFIER => Some("Bearer control unit identifier"),
        SIGNAL => Some("Signal"),
        BEARER_REDIRECTION_CAPABILITY => Some("Bearer redirection capability"),
        BEARER_REDIRECTION_INDICATORS => Some("Bearer redirection indicators"),
        SIGNAL_TYPE => Some("Signal type"),
        DURATION => Some("Duration"),
        _ => None,
    }
}

fn action_indicator_name(value: u8) -> &'static str {
    match value {
        1 => "connect backward",
        2 => "connect forward",
        3 => "connect forward, no notification",
        4 => "connect forward, plus notification",
        5 => "connect forward, no notification + selected codec",
        6 => "connect forward, plus notification + selected codec",
        7 => "use idle",
        8 => "connected",
        9 => "switched",
        10 => "selected codec",
        11 => "modify codec",
        12 => "successful codec modification",
        13 => "codec modification failure",
        14 => "mid-call codec negotiation",
        15 => "modify to selected codec information",
        16 => "mid-call codec negotiation failure",
        _ => "reserved",
    }
}

fn organization_name(org: u8) -> &'static str {
    match org {
        1 => "ITU-T",
        2 => "ETSI",
        _ => "reserved",
    }
}

fn itu_codec_name(codec: u8) -> &'static str {
    match codec {
        1 => "G.711 64 kbit/s A-law",
        2 => "G.711 64 kbit/s mu-law",
        3 => "G.711 56 kbit/s A-law",
        4 => "G.711 56 kbit/s mu-law",
        5 => "G.722",
        6 => "G.723.1",
        7 => "G.726",
        8 => "G.727",
        9 => "G.728",
        10 => "G.729",
        _ => "reserved",
    }
}

/// Decode the compatibility instruction octet every element carries
fn compatibility_field(at: usize, octet: u8) -> DecodedField {
    let action = octet & 0x03;
    let notify = (octet >> 2) & 0x01;

    DecodedField::new(
        "Instruction indicators",
        at,
        at + 1,
        match action {
            0 => "pass on",
            1 => "discard parameter",
            2 => "discard message",
            _ => "release call",
        },
    )
    .with_value(FieldValue::Unsigned(octet as u64))
    .with_child(
        DecodedField::new("Send notification indicator", at, at + 1,
            if notify == 0 { "do not send notification" } else { "send notification" })
            .with_value(FieldValue::Unsigned(notify as u64)),
    )
}

/// Decode one element's content, shape keyed on the identifier
fn element_content(id: u8, buf: &[u8], range: Range<usize>) -> DecodedField {
    use element::*;
    let data = &buf[range.clone()];
    let at = range.start;

    match id {
        ACTION_INDICATOR if !data.is_empty() => {
            let action = data[0] & 0x7F;
            DecodedField::new("Action", at, range.end, action_indicator_name(action))
                .with_value(FieldValue::Unsigned(action as u64))
        }
        CODEC | CODEC_LIST if !data.is_empty() => {
            let org = data[0];
            let mut field = DecodedField::new(
                "Codec information",
                at,
                range.end,
                format!("Organization: {}", organization_name(org)),
            )
            .with_value(FieldValue::Unsigned(org as u64));
            if data.len() > 1 && org == 1 {
                field.push_child(
                    DecodedField::new("Codec type", at + 1, at + 2, itu_codec_name(data[1]))
                        .with_value(FieldValue::Unsigned(data[1] as u64)),
                );
            } else if data.len() > 1 {
                field.push_child(
                    DecodedField::new("Codec data", at + 1, range.end, hex_string(&data[1..]))
                        .with_value(FieldValue::Bytes(data[1..].to_vec())),
                );
            }
            field
        }
        BEARER_CONTROL_TUNNELLING if !data.is_empty() => {
            let tunnelling = data[0] & 0x01;
            DecodedField::new("Tunnelling indicator", at, range.end,
                if tunnelling != 0 { "tunnelling to be used" } else { "no indication" })
                .with_value(FieldValue::Unsigned(tunnelling as u64))
        }
        SIGNAL if data.len() >= 3 => {
            let signal_type = data[0];
            let duration = u16::from_be_bytes([data[1], data[2]]);
            DecodedField::new("Signal", at, range.end,
                format!("Signal type {}, duration {} ms", signal_type, duration))
                .with_value(FieldValue::Unsigned(signal_type as u64))
                .with_child(
                    DecodedField::new("Duration", at + 1, at + 3, format!("{} ms", duration))
                        .with_value(FieldValue::Unsigned(duration as u64)),
                )
        }
        SIGNAL_TYPE if !data.is_empty() => {
            DecodedField::new("Signal type", at, range.end, format!("Signal type {}", data[0]))
                .with_value(FieldValue::Unsigned(data[0] as u64))
        }
        DURATION if data.len() >= 2 => {
            let duration = u16::from_be_bytes([data[0], data[1]]);
            DecodedField::new("Duration", at, range.end, format!("{} ms", duration))
                .with_value(FieldValue::Unsigned(duration as u64))
        }
        _ => DecodedField::new("Content", at, range.end, hex_string(data))
            .with_value(FieldValue::Bytes(data.to_vec())),
    }
}

/// Application transport parameter: BAT-ASE element loop
///
/// Runs its own dispatch loop over `(identifier, length, compatibility,
/// content)` elements until the declared parameter length is exhausted.
/// Every iteration consumes at least the 2 header octets, so the loop
/// terminates within `len / 2` turns. Unknown identifiers become opaque
/// elements and do not desynchronize the walk (the declared element length
/// stays authoritative).
pub fn decode_application_transport(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    let start = range.start;

    let mut field = DecodedField::new(
        "Application transport",
        start,
        range.end,
        format!("Application transport, {} bytes", data.len()),
    );
    let mut status = DecodeStatus::Ok;

    let mut pos = 0usize;
    while pos < data.len() {
        if data.len() - pos < 2 {
            let (child, st) = malformed_field(
                "BAT-ASE element",
                start + pos..range.end,
                "element header needs 2 octets",
            );
            field.push_child(child);
            status = status.combine(st);
            break;
        }

        let id = data[pos] & 0x7F;
        let len = data[pos + 1] as usize;
        let content_start = pos + 2;

        if content_start + len > data.len() {
            let (child, st) = malformed_field(
                "BAT-ASE element",
                start + pos..range.end,
                "element length exceeds parameter",
            );
            field.push_child(child);
            status = status.combine(st);
            break;
        }

        let element_range = start + pos..start + content_start + len;
        let mut element_field = match element_name(id) {
            Some(name) => DecodedField::new(name, element_range.start, element_range.end,
                format!("{} ({} bytes)", name, len)),
            None => {
                status = status.combine(DecodeStatus::OkWithUnknowns);
                log::debug!("unknown BAT-ASE element identifier {}", id);
                DecodedField::new(
                    format!("BAT-ASE element {}", id),
                    element_range.start,
                    element_range.end,
                    format!("Identifier unknown, {} bytes, contents opaque", len),
                )
            }
        };

        // First content octet is the compatibility instruction octet
        if len > 0 {
            element_field.push_child(compatibility_field(start + content_start, data[content_start]));
            if len > 1 && element_name(id).is_some() {
                element_field.push_child(element_content(
                    id,
                    buf,
                    start + content_start + 1..start + content_start + len,
                ));
            }
        }

        field.push_child(element_field);
        pos = content_start + len;
    }

    (field, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_indicator_element() {
        // id 1, len 2: compatibility 0x00 (pass on), action 8 = connected
        let buf = [0x01, 0x02, 0x00, 0x08];
        let (field, status) = decode_application_transport(&buf, 0..4);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.children.len(), 1);
        let elem = &field.children[0];
        assert_eq!(elem.name, "Action indicator");
        assert_eq!(elem.children[1].display, "connected");
    }

    #[test]
    fn test_codec_list_itu() {
        // id 4, len 3: compatibility, org ITU-T, codec G.711 A-law
        let buf = [0x04, 0x03, 0x00, 0x01, 0x01];
        let (field, status) = decode_application_transport(&buf, 0..5);
        assert_eq!(status, DecodeStatus::Ok);
        let codec = &field.children[0].children[1];
        assert_eq!(codec.display, "Organization: ITU-T");
        assert_eq!(codec.children[0].display, "G.711 64 kbit/s A-law");
    }

    #[test]
    fn test_multiple_elements_until_exhaustion() {
        let buf = [
            0x01, 0x02, 0x00, 0x01, // action: connect backward
            0x0E, 0x02, 0x00, 0x05, // signal type 5
        ];
        let (field, status) = decode_application_transport(&buf, 0..8);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.children.len(), 2);
        assert_eq!(field.children[1].name, "Signal type");
    }

    #[test]
    fn test_unknown_identifier_is_skipped_cleanly() {
        let buf = [
            0x7A, 0x01, 0x00,       // unknown identifier 0x7A
            0x01, 0x02, 0x00, 0x07, // action: use idle
        ];
        let (field, status) = decode_application_transport(&buf, 0..7);
        assert_eq!(status, DecodeStatus::OkWithUnknowns);
        assert_eq!(field.children.len(), 2);
        assert_eq!(field.children[1].name, "Action indicator");
        assert_eq!(field.children[1].children[1].display, "use idle");
    }

    #[test]
    fn test_overlong_element_is_malformed_and_stops() {
        let buf = [0x01, 0x10, 0x00];
        let (field, status) = decode_application_transport(&buf, 0..3);
        assert!(status.is_malformed());
        assert_eq!(field.children.len(), 1);
    }

    // Adversarial zero-length elements: every turn still consumes the two
    // header octets, so the loop terminates.
    #[test]
    fn test_zero_length_elements_terminate() {
        let buf = [0x01, 0x00].repeat(64);
        let (field, _) = decode_application_transport(&buf, 0..buf.len());
        assert_eq!(field.children.len(), 64);
    }
}
