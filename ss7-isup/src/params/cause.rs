//! Cause indicators parameter (ITU-T Q.850 cause values)

use core::ops::Range;

use ss7_core::field::{DecodeStatus, DecodedField, FieldValue};

use super::{hex_string, malformed_field};

/// Q.850 cause value → name
pub fn cause_value_name(value: u8) -> &'static str {
    match value {
        1 => "Unallocated (unassigned) number",
        2 => "No route to specified transit network",
        3 => "No route to destination",
        4 => "Send special information tone",
        5 => "Misdialled trunk prefix",
        6 => "Channel unacceptable",
        7 => "Call awarded and being delivered in an established channel",
        8 => "Preemption",
        9 => "Preemption - circuit reserved for reuse",
        16 => "Normal call clearing",
        17 => "User busy",
        18 => "No user responding",
        19 => "No answer from user (user alerted)",
        20 => "Subscriber absent",
        21 => "Call rejected",
        22 => "Number changed",
        23 => "Redirection to new destination",
        25 => "Exchange routing error",
        26 => "Non-selected user clearing",
        27 => "Destination out of order",
        28 => "Invalid number format (address incomplete)",
        29 => "Facility rejected",
        30 => "Response to STATUS ENQUIRY",
        31 => "Normal, unspecified",
        34 => "No circuit/channel available",
        38 => "Network out of order",
        39 => "Permanent frame mode connection out of service",
        40 => "Permanent frame mode connection operational",
        41 => "Temporary failure",
        42 => "Switching equipment congestion",
        43 => "Access information discarded",
        44 => "Requested circuit/channel not available",
        46 => "Precedence call blocked",
        47 => "Resource unavailable, unspecified",
        49 => "Quality of service unavailable",
        50 => "Requested facility not subscribed",
        53 => "Outgoing calls barred within CUG",
        55 => "Incoming calls barred within CUG",
        57 => "Bearer capability not authorized",
        58 => "Bearer capability not presently available",
        62 => "Inconsistency in designated outgoing access information and subscriber class",
        63 => "Service or option not available, unspecified",
        65 => "Bearer capability not implemented",
        66 => "Channel type not implemented",
        69 => "Requested facility not implemented",
        70 => "Only restricted digital information bearer capability is available",
        79 => "Service or option not implemented, unspecified",
        81 => "Invalid call reference value",
        82 => "Identified channel does not exist",
        83 => "A suspended call exists, but this call identity does not",
        84 => "Call identity in use",
        85 => "No call suspended",
        86 => "Call having the requested call identity has been cleared",
        87 => "User not member of CUG",
        88 => "Incompatible destination",
        90 => "Non-existent CUG",
        91 => "Invalid transit network selection",
        95 => "Invalid message, unspecified",
        96 => "Mandatory information element is missing",
        97 => "Message type non-existent or not implemented",
        98 => "Message not compatible with call state or message type non-existent",
        99 => "Information element/parameter non-existent or not implemented",
        100 => "Invalid information element contents",
        101 => "Message not compatible with call state",
        102 => "Recovery on timer expiry",
        103 => "Parameter non-existent or not implemented - passed on",
        110 => "Message with unrecognized parameter discarded",
        111 => "Protocol error, unspecified",
        127 => "Interworking, unspecified",
        _ => "Unknown cause value",
    }
}

fn coding_standard_name(code: u8) -> &'static str {
    match code & 0x03 {
        0 => "ITU-T standardized coding",
        1 => "ISO/IEC standard",
        2 => "national standard",
        _ => "standard specific to identified location",
    }
}

fn location_name(code: u8) -> &'static str {
    match code & 0x0F {
        0 => "user (U)",
        1 => "private network serving the local user (LPN)",
        2 => "public network serving the local user (LN)",
        3 => "transit network (TN)",
        4 => "public network serving the remote user (RLN)",
        5 => "private network serving the remote user (RPN)",
        7 => "international network (INTL)",
        10 => "network beyond interworking point (BI)",
        _ => "spare",
    }
}

/// Cause indicators: coding standard + location octet, cause value octet,
/// then optional diagnostics. Bit 8 of each of the first two octets is the
/// extension bit; a cleared extension bit on the cause octet signals that
/// diagnostic octets follow.
pub fn decode_cause_indicators(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.len() < 2 {
        return malformed_field("Cause indicators", range, "needs at least 2 octets");
    }

    let start = range.start;
    let coding = (data[0] >> 5) & 0x03;
    let location = data[0] & 0x0F;
    let cause_value = data[1] & 0x7F;
    let diag_follows = data[1] & 0x80 == 0;

    let mut field = DecodedField::new(
        "Cause indicators",
        start,
        range.end,
        format!("Cause: {} ({})", cause_value_name(cause_value), cause_value),
    )
    .with_value(FieldValue::Integer(cause_value as i64));

    field.push_child(
        DecodedField::new("Coding standard", start, start + 1, coding_standard_name(coding))
            .with_value(FieldValue::Unsigned(coding as u64)),
    );
    field.push_child(
        DecodedField::new("Location", start, start + 1, location_name(location))
            .with_value(FieldValue::Unsigned(location as u64)),
    );
    field.push_child(
        DecodedField::new("Cause value", start + 1, start + 2, cause_value_name(cause_value))
            .with_value(FieldValue::Unsigned(cause_value as u64)),
    );

    if data.len() > 2 {
        field.push_child(
            DecodedField::new(
                "Diagnostics",
                start + 2,
                range.end,
                format!("Diagnostics: {}", hex_string(&data[2..])),
            )
            .with_value(FieldValue::Bytes(data[2..].to_vec())),
        );
    } else if diag_follows {
        // Extension bit promised diagnostics but the declared length has
        // none; report what we have rather than over-read.
        field.push_child(DecodedField::new(
            "Diagnostics",
            range.end,
            range.end,
            "Diagnostics indicated but absent",
        ));
    }

    (field, DecodeStatus::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_busy() {
        // ITU-T, user location; cause 17 with extension bit set
        let buf = [0x80, 0x91];
        let (field, status) = decode_cause_indicators(&buf, 0..2);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.display, "Cause: User busy (17)");
        assert_eq!(field.value, Some(FieldValue::Integer(17)));
    }

    #[test]
    fn test_diagnostics_present() {
        let buf = [0x82, 0x10, 0xDE, 0xAD];
        let (field, status) = decode_cause_indicators(&buf, 0..4);
        assert_eq!(status, DecodeStatus::Ok);
        let diag = field.children.iter().find(|c| c.name == "Diagnostics").unwrap();
        assert_eq!(diag.value, Some(FieldValue::Bytes(vec![0xDE, 0xAD])));
        let loc = field.children.iter().find(|c| c.name == "Location").unwrap();
        assert_eq!(loc.display, "public network serving the local user (LN)");
    }

    #[test]
    fn test_single_octet_is_malformed() {
        let buf = [0x80];
        let (_, status) = decode_cause_indicators(&buf, 0..1);
        assert!(status.is_malformed());
    }

    #[test]
    fn test_unknown_cause_value_is_named() {
        assert_eq!(cause_value_name(123), "Unknown cause value");
        assert_eq!(cause_value_name(16), "Normal call clearing");
        assert_eq!(cause_value_name(127), "Interworking, unspecified");
    }
}
