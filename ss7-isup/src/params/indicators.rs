//! Bitmask-coded indicator parameters
//!
//! These parameters are one or two octets in which every bit or bit group
//! carries an independent named meaning. Each group is extracted as its own
//! sub-field; the parameter value is never reported as one opaque integer.

use core::ops::Range;

use ss7_core::field::{DecodeStatus, DecodedField, FieldValue};

use super::{hex_string, malformed_field};

/// Build a sub-field for a masked bit group of one octet
fn bit_group(name: &str, at: usize, value: u8, display: &'static str) -> DecodedField {
    DecodedField::new(name, at, at + 1, display).with_value(FieldValue::Unsigned(value as u64))
}

fn end_to_end_method_name(code: u8) -> &'static str {
    match code & 0x03 {
        0 => "no end-to-end method available (only link-by-link method available)",
        1 => "pass-along method available (national use)",
        2 => "SCCP method available",
        _ => "pass-along and SCCP methods available (national use)",
    }
}

fn sccp_method_name(code: u8) -> &'static str {
    match code & 0x03 {
        0 => "no indication",
        1 => "connectionless method available (national use)",
        2 => "connection oriented method available",
        _ => "connectionless and connection oriented methods available (national use)",
    }
}

/// Nature of connection indicators (1 octet)
pub fn decode_nature_of_connection(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Nature of connection indicators", range, "needs 1 octet");
    }

    let at = range.start;
    let octet = data[0];
    let satellite = octet & 0x03;
    let continuity = (octet >> 2) & 0x03;
    let echo = (octet >> 4) & 0x01;

    let mut field = DecodedField::new(
        "Nature of connection indicators",
        at,
        range.end,
        format!("Nature of connection indicators: 0x{:02X}", octet),
    )
    .with_value(FieldValue::Unsigned(octet as u64));

    field.push_child(bit_group("Satellite indicator", at, satellite, match satellite {
        0 => "no satellite circuit in the connection",
        1 => "one satellite circuit in the connection",
        2 => "two satellite circuits in the connection",
        _ => "spare",
    }));
    field.push_child(bit_group("Continuity check indicator", at, continuity, match continuity {
        0 => "continuity check not required",
        1 => "continuity check required on this circuit",
        2 => "continuity check performed on a previous circuit",
        _ => "spare",
    }));
    field.push_child(bit_group("Echo control device indicator", at, echo, match echo {
        0 => "echo control device not included",
        _ => "echo control device included",
    }));

    (field, DecodeStatus::Ok)
}

/// Forward call indicators (2 octets)
pub fn decode_forward_call(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.len() < 2 {
        return malformed_field("Forward call indicators", range, "needs 2 octets");
    }

    let at = range.start;
    let o1 = data[0];
    let o2 = data[1];

    let mut field = DecodedField::new(
        "Forward call indicators",
        at,
        range.end,
        format!("Forward call indicators: 0x{:02X}{:02X}", o1, o2),
    )
    .with_value(FieldValue::Unsigned(((o1 as u64) << 8) | o2 as u64));

    field.push_child(bit_group("National/international call indicator", at, o1 & 0x01,
        if o1 & 0x01 == 0 { "call to be treated as a national call" } else { "call to be treated as an international call" }));
    field.push_child(bit_group("End-to-end method indicator", at, (o1 >> 1) & 0x03,
        end_to_end_method_name((o1 >> 1) & 0x03)));
    field.push_child(bit_group("Interworking indicator", at, (o1 >> 3) & 0x01,
        if (o1 >> 3) & 0x01 == 0 { "no interworking encountered (Signalling System No. 7 all the way)" } else { "interworking encountered" }));
    field.push_child(bit_group("End-to-end information indicator", at, (o1 >> 4) & 0x01,
        if (o1 >> 4) & 0x01 == 0 { "no end-to-end information available" } else { "end-to-end information available" }));
    field.push_child(bit_group("ISDN user part indicator", at, (o1 >> 5) & 0x01,
        if (o1 >> 5) & 0x01 == 0 { "ISDN user part not used all the way" } else { "ISDN user part used all the way" }));
    field.push_child(bit_group("ISDN user part preference indicator", at, (o1 >> 6) & 0x03,
        match (o1 >> 6) & 0x03 {
            0 => "ISDN user part preferred all the way",
            1 => "ISDN user part not required all the way",
            2 => "ISDN user part required all the way",
            _ => "spare",
        }));
    field.push_child(bit_group("ISDN access indicator", at + 1, o2 & 0x01,
        if o2 & 0x01 == 0 { "originating access non-ISDN" } else { "originating access ISDN" }));
    field.push_child(bit_group("SCCP method indicator", at + 1, (o2 >> 1) & 0x03,
        sccp_method_name((o2 >> 1) & 0x03)));

    (field, DecodeStatus::Ok)
}

/// Backward call indicators (2 octets)
pub fn decode_backward_call(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.len() < 2 {
        return malformed_field("Backward call indicators", range, "needs 2 octets");
    }

    let at = range.start;
    let o1 = data[0];
    let o2 = data[1];

    let mut field = DecodedField::new(
        "Backward call indicators",
        at,
        range.end,
        format!("Backward call indicators: 0x{:02X}{:02X}", o1, o2),
    )
    .with_value(FieldValue::Unsigned(((o1 as u64) << 8) | o2 as u64));

    field.push_child(bit_group("Charge indicator", at, o1 & 0x03, match o1 & 0x03 {
        0 => "no indication",
        1 => "no charge",
        2 => "charge",
        _ => "spare",
    }));
    field.push_child(bit_group("Called party's status indicator", at, (o1 >> 2) & 0x03,
        match (o1 >> 2) & 0x03 {
            0 => "no indication",
            1 => "subscriber free",
            2 => "connect when free (national use)",
            _ => "spare",
        }));
    field.push_child(bit_group("Called party's category indicator", at, (o1 >> 4) & 0x03,
        match (o1 >> 4) & 0x03 {
            0 => "no indication",
            1 => "ordinary subscriber",
            2 => "payphone",
            _ => "spare",
        }));
    field.push_child(bit_group("End-to-end method indicator", at, (o1 >> 6) & 0x03,
        end_to_end_method_name((o1 >> 6) & 0x03)));
    field.push_child(bit_group("Interworking indicator", at + 1, o2 & 0x01,
        if o2 & 0x01 == 0 { "no interworking encountered (Signalling System No. 7 all the way)" } else { "interworking encountered" }));
    field.push_child(bit_group("End-to-end information indicator", at + 1, (o2 >> 1) & 0x01,
        if (o2 >> 1) & 0x01 == 0 { "no end-to-end information available" } else { "end-to-end information available" }));
    field.push_child(bit_group("ISDN user part indicator", at + 1, (o2 >> 2) & 0x01,
        if (o2 >> 2) & 0x01 == 0 { "ISDN user part not used all the way" } else { "ISDN user part used all the way" }));
    field.push_child(bit_group("Holding indicator", at + 1, (o2 >> 3) & 0x01,
        if (o2 >> 3) & 0x01 == 0 { "holding not requested" } else { "holding requested (national use)" }));
    field.push_child(bit_group("ISDN access indicator", at + 1, (o2 >> 4) & 0x01,
        if (o2 >> 4) & 0x01 == 0 { "terminating access non-ISDN" } else { "terminating access ISDN" }));
    field.push_child(bit_group("Echo control device indicator", at + 1, (o2 >> 5) & 0x01,
        if (o2 >> 5) & 0x01 == 0 { "echo control device not included" } else { "echo control device included" }));
    field.push_child(bit_group("SCCP method indicator", at + 1, (o2 >> 6) & 0x03,
        sccp_method_name((o2 >> 6) & 0x03)));

    (field, DecodeStatus::Ok)
}

/// Optional forward call indicators (1 octet)
pub fn decode_optional_forward_call(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Optional forward call indicators", range, "needs 1 octet");
    }

    let at = range.start;
    let octet = data[0];

    let mut field = DecodedField::new(
        "Optional forward call indicators",
        at,
        range.end,
        format!("Optional forward call indicators: 0x{:02X}", octet),
    )
    .with_value(FieldValue::Unsigned(octet as u64));

    field.push_child(bit_group("Closed user group call indicator", at, octet & 0x03,
        match octet & 0x03 {
            0 => "non-CUG call",
            1 => "spare",
            2 => "closed user group call, outgoing access allowed",
            _ => "closed user group call, outgoing access not allowed",
        }));
    field.push_child(bit_group("Simple segmentation indicator", at, (octet >> 2) & 0x01,
        if (octet >> 2) & 0x01 == 0 { "no additional information will be sent" } else { "additional information will be sent in a segmentation message" }));
    field.push_child(bit_group("Connected line identity request indicator", at, (octet >> 7) & 0x01,
        if (octet >> 7) & 0x01 == 0 { "not requested" } else { "requested" }));

    (field, DecodeStatus::Ok)
}

/// Optional backward call indicators (1 octet)
pub fn decode_optional_backward_call(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Optional backward call indicators", range, "needs 1 octet");
    }

    let at = range.start;
    let octet = data[0];

    let mut field = DecodedField::new(
        "Optional backward call indicators",
        at,
        range.end,
        format!("Optional backward call indicators: 0x{:02X}", octet),
    )
    .with_value(FieldValue::Unsigned(octet as u64));

    field.push_child(bit_group("In-band information indicator", at, octet & 0x01,
        if octet & 0x01 == 0 { "no indication" } else { "in-band information or an appropriate pattern is now available" }));
    field.push_child(bit_group("Call diversion may occur indicator", at, (octet >> 1) & 0x01,
        if (octet >> 1) & 0x01 == 0 { "no indication" } else { "call diversion may occur" }));
    field.push_child(bit_group("Simple segmentation indicator", at, (octet >> 2) & 0x01,
        if (octet >> 2) & 0x01 == 0 { "no additional information will be sent" } else { "additional information will be sent in a segmentation message" }));
    field.push_child(bit_group("MLPP user indicator", at, (octet >> 3) & 0x01,
        if (octet >> 3) & 0x01 == 0 { "no indication" } else { "MLPP user" }));

    (field, DecodeStatus::Ok)
}

/// Calling party's category (1 octet)
pub fn decode_calling_partys_category(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Calling party's category", range, "needs 1 octet");
    }

    let category = data[0];
    let name = match category {
        0 => "calling party's category unknown at this time (national use)",
        1 => "operator, language French",
        2 => "operator, language English",
        3 => "operator, language German",
        4 => "operator, language Russian",
        5 => "operator, language Spanish",
        9 => "reserved (see ITU-T Q.104)",
        10 => "ordinary calling subscriber",
        11 => "calling subscriber with priority",
        12 => "data call (voice band data)",
        13 => "test call",
        15 => "payphone",
        _ => "reserved",
    };

    let field = DecodedField::new(
        "Calling party's category",
        range.start,
        range.end,
        format!("Calling party's category: {}", name),
    )
    .with_value(FieldValue::Unsigned(category as u64));

    (field, DecodeStatus::Ok)
}

/// Transmission medium requirement / used (1 octet)
pub fn decode_transmission_medium(name: &str, buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field(name, range, "needs 1 octet");
    }

    let tmr = data[0];
    let medium = match tmr {
        0 => "speech",
        2 => "64 kbit/s unrestricted",
        3 => "3.1 kHz audio",
        4 => "reserved for alternate speech (service 2)/64 kbit/s unrestricted (service 1)",
        5 => "reserved for alternate 64 kbit/s unrestricted (service 1)/speech (service 2)",
        6 => "64 kbit/s preferred",
        7 => "2 x 64 kbit/s unrestricted",
        8 => "384 kbit/s unrestricted",
        9 => "1536 kbit/s unrestricted",
        10 => "1920 kbit/s unrestricted",
        _ => "spare",
    };

    let field = DecodedField::new(name, range.start, range.end, format!("{}: {}", name, medium))
        .with_value(FieldValue::Unsigned(tmr as u64));

    (field, DecodeStatus::Ok)
}

/// Continuity indicators (1 octet)
pub fn decode_continuity(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Continuity indicators", range, "needs 1 octet");
    }

    let success = data[0] & 0x01 != 0;
    let field = DecodedField::new(
        "Continuity indicators",
        range.start,
        range.end,
        if success { "continuity check successful" } else { "continuity check failed" },
    )
    .with_value(FieldValue::Unsigned(success as u64));

    (field, DecodeStatus::Ok)
}

/// Event information (1 octet)
pub fn decode_event_information(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Event information", range, "needs 1 octet");
    }

    let at = range.start;
    let event = data[0] & 0x7F;
    let restricted = data[0] & 0x80 != 0;

    let event_name = match event {
        1 => "ALERTING",
        2 => "PROGRESS",
        3 => "in-band information or an appropriate pattern is now available",
        4 => "call forwarded on busy (national use)",
        5 => "call forwarded on no reply (national use)",
        6 => "call forwarded unconditional (national use)",
        _ => "spare",
    };

    let field = DecodedField::new(
        "Event information",
        at,
        range.end,
        format!("Event: {}", event_name),
    )
    .with_value(FieldValue::Unsigned(event as u64))
    .with_child(bit_group("Event indicator", at, event, event_name))
    .with_child(bit_group("Event presentation restricted indicator", at, restricted as u8,
        if restricted { "presentation restricted" } else { "no indication" }));

    (field, DecodeStatus::Ok)
}

/// Suspend/resume indicators (1 octet)
pub fn decode_suspend_resume(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Suspend/resume indicators", range, "needs 1 octet");
    }

    let network = data[0] & 0x01 != 0;
    let field = DecodedField::new(
        "Suspend/resume indicators",
        range.start,
        range.end,
        if network { "network initiated" } else { "ISDN subscriber initiated" },
    )
    .with_value(FieldValue::Unsigned(network as u64));

    (field, DecodeStatus::Ok)
}

/// Information indicators (2 octets)
pub fn decode_information(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.len() < 2 {
        return malformed_field("Information indicators", range, "needs 2 octets");
    }

    let at = range.start;
    let o1 = data[0];

    let mut field = DecodedField::new(
        "Information indicators",
        at,
        range.end,
        format!("Information indicators: 0x{:02X}{:02X}", o1, data[1]),
    )
    .with_value(FieldValue::Unsigned(((o1 as u64) << 8) | data[1] as u64));

    field.push_child(bit_group("Calling party address response indicator", at, o1 & 0x03,
        match o1 & 0x03 {
            0 => "calling party address not included",
            1 => "calling party address not available",
            3 => "calling party address included",
            _ => "spare",
        }));
    field.push_child(bit_group("Hold provided indicator", at, (o1 >> 2) & 0x01,
        if (o1 >> 2) & 0x01 == 0 { "hold not provided" } else { "hold provided" }));
    field.push_child(bit_group("Calling party's category response indicator", at, (o1 >> 5) & 0x01,
        if (o1 >> 5) & 0x01 == 0 { "calling party's category not included" } else { "calling party's category included" }));
    field.push_child(bit_group("Charge information response indicator", at, (o1 >> 6) & 0x01,
        if (o1 >> 6) & 0x01 == 0 { "charge information not included" } else { "charge information included" }));
    field.push_child(bit_group("Solicited information indicator", at, (o1 >> 7) & 0x01,
        if (o1 >> 7) & 0x01 == 0 { "solicited" } else { "unsolicited" }));

    (field, DecodeStatus::Ok)
}

/// Information request indicators (2 octets)
pub fn decode_information_request(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.len() < 2 {
        return malformed_field("Information request indicators", range, "needs 2 octets");
    }

    let at = range.start;
    let o1 = data[0];

    let mut field = DecodedField::new(
        "Information request indicators",
        at,
        range.end,
        format!("Information request indicators: 0x{:02X}{:02X}", o1, data[1]),
    )
    .with_value(FieldValue::Unsigned(((o1 as u64) << 8) | data[1] as u64));

    field.push_child(bit_group("Calling party address request indicator", at, o1 & 0x01,
        if o1 & 0x01 == 0 { "calling party address not requested" } else { "calling party address requested" }));
    field.push_child(bit_group("Holding indicator", at, (o1 >> 1) & 0x01,
        if (o1 >> 1) & 0x01 == 0 { "holding not requested" } else { "holding requested (national use)" }));
    field.push_child(bit_group("Calling party's category request indicator", at, (o1 >> 3) & 0x01,
        if (o1 >> 3) & 0x01 == 0 { "calling party's category not requested" } else { "calling party's category requested" }));
    field.push_child(bit_group("Charge information request indicator", at, (o1 >> 4) & 0x01,
        if (o1 >> 4) & 0x01 == 0 { "charge information not requested" } else { "charge information requested" }));
    field.push_child(bit_group("Malicious call identification request indicator", at, (o1 >> 7) & 0x01,
        if (o1 >> 7) & 0x01 == 0 { "malicious call identification not requested" } else { "malicious call identification requested (national use)" }));

    (field, DecodeStatus::Ok)
}

/// Redirection information (2 octets; the second is optional in old
/// encodings, decoded when present)
pub fn decode_redirection_information(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Redirection information", range, "needs at least 1 octet");
    }

    let at = range.start;
    let o1 = data[0];

    let mut field = DecodedField::new(
        "Redirection information",
        at,
        range.end,
        format!("Redirection information: {}", hex_string(data)),
    )
    .with_value(FieldValue::Bytes(data.to_vec()));

    field.push_child(bit_group("Redirecting indicator", at, o1 & 0x07, match o1 & 0x07 {
        0 => "no redirection (national use)",
        1 => "call rerouted (national use)",
        2 => "call rerouted, all redirection information presentation restricted (national use)",
        3 => "call diverted",
        4 => "call diverted, all redirection information presentation restricted",
        5 => "call rerouted, redirection number presentation restricted (national use)",
        6 => "call diversion, redirection number presentation restricted (national use)",
        _ => "spare",
    }));
    field.push_child(bit_group("Original redirection reason", at, (o1 >> 4) & 0x0F,
        match (o1 >> 4) & 0x0F {
            0 => "unknown/not available",
            1 => "user busy (national use)",
            2 => "no reply (national use)",
            3 => "unconditional (national use)",
            _ => "spare",
        }));

    if data.len() > 1 {
        let o2 = data[1];
        field.push_child(bit_group("Redirection counter", at + 1, o2 & 0x07, "number of redirections"));
        field.push_child(bit_group("Redirecting reason", at + 1, (o2 >> 4) & 0x0F,
            match (o2 >> 4) & 0x0F {
                0 => "unknown/not available",
                1 => "user busy",
                2 => "no reply",
                3 => "unconditional",
                4 => "deflection during alerting",
                5 => "deflection immediate response",
                6 => "mobile subscriber not reachable",
                _ => "spare",
            }));
    }

    (field, DecodeStatus::Ok)
}

/// Circuit group supervision message type (1 octet)
pub fn decode_cgs_message_type(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Circuit group supervision message type", range, "needs 1 octet");
    }

    let code = data[0] & 0x03;
    let name = match code {
        0 => "maintenance oriented",
        1 => "hardware failure oriented",
        2 => "reserved for national use",
        _ => "spare",
    };

    let field = DecodedField::new(
        "Circuit group supervision message type",
        range.start,
        range.end,
        format!("Circuit group supervision message type: {}", name),
    )
    .with_value(FieldValue::Unsigned(code as u64));

    (field, DecodeStatus::Ok)
}

/// Range and status: range octet followed by a status bit field
pub fn decode_range_and_status(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Range and status", range, "needs at least 1 octet");
    }

    let at = range.start;
    let range_value = data[0];

    let mut field = DecodedField::new(
        "Range and status",
        at,
        range.end,
        format!("Range: {}", range_value),
    )
    .with_value(FieldValue::Unsigned(range_value as u64));

    field.push_child(
        DecodedField::new("Range", at, at + 1, format!("{}", range_value))
            .with_value(FieldValue::Unsigned(range_value as u64)),
    );
    if data.len() > 1 {
        field.push_child(
            DecodedField::new("Status", at + 1, range.end, format!("Status: {}", hex_string(&data[1..])))
                .with_value(FieldValue::Bytes(data[1..].to_vec())),
        );
    }

    (field, DecodeStatus::Ok)
}

/// Access delivery information (1 octet)
pub fn decode_access_delivery(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Access delivery information", range, "needs 1 octet");
    }

    let no_setup = data[0] & 0x01 != 0;
    let field = DecodedField::new(
        "Access delivery information",
        range.start,
        range.end,
        if no_setup { "no set-up message generated" } else { "set-up message generated" },
    )
    .with_value(FieldValue::Unsigned(no_setup as u64));

    (field, DecodeStatus::Ok)
}

/// Hop counter (1 octet, low 5 bits)
pub fn decode_hop_counter(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Hop counter", range, "needs 1 octet");
    }

    let hops = data[0] & 0x1F;
    let field = DecodedField::new(
        "Hop counter",
        range.start,
        range.end,
        format!("Hop counter: {}", hops),
    )
    .with_value(FieldValue::Unsigned(hops as u64));

    (field, DecodeStatus::Ok)
}

/// Propagation delay counter (2 octets, big-endian milliseconds)
pub fn decode_propagation_delay(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.len() < 2 {
        return malformed_field("Propagation delay counter", range, "needs 2 octets");
    }

    let delay = u16::from_be_bytes([data[0], data[1]]);
    let field = DecodedField::new(
        "Propagation delay counter",
        range.start,
        range.end,
        format!("Propagation delay: {} ms", delay),
    )
    .with_value(FieldValue::Unsigned(delay as u64));

    (field, DecodeStatus::Ok)
}

/// Call history information (2 octets, big-endian milliseconds)
pub fn decode_call_history(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.len() < 2 {
        return malformed_field("Call history information", range, "needs 2 octets");
    }

    let delay = u16::from_be_bytes([data[0], data[1]]);
    let field = DecodedField::new(
        "Call history information",
        range.start,
        range.end,
        format!("Propagation delay value: {} ms", delay),
    )
    .with_value(FieldValue::Unsigned(delay as u64));

    (field, DecodeStatus::Ok)
}

/// User service information (bearer capability octets, Q.931 coding)
///
/// Only the leading coding/transfer octets get named sub-fields; the
/// remaining layer octets are reported as raw content.
pub fn decode_user_service_information(name: &str, buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field(name, range, "needs at least 1 octet");
    }

    let at = range.start;
    let capability = data[0] & 0x1F;
    let coding = (data[0] >> 5) & 0x03;

    let capability_name = match capability {
        0 => "speech",
        8 => "unrestricted digital information",
        9 => "restricted digital information",
        16 => "3.1 kHz audio",
        17 => "unrestricted digital information with tones/announcements",
        24 => "video",
        _ => "reserved",
    };

    let mut field = DecodedField::new(
        name,
        at,
        range.end,
        format!("{}: {}", name, capability_name),
    )
    .with_value(FieldValue::Unsigned(capability as u64));

    field.push_child(bit_group("Coding standard", at, coding, match coding {
        0 => "ITU-T standardized coding",
        1 => "ISO/IEC standard",
        2 => "national standard",
        _ => "standard defined for the network",
    }));
    field.push_child(bit_group("Information transfer capability", at, capability, capability_name));

    if data.len() > 1 {
        let rate = data[1] & 0x1F;
        let mode = (data[1] >> 5) & 0x03;
        field.push_child(bit_group("Transfer mode", at + 1, mode, match mode {
            0 => "circuit mode",
            2 => "packet mode",
            _ => "reserved",
        }));
        field.push_child(bit_group("Information transfer rate", at + 1, rate, match rate {
            16 => "64 kbit/s",
            17 => "2 x 64 kbit/s",
            19 => "384 kbit/s",
            21 => "1536 kbit/s",
            23 => "1920 kbit/s",
            _ => "reserved",
        }));
    }
    if data.len() > 2 {
        field.push_child(
            DecodedField::new("Layer information", at + 2, range.end, hex_string(&data[2..]))
                .with_value(FieldValue::Bytes(data[2..].to_vec())),
        );
    }

    (field, DecodeStatus::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nature_of_connection() {
        // one satellite, continuity check required, echo control included
        let buf = [0x15];
        let (field, status) = decode_nature_of_connection(&buf, 0..1);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.children[0].display, "one satellite circuit in the connection");
        assert_eq!(field.children[1].display, "continuity check required on this circuit");
        assert_eq!(field.children[2].display, "echo control device included");
    }

    #[test]
    fn test_forward_call_bit_groups() {
        // international, SCCP method available, ISUP all the way
        let buf = [0x25, 0x00];
        let (field, status) = decode_forward_call(&buf, 0..2);
        assert_eq!(status, DecodeStatus::Ok);
        let find = |n: &str| field.children.iter().find(|c| c.name == n).unwrap();
        assert_eq!(find("National/international call indicator").display,
            "call to be treated as an international call");
        assert_eq!(find("End-to-end method indicator").display, "SCCP method available");
        assert_eq!(find("ISDN user part indicator").display, "ISDN user part used all the way");
    }

    #[test]
    fn test_backward_call_charge_and_status() {
        // charge, subscriber free; terminating access ISDN
        let buf = [0x06, 0x10];
        let (field, status) = decode_backward_call(&buf, 0..2);
        assert_eq!(status, DecodeStatus::Ok);
        let find = |n: &str| field.children.iter().find(|c| c.name == n).unwrap();
        assert_eq!(find("Charge indicator").display, "charge");
        assert_eq!(find("Called party's status indicator").display, "subscriber free");
        assert_eq!(find("ISDN access indicator").display, "terminating access ISDN");
    }

    #[test]
    fn test_event_information_presentation_bit() {
        let buf = [0x81];
        let (field, status) = decode_event_information(&buf, 0..1);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.display, "Event: ALERTING");
        assert_eq!(field.children[1].display, "presentation restricted");
    }

    #[test]
    fn test_two_octet_indicators_reject_short_input() {
        let buf = [0x01];
        assert!(decode_forward_call(&buf, 0..1).1.is_malformed());
        assert!(decode_backward_call(&buf, 0..1).1.is_malformed());
        assert!(decode_information(&buf, 0..1).1.is_malformed());
        assert!(decode_propagation_delay(&buf, 0..1).1.is_malformed());
    }

    #[test]
    fn test_range_and_status() {
        let buf = [0x1F, 0xFF, 0x03];
        let (field, status) = decode_range_and_status(&buf, 0..3);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.display, "Range: 31");
        assert_eq!(field.children.len(), 2);
    }

    #[test]
    fn test_calling_partys_category_names() {
        let buf = [10];
        let (field, _) = decode_calling_partys_category(&buf, 0..1);
        assert_eq!(field.display, "Calling party's category: ordinary calling subscriber");
        let buf = [13];
        let (field, _) = decode_calling_partys_category(&buf, 0..1);
        assert_eq!(field.display, "Calling party's category: test call");
    }
}
