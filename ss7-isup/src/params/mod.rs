//! ISUP parameter decoder set
//!
//! One decode routine per named parameter type (ITU-T Q.763 §3). Every
//! decoder operates only on the sub-slice it is handed; the caller has
//! already resolved the slice boundary from the declared parameter length,
//! and no decoder reads outside it. A decoder that needs more bytes than the
//! declared length allows produces a field flagged malformed; the enclosing
//! walker then advances by the declared length, which stays authoritative
//! for framing.
//!
//! Parameter types are an open set: newer protocol revisions add types, so
//! dispatch falls back to an opaque placeholder for anything unrecognized
//! instead of failing the message.

pub mod address;
pub mod bat_ase;
pub mod cause;
pub mod indicators;

use core::ops::Range;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use ss7_core::field::{DecodeStatus, DecodedField, FieldValue};

/// Q.763 parameter type codes
pub mod param_type {
    pub const END_OF_OPTIONAL_PARAMETERS: u8 = 0x00;
    pub const CALL_REFERENCE: u8 = 0x01;
    pub const TRANSMISSION_MEDIUM_REQUIREMENT: u8 = 0x02;
    pub const ACCESS_TRANSPORT: u8 = 0x03;
    pub const CALLED_PARTY_NUMBER: u8 = 0x04;
    pub const SUBSEQUENT_NUMBER: u8 = 0x05;
    pub const NATURE_OF_CONNECTION_INDICATORS: u8 = 0x06;
    pub const FORWARD_CALL_INDICATORS: u8 = 0x07;
    pub const OPTIONAL_FORWARD_CALL_INDICATORS: u8 = 0x08;
    pub const CALLING_PARTYS_CATEGORY: u8 = 0x09;
    pub const CALLING_PARTY_NUMBER: u8 = 0x0A;
    pub const REDIRECTING_NUMBER: u8 = 0x0B;
    pub const REDIRECTION_NUMBER: u8 = 0x0C;
    pub const CONNECTION_REQUEST: u8 = 0x0D;
    pub const INFORMATION_REQUEST_INDICATORS: u8 = 0x0E;
    pub const INFORMATION_INDICATORS: u8 = 0x0F;
    pub const CONTINUITY_INDICATORS: u8 = 0x10;
    pub const BACKWARD_CALL_INDICATORS: u8 = 0x11;
    pub const CAUSE_INDICATORS: u8 = 0x12;
    pub const REDIRECTION_INFORMATION: u8 = 0x13;
    pub const CIRCUIT_GROUP_SUPERVISION_MESSAGE_TYPE: u8 = 0x15;
    pub const RANGE_AND_STATUS: u8 = 0x16;
    pub const FACILITY_INDICATOR: u8 = 0x18;
    pub const CLOSED_USER_GROUP_INTERLOCK_CODE: u8 = 0x1A;
    pub const USER_SERVICE_INFORMATION: u8 = 0x1D;
    pub const SIGNALLING_POINT_CODE: u8 = 0x1E;
    pub const USER_TO_USER_INFORMATION: u8 = 0x20;
    pub const CONNECTED_NUMBER: u8 = 0x21;
    pub const SUSPEND_RESUME_INDICATORS: u8 = 0x22;
    pub const TRANSIT_NETWORK_SELECTION: u8 = 0x23;
    pub const EVENT_INFORMATION: u8 = 0x24;
    pub const CIRCUIT_ASSIGNMENT_MAP: u8 = 0x25;
    pub const CIRCUIT_STATE_INDICATOR: u8 = 0x26;
    pub const AUTOMATIC_CONGESTION_LEVEL: u8 = 0x27;
    pub const ORIGINAL_CALLED_NUMBER: u8 = 0x28;
    pub const OPTIONAL_BACKWARD_CALL_INDICATORS: u8 = 0x29;
    pub const USER_TO_USER_INDICATORS: u8 = 0x2A;
    pub const ORIGINATION_ISC_POINT_CODE: u8 = 0x2B;
    pub const GENERIC_NOTIFICATION_INDICATOR: u8 = 0x2C;
    pub const CALL_HISTORY_INFORMATION: u8 = 0x2D;
    pub const ACCESS_DELIVERY_INFORMATION: u8 = 0x2E;
    pub const NETWORK_SPECIFIC_FACILITY: u8 = 0x2F;
    pub const USER_SERVICE_INFORMATION_PRIME: u8 = 0x30;
    pub const PROPAGATION_DELAY_COUNTER: u8 = 0x31;
    pub const REMOTE_OPERATIONS: u8 = 0x32;
    pub const SERVICE_ACTIVATION: u8 = 0x33;
    pub const USER_TELESERVICE_INFORMATION: u8 = 0x34;
    pub const TRANSMISSION_MEDIUM_USED: u8 = 0x35;
    pub const CALL_DIVERSION_INFORMATION: u8 = 0x36;
    pub const ECHO_CONTROL_INFORMATION: u8 = 0x37;
    pub const MESSAGE_COMPATIBILITY_INFORMATION: u8 = 0x38;
    pub const PARAMETER_COMPATIBILITY_INFORMATION: u8 = 0x39;
    pub const MLPP_PRECEDENCE: u8 = 0x3A;
    pub const MCID_REQUEST_INDICATORS: u8 = 0x3B;
    pub const MCID_RESPONSE_INDICATORS: u8 = 0x3C;
    pub const HOP_COUNTER: u8 = 0x3D;
    pub const TRANSMISSION_MEDIUM_REQUIREMENT_PRIME: u8 = 0x3E;
    pub const LOCATION_NUMBER: u8 = 0x3F;
    pub const REDIRECTION_NUMBER_RESTRICTION: u8 = 0x40;
    pub const CALL_TRANSFER_REFERENCE: u8 = 0x43;
    pub const LOOP_PREVENTION_INDICATORS: u8 = 0x44;
    pub const CALL_TRANSFER_NUMBER: u8 = 0x45;
    pub const CCSS: u8 = 0x4B;
    pub const FORWARD_GVNS: u8 = 0x4C;
    pub const BACKWARD_GVNS: u8 = 0x4D;
    pub const REDIRECT_CAPABILITY: u8 = 0x4E;
    pub const NETWORK_MANAGEMENT_CONTROLS: u8 = 0x5B;
    pub const CORRELATION_ID: u8 = 0x65;
    pub const SCF_ID: u8 = 0x66;
    pub const CALL_DIVERSION_TREATMENT_INDICATORS: u8 = 0x6E;
    pub const CALLED_IN_NUMBER: u8 = 0x6F;
    pub const CALL_OFFERING_TREATMENT_INDICATORS: u8 = 0x70;
    pub const CHARGED_PARTY_IDENTIFICATION: u8 = 0x71;
    pub const CONFERENCE_TREATMENT_INDICATORS: u8 = 0x72;
    pub const DISPLAY_INFORMATION: u8 = 0x73;
    pub const UID_ACTION_INDICATORS: u8 = 0x74;
    pub const UID_CAPABILITY_INDICATORS: u8 = 0x75;
    pub const REDIRECT_COUNTER: u8 = 0x77;
    pub const APPLICATION_TRANSPORT: u8 = 0x78;
    pub const COLLECT_CALL_REQUEST: u8 = 0x79;
    pub const CALLING_GEODETIC_LOCATION: u8 = 0x81;
    pub const GENERIC_NUMBER: u8 = 0xC0;
    pub const GENERIC_DIGITS: u8 = 0xC1;
}

/// Parameter type → display name
///
/// Kept as a lazily built lookup table rather than a match because the
/// parameter space is open: unknown codes fall through to the opaque
/// fallback, known codes only need a name here.
static PARAM_NAMES: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    use param_type::*;
    HashMap::from([
        (END_OF_OPTIONAL_PARAMETERS, "End of optional parameters"),
        (CALL_REFERENCE, "Call reference"),
        (TRANSMISSION_MEDIUM_REQUIREMENT, "Transmission medium requirement"),
        (ACCESS_TRANSPORT, "Access transport"),
        (CALLED_PARTY_NUMBER, "Called party number"),
        (SUBSEQUENT_NUMBER, "Subsequent number"),
        (NATURE_OF_CONNECTION_INDICATORS, "Nature of connection indicators"),
        (FORWARD_CALL_INDICATORS, "Forward call indicators"),
        (OPTIONAL_FORWARD_CALL_INDICATORS, "Optional forward call indicators"),
        (CALLING_PARTYS_CATEGORY, "Calling party's category"),
        (CALLING_PARTY_NUMBER, "Calling party number"),
        (REDIRECTING_NUMBER, "Redirecting number"),
        (REDIRECTION_NUMBER, "Redirection number"),
        (CONNECTION_REQUEST, "Connection request"),
        (INFORMATION_REQUEST_INDICATORS, "Information request indicators"),
        (INFORMATION_INDICATORS, "Information indicators"),
        (CONTINUITY_INDICATORS, "Continuity indicators"),
        (BACKWARD_CALL_INDICATORS, "Backward call indicators"),
        (CAUSE_INDICATORS, "Cause indicators"),
        (REDIRECTION_INFORMATION, "Redirection information"),
        (CIRCUIT_GROUP_SUPERVISION_MESSAGE_TYPE, "Circuit group supervision message type"),
        (RANGE_AND_STATUS, "Range and status"),
        (FACILITY_INDICATOR, "Facility indicator"),
        (CLOSED_USER_GROUP_INTERLOCK_CODE, "Closed user group interlock code"),
        (USER_SERVICE_INFORMATION, "User service information"),
        (SIGNALLING_POINT_CODE, "Signalling point code"),
        (USER_TO_USER_INFORMATION, "User-to-user information"),
        (CONNECTED_NUMBER, "Connected number"),
        (SUSPEND_RESUME_INDICATORS, "Suspend/resume indicators"),
        (TRANSIT_NETWORK_SELECTION, "Transit network selection"),
        (EVENT_INFORMATION, "Event information"),
        (CIRCUIT_ASSIGNMENT_MAP, "Circuit assignment map"),
        (CIRCUIT_STATE_INDICATOR, "Circuit state indicator"),
        (AUTOMATIC_CONGESTION_LEVEL, "Automatic congestion level"),
        (ORIGINAL_CALLED_NUMBER, "Original called number"),
        (OPTIONAL_BACKWARD_CALL_INDICATORS, "Optional backward call indicators"),
        (USER_TO_USER_INDICATORS, "User-to-user indicators"),
        (ORIGINATION_ISC_POINT_CODE, "Origination ISC point code"),
        (GENERIC_NOTIFICATION_INDICATOR, "Generic notification indicator"),
        (CALL_HISTORY_INFORMATION, "Call history information"),
        (ACCESS_DELIVERY_INFORMATION, "Access delivery information"),
        (NETWORK_SPECIFIC_FACILITY, "Network specific facility"),
        (USER_SERVICE_INFORMATION_PRIME, "User service information prime"),
        (PROPAGATION_DELAY_COUNTER, "Propagation delay counter"),
        (REMOTE_OPERATIONS, "Remote operations"),
        (SERVICE_ACTIVATION, "Service activation"),
        (USER_TELESERVICE_INFORMATION, "User teleservice information"),
        (TRANSMISSION_MEDIUM_USED, "Transmission medium used"),
        (CALL_DIVERSION_INFORMATION, "Call diversion information"),
        (ECHO_CONTROL_INFORMATION, "Echo control information"),
        (MESSAGE_COMPATIBILITY_INFORMATION, "Message compatibility information"),
        (PARAMETER_COMPATIBILITY_INFORMATION, "Parameter compatibility information"),
        (MLPP_PRECEDENCE, "MLPP precedence"),
        (MCID_REQUEST_INDICATORS, "MCID request indicators"),
        (MCID_RESPONSE_INDICATORS, "MCID response indicators"),
        (HOP_COUNTER, "Hop counter"),
        (TRANSMISSION_MEDIUM_REQUIREMENT_PRIME, "Transmission medium requirement prime"),
        (LOCATION_NUMBER, "Location number"),
        (REDIRECTION_NUMBER_RESTRICTION, "Redirection number restriction"),
        (CALL_TRANSFER_REFERENCE, "Call transfer reference"),
        (LOOP_PREVENTION_INDICATORS, "Loop prevention indicators"),
        (CALL_TRANSFER_NUMBER, "Call transfer number"),
        (CCSS, "CCSS"),
        (FORWARD_GVNS, "Forward GVNS"),
        (BACKWARD_GVNS, "Backward GVNS"),
        (REDIRECT_CAPABILITY, "Redirect capability"),
        (NETWORK_MANAGEMENT_CONTROLS, "Network management controls"),
        (CORRELATION_ID, "Correlation id"),
        (SCF_ID, "SCF id"),
        (CALL_DIVERSION_TREATMENT_INDICATORS, "Call diversion treatment indicators"),
        (CALLED_IN_NUMBER, "Called IN number"),
        (CALL_OFFERING_TREATMENT_INDICATORS, "Call offering treatment indicators"),
        (CHARGED_PARTY_IDENTIFICATION, "Charged party identification"),
        (CONFERENCE_TREATMENT_INDICATORS, "Conference treatment indicators"),
        (DISPLAY_INFORMATION, "Display information"),
        (UID_ACTION_INDICATORS, "UID action indicators"),
        (UID_CAPABILITY_INDICATORS, "UID capability indicators"),
        (REDIRECT_COUNTER, "Redirect counter"),
        (APPLICATION_TRANSPORT, "Application transport"),
        (COLLECT_CALL_REQUEST, "Collect call request"),
        (CALLING_GEODETIC_LOCATION, "Calling geodetic location"),
        (GENERIC_NUMBER, "Generic number"),
        (GENERIC_DIGITS, "Generic digits"),
    ])
});

/// Display name for a parameter type, if recognized
pub fn param_name(ptype: u8) -> Option<&'static str> {
    PARAM_NAMES.get(&ptype).copied()
}

/// Render a byte slice as spaced hex
pub(crate) fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a field flagged as malformed
///
/// Used by decoders whose declared length is inconsistent with their
/// internal structure; the walker keeps going using the declared length.
pub(crate) fn malformed_field(
    name: &str,
    range: Range<usize>,
    reason: &str,
) -> (DecodedField, DecodeStatus) {
    let offset = range.start;
    log::debug!("malformed parameter {:?} at offset {}: {}", name, offset, reason);
    let field = DecodedField::new(name, range.start, range.end, format!("Malformed: {}", reason));
    (field, DecodeStatus::Malformed { offset })
}

/// Fallback for a recognized parameter type without a field-level decoder:
/// the contents are rendered as hex but the decode is still clean.
fn raw_named(name: &str, buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    let display = if data.is_empty() {
        format!("{} (empty)", name)
    } else {
        format!("{}: {}", name, hex_string(data))
    };
    let field = DecodedField::new(name, range.start, range.end, display)
        .with_value(FieldValue::Bytes(data.to_vec()));
    (field, DecodeStatus::Ok)
}

/// Fallback for an unrecognized parameter type
///
/// Never fails the message: newer protocol revisions introduce parameter
/// types this decoder has not heard of, and they must be skippable.
pub fn unknown_parameter(ptype: u8, buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    log::debug!("unknown parameter type 0x{:02X} ({} bytes)", ptype, data.len());
    let field = DecodedField::new(
        format!("Parameter 0x{:02X}", ptype),
        range.start,
        range.end,
        format!("Type unknown, {} bytes, contents opaque", data.len()),
    )
    .with_value(FieldValue::Bytes(data.to_vec()));
    (field, DecodeStatus::OkWithUnknowns)
}

/// Decode one parameter value
///
/// `range` is the absolute extent of the parameter value (excluding the
/// type and length octets); it has already been bounds-checked against the
/// buffer. Dispatches on the parameter type to the matching decoder, a
/// hex-rendering fallback for recognized types without one, or the opaque
/// unknown-parameter placeholder.
pub fn decode_parameter(ptype: u8, buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    use param_type::*;

    match ptype {
        CALLED_PARTY_NUMBER => address::decode_called_party_number(buf, range),
        SUBSEQUENT_NUMBER => address::decode_subsequent_number(buf, range),
        CALLING_PARTY_NUMBER => {
            address::decode_calling_style_number("Calling party number", address::ScreeningTable::Basic, buf, range)
        }
        CONNECTED_NUMBER => {
            address::decode_calling_style_number("Connected number", address::ScreeningTable::Basic, buf, range)
        }
        REDIRECTING_NUMBER => {
            address::decode_calling_style_number("Redirecting number", address::ScreeningTable::Basic, buf, range)
        }
        ORIGINAL_CALLED_NUMBER => {
            address::decode_calling_style_number("Original called number", address::ScreeningTable::Basic, buf, range)
        }
        LOCATION_NUMBER => {
            address::decode_calling_style_number("Location number", address::ScreeningTable::Basic, buf, range)
        }
        REDIRECTION_NUMBER => address::decode_called_style_number("Redirection number", buf, range),
        CALLED_IN_NUMBER => {
            address::decode_calling_style_number("Called IN number", address::ScreeningTable::Basic, buf, range)
        }
        // Call transfer number and generic number use the enhanced screening
        // table; this is a static per-parameter choice, not a data flag.
        CALL_TRANSFER_NUMBER => {
            address::decode_calling_style_number("Call transfer number", address::ScreeningTable::Enhanced, buf, range)
        }
        GENERIC_NUMBER => address::decode_generic_number(buf, range),
        GENERIC_DIGITS => address::decode_generic_digits(buf, range),

        CAUSE_INDICATORS => cause::decode_cause_indicators(buf, range),

        NATURE_OF_CONNECTION_INDICATORS => indicators::decode_nature_of_connection(buf, range),
        FORWARD_CALL_INDICATORS => indicators::decode_forward_call(buf, range),
        BACKWARD_CALL_INDICATORS => indicators::decode_backward_call(buf, range),
        OPTIONAL_FORWARD_CALL_INDICATORS => indicators::decode_optional_forward_call(buf, range),
        OPTIONAL_BACKWARD_CALL_INDICATORS => indicators::decode_optional_backward_call(buf, range),
        CALLING_PARTYS_CATEGORY => indicators::decode_calling_partys_category(buf, range),
        TRANSMISSION_MEDIUM_REQUIREMENT | TRANSMISSION_MEDIUM_REQUIREMENT_PRIME | TRANSMISSION_MEDIUM_USED => {
            indicators::decode_transmission_medium(param_name(ptype).unwrap_or("Transmission medium"), buf, range)
        }
        CONTINUITY_INDICATORS => indicators::decode_continuity(buf, range),
        EVENT_INFORMATION => indicators::decode_event_information(buf, range),
        SUSPEND_RESUME_INDICATORS => indicators::decode_suspend_resume(buf, range),
        INFORMATION_INDICATORS => indicators::decode_information(buf, range),
        INFORMATION_REQUEST_INDICATORS => indicators::decode_information_request(buf, range),
        REDIRECTION_INFORMATION => indicators::decode_redirection_information(buf, range),
        CIRCUIT_GROUP_SUPERVISION_MESSAGE_TYPE => indicators::decode_cgs_message_type(buf, range),
        RANGE_AND_STATUS => indicators::decode_range_and_status(buf, range),
        ACCESS_DELIVERY_INFORMATION => indicators::decode_access_delivery(buf, range),
        HOP_COUNTER => indicators::decode_hop_counter(buf, range),
        PROPAGATION_DELAY_COUNTER => indicators::decode_propagation_delay(buf, range),
        CALL_HISTORY_INFORMATION => indicators::decode_call_history(buf, range),
        USER_SERVICE_INFORMATION | USER_SERVICE_INFORMATION_PRIME => {
            indicators::decode_user_service_information(param_name(ptype).unwrap_or("User service information"), buf, range)
        }

        APPLICATION_TRANSPORT => bat_ase::decode_application_transport(buf, range),

        _ => match param_name(ptype) {
            Some(name) => raw_named(name, buf, range),
            None => unknown_parameter(ptype, buf, range),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_name_lookup() {
        assert_eq!(param_name(param_type::CAUSE_INDICATORS), Some("Cause indicators"));
        assert_eq!(param_name(0xFE), None);
    }

    #[test]
    fn test_unknown_parameter_is_opaque_not_fatal() {
        let buf = [0xDE, 0xAD, 0xBE];
        let (field, status) = decode_parameter(0xFE, &buf, 0..3);
        assert_eq!(status, DecodeStatus::OkWithUnknowns);
        assert!(field.display.contains("unknown"));
        assert_eq!(field.value, Some(FieldValue::Bytes(vec![0xDE, 0xAD, 0xBE])));
    }

    #[test]
    fn test_recognized_raw_parameter_stays_clean() {
        let buf = [0x01, 0x02];
        let (field, status) = decode_parameter(param_type::CALL_REFERENCE, &buf, 0..2);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.name, "Call reference");
    }

    // Length-bound containment: decoders only see their sub-slice and the
    // sentinel bytes around it stay untouched in the produced ranges.
    #[test]
    fn test_decoders_stay_inside_declared_range() {
        let mut buf = vec![0xAA; 4];
        buf.extend_from_slice(&[0x83, 0x10, 0x21, 0x43]);
        buf.extend_from_slice(&[0xAA; 4]);
        let range = 4..8;

        for ptype in 0u8..=0xFF {
            let (field, _) = decode_parameter(ptype, &buf, range.clone());
            let mut stack = vec![&field];
            while let Some(f) = stack.pop() {
                assert!(f.start >= range.start && f.end <= range.end,
                    "field {:?} of param 0x{:02X} escapes its slice", f.name, ptype);
                stack.extend(f.children.iter());
            }
        }
    }
}
