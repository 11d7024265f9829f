//! ISUP message-type dispatch
//!
//! Each message type selects a static layout: the ordered mandatory fixed
//! parameters, the mandatory variable parameters (each located through a
//! one-byte relative pointer), and whether an optional-parameter part may
//! follow (located through a final pointer, zero meaning absent). The
//! layouts are compile-time tables; decoding never mutates shared state, so
//! independent invocations over the same bytes yield identical output.

use ss7_core::error::{SigError, SigResult};
use ss7_core::field::{DecodeStatus, DecodedField, FieldValue, MessageOutput};

use crate::optional::walk_optional_tail;
use crate::params::{self, param_type};

/// Maximum pass-along nesting depth
///
/// A crafted message can nest pass-along bodies arbitrarily deep; the bound
/// turns that into a reported marker instead of a stack overflow.
pub const MAX_NESTING_DEPTH: usize = 16;

/// ISUP message types (ITU-T Q.762/Q.763)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    InitialAddress = 1,
    SubsequentAddress = 2,
    InformationRequest = 3,
    Information = 4,
    Continuity = 5,
    AddressComplete = 6,
    Connect = 7,
    ForwardTransfer = 8,
    Answer = 9,
    Release = 12,
    Suspend = 13,
    Resume = 14,
    ReleaseComplete = 16,
    ContinuityCheckRequest = 17,
    ResetCircuit = 18,
    Blocking = 19,
    Unblocking = 20,
    BlockingAck = 21,
    UnblockingAck = 22,
    CircuitGroupReset = 23,
    CircuitGroupBlocking = 24,
    CircuitGroupUnblocking = 25,
    CircuitGroupBlockingAck = 26,
    CircuitGroupUnblockingAck = 27,
    FacilityRequest = 31,
    FacilityAccepted = 32,
    FacilityReject = 33,
    LoopbackAck = 36,
    PassAlong = 40,
    CircuitGroupResetAck = 41,
    CircuitGroupQuery = 42,
    CircuitGroupQueryResponse = 43,
    CallProgress = 44,
    UserToUserInformation = 45,
    UnequippedCic = 46,
    Confusion = 47,
    Overload = 48,
    ChargeInformation = 49,
    NetworkResourceManagement = 50,
    Facility = 51,
    UserPartTest = 52,
    UserPartAvailable = 53,
    IdentificationRequest = 54,
    IdentificationResponse = 55,
    Segmentation = 56,
    LoopPrevention = 64,
    ApplicationTransport = 65,
    PreReleaseInformation = 66,
    SubsequentDirectoryNumber = 67,
}

impl MessageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        use MessageType::*;
        Some(match value {
            1 => InitialAddress,
            2 => SubsequentAddress,
            3 => InformationRequest,
            4 => Information,
            5 => Continuity,
            6 => AddressComplete,
            7 => Connect,
            8 => ForwardTransfer,
            9 => Answer,
            12 => Release,
            13 => Suspend,
            14 => Resume,
            16 => ReleaseComplete,
            17 => ContinuityCheckRequest,
            18 => ResetCircuit,
            19 => Blocking,
            20 => Unblocking,
            21 => BlockingAck,
            22 => UnblockingAck,
            23 => CircuitGroupReset,
            24 => CircuitGroupBlocking,
            25 => CircuitGroupUnblocking,
            26 => CircuitGroupBlockingAck,
            27 => CircuitGroupUnblockingAck,
            31 => FacilityRequest,
            32 => FacilityAccepted,
            33 => FacilityReject,
            36 => LoopbackAck,
            40 => PassAlong,
            41 => CircuitGroupResetAck,
            42 => CircuitGroupQuery,
            43 => CircuitGroupQueryResponse,
            44 => CallProgress,
            45 => UserToUserInformation,
            46 => UnequippedCic,
            47 => Confusion,
            48 => Overload,
            49 => ChargeInformation,
            50 => NetworkResourceManagement,
            51 => Facility,
            52 => UserPartTest,
            53 => UserPartAvailable,
            54 => IdentificationRequest,
            55 => IdentificationResponse,
            56 => Segmentation,
            64 => LoopPrevention,
            65 => ApplicationTransport,
            66 => PreReleaseInformation,
            67 => SubsequentDirectoryNumber,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        use MessageType::*;
        match self {
            InitialAddress => "Initial address",
            SubsequentAddress => "Subsequent address",
            InformationRequest => "Information request",
            Information => "Information",
            Continuity => "Continuity",
            AddressComplete => "Address complete",
            Connect => "Connect",
            ForwardTransfer => "Forward transfer",
            Answer => "Answer",
            Release => "Release",
            Suspend => "Suspend",
            Resume => "Resume",
            ReleaseComplete => "Release complete",
            ContinuityCheckRequest => "Continuity check request",
            ResetCircuit => "Reset circuit",
            Blocking => "Blocking",
            Unblocking => "Unblocking",
            BlockingAck => "Blocking acknowledgement",
            UnblockingAck => "Unblocking acknowledgement",
            CircuitGroupReset => "Circuit group reset",
            CircuitGroupBlocking => "Circuit group blocking",
            CircuitGroupUnblocking => "Circuit group unblocking",
            CircuitGroupBlockingAck => "Circuit group blocking acknowledgement",
            CircuitGroupUnblockingAck => "Circuit group unblocking acknowledgement",
            FacilityRequest => "Facility request",
            FacilityAccepted => "Facility accepted",
            FacilityReject => "Facility reject",
            LoopbackAck => "Loop back acknowledgement",
            PassAlong => "Pass-along",
            CircuitGroupResetAck => "Circuit group reset acknowledgement",
            CircuitGroupQuery => "Circuit group query",
            CircuitGroupQueryResponse => "Circuit group query response",
            CallProgress => "Call progress",
            UserToUserInformation => "User-to-user information",
            UnequippedCic => "Unequipped CIC",
            Confusion => "Confusion",
            Overload => "Overload",
            ChargeInformation => "Charge information",
            NetworkResourceManagement => "Network resource management",
            Facility => "Facility",
            UserPartTest => "User part test",
            UserPartAvailable => "User part available",
            IdentificationRequest => "Identification request",
            IdentificationResponse => "Identification response",
            Segmentation => "Segmentation",
            LoopPrevention => "Loop prevention",
            ApplicationTransport => "Application transport",
            PreReleaseInformation => "Pre-release information",
            SubsequentDirectoryNumber => "Subsequent directory number",
        }
    }
}

/// One mandatory fixed parameter: type and its fixed length in octets
#[derive(Debug, Clone, Copy)]
pub struct FixedParam {
    pub ptype: u8,
    pub len: usize,
}

/// Static layout of one message type
#[derive(Debug, Clone, Copy)]
pub struct MessageLayout {
    pub fixed: &'static [FixedParam],
    pub variable: &'static [u8],
    pub has_optional: bool,
}

const EMPTY: MessageLayout = MessageLayout {
    fixed: &[],
    variable: &[],
    has_optional: false,
};

const OPTIONAL_ONLY: MessageLayout = MessageLayout {
    fixed: &[],
    variable: &[],
    has_optional: true,
};

/// Layout table (ITU-T Q.763 message format tables)
pub fn layout(message_type: MessageType) -> MessageLayout {
    use MessageType::*;
    use param_type::*;
    match message_type {
        InitialAddress => MessageLayout {
            fixed: &[
                FixedParam { ptype: NATURE_OF_CONNECTION_INDICATORS, len: 1 },
                FixedParam { ptype: FORWARD_CALL_INDICATORS, len: 2 },
                FixedParam { ptype: CALLING_PARTYS_CATEGORY, len: 1 },
                FixedParam { ptype: TRANSMISSION_MEDIUM_REQUIREMENT, len: 1 },
            ],
            variable: &[CALLED_PARTY_NUMBER],
            has_optional: true,
        },
        SubsequentAddress => MessageLayout {
            fixed: &[],
            variable: &[SUBSEQUENT_NUMBER],
            has_optional: true,
        },
        InformationRequest => MessageLayout {
            fixed: &[FixedParam { ptype: INFORMATION_REQUEST_INDICATORS, len: 2 }],
            variable: &[],
            has_optional: true,
        },
        Information => MessageLayout {
            fixed: &[FixedParam { ptype: INFORMATION_INDICATORS, len: 2 }],
            variable: &[],
            has_optional: true,
        },
        Continuity => MessageLayout {
            fixed: &[FixedParam { ptype: CONTINUITY_INDICATORS, len: 1 }],
            variable: &[],
            has_optional: false,
        },
        AddressComplete | Connect => MessageLayout {
            fixed: &[FixedParam { ptype: BACKWARD_CALL_INDICATORS, len: 2 }],
            variable: &[],
            has_optional: true,
        },
        Release => MessageLayout {
            fixed: &[],
            variable: &[CAUSE_INDICATORS],
            has_optional: true,
        },
        Suspend | Resume => MessageLayout {
            fixed: &[FixedParam { ptype: SUSPEND_RESUME_INDICATORS, len: 1 }],
            variable: &[],
            has_optional: true,
        },
        CallProgress => MessageLayout {
            fixed: &[FixedParam { ptype: EVENT_INFORMATION, len: 1 }],
            variable: &[],
            has_optional: true,
        },
        CircuitGroupReset | CircuitGroupResetAck | CircuitGroupQuery => MessageLayout {
            fixed: &[],
            variable: &[RANGE_AND_STATUS],
            has_optional: false,
        },
        CircuitGroupQueryResponse => MessageLayout {
            fixed: &[],
            variable: &[RANGE_AND_STATUS, CIRCUIT_STATE_INDICATOR],
            has_optional: false,
        },
        CircuitGroupBlocking
        | CircuitGroupUnblocking
        | CircuitGroupBlockingAck
        | CircuitGroupUnblockingAck => MessageLayout {
            fixed: &[FixedParam { ptype: CIRCUIT_GROUP_SUPERVISION_MESSAGE_TYPE, len: 1 }],
            variable: &[RANGE_AND_STATUS],
            has_optional: false,
        },
        FacilityRequest | FacilityAccepted => MessageLayout {
            fixed: &[FixedParam { ptype: FACILITY_INDICATOR, len: 1 }],
            variable: &[],
            has_optional: true,
        },
        FacilityReject => MessageLayout {
            fixed: &[FixedParam { ptype: FACILITY_INDICATOR, len: 1 }],
            variable: &[CAUSE_INDICATORS],
            has_optional: true,
        },
        UserToUserInformation => MessageLayout {
            fixed: &[],
            variable: &[USER_TO_USER_INFORMATION],
            has_optional: false,
        },
        Confusion => MessageLayout {
            fixed: &[],
            variable: &[CAUSE_INDICATORS],
            has_optional: false,
        },
        ReleaseComplete
        | ForwardTransfer
        | Answer
        | NetworkResourceManagement
        | Facility
        | UserPartTest
        | UserPartAvailable
        | IdentificationRequest
        | IdentificationResponse
        | Segmentation
        | LoopPrevention
        | ApplicationTransport
        | PreReleaseInformation
        | SubsequentDirectoryNumber => OPTIONAL_ONLY,
        ContinuityCheckRequest
        | ResetCircuit
        | Blocking
        | Unblocking
        | BlockingAck
        | UnblockingAck
        | LoopbackAck
        | UnequippedCic
        | Overload
        | ChargeInformation => EMPTY,
        // Pass-along is dispatched before the layout tables apply
        PassAlong => EMPTY,
    }
}

/// Decode one ISUP message body starting at the message-type octet
///
/// `depth` counts pass-along nesting. Fails outright only when `start` is
/// already past the end of the buffer; everything else is reported through
/// the output status.
pub fn decode_body(buf: &[u8], start: usize, depth: usize) -> SigResult<MessageOutput> {
    let Some(&type_octet) = buf.get(start) else {
        return Err(SigError::TruncatedInput {
            offset: start,
            needed: 1,
            available: 0,
        });
    };

    let Some(message_type) = MessageType::from_u8(type_octet) else {
        // Unknown message type from a newer revision: report it opaquely
        log::debug!("unknown ISUP message type 0x{:02X}", type_octet);
        let mut output = MessageOutput::new(format!("Unknown message type 0x{:02X}", type_octet));
        output.push_field(
            DecodedField::new(
                "Message type",
                start,
                start + 1,
                format!("Unknown message type 0x{:02X}", type_octet),
            )
            .with_value(FieldValue::Unsigned(type_octet as u64)),
        );
        if buf.len() > start + 1 {
            output.push_field(
                DecodedField::new(
                    "Message body",
                    start + 1,
                    buf.len(),
                    format!("{} bytes, contents opaque", buf.len() - start - 1),
                )
                .with_value(FieldValue::Bytes(buf[start + 1..].to_vec())),
            );
        }
        output.degrade(DecodeStatus::OkWithUnknowns);
        output.consumed = buf.len() - start;
        return Ok(output);
    };

    let mut output = MessageOutput::new(message_type.name());
    output.push_field(
        DecodedField::new("Message type", start, start + 1, message_type.name())
            .with_value(FieldValue::Unsigned(type_octet as u64)),
    );

    if message_type == MessageType::PassAlong {
        return decode_pass_along(buf, start, depth, output);
    }

    let message_layout = layout(message_type);
    let mut pos = start + 1;
    // Furthest byte any parameter reached; pointer targets can lie beyond
    // the pointer fields themselves.
    let mut extent = pos;

    // Mandatory fixed part: parameters at fixed offsets, in table order
    for param in message_layout.fixed {
        if pos + param.len > buf.len() {
            output.degrade(DecodeStatus::Malformed { offset: pos });
            output.push_field(DecodedField::new(
                params::param_name(param.ptype).unwrap_or("Parameter"),
                pos,
                buf.len(),
                "Malformed: mandatory fixed parameter truncated",
            ));
            output.consumed = buf.len() - start;
            return Ok(output);
        }
        let (field, status) = params::decode_parameter(param.ptype, buf, pos..pos + param.len);
        output.degrade(status);
        output.push_field(field);
        pos += param.len;
        extent = extent.max(pos);
    }

    // Mandatory variable part: one pointer octet per parameter, each
    // resolved independently relative to its own position
    for &ptype in message_layout.variable {
        let Some(&pointer) = buf.get(pos) else {
            output.degrade(DecodeStatus::Malformed { offset: pos });
            output.consumed = buf.len() - start;
            return Ok(output);
        };
        let target = pos + pointer as usize;
        pos += 1;
        extent = extent.max(pos);

        let name = params::param_name(ptype).unwrap_or("Parameter");
        let Some(&length) = buf.get(target) else {
            output.degrade(DecodeStatus::Malformed { offset: target });
            output.push_field(DecodedField::new(
                name,
                target.min(buf.len()),
                buf.len(),
                "Malformed: variable parameter pointer out of range",
            ));
            continue;
        };
        let value_start = target + 1;
        let value_end = value_start + length as usize;
        if value_end > buf.len() {
            output.degrade(DecodeStatus::Malformed { offset: target });
            output.push_field(DecodedField::new(
                name,
                target,
                buf.len(),
                format!("Malformed: declared length {} exceeds buffer", length),
            ));
            continue;
        }

        let (field, status) = params::decode_parameter(ptype, buf, value_start..value_end);
        output.degrade(status);
        output.push_field(field);
        extent = extent.max(value_end);
    }

    // Optional part: final pointer, zero meaning absent
    if message_layout.has_optional {
        let Some(&pointer) = buf.get(pos) else {
            output.degrade(DecodeStatus::Malformed { offset: pos });
            output.consumed = buf.len() - start;
            return Ok(output);
        };
        let pointer_pos = pos;
        pos += 1;
        extent = extent.max(pos);

        if pointer != 0 {
            let opt_start = pointer_pos + pointer as usize;
            if opt_start >= buf.len() {
                output.degrade(DecodeStatus::Malformed { offset: pointer_pos });
            } else {
                let walk = walk_optional_tail(buf, opt_start);
                output.degrade(walk.status);
                for field in walk.fields {
                    output.push_field(field);
                }
                extent = extent.max(walk.end);
            }
        }
    }

    output.consumed = extent - start;
    Ok(output)
}

/// Pass-along: the body is itself a complete ISUP message
fn decode_pass_along(
    buf: &[u8],
    start: usize,
    depth: usize,
    mut output: MessageOutput,
) -> SigResult<MessageOutput> {
    let body_start = start + 1;

    if depth + 1 > MAX_NESTING_DEPTH {
        log::warn!("pass-along nesting exceeded {} levels", MAX_NESTING_DEPTH);
        output.push_field(DecodedField::new(
            "Embedded message",
            body_start.min(buf.len()),
            buf.len(),
            "Recursion limit exceeded, embedded message not decoded",
        ));
        output.degrade(DecodeStatus::Malformed { offset: body_start });
        output.consumed = buf.len() - start;
        return Ok(output);
    }

    match decode_body(buf, body_start, depth + 1) {
        Ok(inner) => {
            let mut embedded = DecodedField::new(
                "Embedded message",
                body_start,
                body_start + inner.consumed,
                inner.summary.clone(),
            );
            embedded.children = inner.fields;
            output.summary = format!("Pass-along: {}", inner.summary);
            output.degrade(inner.status);
            output.consumed = 1 + inner.consumed;
            output.push_field(embedded);
        }
        Err(_) => {
            // Empty pass-along body
            output.push_field(DecodedField::new(
                "Embedded message",
                body_start.min(buf.len()),
                buf.len(),
                "Empty pass-along body",
            ));
            output.degrade(DecodeStatus::Malformed { offset: body_start });
            output.consumed = buf.len() - start;
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    // IAM: nature of connection, forward call (2), category, TMR,
    // pointer to called party number, pointer to optional part
    fn sample_iam() -> Vec<u8> {
        vec![
            0x01,             // Initial address
            0x00,             // nature of connection
            0x20, 0x01,       // forward call indicators
            0x0A,             // calling party's category
            0x00,             // TMR: speech
            0x02,             // pointer to called party number
            0x07,             // pointer to optional part
            0x04, 0x03, 0x10, 0x21, 0x43, // called party number "1234" (even)
            0x00, // filler so optional pointer target is in range
            0x0A, 0x04, 0x02, 0x13, 0x21, 0x43, // calling party number
            0x00, // end of optional parameters
        ]
    }

    #[test]
    fn test_initial_address_full_decode() {
        let buf = sample_iam();
        let output = decode_body(&buf, 0, 0).unwrap();
        assert_eq!(output.summary, "Initial address");
        assert_eq!(output.status, DecodeStatus::Ok);

        let names: Vec<&str> = output.fields.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"Nature of connection indicators"));
        assert!(names.contains(&"Forward call indicators"));
        assert!(names.contains(&"Calling party's category"));
        assert!(names.contains(&"Transmission medium requirement"));
        assert!(names.contains(&"Called party number"));
        assert!(names.contains(&"Calling party number"));
        assert!(names.contains(&"End of optional parameters"));

        let called = output.fields.iter().find(|f| f.name == "Called party number").unwrap();
        assert_eq!(called.value, Some(FieldValue::Digits("1234".into())));
        assert_eq!(output.consumed, buf.len());
    }

    // The odd/even bit governs the digit count: an odd header on the same
    // digit octets drops the trailing filler nibble.
    #[test]
    fn test_iam_called_party_number_odd_indicator() {
        let mut buf = sample_iam();
        buf[9] = 0x83; // odd number of address signals
        let output = decode_body(&buf, 0, 0).unwrap();
        let called = output.fields.iter().find(|f| f.name == "Called party number").unwrap();
        assert_eq!(called.value, Some(FieldValue::Digits("123".into())));
    }

    // Every layout entry must be internally consistent: fixed parameters
    // carry a nonzero length and every listed type has a known name.
    #[test]
    fn test_layout_tables_are_consistent() {
        for code in 0u8..=0xFF {
            let Some(message_type) = MessageType::from_u8(code) else {
                continue;
            };
            let table = layout(message_type);
            for param in table.fixed {
                assert!(param.len >= 1, "{:?}", message_type);
                assert!(params::param_name(param.ptype).is_some(), "{:?}", message_type);
            }
            for &ptype in table.variable {
                assert!(params::param_name(ptype).is_some(), "{:?}", message_type);
            }
        }
    }

    // Truncated mandatory variable parameter: status is Malformed at that
    // parameter while the preceding fixed parameters decode normally.
    #[test]
    fn test_iam_with_truncated_called_party_number() {
        let buf = vec![
            0x01,       // Initial address
            0x00,       // nature of connection
            0x20, 0x01, // forward call indicators
            0x0A,       // calling party's category
            0x00,       // TMR
            0x02,       // pointer to called party number
            0x00,       // optional pointer (none)
            0x0A,       // called party number claims 10 octets but has none
        ];
        let output = decode_body(&buf, 0, 0).unwrap();
        assert_eq!(output.status, DecodeStatus::Malformed { offset: 8 });

        let names: Vec<&str> = output.fields.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"Nature of connection indicators"));
        assert!(names.contains(&"Forward call indicators"));
        assert!(names.contains(&"Calling party's category"));
        let category = output.fields.iter().find(|f| f.name == "Calling party's category").unwrap();
        assert_eq!(category.display, "Calling party's category: ordinary calling subscriber");
    }

    #[test]
    fn test_release_with_cause() {
        let buf = vec![
            0x0C, // Release
            0x02, // pointer to cause indicators
            0x00, // optional pointer (none)
            0x02, 0x80, 0x90, // cause: normal call clearing
        ];
        let output = decode_body(&buf, 0, 0).unwrap();
        assert_eq!(output.summary, "Release");
        assert_eq!(output.status, DecodeStatus::Ok);
        let cause = output.fields.iter().find(|f| f.name == "Cause indicators").unwrap();
        assert_eq!(cause.display, "Cause: Normal call clearing (16)");
    }

    #[test]
    fn test_unknown_message_type_is_opaque() {
        let buf = vec![0xF0, 0x01, 0x02];
        let output = decode_body(&buf, 0, 0).unwrap();
        assert_eq!(output.status, DecodeStatus::OkWithUnknowns);
        assert!(output.summary.contains("Unknown message type"));
        assert_eq!(output.consumed, 3);
    }

    #[test]
    fn test_pass_along_single_level() {
        // Pass-along wrapping a Blocking message
        let buf = vec![0x28, 0x13];
        let output = decode_body(&buf, 0, 0).unwrap();
        assert_eq!(output.summary, "Pass-along: Blocking");
        assert_eq!(output.status, DecodeStatus::Ok);
        let embedded = output.fields.iter().find(|f| f.name == "Embedded message").unwrap();
        assert_eq!(embedded.children[0].display, "Blocking");
    }

    // A deeply nested pass-along chain must hit the recursion bound, not
    // the stack.
    #[test]
    fn test_pass_along_nesting_bound() {
        let mut buf = vec![0x28; 1000];
        buf.push(0x13); // innermost: Blocking
        let output = decode_body(&buf, 0, 0).unwrap();
        assert!(output.status.is_malformed());

        // The marker sits at the recursion limit
        let mut field = output.fields.iter().find(|f| f.name == "Embedded message").unwrap();
        let mut levels = 1;
        while let Some(next) = field.children.iter().find(|f| f.name == "Embedded message") {
            field = next;
            levels += 1;
        }
        assert_eq!(levels, MAX_NESTING_DEPTH + 1);
        assert!(field.display.contains("Recursion limit exceeded"));
    }

    #[test]
    fn test_answer_optional_only() {
        let buf = vec![
            0x09, // Answer
            0x01, // optional pointer
            0x11, 0x02, 0x04, 0x14, // backward call indicators
            0x00,
        ];
        let output = decode_body(&buf, 0, 0).unwrap();
        assert_eq!(output.summary, "Answer");
        assert_eq!(output.status, DecodeStatus::Ok);
        assert!(output.fields.iter().any(|f| f.name == "Backward call indicators"));
    }

    #[test]
    fn test_empty_buffer_is_the_only_hard_error() {
        let err = decode_body(&[], 0, 0).unwrap_err();
        assert!(matches!(err, SigError::TruncatedInput { .. }));
    }

    // Decoding the same bytes twice yields identical trees: no hidden
    // mutable state between invocations.
    #[test]
    fn test_decode_is_idempotent() {
        let buf = sample_iam();
        let first = decode_body(&buf, 0, 0).unwrap();
        let second = decode_body(&buf, 0, 0).unwrap();
        assert_eq!(first, second);
    }
}
