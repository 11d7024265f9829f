//! CAP argument decoding
//!
//! Invoke arguments are SEQUENCEs of context-tagged members; which member a
//! context tag selects depends on the operation *and* the CAMEL phase. Each
//! operation therefore has a static member table, with phase-specific
//! extension tables layered on top. Members carrying ITU-T Q.763 encoded
//! numbers (calledPartyNumber, callingPartyNumber, redirectingPartyID, ...)
//! are handed to the ISUP address decoders, which know the digit tables and
//! header bits.
//!
//! Unknown member tags never fail the argument: newer phases add members,
//! and a decoder keyed to an older table must still walk past them.

use core::ops::Range;

use ss7_asn1::{BerReader, BerTag, BerTagClass, integer_from_bytes};
use ss7_core::field::{DecodeStatus, DecodedField, FieldValue};
use ss7_isup::params::address::{self, ScreeningTable};
use ss7_isup::params::{cause, indicators};

use crate::opcode::{CamelVersion, op};

/// How one argument member decodes
#[derive(Debug, Clone, Copy)]
enum MemberKind {
    /// Universal-style big-endian integer
    Integer,
    /// Integer rendered through the BCSM event-type table
    EventTypeBcsm,
    /// Integer rendered through the monitor-mode table
    MonitorMode,
    /// Q.763 called party number format
    CalledNumber,
    /// Q.763 calling party number format (basic screening table)
    CallingNumber,
    /// Q.763 calling party's category octet
    Category,
    /// Q.763 redirection information
    RedirectionInformation,
    /// Constructed SEQUENCE OF Q.763 called party numbers
    CalledNumberList,
    /// Constructed SEQUENCE OF BCSMEvent
    BcsmEventList,
    /// Raw octets rendered as hex
    Opaque,
}

#[derive(Debug, Clone, Copy)]
struct Member {
    tag: u32,
    name: &'static str,
    kind: MemberKind,
}

const fn m(tag: u32, name: &'static str, kind: MemberKind) -> Member {
    Member { tag, name, kind }
}

fn lookup(table: &'static [Member], tag: u32) -> Option<&'static Member> {
    table.iter().find(|member| member.tag == tag)
}

/// InitialDPArg members shared by every phase
const INITIAL_DP_BASE: &[Member] = &[
    m(0, "serviceKey", MemberKind::Integer),
    m(2, "calledPartyNumber", MemberKind::CalledNumber),
    m(3, "callingPartyNumber", MemberKind::CallingNumber),
    m(5, "callingPartysCategory", MemberKind::Category),
    m(7, "cGEncountered", MemberKind::Integer),
    m(8, "iPSSPCapabilities", MemberKind::Opaque),
    m(10, "locationNumber", MemberKind::CallingNumber),
    m(12, "originalCalledPartyID", MemberKind::CallingNumber),
    m(15, "extensions", MemberKind::Opaque),
    m(23, "highLayerCompatibility", MemberKind::Opaque),
    m(25, "additionalCallingPartyNumber", MemberKind::CallingNumber),
    m(27, "bearerCapability", MemberKind::Opaque),
    m(28, "eventTypeBCSM", MemberKind::EventTypeBcsm),
    m(29, "redirectingPartyID", MemberKind::CallingNumber),
    m(30, "redirectionInformation", MemberKind::RedirectionInformation),
];

/// Members added by phase 2
const INITIAL_DP_PHASE2: &[Member] = &[
    m(50, "iMSI", MemberKind::Opaque),
    m(51, "subscriberState", MemberKind::Opaque),
    m(52, "locationInformation", MemberKind::Opaque),
    m(53, "ext-basicServiceCode", MemberKind::Opaque),
    m(54, "callReferenceNumber", MemberKind::Opaque),
    m(55, "mscAddress", MemberKind::Opaque),
    m(56, "calledPartyBCDNumber", MemberKind::Opaque),
    m(57, "timeAndTimezone", MemberKind::Opaque),
];

/// Members added by phase 3
const INITIAL_DP_PHASE3: &[Member] = &[
    m(58, "gsm-ForwardingPending", MemberKind::Opaque),
    m(59, "initialDPArgExtension", MemberKind::Opaque),
];

const CONNECT: &[Member] = &[
    m(0, "destinationRoutingAddress", MemberKind::CalledNumberList),
    m(1, "alertingPattern", MemberKind::Opaque),
    m(6, "originalCalledPartyID", MemberKind::CallingNumber),
    m(10, "extensions", MemberKind::Opaque),
    m(11, "carrier", MemberKind::Opaque),
    m(14, "genericNumbers", MemberKind::Opaque),
    m(15, "serviceInteractionIndicatorsTwo", MemberKind::Opaque),
    m(19, "chargeNumber", MemberKind::CallingNumber),
    m(21, "legToBeConnected", MemberKind::Opaque),
    m(28, "callingPartysCategory", MemberKind::Category),
    m(29, "redirectingPartyID", MemberKind::CallingNumber),
    m(30, "redirectionInformation", MemberKind::RedirectionInformation),
    m(55, "suppressionOfAnnouncement", MemberKind::Opaque),
    m(56, "oCSIApplicable", MemberKind::Opaque),
];

const REQUEST_REPORT_BCSM_EVENT: &[Member] = &[
    m(0, "bcsmEvents", MemberKind::BcsmEventList),
    m(2, "extensions", MemberKind::Opaque),
];

const BCSM_EVENT: &[Member] = &[
    m(0, "eventTypeBCSM", MemberKind::EventTypeBcsm),
    m(1, "monitorMode", MemberKind::MonitorMode),
    m(2, "legID", MemberKind::Opaque),
    m(30, "dpSpecificCriteria", MemberKind::Opaque),
];

const EVENT_REPORT_BCSM: &[Member] = &[
    m(0, "eventTypeBCSM", MemberKind::EventTypeBcsm),
    m(2, "eventSpecificInformationBCSM", MemberKind::Opaque),
    m(3, "legID", MemberKind::Opaque),
    m(4, "miscCallInfo", MemberKind::Opaque),
    m(5, "extensions", MemberKind::Opaque),
];

const APPLY_CHARGING: &[Member] = &[
    m(0, "aChBillingChargingCharacteristics", MemberKind::Opaque),
    m(2, "partyToCharge", MemberKind::Opaque),
    m(3, "extensions", MemberKind::Opaque),
];

const CONNECT_TO_RESOURCE: &[Member] = &[
    m(0, "ipRoutingAddress", MemberKind::CalledNumber),
    m(4, "extensions", MemberKind::Opaque),
    m(7, "serviceInteractionIndicatorsTwo", MemberKind::Opaque),
];

const ESTABLISH_TEMPORARY_CONNECTION: &[Member] = &[
    m(0, "assistingSSPIPRoutingAddress", MemberKind::Opaque),
    m(1, "correlationID", MemberKind::Opaque),
    m(3, "scfID", MemberKind::Opaque),
    m(4, "extensions", MemberKind::Opaque),
    m(5, "carrier", MemberKind::Opaque),
    m(6, "serviceInteractionIndicatorsTwo", MemberKind::Opaque),
];

const CALL_INFORMATION_REQUEST: &[Member] = &[
    m(0, "requestedInformationTypeList", MemberKind::Opaque),
    m(2, "extensions", MemberKind::Opaque),
    m(3, "legID", MemberKind::Opaque),
];

const CALL_INFORMATION_REPORT: &[Member] = &[
    m(0, "requestedInformationList", MemberKind::Opaque),
    m(2, "extensions", MemberKind::Opaque),
    m(3, "legID", MemberKind::Opaque),
];

const PLAY_ANNOUNCEMENT: &[Member] = &[
    m(0, "informationToSend", MemberKind::Opaque),
    m(1, "disconnectFromIPForbidden", MemberKind::Integer),
    m(2, "requestAnnouncementComplete", MemberKind::Integer),
    m(3, "extensions", MemberKind::Opaque),
];

const PROMPT_AND_COLLECT: &[Member] = &[
    m(0, "collectedInfo", MemberKind::Opaque),
    m(1, "disconnectFromIPForbidden", MemberKind::Integer),
    m(2, "informationToSend", MemberKind::Opaque),
    m(3, "extensions", MemberKind::Opaque),
];

const INITIATE_CALL_ATTEMPT: &[Member] = &[
    m(0, "destinationRoutingAddress", MemberKind::CalledNumberList),
    m(1, "alertingPattern", MemberKind::Opaque),
    m(4, "extensions", MemberKind::Opaque),
    m(29, "callingPartyNumber", MemberKind::CallingNumber),
];

const RESET_TIMER: &[Member] = &[
    m(0, "timerID", MemberKind::Integer),
    m(1, "timervalue", MemberKind::Integer),
    m(2, "extensions", MemberKind::Opaque),
];

const COLLECT_INFORMATION: &[Member] = &[
    m(0, "alertingPattern", MemberKind::Opaque),
    m(1, "numberingPlan", MemberKind::Opaque),
    m(2, "sendingSideID", MemberKind::Opaque),
];

fn event_type_bcsm_name(code: i64) -> &'static str {
    match code {
        1 => "origAttemptAuthorized",
        2 => "collectedInfo",
        3 => "analyzedInformation",
        4 => "routeSelectFailure",
        5 => "oCalledPartyBusy",
        6 => "oNoAnswer",
        7 => "oAnswer",
        9 => "oDisconnect",
        10 => "oAbandon",
        12 => "termAttemptAuthorized",
        13 => "tBusy",
        14 => "tNoAnswer",
        15 => "tAnswer",
        17 => "tDisconnect",
        18 => "tAbandon",
        _ => "unknown event type",
    }
}

fn monitor_mode_name(code: i64) -> &'static str {
    match code {
        0 => "interrupted",
        1 => "notifyAndContinue",
        2 => "transparent",
        _ => "unknown monitor mode",
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Member table for an opcode, or `None` when the operation carries no
/// SEQUENCE argument (or its argument is not a member sequence at all)
fn member_table(opcode: i64) -> Option<&'static [Member]> {
    match opcode {
        op::INITIAL_DP => Some(INITIAL_DP_BASE),
        op::CONNECT => Some(CONNECT),
        op::REQUEST_REPORT_BCSM_EVENT => Some(REQUEST_REPORT_BCSM_EVENT),
        op::EVENT_REPORT_BCSM => Some(EVENT_REPORT_BCSM),
        op::APPLY_CHARGING => Some(APPLY_CHARGING),
        op::CONNECT_TO_RESOURCE => Some(CONNECT_TO_RESOURCE),
        op::ESTABLISH_TEMPORARY_CONNECTION => Some(ESTABLISH_TEMPORARY_CONNECTION),
        op::CALL_INFORMATION_REQUEST => Some(CALL_INFORMATION_REQUEST),
        op::CALL_INFORMATION_REPORT => Some(CALL_INFORMATION_REPORT),
        op::PLAY_ANNOUNCEMENT => Some(PLAY_ANNOUNCEMENT),
        op::PROMPT_AND_COLLECT_USER_INFORMATION => Some(PROMPT_AND_COLLECT),
        op::INITIATE_CALL_ATTEMPT => Some(INITIATE_CALL_ATTEMPT),
        op::RESET_TIMER => Some(RESET_TIMER),
        op::COLLECT_INFORMATION => Some(COLLECT_INFORMATION),
        _ => None,
    }
}

/// Resolve a member tag for an opcode under a phase
fn find_member(version: CamelVersion, opcode: i64, tag: u32) -> Option<&'static Member> {
    let base = member_table(opcode).and_then(|table| lookup(table, tag));
    if base.is_some() || opcode != op::INITIAL_DP {
        return base;
    }
    // InitialDP grew members in later phases; earlier phases must treat the
    // higher tags as unknown, not misdecode them.
    match version {
        CamelVersion::V1 => None,
        CamelVersion::V2 => lookup(INITIAL_DP_PHASE2, tag),
        CamelVersion::V3 => {
            lookup(INITIAL_DP_PHASE2, tag).or_else(|| lookup(INITIAL_DP_PHASE3, tag))
        }
    }
}

/// Decode one invoke argument TLV
///
/// `tag` and `value_range` come from the argument TLV the component decoder
/// already read. Returns the member fields plus the combined status; problems
/// inside an argument never fail the component.
pub fn decode_argument(
    version: CamelVersion,
    opcode: i64,
    buf: &[u8],
    tag: BerTag,
    value_range: Range<usize>,
) -> (Vec<DecodedField>, DecodeStatus) {
    match opcode {
        // ReleaseCallArg ::= Cause (raw Q.850 octets, no sequence wrapper)
        op::RELEASE_CALL => {
            let (field, status) = cause::decode_cause_indicators(buf, value_range);
            (vec![field], status)
        }
        // CancelArg ::= CHOICE { invokeID [0], allRequests [1] NULL }
        op::CANCEL => decode_cancel_choice(buf, tag, value_range),
        op::FURNISH_CHARGING_INFORMATION => {
            (vec![opaque_field("fCIBillingChargingCharacteristics", buf, value_range)], DecodeStatus::Ok)
        }
        op::APPLY_CHARGING_REPORT => {
            (vec![opaque_field("callResult", buf, value_range)], DecodeStatus::Ok)
        }
        op::SPECIALIZED_RESOURCE_REPORT => {
            (vec![opaque_field("specializedResourceReport", buf, value_range)], DecodeStatus::Ok)
        }
        _ => {
            if member_table(opcode).is_some() && tag.is_universal_constructed(16) {
                walk_members(buf, value_range, |member_tag| {
                    find_member(version, opcode, member_tag)
                })
            } else {
                // Recognized operation without a member table, or an
                // unexpected argument shape: keep the bytes visible.
                (vec![opaque_field("argument", buf, value_range)], DecodeStatus::Ok)
            }
        }
    }
}

fn decode_cancel_choice(
    buf: &[u8],
    tag: BerTag,
    value_range: Range<usize>,
) -> (Vec<DecodedField>, DecodeStatus) {
    if tag.is_context(0) {
        match integer_from_bytes(&buf[value_range.clone()], value_range.start) {
            Ok(value) => (
                vec![
                    DecodedField::new(
                        "invokeID",
                        value_range.start,
                        value_range.end,
                        format!("invokeID: {}", value),
                    )
                    .with_value(FieldValue::Integer(value)),
                ],
                DecodeStatus::Ok,
            ),
            Err(_) => (
                vec![DecodedField::new(
                    "invokeID",
                    value_range.start,
                    value_range.end,
                    "Malformed: invalid INTEGER encoding",
                )],
                DecodeStatus::Malformed { offset: value_range.start },
            ),
        }
    } else if tag.is_context(1) {
        (
            vec![DecodedField::new(
                "allRequests",
                value_range.start,
                value_range.end,
                "allRequests",
            )],
            DecodeStatus::Ok,
        )
    } else {
        (
            vec![opaque_field("argument", buf, value_range)],
            DecodeStatus::OkWithUnknowns,
        )
    }
}

/// Walk a SEQUENCE of context-tagged members
fn walk_members(
    buf: &[u8],
    range: Range<usize>,
    resolve: impl Fn(u32) -> Option<&'static Member>,
) -> (Vec<DecodedField>, DecodeStatus) {
    let mut fields = Vec::new();
    let mut status = DecodeStatus::Ok;
    let mut reader = BerReader::bounded(buf, range.start, range.end - range.start);

    while reader.has_remaining() {
        let at = reader.position();
        let (tag, _value, value_range) = match reader.read_tlv() {
            Ok(tlv) => tlv,
            Err(_) => {
                status = status.combine(DecodeStatus::Malformed { offset: at });
                fields.push(DecodedField::new(
                    "Member",
                    at,
                    range.end,
                    "Malformed: member header inconsistent with sequence length",
                ));
                break;
            }
        };

        if tag.class() != BerTagClass::ContextSpecific {
            status = status.combine(DecodeStatus::OkWithUnknowns);
            fields.push(unknown_member(tag.number(), buf, at, value_range));
            continue;
        }

        match resolve(tag.number()) {
            Some(member) => {
                let (field, member_status) = decode_member(member, buf, at, value_range);
                status = status.combine(member_status);
                fields.push(field);
            }
            None => {
                log::debug!("unknown argument member tag [{}]", tag.number());
                status = status.combine(DecodeStatus::OkWithUnknowns);
                fields.push(unknown_member(tag.number(), buf, at, value_range));
            }
        }
    }

    (fields, status)
}

fn unknown_member(tag: u32, buf: &[u8], start: usize, value_range: Range<usize>) -> DecodedField {
    let data = &buf[value_range.clone()];
    DecodedField::new(
        format!("Parameter [{}]", tag),
        start,
        value_range.end,
        format!("Tag [{}] unknown, {} bytes, contents opaque", tag, data.len()),
    )
    .with_value(FieldValue::Bytes(data.to_vec()))
}

fn opaque_field(name: &str, buf: &[u8], range: Range<usize>) -> DecodedField {
    let data = &buf[range.clone()];
    let display = if data.is_empty() {
        format!("{} (empty)", name)
    } else {
        format!("{}: {}", name, hex_string(data))
    };
    DecodedField::new(name, range.start, range.end, display)
        .with_value(FieldValue::Bytes(data.to_vec()))
}

fn integer_member(
    name: &str,
    buf: &[u8],
    start: usize,
    value_range: Range<usize>,
    render: impl Fn(i64) -> String,
) -> (DecodedField, DecodeStatus) {
    match integer_from_bytes(&buf[value_range.clone()], value_range.start) {
        Ok(value) => (
            DecodedField::new(name, start, value_range.end, render(value))
                .with_value(FieldValue::Integer(value)),
            DecodeStatus::Ok,
        ),
        Err(_) => (
            DecodedField::new(name, start, value_range.end, "Malformed: invalid INTEGER encoding"),
            DecodeStatus::Malformed { offset: value_range.start },
        ),
    }
}

fn decode_member(
    member: &Member,
    buf: &[u8],
    start: usize,
    value_range: Range<usize>,
) -> (DecodedField, DecodeStatus) {
    match member.kind {
        MemberKind::Integer => integer_member(member.name, buf, start, value_range, |v| {
            format!("{}: {}", member.name, v)
        }),
        MemberKind::EventTypeBcsm => integer_member(member.name, buf, start, value_range, |v| {
            format!("{}: {} ({})", member.name, event_type_bcsm_name(v), v)
        }),
        MemberKind::MonitorMode => integer_member(member.name, buf, start, value_range, |v| {
            format!("{}: {} ({})", member.name, monitor_mode_name(v), v)
        }),
        MemberKind::CalledNumber => address::decode_called_style_number(member.name, buf, value_range),
        MemberKind::CallingNumber => {
            address::decode_calling_style_number(member.name, ScreeningTable::Basic, buf, value_range)
        }
        MemberKind::Category => indicators::decode_calling_partys_category(buf, value_range),
        MemberKind::RedirectionInformation => {
            indicators::decode_redirection_information(buf, value_range)
        }
        MemberKind::CalledNumberList => decode_called_number_list(member.name, buf, start, value_range),
        MemberKind::BcsmEventList => decode_bcsm_event_list(member.name, buf, start, value_range),
        MemberKind::Opaque => (opaque_field(member.name, buf, value_range), DecodeStatus::Ok),
    }
}

/// SEQUENCE OF CalledPartyNumber (destinationRoutingAddress)
fn decode_called_number_list(
    name: &str,
    buf: &[u8],
    start: usize,
    value_range: Range<usize>,
) -> (DecodedField, DecodeStatus) {
    let mut parent = DecodedField::new(name, start, value_range.end, name.to_string());
    let mut status = DecodeStatus::Ok;
    let mut reader = BerReader::bounded(buf, value_range.start, value_range.end - value_range.start);

    while reader.has_remaining() {
        let at = reader.position();
        match reader.read_tlv() {
            Ok((_tag, _value, inner_range)) => {
                let (child, child_status) =
                    address::decode_called_style_number("CalledPartyNumber", buf, inner_range);
                status = status.combine(child_status);
                parent.push_child(child);
            }
            Err(_) => {
                status = status.combine(DecodeStatus::Malformed { offset: at });
                break;
            }
        }
    }

    parent.display = format!("{}: {} address(es)", name, parent.children.len());
    (parent, status)
}

/// SEQUENCE OF BCSMEvent (bcsmEvents)
fn decode_bcsm_event_list(
    name: &str,
    buf: &[u8],
    start: usize,
    value_range: Range<usize>,
) -> (DecodedField, DecodeStatus) {
    let mut parent = DecodedField::new(name, start, value_range.end, name.to_string());
    let mut status = DecodeStatus::Ok;
    let mut reader = BerReader::bounded(buf, value_range.start, value_range.end - value_range.start);

    while reader.has_remaining() {
        let at = reader.position();
        match reader.read_tlv() {
            Ok((_tag, _value, inner_range)) => {
                let (members, members_status) =
                    walk_members(buf, inner_range.clone(), |tag| lookup(BCSM_EVENT, tag));
                status = status.combine(members_status);
                let mut event = DecodedField::new(
                    "bcsmEvent",
                    at,
                    inner_range.end,
                    members
                        .first()
                        .map(|f| f.display.clone())
                        .unwrap_or_else(|| "bcsmEvent".to_string()),
                );
                event.children = members;
                parent.push_child(event);
            }
            Err(_) => {
                status = status.combine(DecodeStatus::Malformed { offset: at });
                break;
            }
        }
    }

    parent.display = format!("{}: {} event(s)", name, parent.children.len());
    (parent, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ss7_asn1::BerReader;

    fn read_arg_tlv(buf: &[u8]) -> (BerTag, Range<usize>) {
        let mut reader = BerReader::new(buf, 0);
        let (tag, _, range) = reader.read_tlv().unwrap();
        (tag, range)
    }

    // InitialDP with serviceKey 123 and a calling party number; the number
    // octets are Q.763: odd indicator set, so the trailing high nibble is
    // dropped and three digits come out.
    #[test]
    fn test_initial_dp_argument() {
        let buf = [
            0x30, 0x0C, // SEQUENCE
            0x80, 0x01, 0x7B, // serviceKey [0] = 123
            0x83, 0x04, 0x83, 0x10, 0x21, 0x03, // callingPartyNumber [3]
            0x9C, 0x01, 0x02, // eventTypeBCSM [28] = collectedInfo
        ];
        let (tag, range) = read_arg_tlv(&buf);
        let (fields, status) =
            decode_argument(CamelVersion::V2, op::INITIAL_DP, &buf, tag, range);
        assert_eq!(status, DecodeStatus::Ok);

        let key = fields.iter().find(|f| f.name == "serviceKey").unwrap();
        assert_eq!(key.value, Some(FieldValue::Integer(123)));

        let calling = fields.iter().find(|f| f.name == "callingPartyNumber").unwrap();
        assert_eq!(calling.value, Some(FieldValue::Digits("123".into())));

        let event = fields.iter().find(|f| f.name == "eventTypeBCSM").unwrap();
        assert_eq!(event.display, "eventTypeBCSM: collectedInfo (2)");
    }

    // Phase 3 members must be unknown under a phase 1 table.
    #[test]
    fn test_initial_dp_phase_gating() {
        let buf = [
            0x30, 0x06, // SEQUENCE
            0x80, 0x01, 0x01, // serviceKey [0] = 1
            0x9F, 0x39, 0x00, // timeAndTimezone [57], empty
        ];
        let (tag, range) = read_arg_tlv(&buf);

        let (fields, status) =
            decode_argument(CamelVersion::V1, op::INITIAL_DP, &buf, tag, range.clone());
        assert_eq!(status, DecodeStatus::OkWithUnknowns);
        assert!(fields.iter().any(|f| f.name == "Parameter [57]"));

        let (fields, status) = decode_argument(CamelVersion::V2, op::INITIAL_DP, &buf, tag, range);
        assert_eq!(status, DecodeStatus::Ok);
        assert!(fields.iter().any(|f| f.name == "timeAndTimezone"));
    }

    #[test]
    fn test_release_call_argument_is_cause() {
        // Argument TLV: OCTET STRING carrying cause octets (normal clearing)
        let buf = [0x04, 0x02, 0x80, 0x90];
        let (tag, range) = read_arg_tlv(&buf);
        let (fields, status) =
            decode_argument(CamelVersion::V2, op::RELEASE_CALL, &buf, tag, range);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(fields[0].display, "Cause: Normal call clearing (16)");
    }

    #[test]
    fn test_cancel_all_requests() {
        let buf = [0x81, 0x00]; // allRequests [1] NULL
        let (tag, range) = read_arg_tlv(&buf);
        let (fields, status) = decode_argument(CamelVersion::V2, op::CANCEL, &buf, tag, range);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(fields[0].name, "allRequests");
    }

    #[test]
    fn test_connect_destination_routing_address() {
        let buf = [
            0x30, 0x08, // SEQUENCE
            0xA0, 0x06, // destinationRoutingAddress [0], constructed
            0x04, 0x04, 0x03, 0x10, 0x21, 0x43, // CalledPartyNumber "1234"
        ];
        let (tag, range) = read_arg_tlv(&buf);
        let (fields, status) = decode_argument(CamelVersion::V2, op::CONNECT, &buf, tag, range);
        assert_eq!(status, DecodeStatus::Ok);
        let dra = fields.iter().find(|f| f.name == "destinationRoutingAddress").unwrap();
        assert_eq!(dra.children.len(), 1);
        assert_eq!(dra.children[0].value, Some(FieldValue::Digits("1234".into())));
    }

    #[test]
    fn test_request_report_bcsm_event_list() {
        let buf = [
            0x30, 0x0C, // SEQUENCE
            0xA0, 0x0A, // bcsmEvents [0]
            0x30, 0x08, // BCSMEvent
            0x80, 0x01, 0x07, // eventTypeBCSM [0] = oAnswer
            0x81, 0x01, 0x00, // monitorMode [1] = interrupted
            0x82, 0x00, // legID [2], empty
        ];
        let (tag, range) = read_arg_tlv(&buf);
        let (fields, status) =
            decode_argument(CamelVersion::V2, op::REQUEST_REPORT_BCSM_EVENT, &buf, tag, range);
        assert_eq!(status, DecodeStatus::Ok);
        let events = fields.iter().find(|f| f.name == "bcsmEvents").unwrap();
        assert_eq!(events.children.len(), 1);
        let event = &events.children[0];
        assert_eq!(event.children[0].display, "eventTypeBCSM: oAnswer (7)");
        assert_eq!(event.children[1].display, "monitorMode: interrupted (0)");
    }

    #[test]
    fn test_truncated_member_degrades_to_malformed() {
        let buf = [
            0x30, 0x04, // SEQUENCE
            0x80, 0x05, 0x01, 0x02, // serviceKey claims 5 value bytes, has 2
        ];
        let (tag, range) = read_arg_tlv(&buf);
        let (_, status) = decode_argument(CamelVersion::V2, op::INITIAL_DP, &buf, tag, range);
        assert!(status.is_malformed());
    }
}
