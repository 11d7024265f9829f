//! Address (number) parameter decoders
//!
//! Q.763 number parameters share a 2-octet header (odd/even + nature of
//! address, then plan/presentation/screening bits) followed by packed
//! address signals. Called-party style numbers carry the INN indicator where
//! calling-party style numbers carry presentation and screening.

use core::ops::Range;

use ss7_core::digits::{AddressContext, decode_digits};
use ss7_core::field::{DecodeStatus, DecodedField, FieldValue};

use super::malformed_field;

/// Which screening-indicator value table applies
///
/// The "basic" table (plain Calling Party Number) and the "enhanced" table
/// (Generic Number, Call Transfer Number) differ at codes 0 and 2. The
/// choice is made statically per parameter type; nothing in the data
/// distinguishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreeningTable {
    Basic,
    Enhanced,
}

impl ScreeningTable {
    pub fn name(self, code: u8) -> &'static str {
        match (self, code & 0x03) {
            (ScreeningTable::Basic, 0) => "reserved",
            (ScreeningTable::Basic, 2) => "reserved",
            (ScreeningTable::Enhanced, 0) => "user provided, not verified",
            (ScreeningTable::Enhanced, 2) => "user provided, verified and failed",
            (_, 1) => "user provided, verified and passed",
            (_, 3) => "network provided",
            _ => unreachable!(),
        }
    }
}

pub fn nature_of_address_name(noa: u8) -> &'static str {
    match noa {
        0 => "spare",
        1 => "subscriber number (national use)",
        2 => "unknown (national use)",
        3 => "national (significant) number",
        4 => "international number",
        5 => "network-specific number (national use)",
        6 => "network routing number in national (significant) number format (national use)",
        7 => "network routing number in network-specific number format (national use)",
        8 => "network routing number concatenated with Called Directory Number (national use)",
        _ => "reserved",
    }
}

pub fn numbering_plan_name(plan: u8) -> &'static str {
    match plan & 0x07 {
        0 => "spare",
        1 => "ISDN (telephony) numbering plan (ITU-T E.164)",
        3 => "data numbering plan (ITU-T X.121) (national use)",
        4 => "telex numbering plan (ITU-T F.69) (national use)",
        5 => "reserved for national use",
        6 => "reserved for national use",
        _ => "spare",
    }
}

pub fn presentation_name(code: u8) -> &'static str {
    match code & 0x03 {
        0 => "presentation allowed",
        1 => "presentation restricted",
        2 => "address not available (national use)",
        _ => "reserved",
    }
}

/// Called party number: odd/even + NOA, INN + numbering plan, digits
pub fn decode_called_party_number(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    decode_called_style_number("Called party number", buf, range)
}

/// Shared shape for called-party style numbers (INN, no screening)
pub fn decode_called_style_number(
    name: &str,
    buf: &[u8],
    range: Range<usize>,
) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.len() < 2 {
        return malformed_field(name, range, "number header needs 2 octets");
    }

    let start = range.start;
    let odd = data[0] & 0x80 != 0;
    let noa = data[0] & 0x7F;
    let inn = data[1] & 0x80 != 0;
    let plan = (data[1] >> 4) & 0x07;

    let digits = decode_digits(&data[2..], odd, AddressContext::CalledParty);

    let mut field = DecodedField::new(
        name,
        start,
        range.end,
        format!("{}: {}", name, digits.text),
    )
    .with_value(FieldValue::Digits(digits.text.clone()));

    field.push_child(
        DecodedField::new("Odd/even indicator", start, start + 1,
            if odd { "odd number of address signals" } else { "even number of address signals" })
            .with_value(FieldValue::Unsigned(odd as u64)),
    );
    field.push_child(
        DecodedField::new("Nature of address indicator", start, start + 1, nature_of_address_name(noa))
            .with_value(FieldValue::Unsigned(noa as u64)),
    );
    field.push_child(
        DecodedField::new("Internal network number indicator", start + 1, start + 2,
            if inn { "routing to internal network number not allowed" } else { "routing to internal network number allowed" })
            .with_value(FieldValue::Unsigned(inn as u64)),
    );
    field.push_child(
        DecodedField::new("Numbering plan indicator", start + 1, start + 2, numbering_plan_name(plan))
            .with_value(FieldValue::Unsigned(plan as u64)),
    );
    field.push_child(
        DecodedField::new("Address signals", start + 2, range.end, digits.text)
            .with_value(FieldValue::Digits(digits.signals.iter().map(|s| s.to_string()).collect())),
    );

    (field, DecodeStatus::Ok)
}

/// Shared shape for calling-party style numbers (NI, presentation, screening)
pub fn decode_calling_style_number(
    name: &str,
    screening: ScreeningTable,
    buf: &[u8],
    range: Range<usize>,
) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.len() < 2 {
        return malformed_field(name, range, "number header needs 2 octets");
    }

    let start = range.start;
    let odd = data[0] & 0x80 != 0;
    let noa = data[0] & 0x7F;
    let ni = data[1] & 0x80 != 0;
    let plan = (data[1] >> 4) & 0x07;
    let presentation = (data[1] >> 2) & 0x03;
    let screening_code = data[1] & 0x03;

    let digits = decode_digits(&data[2..], odd, AddressContext::CallingParty);

    let mut field = DecodedField::new(
        name,
        start,
        range.end,
        format!("{}: {}", name, digits.text),
    )
    .with_value(FieldValue::Digits(digits.text.clone()));

    field.push_child(
        DecodedField::new("Odd/even indicator", start, start + 1,
            if odd { "odd number of address signals" } else { "even number of address signals" })
            .with_value(FieldValue::Unsigned(odd as u64)),
    );
    field.push_child(
        DecodedField::new("Nature of address indicator", start, start + 1, nature_of_address_name(noa))
            .with_value(FieldValue::Unsigned(noa as u64)),
    );
    field.push_child(
        DecodedField::new("Number incomplete indicator", start + 1, start + 2,
            if ni { "incomplete" } else { "complete" })
            .with_value(FieldValue::Unsigned(ni as u64)),
    );
    field.push_child(
        DecodedField::new("Numbering plan indicator", start + 1, start + 2, numbering_plan_name(plan))
            .with_value(FieldValue::Unsigned(plan as u64)),
    );
    field.push_child(
        DecodedField::new("Address presentation restricted indicator", start + 1, start + 2,
            presentation_name(presentation))
            .with_value(FieldValue::Unsigned(presentation as u64)),
    );
    field.push_child(
        DecodedField::new("Screening indicator", start + 1, start + 2, screening.name(screening_code))
            .with_value(FieldValue::Unsigned(screening_code as u64)),
    );
    field.push_child(
        DecodedField::new("Address signals", start + 2, range.end, digits.text)
            .with_value(FieldValue::Digits(digits.signals.iter().map(|s| s.to_string()).collect())),
    );

    (field, DecodeStatus::Ok)
}

/// Subsequent number: odd/even + spare octet, then digits
pub fn decode_subsequent_number(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Subsequent number", range, "number header needs 1 octet");
    }

    let start = range.start;
    let odd = data[0] & 0x80 != 0;
    let digits = decode_digits(&data[1..], odd, AddressContext::CalledParty);

    let field = DecodedField::new(
        "Subsequent number",
        start,
        range.end,
        format!("Subsequent number: {}", digits.text),
    )
    .with_value(FieldValue::Digits(digits.text.clone()))
    .with_child(
        DecodedField::new("Odd/even indicator", start, start + 1,
            if odd { "odd number of address signals" } else { "even number of address signals" })
            .with_value(FieldValue::Unsigned(odd as u64)),
    )
    .with_child(
        DecodedField::new("Address signals", start + 1, range.end, digits.text),
    );

    (field, DecodeStatus::Ok)
}

fn number_qualifier_name(q: u8) -> &'static str {
    match q {
        0 => "reserved (dialled digits) (national use)",
        1 => "additional called number (national use)",
        2 => "reserved (supplemental user provided calling number, failed screening)",
        3 => "reserved (supplemental user provided calling number, not screened)",
        4 => "reserved (redirecting terminating number)",
        5 => "additional connected number",
        6 => "additional calling party number",
        7 => "reserved for additional original called number",
        8 => "reserved for additional redirecting number",
        9 => "reserved for additional redirection number",
        0xFF => "reserved for expansion",
        _ => "reserved",
    }
}

/// Generic number: number qualifier octet, then a calling-party style
/// number using the enhanced screening table
pub fn decode_generic_number(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Generic number", range, "missing number qualifier octet");
    }

    let start = range.start;
    let qualifier = data[0];
    let (mut inner, status) = decode_calling_style_number(
        "Generic number",
        ScreeningTable::Enhanced,
        buf,
        start + 1..range.end,
    );

    inner.start = start;
    inner.children.insert(
        0,
        DecodedField::new("Number qualifier indicator", start, start + 1, number_qualifier_name(qualifier))
            .with_value(FieldValue::Unsigned(qualifier as u64)),
    );

    (inner, status)
}

/// Generic digits: type-of-digits and encoding scheme, then digit content
pub fn decode_generic_digits(buf: &[u8], range: Range<usize>) -> (DecodedField, DecodeStatus) {
    let data = &buf[range.clone()];
    if data.is_empty() {
        return malformed_field("Generic digits", range, "missing header octet");
    }

    let start = range.start;
    let scheme = (data[0] >> 5) & 0x07;
    let type_of_digits = data[0] & 0x1F;

    let scheme_name = match scheme {
        0 => "BCD even",
        1 => "BCD odd",
        2 => "IA5 character",
        3 => "binary coded",
        _ => "reserved",
    };
    let tod_name = match type_of_digits {
        0 => "account code",
        1 => "authorization code",
        2 => "private networking travelling class mark",
        3 => "business communication group identity",
        _ => "reserved",
    };

    let rendered = match scheme {
        0 | 1 => decode_digits(&data[1..], scheme == 1, AddressContext::CalledParty).text,
        2 => String::from_utf8_lossy(&data[1..]).into_owned(),
        _ => super::hex_string(&data[1..]),
    };

    let field = DecodedField::new(
        "Generic digits",
        start,
        range.end,
        format!("Generic digits ({}): {}", tod_name, rendered),
    )
    .with_value(FieldValue::Digits(rendered))
    .with_child(
        DecodedField::new("Encoding scheme", start, start + 1, scheme_name)
            .with_value(FieldValue::Unsigned(scheme as u64)),
    )
    .with_child(
        DecodedField::new("Type of digits", start, start + 1, tod_name)
            .with_value(FieldValue::Unsigned(type_of_digits as u64)),
    );

    (field, DecodeStatus::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_called_party_number_basic() {
        // odd, NOA = national; E.164 plan; digits "123"
        let buf = [0x83, 0x10, 0x21, 0x03];
        let (field, status) = decode_called_party_number(&buf, 0..4);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.value, Some(FieldValue::Digits("123".into())));
        let noa = field.children.iter().find(|c| c.name == "Nature of address indicator").unwrap();
        assert_eq!(noa.display, "national (significant) number");
    }

    #[test]
    fn test_calling_party_number_screening_basic_table() {
        // even, NOA unknown(2); plan E.164, presentation allowed, screening 3
        let buf = [0x02, 0x13, 0x21];
        let (field, status) =
            decode_calling_style_number("Calling party number", ScreeningTable::Basic, &buf, 0..3);
        assert_eq!(status, DecodeStatus::Ok);
        let scr = field.children.iter().find(|c| c.name == "Screening indicator").unwrap();
        assert_eq!(scr.display, "network provided");
        assert_eq!(field.value, Some(FieldValue::Digits("12".into())));
    }

    // The screening tables are selected per parameter identity; codes 0 and
    // 2 read differently through each table.
    #[test]
    fn test_screening_tables_differ_at_zero_and_two() {
        assert_eq!(ScreeningTable::Basic.name(0), "reserved");
        assert_eq!(ScreeningTable::Enhanced.name(0), "user provided, not verified");
        assert_eq!(ScreeningTable::Basic.name(2), "reserved");
        assert_eq!(ScreeningTable::Enhanced.name(2), "user provided, verified and failed");
        assert_eq!(ScreeningTable::Basic.name(1), ScreeningTable::Enhanced.name(1));
        assert_eq!(ScreeningTable::Basic.name(3), ScreeningTable::Enhanced.name(3));
    }

    #[test]
    fn test_truncated_header_is_malformed_not_panic() {
        let buf = [0x83];
        let (field, status) = decode_called_party_number(&buf, 0..1);
        assert!(status.is_malformed());
        assert!(field.display.starts_with("Malformed"));
    }

    #[test]
    fn test_generic_number_carries_qualifier() {
        // qualifier 6 = additional calling party number, then header+digit
        let buf = [0x06, 0x81, 0x10, 0x07];
        let (field, status) = decode_generic_number(&buf, 0..4);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.children[0].name, "Number qualifier indicator");
        assert_eq!(field.children[0].display, "additional calling party number");
        assert_eq!(field.value, Some(FieldValue::Digits("7".into())));
    }

    #[test]
    fn test_empty_digit_section_allowed() {
        // Header only, no digits: valid, empty number
        let buf = [0x00, 0x10];
        let (field, status) = decode_called_party_number(&buf, 0..2);
        assert_eq!(status, DecodeStatus::Ok);
        assert_eq!(field.value, Some(FieldValue::Digits(String::new())));
    }
}
