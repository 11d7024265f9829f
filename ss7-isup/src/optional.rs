//! Optional-parameter tail walker
//!
//! After the mandatory part of an ISUP message an optional pointer may lead
//! to a run of `(type, length, value)` parameters terminated by the
//! end-of-optional-parameters octet (0) or by buffer exhaustion. Every
//! iteration consumes at least the type and length octets, bounding the walk
//! to `buffer_length / 2` turns even on adversarial input.

use ss7_core::field::{DecodeStatus, DecodedField, FieldValue};

use crate::params::{self, param_type};

/// Result of walking one optional-parameter tail
#[derive(Debug)]
pub struct TailWalk {
    pub fields: Vec<DecodedField>,
    pub status: DecodeStatus,
    /// Offset one past the last byte the walk consumed
    pub end: usize,
}

/// Walk the optional parameter tail starting at `start`
pub fn walk_optional_tail(buf: &[u8], start: usize) -> TailWalk {
    let mut fields = Vec::new();
    let mut status = DecodeStatus::Ok;
    let mut pos = start;

    loop {
        // Input exhausted without an end marker: terminate cleanly
        let Some(&ptype) = buf.get(pos) else { break };

        if ptype == param_type::END_OF_OPTIONAL_PARAMETERS {
            fields.push(
                DecodedField::new("End of optional parameters", pos, pos + 1, "End of optional parameters")
                    .with_value(FieldValue::Unsigned(0)),
            );
            pos += 1;
            break;
        }

        let Some(&length) = buf.get(pos + 1) else {
            status = status.combine(DecodeStatus::Malformed { offset: pos + 1 });
            fields.push(DecodedField::new(
                params::param_name(ptype).unwrap_or("Parameter"),
                pos,
                buf.len(),
                "Malformed: length octet missing",
            ));
            pos = buf.len();
            break;
        };

        let value_start = pos + 2;
        let value_end = value_start + length as usize;
        if value_end > buf.len() {
            status = status.combine(DecodeStatus::Malformed { offset: value_start });
            fields.push(DecodedField::new(
                params::param_name(ptype).unwrap_or("Parameter"),
                pos,
                buf.len(),
                format!("Malformed: declared length {} exceeds buffer", length),
            ));
            pos = buf.len();
            break;
        }

        // The declared length is authoritative for framing: whatever the
        // decoder consumed or reported, the walk advances past value_end.
        let (field, field_status) = params::decode_parameter(ptype, buf, value_start..value_end);
        status = status.combine(field_status);
        fields.push(field);
        pos = value_end;
    }

    TailWalk {
        fields,
        status,
        end: pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_marker_terminates() {
        // Calling party's category, then end marker
        let buf = [0x09, 0x01, 0x0A, 0x00];
        let walk = walk_optional_tail(&buf, 0);
        assert_eq!(walk.status, DecodeStatus::Ok);
        assert_eq!(walk.fields.len(), 2);
        assert_eq!(walk.end, 4);
        assert_eq!(walk.fields[1].name, "End of optional parameters");
    }

    #[test]
    fn test_exhaustion_without_marker_terminates() {
        let buf = [0x09, 0x01, 0x0A];
        let walk = walk_optional_tail(&buf, 0);
        assert_eq!(walk.status, DecodeStatus::Ok);
        assert_eq!(walk.fields.len(), 1);
        assert_eq!(walk.end, 3);
    }

    // Unknown optional parameters from newer protocol revisions are skipped
    // using the declared length and do not desynchronize what follows.
    #[test]
    fn test_unknown_type_does_not_desync() {
        let buf = [
            0xFE, 0x03, 0x11, 0x22, 0x33, // unrecognized type, 3 bytes
            0x12, 0x02, 0x80, 0x91,       // cause indicators: user busy
            0x00,
        ];
        let walk = walk_optional_tail(&buf, 0);
        assert_eq!(walk.status, DecodeStatus::OkWithUnknowns);
        assert_eq!(walk.fields.len(), 3);
        assert_eq!(walk.fields[1].display, "Cause: User busy (17)");
    }

    #[test]
    fn test_overlong_declared_length_is_malformed() {
        let buf = [0x12, 0x20, 0x80];
        let walk = walk_optional_tail(&buf, 0);
        assert_eq!(walk.status, DecodeStatus::Malformed { offset: 2 });
        assert_eq!(walk.end, 3);
    }

    // Adversarial input: repeated zero-length parameters must terminate
    // within buffer_length iterations.
    #[test]
    fn test_zero_length_parameters_terminate() {
        let buf = [0x09, 0x00].repeat(128);
        let walk = walk_optional_tail(&buf, 0);
        assert_eq!(walk.fields.len(), 128);
        assert_eq!(walk.end, buf.len());
    }

    #[test]
    fn test_walk_from_offset() {
        let buf = [0xAA, 0xAA, 0x09, 0x01, 0x0A, 0x00];
        let walk = walk_optional_tail(&buf, 2);
        assert_eq!(walk.fields.len(), 2);
        assert_eq!(walk.fields[0].start, 4);
        assert_eq!(walk.end, 6);
    }
}
