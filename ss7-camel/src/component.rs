//! TCAP component decoding
//!
//! A CAP message arrives as one TCAP component: a context-constructed CHOICE
//! of Invoke (1), ReturnResultLast (2), ReturnError (3) or Reject (4). The
//! component carries an invoke ID (an INTEGER, or NULL meaning "absent"),
//! then per-alternative content. Only an unrecognized CHOICE tag aborts the
//! component; everything inside it degrades to marker fields instead.

use ss7_asn1::{BerReader, BerTagClass, integer_from_bytes};
use ss7_core::error::{SigError, SigResult};
use ss7_core::field::{DecodeStatus, DecodedField, FieldValue, MessageOutput};

use crate::args;
use crate::opcode::{self, CamelVersion};

const TAG_INVOKE: u32 = 1;
const TAG_RETURN_RESULT_LAST: u32 = 2;
const TAG_RETURN_ERROR: u32 = 3;
const TAG_REJECT: u32 = 4;

/// Decode one TCAP component at `offset`
///
/// # Error Handling
///
/// Fails with [`SigError::UnknownComponentType`] when the outer CHOICE tag
/// is not one of the four component types, and [`SigError::TruncatedInput`]
/// when the buffer cannot hold the component header. Problems inside the
/// component are reported through the output status.
pub fn decode_component(
    buf: &[u8],
    offset: usize,
    version: CamelVersion,
) -> SigResult<MessageOutput> {
    let mut reader = BerReader::new(buf, offset);
    let (tag, _, value_range) = reader.read_tlv()?;

    if tag.class() != BerTagClass::ContextSpecific || !tag.is_constructed() {
        return Err(SigError::UnknownComponentType(first_octet(buf, offset)));
    }

    let mut inner = BerReader::bounded(buf, value_range.start, value_range.end - value_range.start);
    let mut output = match tag.number() {
        TAG_INVOKE => decode_invoke(buf, &mut inner, version),
        TAG_RETURN_RESULT_LAST => decode_return_result(buf, &mut inner),
        TAG_RETURN_ERROR => decode_return_error(&mut inner),
        TAG_REJECT => decode_reject(&mut inner),
        _ => return Err(SigError::UnknownComponentType(first_octet(buf, offset))),
    };

    output.consumed = value_range.end - offset;
    Ok(output)
}

fn first_octet(buf: &[u8], offset: usize) -> u8 {
    buf.get(offset).copied().unwrap_or(0)
}

/// Invoke ID: INTEGER, or NULL meaning absent
fn decode_invoke_id(reader: &mut BerReader<'_>, output: &mut MessageOutput) {
    let at = reader.position();
    match reader.peek_byte() {
        Some(0x05) => match reader.read_null() {
            Ok(range) => output.push_field(DecodedField::new(
                "Invoke ID",
                at,
                range.end,
                "Invoke ID: absent",
            )),
            Err(_) => output.degrade(DecodeStatus::Malformed { offset: at }),
        },
        Some(_) => match reader.read_integer_tlv() {
            Ok((value, range)) => output.push_field(
                DecodedField::new("Invoke ID", at, range.end, format!("Invoke ID: {}", value))
                    .with_value(FieldValue::Integer(value)),
            ),
            Err(_) => {
                output.degrade(DecodeStatus::Malformed { offset: at });
            }
        },
        None => output.degrade(DecodeStatus::Malformed { offset: at }),
    }
}

fn decode_invoke(buf: &[u8], reader: &mut BerReader<'_>, version: CamelVersion) -> MessageOutput {
    let mut output = MessageOutput::new("Invoke");
    decode_invoke_id(reader, &mut output);
    if output.status.is_malformed() {
        return output;
    }

    // Optional linked ID [0]
    if reader.peek_byte() == Some(0x80) {
        let at = reader.position();
        match reader.read_tlv() {
            Ok((_, value, range)) => match integer_from_bytes(value, range.start) {
                Ok(linked) => output.push_field(
                    DecodedField::new("Linked ID", at, range.end, format!("Linked ID: {}", linked))
                        .with_value(FieldValue::Integer(linked)),
                ),
                Err(_) => output.degrade(DecodeStatus::Malformed { offset: range.start }),
            },
            Err(_) => {
                output.degrade(DecodeStatus::Malformed { offset: at });
                return output;
            }
        }
    }

    // Operation code
    let at = reader.position();
    let (code, code_range) = match reader.read_integer_tlv() {
        Ok(ok) => ok,
        Err(_) => {
            output.degrade(DecodeStatus::Malformed { offset: at });
            return output;
        }
    };

    match opcode::opcode_name(code) {
        Some(name) => {
            output.summary = format!("Invoke {}", name);
            output.push_field(
                DecodedField::new(
                    "Operation",
                    at,
                    code_range.end,
                    format!("Operation: {} ({})", name, code),
                )
                .with_value(FieldValue::Integer(code)),
            );
        }
        None => {
            // Unknown opcode: the argument length is still known, so the
            // bytes are reported opaquely instead of failing the component.
            log::debug!("unknown CAP opcode {}", code);
            output.summary = format!("Invoke unknown operation {}", code);
            output.push_field(
                DecodedField::new(
                    "Operation",
                    at,
                    code_range.end,
                    format!("Operation: unknown ({})", code),
                )
                .with_value(FieldValue::Integer(code)),
            );
            if reader.has_remaining() {
                let blob_start = reader.position();
                let blob_end = blob_start + reader.remaining();
                output.push_field(DecodedField::new(
                    "Argument",
                    blob_start,
                    blob_end,
                    format!("Unknown invokeData blob, {} bytes", blob_end - blob_start),
                ));
            }
            output.degrade(DecodeStatus::OkWithUnknowns);
            return output;
        }
    }

    // Argument, when present
    if reader.has_remaining() {
        let at = reader.position();
        match reader.read_tlv() {
            Ok((arg_tag, _, arg_range)) => {
                let (fields, status) = args::decode_argument(version, code, buf, arg_tag, arg_range);
                output.degrade(status);
                for field in fields {
                    output.push_field(field);
                }
            }
            Err(_) => output.degrade(DecodeStatus::Malformed { offset: at }),
        }
    }

    output
}

fn decode_return_result(buf: &[u8], reader: &mut BerReader<'_>) -> MessageOutput {
    let mut output = MessageOutput::new("ReturnResultLast");
    decode_invoke_id(reader, &mut output);
    if output.status.is_malformed() {
        return output;
    }

    // Optional SEQUENCE { opcode, result }
    if !reader.has_remaining() {
        return output;
    }
    let at = reader.position();
    let (tag, _, range) = match reader.read_tlv() {
        Ok(ok) => ok,
        Err(_) => {
            output.degrade(DecodeStatus::Malformed { offset: at });
            return output;
        }
    };
    if !tag.is_universal_constructed(16) {
        output.push_field(DecodedField::new(
            "Result",
            at,
            range.end,
            format!("Result: {} bytes, contents opaque", range.len()),
        ));
        output.degrade(DecodeStatus::OkWithUnknowns);
        return output;
    }

    let mut seq = BerReader::bounded(buf, range.start, range.end - range.start);
    let code_at = seq.position();
    match seq.read_integer_tlv() {
        Ok((code, code_range)) => {
            let name = opcode::opcode_name(code).unwrap_or("unknown");
            output.summary = format!("ReturnResultLast {}", name);
            output.push_field(
                DecodedField::new(
                    "Operation",
                    code_at,
                    code_range.end,
                    format!("Operation: {} ({})", name, code),
                )
                .with_value(FieldValue::Integer(code)),
            );
            if seq.has_remaining() {
                let result_start = seq.position();
                let result_end = result_start + seq.remaining();
                output.push_field(DecodedField::new(
                    "Result",
                    result_start,
                    result_end,
                    format!("Result: {} bytes", result_end - result_start),
                ));
            }
        }
        Err(_) => output.degrade(DecodeStatus::Malformed { offset: code_at }),
    }

    output
}

fn decode_return_error(reader: &mut BerReader<'_>) -> MessageOutput {
    let mut output = MessageOutput::new("ReturnError");
    decode_invoke_id(reader, &mut output);
    if output.status.is_malformed() {
        return output;
    }

    let at = reader.position();
    match reader.read_integer_tlv() {
        Ok((code, range)) => {
            let rendered = match opcode::error_name(code) {
                Some(name) => format!("Error: {} ({})", name, code),
                None => format!("Error: unknown ({})", code),
            };
            if opcode::error_name(code).is_none() {
                output.degrade(DecodeStatus::OkWithUnknowns);
            }
            output.summary = format!(
                "ReturnError {}",
                opcode::error_name(code).unwrap_or("unknown")
            );
            output.push_field(
                DecodedField::new("Error code", at, range.end, rendered)
                    .with_value(FieldValue::Integer(code)),
            );
        }
        Err(_) => {
            output.degrade(DecodeStatus::Malformed { offset: at });
            return output;
        }
    }

    if reader.has_remaining() {
        let param_start = reader.position();
        let param_end = param_start + reader.remaining();
        output.push_field(DecodedField::new(
            "Error parameter",
            param_start,
            param_end,
            format!("Error parameter: {} bytes, contents opaque", param_end - param_start),
        ));
    }

    output
}

fn reject_problem_name(category: u32, value: i64) -> String {
    let (kind, name) = match category {
        0 => (
            "general",
            match value {
                0 => "unrecognized component",
                1 => "mistyped component",
                2 => "badly structured component",
                _ => "unknown problem",
            },
        ),
        1 => (
            "invoke",
            match value {
                0 => "duplicate invoke ID",
                1 => "unrecognized operation",
                2 => "mistyped parameter",
                3 => "resource limitation",
                4 => "initiating release",
                5 => "unrecognized linked ID",
                6 => "linked response unexpected",
                7 => "unexpected linked operation",
                _ => "unknown problem",
            },
        ),
        2 => (
            "returnResult",
            match value {
                0 => "unrecognized invoke ID",
                1 => "return result unexpected",
                2 => "mistyped parameter",
                _ => "unknown problem",
            },
        ),
        3 => (
            "returnError",
            match value {
                0 => "unrecognized invoke ID",
                1 => "return error unexpected",
                2 => "unrecognized error",
                3 => "unexpected error",
                4 => "mistyped parameter",
                _ => "unknown problem",
            },
        ),
        _ => ("unknown", "unknown problem"),
    };
    format!("Problem ({}): {}", kind, name)
}

fn decode_reject(reader: &mut BerReader<'_>) -> MessageOutput {
    let mut output = MessageOutput::new("Reject");
    decode_invoke_id(reader, &mut output);
    if output.status.is_malformed() {
        return output;
    }

    // Problem CHOICE: context tag selects the category, value the problem
    let at = reader.position();
    match reader.read_tlv() {
        Ok((tag, value, range)) => {
            if tag.class() != BerTagClass::ContextSpecific || tag.number() > 3 {
                output.push_field(DecodedField::new(
                    "Problem",
                    at,
                    range.end,
                    "Problem: unrecognized category",
                ));
                output.degrade(DecodeStatus::OkWithUnknowns);
                return output;
            }
            match integer_from_bytes(value, range.start) {
                Ok(problem) => {
                    let rendered = reject_problem_name(tag.number(), problem);
                    output.summary = format!("Reject ({})", rendered);
                    output.push_field(
                        DecodedField::new("Problem", at, range.end, rendered)
                            .with_value(FieldValue::Integer(problem)),
                    );
                }
                Err(_) => output.degrade(DecodeStatus::Malformed { offset: range.start }),
            }
        }
        Err(_) => output.degrade(DecodeStatus::Malformed { offset: at }),
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    // Invoke initialDP with a calling party number member; the concrete
    // digits exercise the odd-count rule end to end.
    #[test]
    fn test_invoke_initial_dp() {
        let buf = [
            0xA1, 0x10, // Invoke
            0x02, 0x01, 0x01, // Invoke ID = 1
            0x02, 0x01, 0x00, // opcode = initialDP
            0x30, 0x08, // SEQUENCE
            0x80, 0x01, 0x2A, // serviceKey [0] = 42
            0x83, 0x03, 0x81, 0x10, 0x01, // callingPartyNumber [3], odd, digit "1"
        ];
        let output = decode_component(&buf, 0, CamelVersion::V2).unwrap();
        assert_eq!(output.summary, "Invoke initialDP");
        assert_eq!(output.status, DecodeStatus::Ok);
        assert_eq!(output.consumed, buf.len());

        let calling = output.fields.iter().find(|f| f.name == "callingPartyNumber").unwrap();
        assert_eq!(calling.value, Some(FieldValue::Digits("1".into())));
    }

    #[test]
    fn test_invoke_absent_invoke_id() {
        let buf = [
            0xA1, 0x05, // Invoke
            0x05, 0x00, // invoke ID absent (NULL)
            0x02, 0x01, 0x37, // opcode = activityTest
        ];
        let output = decode_component(&buf, 0, CamelVersion::V2).unwrap();
        assert_eq!(output.summary, "Invoke activityTest");
        assert_eq!(output.fields[0].display, "Invoke ID: absent");
    }

    #[test]
    fn test_invoke_unknown_opcode_is_opaque_blob() {
        let buf = [
            0xA1, 0x09, // Invoke
            0x02, 0x01, 0x02, // Invoke ID = 2
            0x02, 0x01, 0x63, // opcode = 99 (unknown)
            0x04, 0x01, 0xAB, // argument bytes
        ];
        let output = decode_component(&buf, 0, CamelVersion::V2).unwrap();
        assert_eq!(output.status, DecodeStatus::OkWithUnknowns);
        assert_eq!(output.summary, "Invoke unknown operation 99");
        let blob = output.fields.iter().find(|f| f.name == "Argument").unwrap();
        assert!(blob.display.contains("Unknown invokeData blob"));
    }

    #[test]
    fn test_return_result_last() {
        let buf = [
            0xA2, 0x08, // ReturnResultLast
            0x02, 0x01, 0x05, // Invoke ID = 5
            0x30, 0x03, // SEQUENCE
            0x02, 0x01, 0x23, // opcode = applyCharging
        ];
        let output = decode_component(&buf, 0, CamelVersion::V2).unwrap();
        assert_eq!(output.summary, "ReturnResultLast applyCharging");
        assert_eq!(output.status, DecodeStatus::Ok);
    }

    #[test]
    fn test_return_error() {
        let buf = [
            0xA3, 0x06, // ReturnError
            0x02, 0x01, 0x07, // Invoke ID = 7
            0x02, 0x01, 0x0B, // error = systemFailure
        ];
        let output = decode_component(&buf, 0, CamelVersion::V2).unwrap();
        assert_eq!(output.summary, "ReturnError systemFailure");
        let code = output.fields.iter().find(|f| f.name == "Error code").unwrap();
        assert_eq!(code.display, "Error: systemFailure (11)");
    }

    #[test]
    fn test_reject_problem() {
        let buf = [
            0xA4, 0x06, // Reject
            0x02, 0x01, 0x03, // Invoke ID = 3
            0x81, 0x01, 0x01, // invokeProblem: unrecognized operation
        ];
        let output = decode_component(&buf, 0, CamelVersion::V2).unwrap();
        assert_eq!(output.summary, "Reject (Problem (invoke): unrecognized operation)");
    }

    // An unrecognized CHOICE tag aborts this component only; the caller can
    // keep decoding sibling components.
    #[test]
    fn test_unknown_component_tag() {
        let buf = [0xA7, 0x03, 0x02, 0x01, 0x01];
        let err = decode_component(&buf, 0, CamelVersion::V2).unwrap_err();
        assert_eq!(err, SigError::UnknownComponentType(0xA7));
    }

    #[test]
    fn test_component_is_idempotent() {
        let buf = [
            0xA1, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x1F, // Invoke continue
        ];
        let first = decode_component(&buf, 0, CamelVersion::V3).unwrap();
        let second = decode_component(&buf, 0, CamelVersion::V3).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.summary, "Invoke continue");
    }
}
