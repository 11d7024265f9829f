//! Decoded-output data model
//!
//! Decoding a message produces a tree of [`DecodedField`] records wrapped in a
//! [`MessageOutput`]. Fields carry the byte range they were decoded from (as
//! absolute offsets into the original capture buffer), a human-readable
//! rendering, and optionally a machine-usable value. The tree shape mirrors
//! the message: bitmask sub-fields, nested BAT-ASE elements, and embedded
//! pass-along messages become children of their enclosing field.
//!
//! All output types are immutable once produced and carry serde derives so
//! display and statistics collaborators can serialize decode results.

use serde::{Deserialize, Serialize};

/// Machine-usable value attached to a decoded field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Signed integer (invoke IDs, opcodes, cause values, ...)
    Integer(i64),
    /// Unsigned integer (bitmask sub-fields, indicators, ...)
    Unsigned(u64),
    /// Decoded address digits
    Digits(String),
    /// Raw octets (opaque or unknown content)
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
}

/// One decoded field: a named slice of the input with a rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedField {
    /// Semantic name (parameter or sub-field label)
    pub name: String,
    /// Start offset in the original buffer (inclusive)
    pub start: usize,
    /// End offset in the original buffer (exclusive)
    pub end: usize,
    /// Human-readable rendering
    pub display: String,
    /// Optional machine-usable value
    pub value: Option<FieldValue>,
    /// Sub-fields (bitmask components, nested elements, embedded messages)
    pub children: Vec<DecodedField>,
}

impl DecodedField {
    /// Create a field with no machine value and no children
    pub fn new(name: impl Into<String>, start: usize, end: usize, display: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            display: display.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Attach a machine-usable value
    pub fn with_value(mut self, value: FieldValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Attach a child field
    pub fn with_child(mut self, child: DecodedField) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: DecodedField) {
        self.children.push(child);
    }

    /// Number of bytes this field spans
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Overall outcome of decoding one message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeStatus {
    /// Everything decoded cleanly
    Ok,
    /// Decoded, but one or more opcodes/parameters were unrecognized and
    /// reported as opaque placeholder fields
    OkWithUnknowns,
    /// Decoding gave up at `offset`; fields decoded before that point are
    /// still present in the output
    Malformed { offset: usize },
}

impl DecodeStatus {
    /// Combine two statuses, keeping the worse one
    ///
    /// `Malformed` dominates `OkWithUnknowns`, which dominates `Ok`. When
    /// both sides are `Malformed` the earlier offset wins, since that is
    /// where parsing first gave up.
    pub fn combine(self, other: DecodeStatus) -> DecodeStatus {
        match (self, other) {
            (DecodeStatus::Malformed { offset: a }, DecodeStatus::Malformed { offset: b }) => {
                DecodeStatus::Malformed { offset: a.min(b) }
            }
            (m @ DecodeStatus::Malformed { .. }, _) | (_, m @ DecodeStatus::Malformed { .. }) => m,
            (DecodeStatus::OkWithUnknowns, _) | (_, DecodeStatus::OkWithUnknowns) => {
                DecodeStatus::OkWithUnknowns
            }
            _ => DecodeStatus::Ok,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, DecodeStatus::Malformed { .. })
    }
}

/// Structured result of decoding one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageOutput {
    /// One-line display summary (operation name, message-type name)
    pub summary: String,
    /// Ordered decoded fields: mandatory fixed, mandatory variable, optional
    pub fields: Vec<DecodedField>,
    /// Total number of bytes consumed from the input buffer
    pub consumed: usize,
    /// Decode outcome
    pub status: DecodeStatus,
}

impl MessageOutput {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            fields: Vec::new(),
            consumed: 0,
            status: DecodeStatus::Ok,
        }
    }

    pub fn push_field(&mut self, field: DecodedField) {
        self.fields.push(field);
    }

    /// Degrade the status, keeping the worse of the two
    pub fn degrade(&mut self, status: DecodeStatus) {
        self.status = self.status.combine(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_combine_ordering() {
        let ok = DecodeStatus::Ok;
        let unk = DecodeStatus::OkWithUnknowns;
        let bad = DecodeStatus::Malformed { offset: 7 };

        assert_eq!(ok.combine(ok), ok);
        assert_eq!(ok.combine(unk), unk);
        assert_eq!(unk.combine(ok), unk);
        assert_eq!(unk.combine(bad), bad);
        assert_eq!(bad.combine(unk), bad);
    }

    #[test]
    fn test_status_combine_malformed_keeps_earliest_offset() {
        let a = DecodeStatus::Malformed { offset: 12 };
        let b = DecodeStatus::Malformed { offset: 4 };
        assert_eq!(a.combine(b), DecodeStatus::Malformed { offset: 4 });
        assert_eq!(b.combine(a), DecodeStatus::Malformed { offset: 4 });
    }

    #[test]
    fn test_field_builder() {
        let field = DecodedField::new("Cause indicators", 10, 12, "Cause: User busy (17)")
            .with_value(FieldValue::Integer(17))
            .with_child(DecodedField::new("Location", 10, 11, "User"));

        assert_eq!(field.len(), 2);
        assert_eq!(field.value, Some(FieldValue::Integer(17)));
        assert_eq!(field.children.len(), 1);
    }
}
