//! BER (Basic Encoding Rules) decoding
//!
//! Each BER value is a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//!
//! - CC = class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = primitive (0) or constructed (1)
//! - TTTTT = tag number 0-30, or 11111 marking an extended tag in the
//!   following base-128 continuation bytes
//!
//! ## Length encoding
//!
//! - Short form (1 byte): bit 8 = 0, bits 7-1 = length 0-127
//! - Long form: first byte bit 8 = 1, bits 7-1 = number of length octets,
//!   followed by the big-endian length value
//! - Indefinite form (first byte 0x80) is not used by CAMEL/TCAP and is
//!   rejected with an explicit error
//!
//! Only decoding is implemented; this decoder never produces wire bytes.

pub mod reader;
pub mod types;

pub use reader::{BerReader, integer_from_bytes};
pub use types::{BerLength, BerTag, BerTagClass};
