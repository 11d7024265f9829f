//! BER primitive reader for SS7 CAMEL/TCAP decoding
//!
//! This crate provides the subset of ITU-T X.690 BER actually used by the
//! CAMEL application layer: tag/length header decoding (definite-length form
//! only), INTEGER, NULL and OCTET STRING primitives, and context/application
//! tagged values. It is decode-only; producing wire bytes is out of scope.

pub mod ber;

pub use ber::{BerLength, BerReader, BerTag, BerTagClass, integer_from_bytes};
