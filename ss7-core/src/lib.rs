//! Core types and utilities for SS7 CAMEL/ISUP decoding
//!
//! This crate provides fundamental types, error handling, the decoded-output
//! data model, and the address-digit codec used throughout the decoder stack.

pub mod error;
pub mod field;
pub mod digits;

pub use error::{SigError, SigResult};
pub use field::{DecodeStatus, DecodedField, FieldValue, MessageOutput};
pub use digits::{AddressContext, DigitString};
