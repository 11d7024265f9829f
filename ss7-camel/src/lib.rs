//! CAMEL (CAP) application-layer decoding
//!
//! Decodes the TCAP components carrying CAP operations: the Invoke /
//! ReturnResultLast / ReturnError / Reject CHOICE, the invoke ID and opcode,
//! and the per-operation argument SEQUENCEs. Argument member tables are keyed
//! by [`CamelVersion`], since opcodes keep their numbers across phases while
//! their argument shapes change.
//!
//! Embedded ITU-T Q.763 numbers (called/calling party, redirecting party)
//! are decoded through the `ss7-isup` parameter decoders.

pub mod args;
pub mod component;
pub mod opcode;

pub use component::decode_component;
pub use opcode::{CamelVersion, opcode_name};
