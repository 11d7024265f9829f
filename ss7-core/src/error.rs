use thiserror::Error;

/// Main error type for signaling decode operations
///
/// Most decode problems are recovered locally and reported as marker fields
/// in the output tree; only conditions that make it impossible to produce any
/// output for a message propagate as values of this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigError {
    #[error("Truncated input at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Malformed parameter at offset {offset}: {reason}")]
    MalformedParameter { offset: usize, reason: String },

    #[error("Unknown component type: 0x{0:02X}")]
    UnknownComponentType(u8),

    #[error("Recursion limit exceeded at depth {0}")]
    RecursionLimitExceeded(usize),
}

/// Result type alias for signaling decode operations
pub type SigResult<T> = Result<T, SigError>;
