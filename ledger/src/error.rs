//! Error types for decode operations

use thiserror::Error;

/// Error type for decode operations.
///
/// Only structural failures surface here: an outer message that cannot be
/// parsed, or a policy whose type cannot be understood at all. Inputs that
/// are valid but unrecognized (newer header types, unknown configuration
/// keys, non-KV read/write sets) decode to explicit placeholder values
/// instead of erroring.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("failed to decode {0}: {1}")]
    Proto(&'static str, prost::DecodeError), // context, source
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("unknown policy type: {0}")]
    UnknownPolicyType(i32),
    #[error("signature policy rule has no variant set")]
    EmptySignaturePolicy,
    #[error("signed_by index {index} out of range ({identities} identities)")]
    SignedByOutOfRange { index: i32, identities: usize },
}
