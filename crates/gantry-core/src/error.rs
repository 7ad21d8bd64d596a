//! Bridge error types.

use crate::event::TriggerKind;
use thiserror::Error;

/// Errors that can occur while bridging a trigger event.
///
/// None of these are retried or swallowed inside the bridge; every one
/// propagates to the caller, which decides how to present it to the
/// invoking platform.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The raw event is missing a field required by its declared kind.
    /// No canonical request could be formed, so this is an invocation
    /// failure rather than a 500 response.
    #[error("malformed {kind} event: {reason}")]
    MalformedEvent { kind: TriggerKind, reason: String },

    /// A trigger kind outside the supported set was declared. This is a
    /// configuration error, never silently defaulted.
    #[error("unsupported trigger kind: {0}")]
    UnsupportedTriggerKind(String),

    /// The framework raised, or returned a result the bridge cannot
    /// encode (e.g. an out-of-range status code).
    #[error("framework invocation failed: {0}")]
    Framework(#[source] anyhow::Error),

    /// A body could not be decoded or encoded as declared.
    #[error("body encoding failed: {0}")]
    Encoding(String),
}

impl From<std::string::FromUtf8Error> for BridgeError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        BridgeError::Encoding(e.to_string())
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
