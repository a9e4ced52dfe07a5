//! Protocol error types.

use fedsignal_core::RtcSdpType;
use thiserror::Error;

/// Result type for codec operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding signalling messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A string that should hold an identifier does not parse as one.
    #[error("invalid identifier {value:?}: {source}")]
    InvalidIdentifier {
        value: String,
        #[source]
        source: uuid::Error,
    },

    /// A required field is missing or has the wrong shape.
    #[error("malformed {message_type} payload: {reason}")]
    MalformedPayload {
        message_type: String,
        reason: String,
    },

    /// The outer or inner discriminator is not one this codec knows.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// The value is response-only and has no request encoding.
    #[error("{0} cannot be encoded as a request")]
    UnsupportedEncoding(&'static str),

    /// The session description kind cannot be signalled.
    #[error("session description of type {0} cannot be signalled")]
    UnsupportedSdpType(RtcSdpType),

    /// Message body exceeds the configured limit.
    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// Failed to serialize a message to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Creates a malformed payload error.
    pub fn malformed(message_type: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedPayload {
            message_type: message_type.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the error was caused by the remote side's input
    /// rather than by the local caller.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. }
                | Self::MalformedPayload { .. }
                | Self::UnknownMessageType(_)
                | Self::MessageTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display() {
        let err = ProtocolError::malformed("webrtc: join-room", "missing field `scopeId`");
        assert_eq!(
            err.to_string(),
            "malformed webrtc: join-room payload: missing field `scopeId`"
        );
        assert!(err.is_remote());
    }

    #[test]
    fn local_errors_are_not_remote() {
        assert!(!ProtocolError::UnsupportedEncoding("get-protocol response").is_remote());
        assert!(!ProtocolError::UnsupportedSdpType(RtcSdpType::Rollback).is_remote());
    }
}
