//! The `{type, data}` envelope shared by every signalling message.
//!
//! ```text
//! {"type": "<message type tag>", "data": { ...kind-specific fields... }}
//! ```
//!
//! Requests and responses both go through the two helpers here: [`seal`]
//! wraps a serializable payload under its tag, and [`RawEnvelope`] splits an
//! inbound body into its tag and an untyped payload for later dispatch.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CodecConfig;
use crate::error::{ProtocolError, ProtocolResult};

/// Tag placed in the envelope's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Authenticate,
    CycleRequest,
    Report,
    GetProtocol,
    JoinRoom,
    PeerLeft,
    InternalMessage,
}

impl MessageType {
    /// Every tag this codec understands.
    pub const ALL: [MessageType; 7] = [
        Self::Authenticate,
        Self::CycleRequest,
        Self::Report,
        Self::GetProtocol,
        Self::JoinRoom,
        Self::PeerLeft,
        Self::InternalMessage,
    ];

    /// Returns the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticate => "model-centric/authenticate",
            Self::CycleRequest => "model-centric/cycle-request",
            Self::Report => "model-centric/report",
            Self::GetProtocol => "get-protocol",
            Self::JoinRoom => "webrtc: join-room",
            Self::PeerLeft => "webrtc: peer-left",
            Self::InternalMessage => "webrtc: internal-message",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownMessageType(s.to_string()))
    }
}

#[derive(Serialize)]
struct SealedEnvelope<'a, T> {
    #[serde(rename = "type")]
    message_type: &'static str,
    data: &'a T,
}

/// Serializes `data` under `message_type` into wire bytes.
pub(crate) fn seal<T: Serialize>(
    message_type: MessageType,
    data: &T,
    config: &CodecConfig,
) -> ProtocolResult<Vec<u8>> {
    let bytes = serde_json::to_vec(&SealedEnvelope {
        message_type: message_type.as_str(),
        data,
    })?;
    config.check_size(bytes.len())?;
    Ok(bytes)
}

/// An inbound envelope whose payload has not been interpreted yet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEnvelope {
    /// The unparsed `type` tag.
    #[serde(rename = "type")]
    pub message_type: String,

    /// The payload; `null` when the sender omitted it.
    #[serde(default)]
    pub data: Value,
}

impl RawEnvelope {
    /// Splits a message body into tag and payload.
    pub fn parse(bytes: &[u8], config: &CodecConfig) -> ProtocolResult<Self> {
        config.check_size(bytes.len())?;
        serde_json::from_slice(bytes).map_err(|err| ProtocolError::malformed("envelope", err))
    }

    /// Resolves the tag against the known message types.
    pub fn kind(&self) -> ProtocolResult<MessageType> {
        self.message_type.parse()
    }

    /// Reads the whole payload as `T`.
    pub(crate) fn payload<T: DeserializeOwned>(&self) -> ProtocolResult<T> {
        read_payload(&self.message_type, &self.data)
    }
}

/// Interprets an untyped payload as `T`, blaming `message_type` on failure.
pub(crate) fn read_payload<T: DeserializeOwned>(message_type: &str, data: &Value) -> ProtocolResult<T> {
    T::deserialize(data).map_err(|err| ProtocolError::malformed(message_type, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_tags_roundtrip() {
        for kind in MessageType::ALL {
            assert_eq!(kind.as_str().parse::<MessageType>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_tag() {
        let err = "model-centric/bogus".parse::<MessageType>().unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMessageType(t) if t == "model-centric/bogus"));
    }

    #[test]
    fn seal_writes_type_then_data() {
        let bytes = seal(
            MessageType::JoinRoom,
            &serde_json::json!({"a": 1}),
            &CodecConfig::default(),
        )
        .unwrap();
        insta::assert_snapshot!(
            String::from_utf8(bytes).unwrap(),
            @r#"{"type":"webrtc: join-room","data":{"a":1}}"#
        );
    }

    #[test]
    fn parse_without_data() {
        let envelope =
            RawEnvelope::parse(br#"{"type":"get-protocol"}"#, &CodecConfig::default()).unwrap();
        assert_eq!(envelope.kind().unwrap(), MessageType::GetProtocol);
        assert!(envelope.data.is_null());
    }

    #[test]
    fn parse_rejects_non_envelopes() {
        let config = CodecConfig::default();
        for body in [&b"not json"[..], b"[1,2]", br#"{"data":{}}"#, br#"{"type":5}"#] {
            let err = RawEnvelope::parse(body, &config).unwrap_err();
            assert!(
                matches!(err, ProtocolError::MalformedPayload { ref message_type, .. } if message_type == "envelope"),
                "unexpected error for {:?}: {err:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn oversize_body_rejected_before_parsing() {
        let config = CodecConfig::default().with_max_message_size(8);
        let err = RawEnvelope::parse(br#"{"type":"get-protocol"}"#, &config).unwrap_err();
        assert!(matches!(err, ProtocolError::MessageTooLarge { max: 8, .. }));
    }
}
