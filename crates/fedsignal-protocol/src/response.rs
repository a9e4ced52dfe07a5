//! Responses and relayed messages received by a worker.

use fedsignal_core::{AuthResponse, CycleResponseSuccess};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Number, Value};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::config::{CodecConfig, PeerLeftScopeKey};
use crate::envelope::{MessageType, RawEnvelope};
use crate::error::{ProtocolError, ProtocolResult};
use crate::id;
use crate::webrtc::WebRtcInternalMessage;

/// Message used when an authentication answer carries neither a worker id
/// nor an error.
pub const UNKNOWN_AUTH_ERROR: &str = "Unknown Authentication Error";

/// Authentication refused by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "authentication failed: {}", self.message)
    }
}

impl std::error::Error for AuthError {}

/// Cycle request turned down by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRejection {
    /// Server status, e.g. `"rejected"`.
    pub status: String,
    /// Seconds to wait before asking again. Integral floats such as `30.0`
    /// are accepted; fractional or negative values are not.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "whole_seconds"
    )]
    pub timeout: Option<u64>,
}

fn whole_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|secs| secs.fract() == 0.0 && *secs >= 0.0 && *secs <= u64::MAX as f64)
                .map(|secs| secs as u64)
        })
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("timeout {number} is not a whole number of seconds")))
}

impl std::fmt::Display for CycleRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.timeout {
            Some(timeout) => write!(f, "cycle {} (retry in {}s)", self.status, timeout),
            None => write!(f, "cycle {}", self.status),
        }
    }
}

impl std::error::Error for CycleRejection {}

/// Messages a worker receives.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundResponse {
    Authenticate(Result<AuthResponse, AuthError>),
    CycleRequest(Result<CycleResponseSuccess, CycleRejection>),
    /// The server acknowledged a get-protocol request; payload ignored.
    GetProtocolResponse,
    /// The server acknowledged a model report; payload ignored.
    ModelReportAck,
    JoinRoom {
        worker_id: Uuid,
        scope_id: Uuid,
    },
    PeerLeft {
        worker_id: Uuid,
        scope_id: Uuid,
    },
    InternalMessage(WebRtcInternalMessage),
}

impl InboundResponse {
    /// Returns the envelope tag this response arrived under.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Authenticate(_) => MessageType::Authenticate,
            Self::CycleRequest(_) => MessageType::CycleRequest,
            Self::GetProtocolResponse => MessageType::GetProtocol,
            Self::ModelReportAck => MessageType::Report,
            Self::JoinRoom { .. } => MessageType::JoinRoom,
            Self::PeerLeft { .. } => MessageType::PeerLeft,
            Self::InternalMessage(_) => MessageType::InternalMessage,
        }
    }
}

/// Decodes a message body with the default configuration.
///
/// # Example
///
/// ```rust
/// use fedsignal_protocol::{InboundResponse, decode};
///
/// let response = decode(br#"{"type":"model-centric/report","data":{}}"#).unwrap();
/// assert_eq!(response, InboundResponse::ModelReportAck);
/// ```
pub fn decode(bytes: &[u8]) -> ProtocolResult<InboundResponse> {
    decode_with(bytes, &CodecConfig::default())
}

/// Decodes a `{type, data}` message body.
///
/// Failures caused by the peer's input are logged at `warn`, anything else
/// at `debug`.
pub fn decode_with(bytes: &[u8], config: &CodecConfig) -> ProtocolResult<InboundResponse> {
    decode_body(bytes, config).inspect_err(|err| {
        if err.is_remote() {
            warn!(error = %err, len = bytes.len(), "rejected inbound message");
        } else {
            debug!(error = %err, len = bytes.len(), "failed to decode message");
        }
    })
}

fn decode_body(bytes: &[u8], config: &CodecConfig) -> ProtocolResult<InboundResponse> {
    let envelope = RawEnvelope::parse(bytes, config)?;
    trace!(message_type = %envelope.message_type, "received envelope");

    let message_type = envelope.kind()?;

    let response = match message_type {
        MessageType::Authenticate => InboundResponse::Authenticate(decode_auth(&envelope.data)),
        MessageType::CycleRequest => InboundResponse::CycleRequest(decode_cycle(&envelope)?),
        MessageType::GetProtocol => InboundResponse::GetProtocolResponse,
        MessageType::Report => InboundResponse::ModelReportAck,
        MessageType::JoinRoom => {
            let context = message_type.as_str();
            InboundResponse::JoinRoom {
                worker_id: id_field(context, &envelope.data, "workerId")?,
                scope_id: id_field(context, &envelope.data, "scopeId")?,
            }
        }
        MessageType::PeerLeft => {
            let context = message_type.as_str();
            let scope_key = config.peer_left_scope_key;
            if scope_key == PeerLeftScopeKey::WorkerId {
                trace!("reading peer-left scope from workerId");
            }
            InboundResponse::PeerLeft {
                worker_id: id_field(context, &envelope.data, "workerId")?,
                scope_id: id_field(context, &envelope.data, scope_key.key())?,
            }
        }
        MessageType::InternalMessage => {
            InboundResponse::InternalMessage(WebRtcInternalMessage::from_payload(&envelope.data)?)
        }
    };

    debug!(message_type = %message_type, len = bytes.len(), "decoded response");
    Ok(response)
}

/// Authentication outcomes are always business results, never codec errors.
///
/// Success only needs `status`, a worker id and the speed-test flag to be
/// present under either spelling; extra or duplicated keys are ignored.
fn decode_auth(data: &Value) -> Result<AuthResponse, AuthError> {
    let status = lookup(data, &["status"], Value::as_str);
    let worker_id = lookup(data, &["workerId", "worker_id"], Value::as_str);
    let requires_speed_test = lookup(
        data,
        &["requiresSpeedTest", "requires_speed_test"],
        Value::as_bool,
    );
    if let (Some(status), Some(worker_id), Some(requires_speed_test)) =
        (status, worker_id, requires_speed_test)
    {
        return Ok(AuthResponse::new(status, worker_id, requires_speed_test));
    }
    match data.get("error").and_then(Value::as_str) {
        Some(message) => Err(AuthError::new(message)),
        None => {
            warn!("authentication response carries neither a worker id nor an error");
            Err(AuthError::new(UNKNOWN_AUTH_ERROR))
        }
    }
}

fn decode_cycle(
    envelope: &RawEnvelope,
) -> ProtocolResult<Result<CycleResponseSuccess, CycleRejection>> {
    let status = string_field(&envelope.message_type, &envelope.data, "status")?;
    if status == "accepted" {
        Ok(Ok(envelope.payload()?))
    } else {
        Ok(Err(envelope.payload()?))
    }
}

/// First key whose value `read` accepts.
fn lookup<'a, T>(data: &'a Value, keys: &[&str], read: fn(&'a Value) -> Option<T>) -> Option<T> {
    keys.iter().find_map(|key| data.get(*key).and_then(read))
}

fn string_field<'a>(message_type: &str, data: &'a Value, key: &str) -> ProtocolResult<&'a str> {
    data.get(key).and_then(Value::as_str).ok_or_else(|| {
        ProtocolError::malformed(message_type, format!("missing string field `{key}`"))
    })
}

fn id_field(message_type: &str, data: &Value, key: &str) -> ProtocolResult<Uuid> {
    id::parse_field(message_type, key, string_field(message_type, data, key)?)
}
