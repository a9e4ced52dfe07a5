//! Requests sent from a worker to the coordination server or to peers.

use fedsignal_core::{CycleRequest, FederatedReport, ParcelFederatedReport};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::CodecConfig;
use crate::envelope::{MessageType, seal};
use crate::error::{ProtocolError, ProtocolResult};
use crate::id;
use crate::webrtc::WebRtcInternalMessage;

/// Credentials and model selection for `model-centric/authenticate`.
///
/// Keys go out in camelCase; snake_case keys are accepted when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// Token issued by the model owner, when the model requires one.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "auth_token")]
    pub auth_token: Option<String>,

    #[serde(alias = "model_name")]
    pub model_name: String,

    #[serde(alias = "model_version")]
    pub model_version: String,
}

impl AuthRequest {
    /// Creates an unauthenticated request for a model.
    pub fn new(model_name: impl Into<String>, model_version: impl Into<String>) -> Self {
        Self {
            auth_token: None,
            model_name: model_name.into(),
            model_version: model_version.into(),
        }
    }

    /// Builder: attach an auth token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Messages a worker sends.
///
/// Equality is only defined between `GetProtocol`, `JoinRoom`, `PeerLeft`,
/// `InternalMessage` and `GetProtocolResponse` values of the same variant.
/// Every other comparison is `false`, including a value compared with
/// itself, so `OutboundRequest` is `PartialEq` but not `Eq`.
#[derive(Debug, Clone)]
pub enum OutboundRequest {
    Authenticate(AuthRequest),
    CycleRequest(CycleRequest),
    ModelReport(FederatedReport),
    ModelParcelReport(ParcelFederatedReport),
    GetProtocol {
        worker_id: Uuid,
        scope_id: Uuid,
        protocol_id: String,
    },
    JoinRoom {
        worker_id: Uuid,
        scope_id: Uuid,
    },
    PeerLeft {
        worker_id: Uuid,
        scope_id: Uuid,
    },
    InternalMessage(WebRtcInternalMessage),
    /// Response-only marker; encoding it is always an error.
    GetProtocolResponse,
}

impl OutboundRequest {
    /// Creates a get-protocol request.
    pub fn get_protocol(worker_id: Uuid, scope_id: Uuid, protocol_id: impl Into<String>) -> Self {
        Self::GetProtocol {
            worker_id,
            scope_id,
            protocol_id: protocol_id.into(),
        }
    }

    /// Creates a join-room request.
    pub fn join_room(worker_id: Uuid, scope_id: Uuid) -> Self {
        Self::JoinRoom {
            worker_id,
            scope_id,
        }
    }

    /// Creates a peer-left notice.
    pub fn peer_left(worker_id: Uuid, scope_id: Uuid) -> Self {
        Self::PeerLeft {
            worker_id,
            scope_id,
        }
    }

    /// Returns the envelope tag, or `None` for response-only markers.
    pub fn message_type(&self) -> Option<MessageType> {
        match self {
            Self::Authenticate(_) => Some(MessageType::Authenticate),
            Self::CycleRequest(_) => Some(MessageType::CycleRequest),
            Self::ModelReport(_) | Self::ModelParcelReport(_) => Some(MessageType::Report),
            Self::GetProtocol { .. } => Some(MessageType::GetProtocol),
            Self::JoinRoom { .. } => Some(MessageType::JoinRoom),
            Self::PeerLeft { .. } => Some(MessageType::PeerLeft),
            Self::InternalMessage(_) => Some(MessageType::InternalMessage),
            Self::GetProtocolResponse => None,
        }
    }
}

impl PartialEq for OutboundRequest {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::GetProtocol {
                    worker_id: w1,
                    scope_id: s1,
                    protocol_id: p1,
                },
                Self::GetProtocol {
                    worker_id: w2,
                    scope_id: s2,
                    protocol_id: p2,
                },
            ) => w1 == w2 && s1 == s2 && p1 == p2,
            (
                Self::JoinRoom {
                    worker_id: w1,
                    scope_id: s1,
                },
                Self::JoinRoom {
                    worker_id: w2,
                    scope_id: s2,
                },
            )
            | (
                Self::PeerLeft {
                    worker_id: w1,
                    scope_id: s1,
                },
                Self::PeerLeft {
                    worker_id: w2,
                    scope_id: s2,
                },
            ) => w1 == w2 && s1 == s2,
            (Self::InternalMessage(a), Self::InternalMessage(b)) => a == b,
            (Self::GetProtocolResponse, Self::GetProtocolResponse) => true,
            _ => false,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetProtocolData<'a> {
    worker_id: String,
    scope_id: String,
    protocol_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomData {
    worker_id: String,
    scope_id: String,
}

impl RoomData {
    fn new(worker_id: &Uuid, scope_id: &Uuid) -> Self {
        Self {
            worker_id: id::format(worker_id),
            scope_id: id::format(scope_id),
        }
    }
}

/// Encodes a request with the default configuration.
///
/// # Example
///
/// ```rust
/// use fedsignal_protocol::{OutboundRequest, encode};
/// use uuid::Uuid;
///
/// let bytes = encode(&OutboundRequest::join_room(Uuid::new_v4(), Uuid::new_v4())).unwrap();
/// let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
/// assert_eq!(value["type"], "webrtc: join-room");
/// ```
pub fn encode(request: &OutboundRequest) -> ProtocolResult<Vec<u8>> {
    encode_with(request, &CodecConfig::default())
}

/// Encodes a request into `{type, data}` wire bytes.
pub fn encode_with(request: &OutboundRequest, config: &CodecConfig) -> ProtocolResult<Vec<u8>> {
    let Some(message_type) = request.message_type() else {
        return Err(ProtocolError::UnsupportedEncoding("get-protocol response"));
    };

    let bytes = match request {
        OutboundRequest::Authenticate(auth) => seal(message_type, auth, config),
        OutboundRequest::CycleRequest(cycle) => seal(message_type, cycle, config),
        OutboundRequest::ModelReport(report) => seal(message_type, report, config),
        OutboundRequest::ModelParcelReport(report) => seal(message_type, report, config),
        OutboundRequest::GetProtocol {
            worker_id,
            scope_id,
            protocol_id,
        } => seal(
            message_type,
            &GetProtocolData {
                worker_id: id::format(worker_id),
                scope_id: id::format(scope_id),
                protocol_id,
            },
            config,
        ),
        OutboundRequest::JoinRoom {
            worker_id,
            scope_id,
        }
        | OutboundRequest::PeerLeft {
            worker_id,
            scope_id,
        } => seal(message_type, &RoomData::new(worker_id, scope_id), config),
        OutboundRequest::InternalMessage(message) => seal(message_type, message, config),
        OutboundRequest::GetProtocolResponse => {
            return Err(ProtocolError::UnsupportedEncoding("get-protocol response"));
        }
    }?;

    debug!(message_type = %message_type, len = bytes.len(), "encoded request");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedsignal_core::RtcSessionDescription;
    use serde_json::{Value, json};

    const U1: &str = "9a3f1c2e-7b4d-4e5f-8a6b-1c2d3e4f5a6b";
    const U2: &str = "d1e2f3a4-b5c6-4d7e-8f90-a1b2c3d4e5f6";

    fn encode_str(request: &OutboundRequest) -> String {
        String::from_utf8(encode(request).unwrap()).unwrap()
    }

    fn encode_value(request: &OutboundRequest) -> Value {
        serde_json::from_slice(&encode(request).unwrap()).unwrap()
    }

    #[test]
    fn authenticate_without_token() {
        let request = OutboundRequest::Authenticate(AuthRequest::new("mnist", "1.0.0"));
        insta::assert_snapshot!(
            encode_str(&request),
            @r#"{"type":"model-centric/authenticate","data":{"modelName":"mnist","modelVersion":"1.0.0"}}"#
        );
    }

    #[test]
    fn authenticate_with_token() {
        let request = OutboundRequest::Authenticate(
            AuthRequest::new("mnist", "1.0.0").with_auth_token("secret"),
        );
        insta::assert_snapshot!(
            encode_str(&request),
            @r#"{"type":"model-centric/authenticate","data":{"authToken":"secret","modelName":"mnist","modelVersion":"1.0.0"}}"#
        );
    }

    #[test]
    fn cycle_request() {
        let request = OutboundRequest::CycleRequest(
            CycleRequest::new("w1", "mnist", "1.0.0").with_speed_test(20.0, 50.5, 10.25),
        );
        insta::assert_snapshot!(
            encode_str(&request),
            @r#"{"type":"model-centric/cycle-request","data":{"workerId":"w1","model":"mnist","version":"1.0.0","ping":20.0,"download":50.5,"upload":10.25}}"#
        );
    }

    #[test]
    fn auth_request_decodes_either_key_spelling() {
        let camel: AuthRequest =
            serde_json::from_str(r#"{"authToken":"t","modelName":"m","modelVersion":"1"}"#)
                .unwrap();
        let snake: AuthRequest =
            serde_json::from_str(r#"{"auth_token":"t","model_name":"m","model_version":"1"}"#)
                .unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel, AuthRequest::new("m", "1").with_auth_token("t"));
    }

    #[test]
    fn cycle_request_never_emits_null() {
        let request = OutboundRequest::CycleRequest(CycleRequest::new("w1", "mnist", "1.0.0"));
        let value = encode_value(&request);
        let data = value["data"].as_object().unwrap();
        assert!(!data.contains_key("ping"));
        assert!(!data.contains_key("download"));
        assert!(!data.contains_key("upload"));
    }

    #[test]
    fn both_report_kinds_share_tag_and_shape() {
        let plain = encode_value(&OutboundRequest::ModelReport(FederatedReport::new(
            "w1", "rk", "AAEC",
        )));
        let parcel = encode_value(&OutboundRequest::ModelParcelReport(
            ParcelFederatedReport::new("w1", "rk", "AAEC"),
        ));
        assert_eq!(plain, parcel);
        assert_eq!(
            plain,
            json!({
                "type": "model-centric/report",
                "data": {"workerId": "w1", "requestKey": "rk", "diff": "AAEC"}
            })
        );
    }

    #[test]
    fn get_protocol_lowercases_ids() {
        let worker_id = id::parse(&U1.to_uppercase()).unwrap();
        let scope_id = id::parse(&U2.to_uppercase()).unwrap();
        let request = OutboundRequest::get_protocol(worker_id, scope_id, "p");
        insta::assert_snapshot!(
            encode_str(&request),
            @r#"{"type":"get-protocol","data":{"workerId":"9a3f1c2e-7b4d-4e5f-8a6b-1c2d3e4f5a6b","scopeId":"d1e2f3a4-b5c6-4d7e-8f90-a1b2c3d4e5f6","protocolId":"p"}}"#
        );
    }

    #[test]
    fn join_room_and_peer_left() {
        let worker_id = id::parse(U1).unwrap();
        let scope_id = id::parse(U2).unwrap();
        assert_eq!(
            encode_value(&OutboundRequest::join_room(worker_id, scope_id)),
            json!({"type": "webrtc: join-room", "data": {"workerId": U1, "scopeId": U2}})
        );
        assert_eq!(
            encode_value(&OutboundRequest::peer_left(worker_id, scope_id)),
            json!({"type": "webrtc: peer-left", "data": {"workerId": U1, "scopeId": U2}})
        );
    }

    #[test]
    fn internal_message_offer() {
        let from = id::parse(U1).unwrap();
        let scope = id::parse(U2).unwrap();
        let to = Uuid::new_v4();
        let message =
            WebRtcInternalMessage::offer(from, scope, to, &RtcSessionDescription::answer("v=0"))
                .unwrap();
        let value = encode_value(&OutboundRequest::InternalMessage(message));
        assert_eq!(value["type"], "webrtc: internal-message");
        assert_eq!(value["data"]["type"], "offer");
        assert_eq!(value["data"]["workerId"], U1);
        assert_eq!(value["data"]["scopeId"], U2);
        assert_eq!(value["data"]["to"], to.to_string());
        assert_eq!(value["data"]["data"], json!({"type": "offer", "sdp": "v=0"}));
    }

    #[test]
    fn response_marker_cannot_be_encoded() {
        let err = encode(&OutboundRequest::GetProtocolResponse).unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedEncoding(_)));
        assert_eq!(OutboundRequest::GetProtocolResponse.message_type(), None);
    }

    #[test]
    fn oversize_request_rejected() {
        let config = CodecConfig::default().with_max_message_size(64);
        let request = OutboundRequest::ModelReport(FederatedReport::new("w1", "rk", "A".repeat(128)));
        assert!(matches!(
            encode_with(&request, &config),
            Err(ProtocolError::MessageTooLarge { max: 64, .. })
        ));
    }

    #[test]
    fn equality_is_defined_for_routing_variants() {
        let (w, s) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(
            OutboundRequest::join_room(w, s),
            OutboundRequest::join_room(w, s)
        );
        assert_eq!(
            OutboundRequest::peer_left(w, s),
            OutboundRequest::peer_left(w, s)
        );
        assert_ne!(
            OutboundRequest::join_room(w, s),
            OutboundRequest::peer_left(w, s)
        );
        assert_eq!(
            OutboundRequest::get_protocol(w, s, "p"),
            OutboundRequest::get_protocol(w, s, "p")
        );
        assert_ne!(
            OutboundRequest::get_protocol(w, s, "p"),
            OutboundRequest::get_protocol(w, s, "q")
        );
        assert_eq!(
            OutboundRequest::GetProtocolResponse,
            OutboundRequest::GetProtocolResponse
        );
    }

    #[test]
    #[allow(clippy::eq_op)]
    fn equality_is_undefined_for_payload_variants() {
        let auth = OutboundRequest::Authenticate(AuthRequest::new("mnist", "1"));
        assert!(auth != auth.clone());

        let cycle = OutboundRequest::CycleRequest(CycleRequest::new("w1", "mnist", "1"));
        assert!(cycle != cycle);

        let report = OutboundRequest::ModelReport(FederatedReport::new("w1", "rk", ""));
        assert!(report != report.clone());
    }
}
