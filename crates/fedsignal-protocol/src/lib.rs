//! Signalling codec for federated-learning workers.
//!
//! Workers talk to the coordination server, and through it to each other,
//! with JSON messages wrapped in a two-key envelope:
//!
//! ```text
//! {"type": "model-centric/cycle-request", "data": {"workerId": "...", ...}}
//! ```
//!
//! Outbound values are [`OutboundRequest`]s, turned into bytes by [`encode`].
//! Inbound bytes become [`InboundResponse`]s through [`decode`]. Peer-to-peer
//! session negotiation rides inside `webrtc: internal-message` envelopes as a
//! [`WebRtcInternalMessage`] with its own discriminator.
//!
//! The codec is stateless and does no I/O; moving the bytes is up to the
//! caller's transport.
//!
//! # Example
//!
//! ```rust
//! use fedsignal_protocol::{AuthRequest, InboundResponse, OutboundRequest, decode, encode};
//!
//! let bytes = encode(&OutboundRequest::Authenticate(AuthRequest::new("mnist", "1.0"))).unwrap();
//! assert!(bytes.starts_with(br#"{"type":"model-centric/authenticate""#));
//!
//! let reply = br#"{"type":"model-centric/authenticate","data":{"error":"bad token"}}"#;
//! match decode(reply).unwrap() {
//!     InboundResponse::Authenticate(Err(err)) => assert_eq!(err.message, "bad token"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod codec;
mod config;
mod envelope;
mod error;
pub mod id;
mod request;
mod response;
mod session;
mod webrtc;

pub use codec::Codec;
pub use config::{CodecConfig, DEFAULT_MAX_MESSAGE_SIZE, PeerLeftScopeKey};
pub use envelope::{MessageType, RawEnvelope};
pub use error::{ProtocolError, ProtocolResult};
pub use request::{AuthRequest, OutboundRequest, encode, encode_with};
pub use response::{
    AuthError, CycleRejection, InboundResponse, UNKNOWN_AUTH_ERROR, decode, decode_with,
};
pub use session::{IceCandidate, SdpKind, SessionDescriptor};
pub use webrtc::WebRtcInternalMessage;

pub use fedsignal_core::{
    AuthResponse, CycleRequest, CycleResponseSuccess, FederatedReport, ParcelFederatedReport,
    RtcIceCandidate, RtcSdpType, RtcSessionDescription,
};
