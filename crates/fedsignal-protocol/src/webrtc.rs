//! Peer-to-peer signalling messages relayed through the server.
//!
//! These travel as the payload of a `webrtc: internal-message` envelope and
//! carry their own discriminator:
//!
//! ```text
//! {
//!   "type": "offer" | "answer" | "candidate",
//!   "workerId": "<sender>",
//!   "scopeId": "<scope>",
//!   "to": "<recipient>",
//!   "data": <SessionDescriptor> | <IceCandidate>
//! }
//! ```

use fedsignal_core::{RtcIceCandidate, RtcSessionDescription};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::envelope::{MessageType, read_payload};
use crate::error::{ProtocolError, ProtocolResult};
use crate::id;
use crate::session::{IceCandidate, SdpKind, SessionDescriptor};

const OFFER: &str = "offer";
const ANSWER: &str = "answer";
const CANDIDATE: &str = "candidate";

/// A signalling message addressed from one peer to another within a scope.
///
/// Equality is deliberately narrow: two messages are equal when they are the
/// same variant with the same `from`, `scope` and `to`, and (for offers and
/// answers) the same sdp text. The descriptor kind and the candidate are not
/// compared.
#[derive(Debug, Clone)]
pub enum WebRtcInternalMessage {
    SdpOffer {
        from: Uuid,
        scope: Uuid,
        to: Uuid,
        descriptor: SessionDescriptor,
    },
    SdpAnswer {
        from: Uuid,
        scope: Uuid,
        to: Uuid,
        descriptor: SessionDescriptor,
    },
    IceCandidate {
        from: Uuid,
        scope: Uuid,
        to: Uuid,
        candidate: IceCandidate,
    },
}

impl WebRtcInternalMessage {
    /// Wraps a local description as an offer.
    ///
    /// The signalled kind is always `offer`, whatever the native kind was,
    /// except that a rollback cannot be signalled at all.
    pub fn offer(
        from: Uuid,
        scope: Uuid,
        to: Uuid,
        description: &RtcSessionDescription,
    ) -> ProtocolResult<Self> {
        let mut descriptor = SessionDescriptor::try_from(description)?;
        descriptor.kind = SdpKind::Offer;
        Ok(Self::SdpOffer {
            from,
            scope,
            to,
            descriptor,
        })
    }

    /// Wraps a local description as an answer. See [`Self::offer`].
    pub fn answer(
        from: Uuid,
        scope: Uuid,
        to: Uuid,
        description: &RtcSessionDescription,
    ) -> ProtocolResult<Self> {
        let mut descriptor = SessionDescriptor::try_from(description)?;
        descriptor.kind = SdpKind::Answer;
        Ok(Self::SdpAnswer {
            from,
            scope,
            to,
            descriptor,
        })
    }

    /// Wraps a gathered ICE candidate.
    pub fn candidate(from: Uuid, scope: Uuid, to: Uuid, candidate: &RtcIceCandidate) -> Self {
        Self::IceCandidate {
            from,
            scope,
            to,
            candidate: candidate.into(),
        }
    }

    /// Sender's worker id.
    pub fn from(&self) -> Uuid {
        match self {
            Self::SdpOffer { from, .. }
            | Self::SdpAnswer { from, .. }
            | Self::IceCandidate { from, .. } => *from,
        }
    }

    pub fn scope(&self) -> Uuid {
        match self {
            Self::SdpOffer { scope, .. }
            | Self::SdpAnswer { scope, .. }
            | Self::IceCandidate { scope, .. } => *scope,
        }
    }

    /// Recipient's worker id.
    pub fn to(&self) -> Uuid {
        match self {
            Self::SdpOffer { to, .. }
            | Self::SdpAnswer { to, .. }
            | Self::IceCandidate { to, .. } => *to,
        }
    }

    /// The inner discriminator written on the wire.
    pub fn discriminator(&self) -> &'static str {
        match self {
            Self::SdpOffer { .. } => OFFER,
            Self::SdpAnswer { .. } => ANSWER,
            Self::IceCandidate { .. } => CANDIDATE,
        }
    }

    /// The native description to apply, for offers and answers.
    pub fn session_description(&self) -> Option<RtcSessionDescription> {
        match self {
            Self::SdpOffer { descriptor, .. } | Self::SdpAnswer { descriptor, .. } => {
                Some(descriptor.clone().into())
            }
            Self::IceCandidate { .. } => None,
        }
    }

    /// The native candidate to add, for candidate messages.
    pub fn ice_candidate(&self) -> Option<RtcIceCandidate> {
        match self {
            Self::IceCandidate { candidate, .. } => Some(candidate.clone().into()),
            _ => None,
        }
    }

    /// Decodes the payload of a `webrtc: internal-message` envelope.
    pub fn from_payload(data: &Value) -> ProtocolResult<Self> {
        let context = MessageType::InternalMessage.as_str();
        let Discriminator { kind } = read_payload(context, data)?;

        match kind.as_str() {
            OFFER => {
                let (from, scope, to, SdpText { sdp }) = read_addressed(context, data)?;
                Ok(Self::SdpOffer {
                    from,
                    scope,
                    to,
                    descriptor: SessionDescriptor::new(SdpKind::Offer, sdp),
                })
            }
            ANSWER => {
                let (from, scope, to, SdpText { sdp }) = read_addressed(context, data)?;
                Ok(Self::SdpAnswer {
                    from,
                    scope,
                    to,
                    descriptor: SessionDescriptor::new(SdpKind::Answer, sdp),
                })
            }
            CANDIDATE => {
                let (from, scope, to, candidate) = read_addressed(context, data)?;
                Ok(Self::IceCandidate {
                    from,
                    scope,
                    to,
                    candidate,
                })
            }
            _ => Err(ProtocolError::UnknownMessageType(kind)),
        }
    }
}

impl PartialEq for WebRtcInternalMessage {
    fn eq(&self, other: &Self) -> bool {
        let same_route = || {
            self.from() == other.from() && self.scope() == other.scope() && self.to() == other.to()
        };
        match (self, other) {
            (Self::SdpOffer { descriptor: a, .. }, Self::SdpOffer { descriptor: b, .. })
            | (Self::SdpAnswer { descriptor: a, .. }, Self::SdpAnswer { descriptor: b, .. }) => {
                same_route() && a.sdp == b.sdp
            }
            (Self::IceCandidate { .. }, Self::IceCandidate { .. }) => same_route(),
            _ => false,
        }
    }
}

impl Serialize for WebRtcInternalMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data = match self {
            Self::SdpOffer { descriptor, .. } => PayloadOut::Sdp(SdpOut {
                kind: SdpKind::Offer,
                sdp: &descriptor.sdp,
            }),
            Self::SdpAnswer { descriptor, .. } => PayloadOut::Sdp(SdpOut {
                kind: SdpKind::Answer,
                sdp: &descriptor.sdp,
            }),
            Self::IceCandidate { candidate, .. } => PayloadOut::Candidate(candidate),
        };
        AddressedOut {
            kind: self.discriminator(),
            worker_id: id::format(&self.from()),
            scope_id: id::format(&self.scope()),
            to: id::format(&self.to()),
            data,
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct Discriminator {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressedIn<T> {
    worker_id: String,
    scope_id: String,
    to: String,
    data: T,
}

/// Only the text of a nested descriptor is read; its kind comes from the
/// outer discriminator.
#[derive(Deserialize)]
struct SdpText {
    sdp: String,
}

fn read_addressed<T: serde::de::DeserializeOwned>(
    context: &str,
    data: &Value,
) -> ProtocolResult<(Uuid, Uuid, Uuid, T)> {
    let message: AddressedIn<T> = read_payload(context, data)?;
    Ok((
        id::parse_field(context, "workerId", &message.worker_id)?,
        id::parse_field(context, "scopeId", &message.scope_id)?,
        id::parse_field(context, "to", &message.to)?,
        message.data,
    ))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddressedOut<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    worker_id: String,
    scope_id: String,
    to: String,
    data: PayloadOut<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum PayloadOut<'a> {
    Sdp(SdpOut<'a>),
    Candidate(&'a IceCandidate),
}

#[derive(Serialize)]
struct SdpOut<'a> {
    #[serde(rename = "type")]
    kind: SdpKind,
    sdp: &'a str,
}
