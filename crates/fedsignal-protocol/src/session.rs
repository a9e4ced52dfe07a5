//! Wire forms of session descriptions and ICE candidates.
//!
//! ```text
//! SessionDescriptor  {"type": "offer" | "pranswer" | "answer", "sdp": "v=0..."}
//! IceCandidate       {"candidate": "candidate:...", "sdpMLineIndex": 0, "sdpMid": "0"}
//! ```

use fedsignal_core::{RtcIceCandidate, RtcSdpType, RtcSessionDescription};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Session description kinds that can travel over the signalling channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SdpKind {
    #[serde(rename = "offer")]
    Offer,
    #[serde(rename = "pranswer")]
    PrAnswer,
    #[serde(rename = "answer")]
    Answer,
}

impl TryFrom<RtcSdpType> for SdpKind {
    type Error = ProtocolError;

    fn try_from(sdp_type: RtcSdpType) -> Result<Self, Self::Error> {
        match sdp_type {
            RtcSdpType::Offer => Ok(Self::Offer),
            RtcSdpType::PrAnswer => Ok(Self::PrAnswer),
            RtcSdpType::Answer => Ok(Self::Answer),
            RtcSdpType::Rollback => Err(ProtocolError::UnsupportedSdpType(sdp_type)),
        }
    }
}

impl From<SdpKind> for RtcSdpType {
    fn from(kind: SdpKind) -> Self {
        match kind {
            SdpKind::Offer => Self::Offer,
            SdpKind::PrAnswer => Self::PrAnswer,
            SdpKind::Answer => Self::Answer,
        }
    }
}

/// A session description as signalled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescriptor {
    pub fn new(kind: SdpKind, sdp: impl Into<String>) -> Self {
        Self {
            kind,
            sdp: sdp.into(),
        }
    }
}

impl TryFrom<&RtcSessionDescription> for SessionDescriptor {
    type Error = ProtocolError;

    /// Fails only for [`RtcSdpType::Rollback`], which has no wire form.
    fn try_from(native: &RtcSessionDescription) -> Result<Self, Self::Error> {
        Ok(Self::new(native.sdp_type.try_into()?, native.sdp.clone()))
    }
}

impl From<SessionDescriptor> for RtcSessionDescription {
    fn from(descriptor: SessionDescriptor) -> Self {
        RtcSessionDescription::new(descriptor.kind.into(), descriptor.sdp)
    }
}

/// An ICE candidate as signalled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    #[serde(rename = "candidate")]
    pub line: String,
    #[serde(rename = "sdpMLineIndex")]
    pub media_line_index: i32,
    #[serde(rename = "sdpMid", default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
}

impl From<&RtcIceCandidate> for IceCandidate {
    fn from(native: &RtcIceCandidate) -> Self {
        Self {
            line: native.candidate.clone(),
            media_line_index: native.sdp_m_line_index,
            mid: native.sdp_mid.clone(),
        }
    }
}

impl From<IceCandidate> for RtcIceCandidate {
    fn from(candidate: IceCandidate) -> Self {
        Self {
            candidate: candidate.line,
            sdp_m_line_index: candidate.media_line_index,
            sdp_mid: candidate.mid,
        }
    }
}
