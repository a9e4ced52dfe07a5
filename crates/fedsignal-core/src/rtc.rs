//! Native peer-connection values.
//!
//! These mirror what a WebRTC stack hands out (`RTCSessionDescription`,
//! `RTCIceCandidate`). The signalling codec converts them to and from its
//! own wire types; nothing here knows about JSON.

use std::fmt;

/// Kind of a session description, as the peer-connection layer models it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RtcSdpType {
    Offer,
    PrAnswer,
    Answer,
    /// Rolls back a pending local or remote description. Never signalled.
    Rollback,
}

impl RtcSdpType {
    /// Returns the W3C name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::PrAnswer => "pranswer",
            Self::Answer => "answer",
            Self::Rollback => "rollback",
        }
    }
}

impl fmt::Display for RtcSdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local or remote session description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtcSessionDescription {
    pub sdp_type: RtcSdpType,
    pub sdp: String,
}

impl RtcSessionDescription {
    pub fn new(sdp_type: RtcSdpType, sdp: impl Into<String>) -> Self {
        Self {
            sdp_type,
            sdp: sdp.into(),
        }
    }

    pub fn offer(sdp: impl Into<String>) -> Self {
        Self::new(RtcSdpType::Offer, sdp)
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self::new(RtcSdpType::Answer, sdp)
    }

    pub fn pr_answer(sdp: impl Into<String>) -> Self {
        Self::new(RtcSdpType::PrAnswer, sdp)
    }
}

/// One ICE candidate gathered by the local agent or received from a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtcIceCandidate {
    /// The `candidate:` attribute line.
    pub candidate: String,
    /// Index of the media line the candidate belongs to.
    pub sdp_m_line_index: i32,
    /// Media stream identification tag, when the stack provides one.
    pub sdp_mid: Option<String>,
}

impl RtcIceCandidate {
    pub fn new(candidate: impl Into<String>, sdp_m_line_index: i32) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_m_line_index,
            sdp_mid: None,
        }
    }

    /// Builder: set the media stream tag.
    pub fn with_sdp_mid(mut self, sdp_mid: impl Into<String>) -> Self {
        self.sdp_mid = Some(sdp_mid.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdp_type_names() {
        assert_eq!(RtcSdpType::Offer.to_string(), "offer");
        assert_eq!(RtcSdpType::PrAnswer.to_string(), "pranswer");
        assert_eq!(RtcSdpType::Answer.to_string(), "answer");
        assert_eq!(RtcSdpType::Rollback.to_string(), "rollback");
    }

    #[test]
    fn candidate_builder() {
        let candidate = RtcIceCandidate::new("candidate:1 1 udp 1 10.0.0.1 5000 typ host", 0)
            .with_sdp_mid("0");
        assert_eq!(candidate.sdp_m_line_index, 0);
        assert_eq!(candidate.sdp_mid.as_deref(), Some("0"));
    }
}
