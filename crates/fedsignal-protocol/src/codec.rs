//! A codec value that carries its configuration.

use crate::config::CodecConfig;
use crate::error::ProtocolResult;
use crate::request::{OutboundRequest, encode_with};
use crate::response::{InboundResponse, decode_with};

/// Encoder and decoder bound to one [`CodecConfig`].
///
/// Holds no state beyond the configuration, so a single value can be shared
/// freely between tasks.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encodes an outbound request into wire bytes.
    pub fn encode(&self, request: &OutboundRequest) -> ProtocolResult<Vec<u8>> {
        encode_with(request, &self.config)
    }

    /// Decodes wire bytes into an inbound response.
    pub fn decode(&self, bytes: &[u8]) -> ProtocolResult<InboundResponse> {
        decode_with(bytes, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PeerLeftScopeKey;
    use crate::error::ProtocolError;
    use uuid::Uuid;

    #[test]
    fn codec_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Codec>();
        assert_send_sync::<OutboundRequest>();
        assert_send_sync::<InboundResponse>();
        assert_send_sync::<ProtocolError>();
    }

    #[test]
    fn peer_left_roundtrip_uses_config() {
        let (worker_id, scope_id) = (Uuid::new_v4(), Uuid::new_v4());
        let bytes = Codec::default()
            .encode(&OutboundRequest::peer_left(worker_id, scope_id))
            .unwrap();

        assert_eq!(
            Codec::default().decode(&bytes).unwrap(),
            InboundResponse::PeerLeft {
                worker_id,
                scope_id
            }
        );

        let legacy = Codec::new(
            CodecConfig::default().with_peer_left_scope_key(PeerLeftScopeKey::WorkerId),
        );
        assert_eq!(
            legacy.decode(&bytes).unwrap(),
            InboundResponse::PeerLeft {
                worker_id,
                scope_id: worker_id
            }
        );
    }

    #[test]
    fn join_room_roundtrip() {
        let (worker_id, scope_id) = (Uuid::new_v4(), Uuid::new_v4());
        let codec = Codec::default();
        let bytes = codec
            .encode(&OutboundRequest::join_room(worker_id, scope_id))
            .unwrap();
        assert_eq!(
            codec.decode(&bytes).unwrap(),
            InboundResponse::JoinRoom {
                worker_id,
                scope_id
            }
        );
    }

    #[test]
    fn size_limit_applies_to_both_directions() {
        let codec = Codec::new(CodecConfig::default().with_max_message_size(16));
        let request = OutboundRequest::join_room(Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(
            codec.encode(&request),
            Err(ProtocolError::MessageTooLarge { .. })
        ));

        let bytes = Codec::default().encode(&request).unwrap();
        assert!(matches!(
            codec.decode(&bytes),
            Err(ProtocolError::MessageTooLarge { .. })
        ));
    }
}
