//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ProtocolResult};

/// Default upper bound on a message body (32 MiB).
///
/// Model reports carry whole diffs, so this is far above what the control
/// messages need.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 32 * 1024 * 1024;

/// Which payload key holds the scope id of a `webrtc: peer-left` message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerLeftScopeKey {
    /// Read the scope from `scopeId`.
    #[default]
    ScopeId,
    /// Read the scope from `workerId`, as older workers did. The decoded
    /// scope then always equals the worker id.
    WorkerId,
}

impl PeerLeftScopeKey {
    pub fn key(&self) -> &'static str {
        match self {
            Self::ScopeId => "scopeId",
            Self::WorkerId => "workerId",
        }
    }
}

/// Settings shared by the encoder and the decoder.
///
/// Deserializable so hosts can embed it in their own config file:
///
/// ```toml
/// [signalling]
/// peer_left_scope_key = "worker_id"
/// max_message_size = 1048576
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub peer_left_scope_key: PeerLeftScopeKey,

    /// Largest body, in bytes, that is encoded or decoded.
    pub max_message_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            peer_left_scope_key: PeerLeftScopeKey::default(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl CodecConfig {
    /// Builder: set the peer-left scope key.
    pub fn with_peer_left_scope_key(mut self, key: PeerLeftScopeKey) -> Self {
        self.peer_left_scope_key = key;
        self
    }

    /// Builder: set the maximum message size.
    pub fn with_max_message_size(mut self, max: usize) -> Self {
        self.max_message_size = max;
        self
    }

    pub(crate) fn check_size(&self, size: usize) -> ProtocolResult<()> {
        if size > self.max_message_size {
            return Err(ProtocolError::MessageTooLarge {
                size,
                max: self.max_message_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.peer_left_scope_key, PeerLeftScopeKey::ScopeId);
        assert_eq!(config.max_message_size, DEFAULT_MAX_MESSAGE_SIZE);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: CodecConfig =
            serde_json::from_str(r#"{"peer_left_scope_key":"worker_id"}"#).unwrap();
        assert_eq!(config.peer_left_scope_key, PeerLeftScopeKey::WorkerId);
        assert_eq!(config.max_message_size, DEFAULT_MAX_MESSAGE_SIZE);
    }

    #[test]
    fn check_size_boundary() {
        let config = CodecConfig::default().with_max_message_size(10);
        assert!(config.check_size(10).is_ok());
        assert!(matches!(
            config.check_size(11),
            Err(ProtocolError::MessageTooLarge { size: 11, max: 10 })
        ));
    }

    #[test]
    fn scope_keys() {
        assert_eq!(PeerLeftScopeKey::ScopeId.key(), "scopeId");
        assert_eq!(PeerLeftScopeKey::WorkerId.key(), "workerId");
    }
}
