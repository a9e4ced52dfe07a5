//! Worker, scope and recipient identifiers.
//!
//! On the wire every identifier is a lowercase hyphenated UUID string.

use uuid::Uuid;

use crate::error::{ProtocolError, ProtocolResult};

/// Parses an identifier string.
///
/// Accepts any form `uuid` accepts (upper or lower case, braced, simple).
pub fn parse(s: &str) -> ProtocolResult<Uuid> {
    Uuid::parse_str(s).map_err(|source| ProtocolError::InvalidIdentifier {
        value: s.to_string(),
        source,
    })
}

/// Formats an identifier for the wire.
pub fn format(id: &Uuid) -> String {
    id.as_hyphenated().to_string()
}

/// Parses an identifier read from a `message_type` payload.
///
/// Identifier failures inside a payload are reported as malformed payloads
/// so the caller sees which message was broken.
pub(crate) fn parse_field(message_type: &str, field: &str, value: &str) -> ProtocolResult<Uuid> {
    parse(value).map_err(|err| ProtocolError::malformed(message_type, format!("{field}: {err}")))
}
