//! Authentication payloads.

use serde::{Deserialize, Serialize};

/// Successful answer to a `model-centric/authenticate` request.
///
/// The coordination server assigns the worker id here; it is an opaque
/// string, not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Server status, usually `"success"`.
    pub status: String,

    /// Worker id assigned to this client.
    #[serde(alias = "worker_id")]
    pub worker_id: String,

    /// Whether the server wants a bandwidth test before cycle requests.
    #[serde(alias = "requires_speed_test")]
    pub requires_speed_test: bool,
}

impl AuthResponse {
    /// Creates a new authentication response.
    pub fn new(
        status: impl Into<String>,
        worker_id: impl Into<String>,
        requires_speed_test: bool,
    ) -> Self {
        Self {
            status: status.into(),
            worker_id: worker_id.into(),
            requires_speed_test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_snake_case() {
        let json = r#"{"status":"success","worker_id":"w1","requires_speed_test":true}"#;
        let parsed: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, AuthResponse::new("success", "w1", true));
    }

    #[test]
    fn deserialize_camel_case() {
        let json = r#"{"status":"accepted","workerId":"w1","requiresSpeedTest":false}"#;
        let parsed: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, AuthResponse::new("accepted", "w1", false));
    }

    #[test]
    fn missing_field_is_an_error() {
        let json = r#"{"status":"success","worker_id":"w1"}"#;
        assert!(serde_json::from_str::<AuthResponse>(json).is_err());
    }
}
