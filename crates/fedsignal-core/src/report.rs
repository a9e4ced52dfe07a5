//! Model update reports sent at the end of a cycle.

use serde::{Deserialize, Serialize};

/// Report carrying a model diff produced by a plain training plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedReport {
    #[serde(alias = "worker_id")]
    pub worker_id: String,
    #[serde(alias = "request_key")]
    pub request_key: String,
    /// Serialized diff, base64 encoded by the training layer.
    pub diff: String,
}

impl FederatedReport {
    pub fn new(
        worker_id: impl Into<String>,
        request_key: impl Into<String>,
        diff: impl Into<String>,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            request_key: request_key.into(),
            diff: diff.into(),
        }
    }
}

/// Report carrying a diff serialized as a state parcel.
///
/// Same wire shape as [`FederatedReport`]; kept as its own type so the
/// training layer cannot mix the two encodings up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelFederatedReport {
    #[serde(alias = "worker_id")]
    pub worker_id: String,
    #[serde(alias = "request_key")]
    pub request_key: String,
    pub diff: String,
}

impl ParcelFederatedReport {
    pub fn new(
        worker_id: impl Into<String>,
        request_key: impl Into<String>,
        diff: impl Into<String>,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            request_key: request_key.into(),
            diff: diff.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_reports_share_a_wire_shape() {
        let plain = serde_json::to_value(FederatedReport::new("w1", "rk", "AAEC")).unwrap();
        let parcel = serde_json::to_value(ParcelFederatedReport::new("w1", "rk", "AAEC")).unwrap();
        assert_eq!(plain, parcel);
        assert_eq!(
            plain,
            serde_json::json!({"workerId": "w1", "requestKey": "rk", "diff": "AAEC"})
        );
    }

    #[test]
    fn report_decodes_either_key_spelling() {
        let camel: FederatedReport =
            serde_json::from_str(r#"{"workerId":"w1","requestKey":"rk","diff":"AA"}"#).unwrap();
        let snake: FederatedReport =
            serde_json::from_str(r#"{"worker_id":"w1","request_key":"rk","diff":"AA"}"#).unwrap();
        assert_eq!(camel, snake);
    }
}
