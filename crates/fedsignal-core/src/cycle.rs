//! Cycle request and cycle acceptance payloads.
//!
//! A cycle is one round of training and reporting. The client asks to join
//! with a [`CycleRequest`]; when the server accepts, it answers with a
//! [`CycleResponseSuccess`] naming the plans and protocols to download.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Request to take part in the next training cycle of a hosted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRequest {
    /// Worker id returned by authentication.
    #[serde(alias = "worker_id")]
    pub worker_id: String,

    /// Hosted model name.
    pub model: String,

    /// Hosted model version.
    pub version: String,

    /// Measured round-trip time to the server, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping: Option<f64>,

    /// Measured download bandwidth, in Mbps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<f64>,

    /// Measured upload bandwidth, in Mbps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<f64>,
}

impl CycleRequest {
    /// Creates a cycle request without speed-test figures.
    pub fn new(
        worker_id: impl Into<String>,
        model: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            model: model.into(),
            version: version.into(),
            ping: None,
            download: None,
            upload: None,
        }
    }

    /// Builder: attach speed-test results.
    pub fn with_speed_test(mut self, ping: f64, download: f64, upload: f64) -> Self {
        self.ping = Some(ping);
        self.download = Some(download);
        self.upload = Some(upload);
        self
    }
}

/// Server acceptance of a cycle request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleResponseSuccess {
    /// Always `"accepted"` on this path.
    pub status: String,

    /// Key that must accompany the report for this cycle.
    #[serde(alias = "request_key")]
    pub request_key: String,

    /// Plan name to plan id.
    #[serde(default, deserialize_with = "id_map")]
    pub plans: BTreeMap<String, String>,

    /// Protocol name to protocol id.
    #[serde(default, deserialize_with = "id_map")]
    pub protocols: BTreeMap<String, String>,

    /// Training hyper-parameters; interpreted by the training layer.
    #[serde(default, alias = "client_config")]
    pub client_config: serde_json::Value,

    /// Id of the model checkpoint to download.
    #[serde(alias = "model_id", deserialize_with = "string_or_number")]
    pub model_id: String,
}

impl CycleResponseSuccess {
    /// Returns the id of the named plan, if the server sent one.
    pub fn plan_id(&self, name: &str) -> Option<&str> {
        self.plans.get(name).map(String::as_str)
    }

    /// Returns the id of the named protocol, if the server sent one.
    pub fn protocol_id(&self, name: &str) -> Option<&str> {
        self.protocols.get(name).map(String::as_str)
    }
}

/// Server-side ids arrive either as strings or as integers.
struct WireId(String);

impl<'de> Deserialize<'de> for WireId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de;

        struct WireIdVisitor;

        impl<'v> de::Visitor<'v> for WireIdVisitor {
            type Value = WireId;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or an integer id")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<WireId, E> {
                Ok(WireId(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<WireId, E> {
                Ok(WireId(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<WireId, E> {
                Ok(WireId(value.to_string()))
            }
        }

        deserializer.deserialize_any(WireIdVisitor)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    WireId::deserialize(deserializer).map(|id| id.0)
}

fn id_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, WireId>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(name, id)| (name, id.0)).collect())
}
