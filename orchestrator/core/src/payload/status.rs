use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Step payload for the status step. `next_token` carries the listing cursor
/// between invocations; `isRunning` is written on the way out.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ReconcilePayload {
    #[serde(default)]
    pub test_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub cluster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(
        rename = "isRunning",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_running: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
