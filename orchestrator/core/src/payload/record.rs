use serde::{Deserialize, Serialize};

/// Summary of a submitted run, written once to the metadata store.
///
/// `running` reflects "submitted", not live fleet state: nothing in the
/// orchestrator rewrites the record after submission.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RunRecord {
    pub test_id: String,
    pub task_count: u32,
    pub concurrency: u32,
    pub test_name: String,
    pub test_description: String,
    #[serde(rename = "hold-for")]
    pub hold_for: String,
    #[serde(rename = "ramp-up", default, skip_serializing_if = "Option::is_none")]
    pub ramp_up: Option<String>,
    pub running: bool,
}
