use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ScenarioDefinition, Sizing};

/// Requested fleet size, unvalidated.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TaskSizing {
    #[serde(default)]
    pub task_count: Sizing,
    #[serde(default)]
    pub concurrency: Sizing,
}

/// A test run as submitted by a caller.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RunSubmission {
    pub test_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub test_task_config: TaskSizing,
    pub test_scenario: ScenarioDefinition,
    /// Key into `test_scenario.scenarios` that receives `variables`.
    pub test_name: String,
    #[serde(default)]
    pub test_description: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
}
