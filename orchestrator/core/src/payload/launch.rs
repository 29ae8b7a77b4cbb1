use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Sizing, WorkflowInput};

/// Step payload consumed and produced by the fleet launcher. Keys the launcher
/// does not read pass through `extra` unchanged.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct LaunchPayload {
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub task_count: Sizing,
    #[serde(default)]
    pub test_id: String,
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub task_definition: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub s3_bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnets: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LaunchPayload {
    /// The launch step's input as the workflow derives it from the submission.
    #[must_use]
    pub fn from_workflow_input(input: &WorkflowInput) -> Self {
        let config = &input.test_task_config;
        let mut extra = Map::new();
        extra.insert("duration".to_owned(), Value::from(input.duration));

        Self {
            is_running: false,
            region: input.region.clone(),
            task_count: Sizing::new(config.task_count),
            test_id: input.test_id.clone(),
            cluster: config.cluster.clone(),
            task_definition: config.task_definition.clone(),
            prefix: input.prefix.clone(),
            s3_bucket: input.s3_bucket.clone(),
            container_name: Some(config.container_name.clone()),
            subnets: Some(config.subnet_ids()),
            extra,
        }
    }
}
