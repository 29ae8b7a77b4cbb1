use serde::{Deserialize, Serialize};

/// How the execution service places tasks.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LaunchType {
    /// Managed, serverless capacity.
    #[default]
    Fargate,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnvEntry {
    pub name: String,
    pub value: String,
}

impl EnvEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContainerOverride {
    pub name: String,
    pub environment: Vec<EnvEntry>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOverrides {
    pub container_overrides: Vec<ContainerOverride>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfiguration {
    pub subnets: Vec<String>,
    pub assign_public_ip: bool,
}

/// A request to start `count` copies of a task definition.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLaunchRequest {
    pub region: String,
    pub cluster: String,
    pub task_definition: String,
    pub count: u32,
    pub launch_type: LaunchType,
    /// Grouping key; tasks of one run share it.
    pub group: String,
    pub overrides: TaskOverrides,
    pub network_configuration: NetworkConfiguration,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct LaunchReceipt {
    pub task_ids: Vec<String>,
    /// Per-task placement failures reported without failing the call.
    pub failures: Vec<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct TaskListQuery<'a> {
    pub region: &'a str,
    pub cluster: &'a str,
    pub next_token: Option<&'a str>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TaskPage {
    pub task_ids: Vec<String>,
    pub next_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TaskDescription {
    pub task_id: String,
    pub group: Option<String>,
    pub last_status: Option<String>,
}
