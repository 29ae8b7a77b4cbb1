use serde::{Deserialize, Serialize};

/// Fleet sizing plus the region's infrastructure fields. Sizing is filled from
/// the submission; the rest is merged in by the infra resolver.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TaskConfig {
    pub task_count: u32,
    pub concurrency: u32,
    #[serde(default)]
    pub subnet: String,
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub task_definition: String,
    #[serde(default)]
    pub container_name: String,
}

impl TaskConfig {
    #[must_use]
    pub const fn sized(task_count: u32, concurrency: u32) -> Self {
        Self {
            task_count,
            concurrency,
            subnet: String::new(),
            cluster: String::new(),
            task_definition: String::new(),
            container_name: String::new(),
        }
    }

    /// Subnet ids; the infra table may hold a comma-separated list.
    #[must_use]
    pub fn subnet_ids(&self) -> Vec<String> {
        self.subnet
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Everything a run needs once submitted. Built once, then only read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutionParameters {
    test_id: String,
    region: String,
    task_config: TaskConfig,
    duration_secs: u64,
}

impl ExecutionParameters {
    #[must_use]
    pub const fn new(
        test_id: String,
        region: String,
        task_config: TaskConfig,
        duration_secs: u64,
    ) -> Self {
        Self {
            test_id,
            region,
            task_config,
            duration_secs,
        }
    }

    #[must_use]
    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[must_use]
    pub const fn task_config(&self) -> &TaskConfig {
        &self.task_config
    }

    #[must_use]
    pub const fn duration_secs(&self) -> u64 {
        self.duration_secs
    }
}

/// Input handed to the workflow engine when a run is started.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WorkflowInput {
    pub test_task_config: TaskConfig,
    pub test_id: String,
    pub duration: u64,
    pub prefix: String,
    pub region: String,
    pub s3_bucket: String,
}

impl WorkflowInput {
    #[must_use]
    pub fn new(params: &ExecutionParameters, prefix: String, s3_bucket: String) -> Self {
        Self {
            test_task_config: params.task_config().clone(),
            test_id: params.test_id().to_owned(),
            duration: params.duration_secs(),
            prefix,
            region: params.region().to_owned(),
            s3_bucket,
        }
    }
}
