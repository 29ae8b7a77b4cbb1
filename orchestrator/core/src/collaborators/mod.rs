//! Seams to the services the orchestrator talks to. Each one is a plain
//! request/response call; durability and consistency belong to the service.

mod clock;
mod execution;
mod fs;
pub mod memory;

use async_trait::async_trait;
pub use clock::{Clock, FixedClock, SystemClock};
pub use execution::{
    ContainerOverride, EnvEntry, LaunchReceipt, LaunchType, NetworkConfiguration,
    TaskDescription, TaskLaunchRequest, TaskListQuery, TaskOverrides, TaskPage,
};
pub use fs::FsObjectStore;
use orchestrator_config::RegionInfra;

use crate::{
    error::DynError,
    payload::{RunRecord, WorkflowInput},
};

#[async_trait]
/// Region → infrastructure lookup.
pub trait InfraTable: Send + Sync {
    async fn region_infra(&self, table: &str, region: &str)
    -> Result<Option<RegionInfra>, DynError>;
}

#[async_trait]
/// Blob storage for scenario definitions.
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), DynError>;
}

#[async_trait]
/// Key-value store holding one summary record per run.
pub trait MetadataStore: Send + Sync {
    async fn put_run(&self, table: &str, record: &RunRecord) -> Result<(), DynError>;
}

#[async_trait]
/// The external step scheduler; only the "start" trigger is used here.
pub trait WorkflowEngine: Send + Sync {
    async fn start_execution(
        &self,
        state_machine: &str,
        input: &WorkflowInput,
    ) -> Result<(), DynError>;
}

#[async_trait]
/// Container execution service that runs the worker fleet.
pub trait ExecutionService: Send + Sync {
    async fn run_tasks(&self, request: &TaskLaunchRequest) -> Result<LaunchReceipt, DynError>;

    /// One page of active task ids for a cluster.
    async fn list_tasks(&self, query: &TaskListQuery<'_>) -> Result<TaskPage, DynError>;

    async fn describe_tasks(
        &self,
        region: &str,
        cluster: &str,
        task_ids: &[String],
    ) -> Result<Vec<TaskDescription>, DynError>;
}
