//! Wire structures exchanged with callers and the workflow scheduler. Field
//! names are part of the contract with the scheduler's state definitions.

mod execution;
mod launch;
mod record;
mod scenario;
mod sizing;
mod status;
mod submission;

pub use execution::{ExecutionParameters, TaskConfig, WorkflowInput};
pub use launch::LaunchPayload;
pub use record::RunRecord;
pub use scenario::{ExecutionBlock, ScenarioDefinition, final_stats_reporting};
pub use sizing::Sizing;
pub use status::ReconcilePayload;
pub use submission::{RunSubmission, TaskSizing};
