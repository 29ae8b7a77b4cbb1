pub mod collaborators;
pub mod duration;
pub mod error;
pub mod infra;
pub mod launch;
pub mod payload;
pub mod reconcile;
pub mod submit;

pub use error::{
    ConfigurationError, DependencyError, DynError, ErrorKind, OrchestratorError, ValidationError,
};
pub use infra::InfraResolver;
pub use launch::FleetLauncher;
pub use orchestrator_config::{OrchestratorConfig, PaginationPolicy, RegionInfra};
pub use reconcile::{ReconcileOutcome, ReconcileRequest, StatusReconciler};
pub use submit::{RunSubmitter, SubmitReceipt};
