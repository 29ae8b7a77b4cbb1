//! Single-process wiring: every collaborator is backed by memory, except the
//! scenario blobs, which may go to disk so they can be inspected.

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use orchestrator_config::{OrchestratorConfig, RegionInfra};
use orchestrator_core::{
    FleetLauncher, InfraResolver, RunSubmitter, StatusReconciler,
    collaborators::{
        FsObjectStore, ObjectStore,
        memory::{
            MemoryExecutionService, MemoryInfraTable, MemoryMetadataStore, MemoryObjectStore,
            MemoryWorkflowEngine,
        },
    },
};

use crate::server::AppState;

pub struct LocalBackends {
    pub infra: Arc<MemoryInfraTable>,
    pub objects: Arc<dyn ObjectStore>,
    pub metadata: Arc<MemoryMetadataStore>,
    pub workflow: Arc<MemoryWorkflowEngine>,
    pub execution: Arc<MemoryExecutionService>,
}

impl LocalBackends {
    #[must_use]
    pub fn new(region_infra: BTreeMap<String, RegionInfra>, objects: Arc<dyn ObjectStore>) -> Self {
        Self {
            infra: Arc::new(MemoryInfraTable::from(region_infra)),
            objects,
            metadata: Arc::new(MemoryMetadataStore::new()),
            workflow: Arc::new(MemoryWorkflowEngine::new()),
            execution: Arc::new(MemoryExecutionService::new()),
        }
    }

    /// Scenario blobs land under `data_dir/<bucket>/<key>`.
    #[must_use]
    pub fn on_disk(region_infra: BTreeMap<String, RegionInfra>, data_dir: impl Into<PathBuf>) -> Self {
        Self::new(region_infra, Arc::new(FsObjectStore::new(data_dir)))
    }

    #[must_use]
    pub fn in_memory(region_infra: BTreeMap<String, RegionInfra>) -> Self {
        Self::new(region_infra, Arc::new(MemoryObjectStore::new()))
    }

    #[must_use]
    pub fn with_execution(mut self, execution: Arc<MemoryExecutionService>) -> Self {
        self.execution = execution;
        self
    }

    #[must_use]
    pub fn app_state(&self, config: &OrchestratorConfig) -> AppState {
        let config = Arc::new(config.clone());
        let resolver = InfraResolver::new(self.infra.clone(), config.region_infra_table.clone());

        let submitter = RunSubmitter::new(
            Arc::clone(&config),
            resolver,
            Arc::clone(&self.objects),
            self.metadata.clone(),
            self.workflow.clone(),
        );
        let launcher = FleetLauncher::new(self.execution.clone());
        let reconciler = StatusReconciler::new(self.execution.clone(), config.pagination);

        AppState::new(submitter, launcher, reconciler)
    }
}
