//! Fixtures for driving a whole run through the orchestrator: submission,
//! fleet launch and status polling, either in-process or over HTTP.

use std::{collections::BTreeMap, net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use orchestrator_api::{AppState, LocalBackends, orchestrator_app};
use orchestrator_config::{OrchestratorConfig, PaginationPolicy, RegionInfra};
use orchestrator_core::{
    collaborators::memory::MemoryExecutionService,
    payload::{LaunchPayload, ReconcilePayload, WorkflowInput},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const REGION: &str = "us-east-1";
pub const CLUSTER: &str = "load-cluster";
pub const TESTS_TABLE: &str = "tests";
pub const SCENARIOS_BUCKET: &str = "scenarios";

#[must_use]
pub fn region_infra() -> BTreeMap<String, RegionInfra> {
    BTreeMap::from([(
        REGION.to_owned(),
        RegionInfra {
            subnet: "subnet-a,subnet-b".into(),
            cluster: CLUSTER.into(),
            task_definition: "load-worker:7".into(),
            task_container: "load-worker".into(),
        },
    )])
}

#[must_use]
pub fn config(pagination: PaginationPolicy) -> OrchestratorConfig {
    OrchestratorConfig {
        tests_region: REGION.into(),
        tests_table: TESTS_TABLE.into(),
        scenarios_bucket: SCENARIOS_BUCKET.into(),
        state_machine_arn: "arn:local:load-runs".into(),
        region_infra_table: "region-infra".into(),
        pagination,
    }
}

/// A submission body as a caller would post it.
#[must_use]
pub fn submission_body(test_id: &str, hold_for: &str) -> Value {
    json!({
        "test_id": test_id,
        "test_name": "checkout",
        "test_description": "checkout flow under load",
        "test_task_config": { "task_count": 10, "concurrency": 5 },
        "variables": { "host": "shop.example" },
        "test_scenario": {
            "execution": [{
                "scenario": "checkout",
                "hold-for": hold_for,
                "ramp-up": "1m",
                "executor": "jmeter"
            }],
            "scenarios": { "checkout": { "script": "checkout.jmx" } }
        }
    })
}

pub struct LocalOrchestrator {
    pub backends: LocalBackends,
    pub state: Arc<AppState>,
}

impl LocalOrchestrator {
    #[must_use]
    pub fn new(pagination: PaginationPolicy) -> Self {
        Self::with_execution(pagination, MemoryExecutionService::new())
    }

    #[must_use]
    pub fn with_execution(pagination: PaginationPolicy, execution: MemoryExecutionService) -> Self {
        Self::build(region_infra(), pagination, execution)
    }

    /// No region has infrastructure configured.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::build(
            BTreeMap::new(),
            PaginationPolicy::Drain,
            MemoryExecutionService::new(),
        )
    }

    fn build(
        infra: BTreeMap<String, RegionInfra>,
        pagination: PaginationPolicy,
        execution: MemoryExecutionService,
    ) -> Self {
        let backends = LocalBackends::in_memory(infra).with_execution(Arc::new(execution));
        let state = Arc::new(backends.app_state(&config(pagination)));
        Self { backends, state }
    }

    #[must_use]
    pub fn execution(&self) -> &MemoryExecutionService {
        &self.backends.execution
    }

    /// Input of the most recently started workflow execution.
    pub fn last_workflow_input(&self) -> anyhow::Result<WorkflowInput> {
        self.backends
            .workflow
            .executions()
            .pop()
            .map(|(_, input)| input)
            .context("no workflow execution was started")
    }

    /// What the workflow hands to the launch step for the last submission.
    pub fn launch_payload(&self) -> anyhow::Result<LaunchPayload> {
        Ok(LaunchPayload::from_workflow_input(&self.last_workflow_input()?))
    }

    /// Status step input, derived from the launch step's output.
    pub fn status_payload(launched: &LaunchPayload) -> anyhow::Result<ReconcilePayload> {
        let value = serde_json::to_value(launched)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Serve the HTTP app on an ephemeral local port.
    pub async fn serve(&self) -> anyhow::Result<SocketAddr> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;
        let app = orchestrator_app(Arc::clone(&self.state));

        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                eprintln!("orchestrator test server stopped: {err}");
            }
        });

        Ok(addr)
    }
}
