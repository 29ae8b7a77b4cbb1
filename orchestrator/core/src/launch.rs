use std::sync::Arc;

use tracing::{Instrument as _, Span, debug, error, info, info_span, warn};

use crate::{
    collaborators::{
        ContainerOverride, EnvEntry, ExecutionService, LaunchType, NetworkConfiguration,
        TaskLaunchRequest, TaskOverrides,
    },
    error::{DependencyError, OrchestratorError, ValidationError},
    payload::LaunchPayload,
};

/// Starts the worker fleet for a run. Safe to re-invoke with its own output:
/// once `is_running` is set nothing is launched again.
#[derive(Clone)]
pub struct FleetLauncher {
    service: Arc<dyn ExecutionService>,
    span: Span,
}

impl FleetLauncher {
    pub fn new(service: Arc<dyn ExecutionService>) -> Self {
        Self {
            service,
            span: info_span!("fleet_launcher"),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub async fn launch(&self, payload: LaunchPayload) -> Result<LaunchPayload, OrchestratorError> {
        let span = self.span.clone();
        self.launch_inner(payload).instrument(span).await
    }

    async fn launch_inner(
        &self,
        mut payload: LaunchPayload,
    ) -> Result<LaunchPayload, OrchestratorError> {
        if payload.is_running {
            debug!(test_id = %payload.test_id, "fleet already launched, skipping");
            return Ok(payload);
        }

        let request = build_request(&payload)?;

        let receipt = self.service.run_tasks(&request).await.map_err(|source| {
            error!(
                test_id = %payload.test_id,
                cluster = %payload.cluster,
                error = %source,
                "failed to launch fleet"
            );
            DependencyError::new("run_task", source)
        })?;

        if !receipt.failures.is_empty() {
            warn!(
                test_id = %payload.test_id,
                failures = ?receipt.failures,
                "execution service reported launch failures"
            );
        }

        info!(
            test_id = %payload.test_id,
            cluster = %payload.cluster,
            requested = request.count,
            started = receipt.task_ids.len(),
            "fleet launched"
        );

        payload.is_running = true;
        Ok(payload)
    }
}

fn build_request(payload: &LaunchPayload) -> Result<TaskLaunchRequest, ValidationError> {
    let container_name = payload
        .container_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or(ValidationError::ContainerNameRequired)?;

    let subnets = payload
        .subnets
        .as_ref()
        .filter(|subnets| !subnets.is_empty())
        .ok_or(ValidationError::SubnetRequired)?;

    let count = payload.task_count.resolve("task_count")?;

    Ok(TaskLaunchRequest {
        region: payload.region.clone(),
        cluster: payload.cluster.clone(),
        task_definition: payload.task_definition.clone(),
        count,
        launch_type: LaunchType::Fargate,
        group: payload.test_id.clone(),
        overrides: TaskOverrides {
            container_overrides: vec![ContainerOverride {
                name: container_name.to_owned(),
                environment: vec![
                    EnvEntry::new("S3_BUCKET", &payload.s3_bucket),
                    EnvEntry::new("TEST_ID", &payload.test_id),
                    EnvEntry::new("PREFIX", &payload.prefix),
                    EnvEntry::new("AWS_REGION", &payload.region),
                ],
            }],
        },
        network_configuration: NetworkConfiguration {
            subnets: subnets.clone(),
            assign_public_ip: true,
        },
    })
}
