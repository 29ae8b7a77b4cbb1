use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use orchestrator_config::{
    OrchestratorConfig,
    constants::{SUPPORTED_REGION, scenario_object_key},
};
use serde::Serialize;
use tracing::{Instrument as _, Span, error, info, info_span};

use crate::{
    collaborators::{Clock, MetadataStore, ObjectStore, SystemClock, WorkflowEngine},
    duration::parse_duration_secs,
    error::{ConfigurationError, DependencyError, OrchestratorError, ValidationError},
    infra::InfraResolver,
    payload::{ExecutionParameters, RunRecord, RunSubmission, TaskConfig, WorkflowInput},
};

/// What a caller gets back once a run is scheduled.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SubmitReceipt {
    pub test_id: String,
    pub prefix: String,
    pub duration_secs: u64,
}

/// Ordering prefix for a run: the UTC timestamp in ISO-8601 form without the
/// trailing `Z`, reversed so that keys spread across storage partitions.
#[must_use]
pub fn ordering_prefix(now: DateTime<Utc>) -> String {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);
    stamp.trim_end_matches('Z').chars().rev().collect()
}

/// Turns a submission into a scheduled run: scenario blob, workflow start,
/// and finally the run record.
#[derive(Clone)]
pub struct RunSubmitter {
    config: Arc<OrchestratorConfig>,
    resolver: InfraResolver,
    objects: Arc<dyn ObjectStore>,
    metadata: Arc<dyn MetadataStore>,
    workflow: Arc<dyn WorkflowEngine>,
    clock: Arc<dyn Clock>,
    span: Span,
}

impl RunSubmitter {
    pub fn new(
        config: Arc<OrchestratorConfig>,
        resolver: InfraResolver,
        objects: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
        workflow: Arc<dyn WorkflowEngine>,
    ) -> Self {
        Self {
            config,
            resolver,
            objects,
            metadata,
            workflow,
            clock: Arc::new(SystemClock),
            span: info_span!("run_submitter"),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub async fn submit(&self, submission: RunSubmission) -> Result<SubmitReceipt, OrchestratorError> {
        let span = self.span.clone();
        self.submit_inner(submission).instrument(span).await
    }

    async fn submit_inner(
        &self,
        mut submission: RunSubmission,
    ) -> Result<SubmitReceipt, OrchestratorError> {
        let region = submission
            .region
            .clone()
            .unwrap_or_else(|| self.config.tests_region.clone());
        if region != SUPPORTED_REGION {
            return Err(ConfigurationError::UnsupportedRegion {
                region,
                supported: SUPPORTED_REGION,
            }
            .into());
        }

        if submission.test_id.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "test_id" }.into());
        }

        let mut task_config = TaskConfig::default();
        self.resolver.resolve_into(&region, &mut task_config).await?;

        let execution = submission.test_scenario.primary_execution()?;
        let scenario_name = execution
            .scenario
            .clone()
            .filter(|name| !name.trim().is_empty())
            .ok_or(ValidationError::MissingField { field: "scenario" })?;
        let hold_for = execution
            .hold_for
            .clone()
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(ValidationError::MissingField { field: "hold-for" })?;
        let ramp_up = execution.ramp_up.clone();

        task_config.task_count = submission.test_task_config.task_count.resolve("task_count")?;
        task_config.concurrency = submission
            .test_task_config
            .concurrency
            .resolve("concurrency")?;
        let duration_secs = parse_duration_secs(&hold_for)?;

        let scenario = &mut submission.test_scenario;
        scenario.inject_variables(&submission.test_name, std::mem::take(&mut submission.variables))?;
        scenario.apply_reporting();
        scenario.stamp_sizing(task_config.task_count, task_config.concurrency)?;

        let params = ExecutionParameters::new(
            submission.test_id.clone(),
            region.clone(),
            task_config,
            duration_secs,
        );

        let key = scenario_object_key(params.test_id(), params.region());
        let body = scenario
            .to_json_bytes()
            .map_err(|source| DependencyError::new("serialize_scenario", source))?;
        self.objects
            .put_object(&self.config.scenarios_bucket, &key, body)
            .await
            .map_err(|source| {
                error!(test_id = %params.test_id(), key = %key, error = %source, "failed to store scenario");
                DependencyError::new("put_object", source)
            })?;

        let prefix = ordering_prefix(self.clock.now());
        let input = WorkflowInput::new(&params, prefix.clone(), self.config.scenarios_bucket.clone());
        self.workflow
            .start_execution(&self.config.state_machine_arn, &input)
            .await
            .map_err(|source| {
                error!(test_id = %params.test_id(), error = %source, "failed to start run workflow");
                DependencyError::new("start_execution", source)
            })?;

        let record = RunRecord {
            test_id: params.test_id().to_owned(),
            task_count: params.task_config().task_count,
            concurrency: params.task_config().concurrency,
            test_name: scenario_name,
            test_description: submission.test_description,
            hold_for,
            ramp_up,
            running: true,
        };
        self.metadata
            .put_run(&self.config.tests_table, &record)
            .await
            .map_err(|source| {
                error!(test_id = %record.test_id, error = %source, "failed to write run record");
                DependencyError::new("put_item", source)
            })?;

        info!(
            test_id = %params.test_id(),
            region = %params.region(),
            task_count = params.task_config().task_count,
            concurrency = params.task_config().concurrency,
            duration_secs,
            prefix = %prefix,
            "run submitted"
        );

        Ok(SubmitReceipt {
            test_id: params.test_id().to_owned(),
            prefix,
            duration_secs,
        })
    }
}
