use orchestrator_config::PaginationPolicy;
use orchestrator_core::{
    ErrorKind, OrchestratorError, ValidationError,
    collaborators::memory::MemoryExecutionService, payload::RunSubmission,
};
use serde_json::Value;
use tests_workflows::{
    CLUSTER, LocalOrchestrator, SCENARIOS_BUCKET, TESTS_TABLE, submission_body,
};

fn submission(test_id: &str, hold_for: &str) -> anyhow::Result<RunSubmission> {
    Ok(serde_json::from_value(submission_body(test_id, hold_for))?)
}

#[tokio::test]
async fn run_goes_from_submission_to_inactive() -> anyhow::Result<()> {
    let orchestrator = LocalOrchestrator::new(PaginationPolicy::Drain);
    let state = &orchestrator.state;

    let receipt = state.submitter().submit(submission("run-1", "10m")?).await?;
    assert_eq!(receipt.duration_secs, 600);

    let record = orchestrator
        .backends
        .metadata
        .record(TESTS_TABLE, "run-1")
        .expect("run record");
    assert!(record.running);

    let input = orchestrator.last_workflow_input()?;
    assert_eq!(input.duration, 600);
    assert_eq!(input.s3_bucket, SCENARIOS_BUCKET);
    assert_eq!(input.prefix, receipt.prefix);

    let launched = state.launcher().launch(orchestrator.launch_payload()?).await?;
    assert!(launched.is_running);
    assert_eq!(orchestrator.execution().active_tasks(CLUSTER), 10);

    // the scheduler may retry the launch step with its own output
    let relaunched = state.launcher().launch(launched.clone()).await?;
    assert_eq!(relaunched, launched);
    assert_eq!(orchestrator.execution().launch_count(), 1);

    let status = state
        .reconciler()
        .handle(LocalOrchestrator::status_payload(&launched)?)
        .await?;
    assert_eq!(status.is_running, Some(true));

    orchestrator.execution().stop_group(CLUSTER, "run-1");
    let status = state.reconciler().handle(status).await?;
    assert_eq!(status.is_running, Some(false));
    assert_eq!(status.next_token, None);
    assert_eq!(status.extra["prefix"], Value::from(receipt.prefix));

    Ok(())
}

#[tokio::test]
async fn concurrent_runs_do_not_see_each_other() -> anyhow::Result<()> {
    let orchestrator = LocalOrchestrator::new(PaginationPolicy::Drain);
    let state = &orchestrator.state;

    state.submitter().submit(submission("run-a", "30s")?).await?;
    let run_a = state.launcher().launch(orchestrator.launch_payload()?).await?;
    state.submitter().submit(submission("run-b", "30s")?).await?;
    let run_b = state.launcher().launch(orchestrator.launch_payload()?).await?;

    orchestrator.execution().stop_group(CLUSTER, "run-a");

    let a = state
        .reconciler()
        .handle(LocalOrchestrator::status_payload(&run_a)?)
        .await?;
    let b = state
        .reconciler()
        .handle(LocalOrchestrator::status_payload(&run_b)?)
        .await?;
    assert_eq!(a.is_running, Some(false));
    assert_eq!(b.is_running, Some(true));

    Ok(())
}

#[tokio::test]
async fn resumable_polling_reaches_inactive_only_after_the_last_page() -> anyhow::Result<()> {
    let execution = MemoryExecutionService::new().with_page_size(3);
    for _ in 0..7 {
        execution.seed_task(CLUSTER, "someone-else");
    }
    let orchestrator = LocalOrchestrator::with_execution(PaginationPolicy::Resumable, execution);
    let state = &orchestrator.state;

    state.submitter().submit(submission("run-1", "2m")?).await?;
    let launched = state.launcher().launch(orchestrator.launch_payload()?).await?;
    orchestrator.execution().stop_group(CLUSTER, "run-1");

    let mut payload = LocalOrchestrator::status_payload(&launched)?;
    let mut invocations = 0;
    loop {
        payload = state.reconciler().handle(payload).await?;
        invocations += 1;
        if payload.next_token.is_none() {
            break;
        }
        assert_eq!(payload.is_running, Some(true));
    }

    assert_eq!(payload.is_running, Some(false));
    assert_eq!(invocations, 3);
    Ok(())
}

#[tokio::test]
async fn launch_without_subnets_never_starts_tasks() -> anyhow::Result<()> {
    let orchestrator = LocalOrchestrator::new(PaginationPolicy::Drain);
    let state = &orchestrator.state;

    state.submitter().submit(submission("run-1", "1m")?).await?;
    let mut payload = orchestrator.launch_payload()?;
    payload.subnets = Some(Vec::new());

    let err = state.launcher().launch(payload).await.unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::Validation(ValidationError::SubnetRequired)
    ));
    assert_eq!(orchestrator.execution().launch_count(), 0);
    Ok(())
}

#[tokio::test]
async fn unconfigured_region_leaves_no_trace() -> anyhow::Result<()> {
    let orchestrator = LocalOrchestrator::unconfigured();

    let err = orchestrator
        .state
        .submitter()
        .submit(submission("run-1", "10m")?)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.is_not_found());
    assert!(orchestrator.backends.metadata.is_empty());
    assert!(orchestrator.backends.workflow.executions().is_empty());
    Ok(())
}
