use orchestrator_api::SubmitResponse;
use orchestrator_config::PaginationPolicy;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tests_workflows::{LocalOrchestrator, TESTS_TABLE, submission_body};

#[tokio::test]
async fn submit_launch_and_poll_over_http() -> anyhow::Result<()> {
    let orchestrator = LocalOrchestrator::new(PaginationPolicy::Drain);
    let addr = orchestrator.serve().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/test"))
        .json(&submission_body("run-http", "10m"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let receipt: SubmitResponse = response.json().await?;
    assert_eq!(receipt.test_id, "run-http");
    assert_eq!(receipt.duration, 600);
    assert!(
        orchestrator
            .backends
            .metadata
            .record(TESTS_TABLE, "run-http")
            .is_some()
    );

    let launch = serde_json::to_value(orchestrator.launch_payload()?)?;
    let launched: Value = client
        .post(format!("http://{addr}/steps/launch"))
        .json(&launch)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(launched["is_running"], true);
    assert_eq!(launched["duration"], 600);

    let status: Value = client
        .post(format!("http://{addr}/steps/status"))
        .json(&launched)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(status["isRunning"], true);
    assert_eq!(status["test_id"], "run-http");

    Ok(())
}

#[tokio::test]
async fn errors_map_to_status_codes() -> anyhow::Result<()> {
    let orchestrator = LocalOrchestrator::new(PaginationPolicy::Drain);
    let addr = orchestrator.serve().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/test"))
        .json(&submission_body("run-bad", "2y"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "validation");

    let response = client
        .post(format!("http://{addr}/steps/launch"))
        .json(&json!({ "test_id": "run-bad", "task_count": 1, "subnets": ["subnet-a"] }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut unsupported = submission_body("run-far", "10m");
    unsupported["region"] = json!("eu-west-1");
    let response = client
        .post(format!("http://{addr}/test"))
        .json(&unsupported)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "configuration");

    let unconfigured = LocalOrchestrator::unconfigured();
    let addr = unconfigured.serve().await?;
    let response = client
        .post(format!("http://{addr}/test"))
        .json(&submission_body("run-lost", "10m"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "configuration");

    Ok(())
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() -> anyhow::Result<()> {
    let orchestrator = LocalOrchestrator::new(PaginationPolicy::Drain);
    let addr = orchestrator.serve().await?;
    let client = reqwest::Client::new();

    let mut no_test_id = submission_body("run-anon", "10m");
    no_test_id
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("submission body is not an object"))?
        .remove("test_id");
    let response = client
        .post(format!("http://{addr}/test"))
        .json(&no_test_id)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "validation");
    assert!(body["message"].as_str().is_some_and(|m| m.contains("test_id")));

    let response = client
        .post(format!("http://{addr}/steps/launch"))
        .json(&json!({ "task_count": { "x": 1 }, "container_name": 5 }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "validation");

    let response = client
        .post(format!("http://{addr}/steps/status"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "validation");

    assert_eq!(orchestrator.execution().launch_count(), 0);
    assert!(orchestrator.backends.metadata.is_empty());

    Ok(())
}
