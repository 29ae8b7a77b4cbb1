use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use orchestrator_core::{
    FleetLauncher, RunSubmitter, StatusReconciler,
    payload::{LaunchPayload, ReconcilePayload, RunSubmission},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Components shared by every request. Holds no per-run state.
#[derive(Clone)]
pub struct AppState {
    submitter: RunSubmitter,
    launcher: FleetLauncher,
    reconciler: StatusReconciler,
}

impl AppState {
    #[must_use]
    pub const fn new(
        submitter: RunSubmitter,
        launcher: FleetLauncher,
        reconciler: StatusReconciler,
    ) -> Self {
        Self {
            submitter,
            launcher,
            reconciler,
        }
    }

    #[must_use]
    pub const fn submitter(&self) -> &RunSubmitter {
        &self.submitter
    }

    #[must_use]
    pub const fn launcher(&self) -> &FleetLauncher {
        &self.launcher
    }

    #[must_use]
    pub const fn reconciler(&self) -> &StatusReconciler {
        &self.reconciler
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub test_id: String,
    pub prefix: String,
    pub duration: u64,
}

async fn submit_test(
    State(state): State<Arc<AppState>>,
    submission: Result<Json<RunSubmission>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(submission) = submission?;
    let receipt = state.submitter.submit(submission).await?;

    Ok(Json(SubmitResponse {
        message: "test submitted".to_owned(),
        test_id: receipt.test_id,
        prefix: receipt.prefix,
        duration: receipt.duration_secs,
    }))
}

async fn launch_step(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LaunchPayload>, JsonRejection>,
) -> Result<Json<LaunchPayload>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(state.launcher.launch(payload).await?))
}

async fn status_step(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReconcilePayload>, JsonRejection>,
) -> Result<Json<ReconcilePayload>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(state.reconciler.handle(payload).await?))
}

pub fn orchestrator_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/test", post(submit_test))
        .route("/steps/launch", post(launch_step))
        .route("/steps/status", post(status_step))
        .with_state(state)
}
