//! Answers "is this run's fleet still active?" by scanning the cluster's task
//! listing for tasks grouped under the run id.
//!
//! Inactive is only ever reported once the whole listing has been seen. With
//! [`PaginationPolicy::Drain`] that happens inside one call; with
//! [`PaginationPolicy::Resumable`] each call looks at a single page and hands
//! the cursor back, reporting the run as still running until the listing is
//! exhausted.

use std::sync::Arc;

use orchestrator_config::PaginationPolicy;
use tracing::{Instrument as _, Span, debug, error, info, info_span};

use crate::{
    collaborators::{ExecutionService, TaskListQuery},
    error::{DependencyError, OrchestratorError},
    payload::ReconcilePayload,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReconcileRequest {
    pub region: String,
    pub cluster: String,
    pub test_id: String,
    pub cursor: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReconcileOutcome {
    pub is_running: bool,
    /// Set only when the caller has to re-invoke to see further pages.
    pub next_cursor: Option<String>,
    pub pages_scanned: usize,
}

impl ReconcileOutcome {
    const fn active(pages_scanned: usize) -> Self {
        Self {
            is_running: true,
            next_cursor: None,
            pages_scanned,
        }
    }

    const fn inactive(pages_scanned: usize) -> Self {
        Self {
            is_running: false,
            next_cursor: None,
            pages_scanned,
        }
    }
}

#[derive(Clone)]
pub struct StatusReconciler {
    service: Arc<dyn ExecutionService>,
    policy: PaginationPolicy,
    span: Span,
}

impl StatusReconciler {
    pub fn new(service: Arc<dyn ExecutionService>, policy: PaginationPolicy) -> Self {
        Self {
            service,
            policy,
            span: info_span!("status_reconciler"),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub async fn reconcile(
        &self,
        request: ReconcileRequest,
    ) -> Result<ReconcileOutcome, OrchestratorError> {
        let span = self.span.clone();
        self.reconcile_inner(request).instrument(span).await
    }

    /// Step-payload form of [`Self::reconcile`]: reads `next_token`, writes
    /// `isRunning` and the new `next_token`; other keys pass through.
    pub async fn handle(
        &self,
        mut payload: ReconcilePayload,
    ) -> Result<ReconcilePayload, OrchestratorError> {
        let outcome = self
            .reconcile(ReconcileRequest {
                region: payload.region.clone(),
                cluster: payload.cluster.clone(),
                test_id: payload.test_id.clone(),
                cursor: payload.next_token.take(),
            })
            .await?;

        payload.is_running = Some(outcome.is_running);
        payload.next_token = outcome.next_cursor;
        Ok(payload)
    }

    async fn reconcile_inner(
        &self,
        request: ReconcileRequest,
    ) -> Result<ReconcileOutcome, OrchestratorError> {
        let mut cursor = request.cursor.clone();
        let mut pages_scanned = 0;

        loop {
            let (matched, next) = self.scan_page(&request, cursor.as_deref()).await?;
            pages_scanned += 1;

            if matched {
                info!(test_id = %request.test_id, pages_scanned, "run is still active");
                return Ok(ReconcileOutcome::active(pages_scanned));
            }

            let Some(next) = next else {
                info!(test_id = %request.test_id, pages_scanned, "no active tasks for run");
                return Ok(ReconcileOutcome::inactive(pages_scanned));
            };

            match self.policy {
                PaginationPolicy::Drain => cursor = Some(next),
                PaginationPolicy::Resumable => {
                    debug!(test_id = %request.test_id, "handing listing cursor back");
                    return Ok(ReconcileOutcome {
                        is_running: true,
                        next_cursor: Some(next),
                        pages_scanned,
                    });
                }
            }
        }
    }

    /// One listing page: whether it holds a task of the run, and the cursor
    /// for the next page.
    async fn scan_page(
        &self,
        request: &ReconcileRequest,
        cursor: Option<&str>,
    ) -> Result<(bool, Option<String>), OrchestratorError> {
        let page = self
            .service
            .list_tasks(&TaskListQuery {
                region: &request.region,
                cluster: &request.cluster,
                next_token: cursor,
            })
            .await
            .map_err(|source| {
                error!(cluster = %request.cluster, error = %source, "failed to list tasks");
                DependencyError::new("list_tasks", source)
            })?;

        if page.task_ids.is_empty() {
            return Ok((false, page.next_token));
        }

        let described = self
            .service
            .describe_tasks(&request.region, &request.cluster, &page.task_ids)
            .await
            .map_err(|source| {
                error!(cluster = %request.cluster, error = %source, "failed to describe tasks");
                DependencyError::new("describe_tasks", source)
            })?;

        let matched = described
            .iter()
            .any(|task| task.group.as_deref() == Some(request.test_id.as_str()));
        Ok((matched, page.next_token))
    }
}
