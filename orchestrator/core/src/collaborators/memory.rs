//! In-process collaborator backends. They back the standalone service and the
//! test suites, and count calls so callers can assert on side effects.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use orchestrator_config::RegionInfra;
use tracing::debug;
use uuid::Uuid;

use super::{
    ExecutionService, InfraTable, LaunchReceipt, MetadataStore, ObjectStore, TaskDescription,
    TaskLaunchRequest, TaskListQuery, TaskPage, WorkflowEngine,
};
use crate::{
    error::DynError,
    payload::{RunRecord, WorkflowInput},
};

const DEFAULT_PAGE_SIZE: usize = 100;
const RUNNING_STATUS: &str = "RUNNING";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Optional canned failure returned by the next calls of a backend.
#[derive(Default)]
struct FailureSwitch(Mutex<Option<String>>);

impl FailureSwitch {
    fn set(&self, message: impl Into<String>) {
        *lock(&self.0) = Some(message.into());
    }

    fn check(&self) -> Result<(), DynError> {
        match lock(&self.0).as_ref() {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

/// Region infra table held in memory; the table name is ignored.
#[derive(Default)]
pub struct MemoryInfraTable {
    regions: Mutex<HashMap<String, RegionInfra>>,
    lookups: AtomicUsize,
    failure: FailureSwitch,
}

impl MemoryInfraTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_region(self, region: impl Into<String>, infra: RegionInfra) -> Self {
        lock(&self.regions).insert(region.into(), infra);
        self
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        self.failure.set(message);
    }

    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl From<BTreeMap<String, RegionInfra>> for MemoryInfraTable {
    fn from(entries: BTreeMap<String, RegionInfra>) -> Self {
        Self {
            regions: Mutex::new(entries.into_iter().collect()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl InfraTable for MemoryInfraTable {
    async fn region_infra(
        &self,
        _table: &str,
        region: &str,
    ) -> Result<Option<RegionInfra>, DynError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.failure.check()?;
        Ok(lock(&self.regions).get(region).cloned())
    }
}

/// Object store keeping blobs in a map keyed by `(bucket, key)`.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    failure: FailureSwitch,
}

impl MemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        self.failure.set(message);
    }

    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        lock(&self.objects)
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.objects).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), DynError> {
        self.failure.check()?;
        lock(&self.objects).insert((bucket.to_owned(), key.to_owned()), body);
        Ok(())
    }
}

/// Run records keyed by `(table, test_id)`.
#[derive(Default)]
pub struct MemoryMetadataStore {
    records: Mutex<BTreeMap<(String, String), RunRecord>>,
    failure: FailureSwitch,
}

impl MemoryMetadataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        self.failure.set(message);
    }

    #[must_use]
    pub fn record(&self, table: &str, test_id: &str) -> Option<RunRecord> {
        lock(&self.records)
            .get(&(table.to_owned(), test_id.to_owned()))
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn put_run(&self, table: &str, record: &RunRecord) -> Result<(), DynError> {
        self.failure.check()?;
        lock(&self.records).insert(
            (table.to_owned(), record.test_id.clone()),
            record.clone(),
        );
        Ok(())
    }
}

/// Records started executions instead of running a state machine.
#[derive(Default)]
pub struct MemoryWorkflowEngine {
    executions: Mutex<Vec<(String, WorkflowInput)>>,
    failure: FailureSwitch,
}

impl MemoryWorkflowEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        self.failure.set(message);
    }

    /// Started executions as `(state machine, input)` pairs, oldest first.
    #[must_use]
    pub fn executions(&self) -> Vec<(String, WorkflowInput)> {
        lock(&self.executions).clone()
    }
}

#[async_trait]
impl WorkflowEngine for MemoryWorkflowEngine {
    async fn start_execution(
        &self,
        state_machine: &str,
        input: &WorkflowInput,
    ) -> Result<(), DynError> {
        self.failure.check()?;
        lock(&self.executions).push((state_machine.to_owned(), input.clone()));
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct ActiveTask {
    cluster: String,
    description: TaskDescription,
}

/// Execution service simulating one task registry across clusters. Listing is
/// paginated with an opaque offset cursor; tasks stay active until stopped.
pub struct MemoryExecutionService {
    page_size: usize,
    tasks: Mutex<Vec<ActiveTask>>,
    launches: Mutex<Vec<TaskLaunchRequest>>,
    list_calls: AtomicUsize,
    describe_calls: AtomicUsize,
    launch_failure: FailureSwitch,
}

impl Default for MemoryExecutionService {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryExecutionService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            tasks: Mutex::new(Vec::new()),
            launches: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            describe_calls: AtomicUsize::new(0),
            launch_failure: FailureSwitch::default(),
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Register an already-running task, e.g. one belonging to another run.
    pub fn seed_task(&self, cluster: &str, group: &str) -> String {
        let task_id = format!("task-{}", Uuid::new_v4());
        lock(&self.tasks).push(ActiveTask {
            cluster: cluster.to_owned(),
            description: TaskDescription {
                task_id: task_id.clone(),
                group: Some(group.to_owned()),
                last_status: Some(RUNNING_STATUS.to_owned()),
            },
        });
        task_id
    }

    /// Stop every task of a group, as if the run finished.
    pub fn stop_group(&self, cluster: &str, group: &str) -> usize {
        let mut tasks = lock(&self.tasks);
        let before = tasks.len();
        tasks.retain(|task| {
            task.cluster != cluster || task.description.group.as_deref() != Some(group)
        });
        before - tasks.len()
    }

    pub fn fail_launches_with(&self, message: impl Into<String>) {
        self.launch_failure.set(message);
    }

    #[must_use]
    pub fn launches(&self) -> Vec<TaskLaunchRequest> {
        lock(&self.launches).clone()
    }

    #[must_use]
    pub fn launch_count(&self) -> usize {
        lock(&self.launches).len()
    }

    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn active_tasks(&self, cluster: &str) -> usize {
        lock(&self.tasks)
            .iter()
            .filter(|task| task.cluster == cluster)
            .count()
    }
}

#[async_trait]
impl ExecutionService for MemoryExecutionService {
    async fn run_tasks(&self, request: &TaskLaunchRequest) -> Result<LaunchReceipt, DynError> {
        self.launch_failure.check()?;
        lock(&self.launches).push(request.clone());

        let task_ids = (0..request.count)
            .map(|_| self.seed_task(&request.cluster, &request.group))
            .collect::<Vec<_>>();
        debug!(
            cluster = %request.cluster,
            group = %request.group,
            started = task_ids.len(),
            "memory execution service started tasks"
        );

        Ok(LaunchReceipt {
            task_ids,
            failures: Vec::new(),
        })
    }

    async fn list_tasks(&self, query: &TaskListQuery<'_>) -> Result<TaskPage, DynError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let offset = match query.next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| format!("invalid next token {token}"))?,
            None => 0,
        };

        let ids = lock(&self.tasks)
            .iter()
            .filter(|task| task.cluster == query.cluster)
            .map(|task| task.description.task_id.clone())
            .collect::<Vec<_>>();

        let end = offset.saturating_add(self.page_size).min(ids.len());
        let task_ids = ids.get(offset..end).map(<[String]>::to_vec).unwrap_or_default();
        let next_token = (end < ids.len()).then(|| end.to_string());

        Ok(TaskPage {
            task_ids,
            next_token,
        })
    }

    async fn describe_tasks(
        &self,
        _region: &str,
        cluster: &str,
        task_ids: &[String],
    ) -> Result<Vec<TaskDescription>, DynError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);

        Ok(lock(&self.tasks)
            .iter()
            .filter(|task| task.cluster == cluster && task_ids.contains(&task.description.task_id))
            .map(|task| task.description.clone())
            .collect())
    }
}
