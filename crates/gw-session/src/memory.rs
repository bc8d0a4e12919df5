//! In-memory query and executor for tests, demos and the CLI.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use gw_types::StatusSnapshot;
use tokio::sync::mpsc;

use crate::error::{ExecutionFailure, QueryFailure};
use crate::executor::{ActionExecutor, CommitRequest, PushRequest, UpdateRequest};
use crate::query::{QueryEvent, StatusQuery, StatusRequest};

/// A status query that replays a fixed snapshot.
pub struct InMemoryStatusQuery {
    snapshot: RwLock<StatusSnapshot>,
    failure: Option<String>,
    delay: Option<Duration>,
    requests: RwLock<Vec<StatusRequest>>,
}

impl InMemoryStatusQuery {
    pub fn new(snapshot: StatusSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            failure: None,
            delay: None,
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Every run ends with this diagnostic instead of a completion.
    pub fn failing(mut self, diagnostic: impl Into<String>) -> Self {
        self.failure = Some(diagnostic.into());
        self
    }

    /// Wait this long before replaying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the snapshot replayed by later runs.
    pub fn set_snapshot(&self, snapshot: StatusSnapshot) {
        let mut current = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = snapshot;
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<StatusRequest> {
        self.requests
            .read()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn query_count(&self) -> usize {
        self.requests.read().map(|requests| requests.len()).unwrap_or(0)
    }
}

#[async_trait]
impl StatusQuery for InMemoryStatusQuery {
    async fn run(
        &self,
        request: &StatusRequest,
        events: mpsc::Sender<QueryEvent>,
    ) -> Result<(), QueryFailure> {
        self.requests
            .write()
            .map_err(|_| QueryFailure::new("request log lock poisoned"))?
            .push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(diagnostic) = &self.failure {
            return Err(QueryFailure::new(diagnostic.clone()));
        }

        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| QueryFailure::new("snapshot lock poisoned"))?
            .clone();
        for record in snapshot.records {
            if events.send(QueryEvent::Record(record)).await.is_err() {
                return Ok(());
            }
        }
        // The receiver is only gone if the session stopped listening.
        let _ = events.send(QueryEvent::Complete(snapshot.handle)).await;
        Ok(())
    }
}

/// An action the recording executor was asked to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutedAction {
    Commit(CommitRequest),
    Push(PushRequest),
    Update(UpdateRequest),
}

/// An executor that records requests instead of running commands.
#[derive(Default)]
pub struct RecordingExecutor {
    failure: Option<String>,
    delay: Option<Duration>,
    actions: RwLock<Vec<ExecutedAction>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, diagnostic: impl Into<String>) -> Self {
        self.failure = Some(diagnostic.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Actions that ran to completion, oldest first.
    pub fn actions(&self) -> Vec<ExecutedAction> {
        self.actions
            .read()
            .map(|actions| actions.clone())
            .unwrap_or_default()
    }

    async fn perform(&self, name: &str, action: ExecutedAction) -> Result<(), ExecutionFailure> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(diagnostic) = &self.failure {
            return Err(ExecutionFailure::new(name, diagnostic.clone()));
        }
        self.actions
            .write()
            .map_err(|_| ExecutionFailure::new(name, "action log lock poisoned"))?
            .push(action);
        Ok(())
    }
}

#[async_trait]
impl ActionExecutor for RecordingExecutor {
    async fn commit(&self, request: CommitRequest) -> Result<(), ExecutionFailure> {
        self.perform("commit", ExecutedAction::Commit(request)).await
    }

    async fn push(&self, request: PushRequest) -> Result<(), ExecutionFailure> {
        self.perform("push", ExecutedAction::Push(request)).await
    }

    async fn update(&self, request: UpdateRequest) -> Result<(), ExecutionFailure> {
        self.perform("update", ExecutedAction::Update(request)).await
    }
}

#[cfg(test)]
mod tests {
    use gw_types::{FileStatusRecord, RepoStatus, StatusHandle};

    use super::*;
    use crate::query::{collect, QueryPurpose};

    #[tokio::test]
    async fn replays_snapshot_and_logs_requests() {
        let snapshot = StatusSnapshot::new(
            vec![FileStatusRecord::uniform("A.java", RepoStatus::Modified)],
            StatusHandle::new(false, true),
        );
        let query = InMemoryStatusQuery::new(snapshot.clone());
        let request = StatusRequest::new(QueryPurpose::Update, None);

        let collected = collect(&query, &request).await.unwrap();
        assert_eq!(collected, snapshot);
        assert_eq!(query.requests(), vec![request]);
    }

    #[tokio::test]
    async fn failing_query_reports_diagnostic() {
        let query = InMemoryStatusQuery::new(StatusSnapshot::default()).failing("connection refused");
        let request = StatusRequest::new(QueryPurpose::CommitPush, None);
        let failure = collect(&query, &request).await.unwrap_err();
        assert_eq!(failure.diagnostic, "connection refused");
    }

    #[tokio::test]
    async fn executor_records_completed_actions() {
        let executor = RecordingExecutor::new();
        executor.push(PushRequest::default()).await.unwrap();
        assert_eq!(executor.actions(), vec![ExecutedAction::Push(PushRequest::default())]);

        let failing = RecordingExecutor::new().failing("rejected");
        let err = failing.commit(CommitRequest::default()).await.unwrap_err();
        assert_eq!(err.action, "commit");
        assert!(failing.actions().is_empty());
    }
}
