//! Lifecycle shared by the commit/push and update sessions.

use std::future::Future;
use std::sync::Arc;

use gw_types::{SessionId, StatusSnapshot};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cancel::{AbortHandle, CancelToken};
use crate::error::{ExecutionFailure, SessionError, SessionResult};
use crate::executor::ActionExecutor;
use crate::prefs::TeamPrefs;
use crate::query::{self, QueryPurpose, StatusQuery, StatusRequest};
use crate::state::{ActionOutcome, SessionState};

/// Result of work that ran under a cancel token.
pub(crate) enum Gated<T> {
    Completed(T),
    Aborted,
}

/// Run `work` as a spawned task until it finishes or `token` is cancelled.
///
/// This is the single completion path: a result that arrives after the
/// token was cancelled is dropped.
pub(crate) async fn run_gated<T, F>(token: &CancelToken, work: F) -> SessionResult<Gated<T>>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    if token.is_cancelled() {
        return Ok(Gated::Aborted);
    }
    let mut task = tokio::spawn(work);
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            task.abort();
            Ok(Gated::Aborted)
        }
        joined = &mut task => {
            let value = joined.map_err(|e| SessionError::TaskFailed(e.to_string()))?;
            if token.is_cancelled() {
                Ok(Gated::Aborted)
            } else {
                Ok(Gated::Completed(value))
            }
        }
    }
}

/// State and collaborators common to both session kinds.
pub(crate) struct SessionCore {
    pub(crate) id: SessionId,
    pub(crate) state: SessionState,
    pub(crate) prefs: TeamPrefs,
    query: Arc<dyn StatusQuery>,
    executor: Arc<dyn ActionExecutor>,
    current: Arc<watch::Sender<CancelToken>>,
}

impl SessionCore {
    pub(crate) fn new(
        query: Arc<dyn StatusQuery>,
        executor: Arc<dyn ActionExecutor>,
        prefs: TeamPrefs,
    ) -> Self {
        let (current, _rx) = watch::channel(CancelToken::new());
        Self {
            id: SessionId::new(),
            state: SessionState::Idle,
            prefs,
            query,
            executor,
            current: Arc::new(current),
        }
    }

    pub(crate) fn executor(&self) -> Arc<dyn ActionExecutor> {
        Arc::clone(&self.executor)
    }

    pub(crate) fn abort_handle(&self) -> AbortHandle {
        AbortHandle::new(Arc::clone(&self.current))
    }

    pub(crate) fn require(&self, expected: SessionState) -> SessionResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Start a fresh session and run the status query under a new token.
    pub(crate) async fn query(&mut self, purpose: QueryPurpose) -> SessionResult<Gated<StatusSnapshot>> {
        if self.state.is_abortable() {
            return Err(SessionError::InvalidState {
                expected: SessionState::Idle,
                actual: self.state,
            });
        }

        let token = CancelToken::new();
        self.current.send_replace(token.clone());
        self.id = SessionId::new();
        self.state = SessionState::Querying;

        let request = StatusRequest::new(purpose, self.prefs.last_handle.clone());
        info!(
            session = %self.id,
            ?purpose,
            remote = request.want_remote_info,
            resumed = request.previous_handle.is_some(),
            "querying repository status"
        );

        let status = Arc::clone(&self.query);
        let outcome = run_gated(&token, async move {
            query::collect(&*status, &request).await
        })
        .await;

        match outcome {
            Ok(Gated::Completed(Ok(snapshot))) => {
                debug!(session = %self.id, files = snapshot.records.len(), "status query complete");
                self.prefs.last_handle = Some(snapshot.handle.clone());
                Ok(Gated::Completed(snapshot))
            }
            Ok(Gated::Completed(Err(failure))) => {
                warn!(session = %self.id, diagnostic = %failure.diagnostic, "status query failed");
                self.state = SessionState::Idle;
                Err(failure.into())
            }
            Ok(Gated::Aborted) => {
                info!(session = %self.id, "status query aborted");
                self.state = SessionState::Idle;
                Ok(Gated::Aborted)
            }
            Err(e) => {
                self.state = SessionState::Idle;
                Err(e)
            }
        }
    }

    /// Run an action from `Ready` under the session's token.
    pub(crate) async fn execute<F>(&mut self, action: &'static str, work: F) -> SessionResult<ActionOutcome>
    where
        F: Future<Output = Result<(), ExecutionFailure>> + Send + 'static,
    {
        self.require(SessionState::Ready)?;
        self.state = SessionState::Executing;
        info!(session = %self.id, action, "executing");

        let token = self.current.borrow().clone();
        let outcome = run_gated(&token, work).await;
        self.state = SessionState::Idle;

        match outcome? {
            Gated::Completed(Ok(())) => {
                info!(session = %self.id, action, "completed");
                Ok(ActionOutcome::Completed)
            }
            Gated::Completed(Err(failure)) => {
                warn!(session = %self.id, action, diagnostic = %failure.diagnostic, "action failed");
                Err(failure.into())
            }
            Gated::Aborted => {
                info!(session = %self.id, action, "action aborted");
                Ok(ActionOutcome::Aborted)
            }
        }
    }
}
