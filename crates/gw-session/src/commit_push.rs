//! The commit-and-push session.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use gw_status::{
    ActionAvailability, ActionSets, Availability, ClassifierConfig, ConflictReport,
    ConflictResolver, StatusClassifier,
};
use gw_types::{Perspective, SessionId, StatusHandle};
use serde::Serialize;
use tracing::{info, warn};

use crate::cancel::AbortHandle;
use crate::error::{SessionError, SessionResult};
use crate::executor::{ActionExecutor, CommitRequest, PushRequest};
use crate::prefs::TeamPrefs;
use crate::query::{QueryPurpose, StatusQuery};
use crate::session::{Gated, SessionCore};
use crate::state::{ActionOutcome, SessionOutcome, SessionState};

/// Immutable result of a commit/push classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitPushView {
    pub session: SessionId,
    /// Sets seen from the working copy.
    pub local: ActionSets,
    /// Sets seen from the shared repository, with overridden conflicts removed.
    pub remote: ActionSets,
    /// Remote conflicts the user already resolved locally.
    pub overridden: BTreeSet<PathBuf>,
    pub handle: StatusHandle,
    pub include_layout: bool,
    /// Whether the include-layout toggle is offered.
    pub layout_toggle: bool,
    pub commit_list: BTreeSet<PathBuf>,
    pub push_list: BTreeSet<PathBuf>,
    pub push: Availability,
}

impl CommitPushView {
    fn new(
        session: SessionId,
        local: ActionSets,
        remote: ActionSets,
        overridden: BTreeSet<PathBuf>,
        handle: StatusHandle,
        include_layout: bool,
    ) -> Self {
        let push = ActionAvailability::push(&handle, &remote);
        Self {
            session,
            layout_toggle: ActionAvailability::layout_toggle(&local),
            commit_list: local.commit_list(include_layout),
            push_list: remote.push_list(),
            local,
            remote,
            overridden,
            handle,
            include_layout,
            push,
        }
    }

    /// The same view with the include-layout toggle set to `include_layout`.
    pub fn with_include_layout(&self, include_layout: bool) -> Self {
        Self {
            include_layout,
            commit_list: self.local.commit_list(include_layout),
            ..self.clone()
        }
    }

    pub fn commit_enabled(&self, comment: &str) -> bool {
        ActionAvailability::commit(&self.local, self.include_layout, comment)
    }

    fn commit_request(&self, comment: &str) -> CommitRequest {
        CommitRequest {
            comment: comment.to_string(),
            files: self.commit_list.clone(),
            new_files: self.local.to_add.clone(),
            deleted_files: self.local.to_delete.clone(),
            layout_files: if self.include_layout {
                self.local.modified_layout.clone()
            } else {
                BTreeSet::new()
            },
            handle: self.handle.clone(),
        }
    }
}

/// Classifies status for a commit and a push, then runs them.
pub struct CommitPushSession {
    core: SessionCore,
    classifier: StatusClassifier,
    resolver: ConflictResolver,
    view: Option<CommitPushView>,
}

impl CommitPushSession {
    pub fn new(
        query: Arc<dyn StatusQuery>,
        executor: Arc<dyn ActionExecutor>,
        config: &ClassifierConfig,
        prefs: TeamPrefs,
    ) -> SessionResult<Self> {
        config.validate()?;
        Ok(Self {
            core: SessionCore::new(query, executor, prefs),
            classifier: StatusClassifier::from_config(config),
            resolver: ConflictResolver::new(config.conflict_list_limit),
            view: None,
        })
    }

    pub fn id(&self) -> SessionId {
        self.core.id
    }

    pub fn state(&self) -> SessionState {
        self.core.state
    }

    pub fn prefs(&self) -> &TeamPrefs {
        &self.core.prefs
    }

    pub fn view(&self) -> Option<&CommitPushView> {
        self.view.as_ref()
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.core.abort_handle()
    }

    /// Query the repository and classify for commit and push.
    ///
    /// Conflicts in the local view block immediately. Remote conflicts are
    /// checked only after removing files the user has staged locally.
    pub async fn open(&mut self) -> SessionResult<SessionOutcome<CommitPushView>> {
        self.view = None;
        let snapshot = match self.core.query(QueryPurpose::CommitPush).await? {
            Gated::Completed(snapshot) => snapshot,
            Gated::Aborted => return Ok(SessionOutcome::Aborted),
        };

        let local = self.classifier.classify(&snapshot.records, Perspective::Local);
        if let Some(report) = self.resolver.check_local(&local) {
            return Ok(self.block(report));
        }

        let mut remote = self.classifier.classify(&snapshot.records, Perspective::Remote);
        let resolution = self.resolver.resolve_push(&local, &remote);
        if let Some(report) = resolution.report {
            return Ok(self.block(report));
        }
        resolution.remaining.apply_to(&mut remote);

        let view = CommitPushView::new(
            self.core.id,
            local,
            remote,
            resolution.overridden,
            snapshot.handle,
            self.core.prefs.include_layout,
        );
        self.core.state = SessionState::Ready;
        info!(
            session = %self.core.id,
            commit = view.commit_list.len(),
            push = view.push_list.len(),
            push_enabled = view.push.enabled,
            overridden = view.overridden.len(),
            "commit/push session ready"
        );
        self.view = Some(view.clone());
        Ok(SessionOutcome::Ready(view))
    }

    /// Flip the include-layout toggle and recompute the commit list from the
    /// sets already held. Does not query again.
    pub fn set_include_layout(&mut self, include_layout: bool) -> SessionResult<CommitPushView> {
        self.core.require(SessionState::Ready)?;
        let view = self
            .view
            .as_ref()
            .map(|view| view.with_include_layout(include_layout))
            .ok_or(SessionError::InvalidState {
                expected: SessionState::Ready,
                actual: SessionState::Idle,
            })?;
        self.core.prefs.include_layout = include_layout;
        self.view = Some(view.clone());
        Ok(view)
    }

    pub async fn commit(&mut self, comment: &str) -> SessionResult<ActionOutcome> {
        let view = self.ready_view()?;
        if !view.commit_enabled(comment) {
            return Err(SessionError::Unavailable { action: "commit" });
        }
        let request = view.commit_request(comment);
        let executor = self.core.executor();
        let outcome = self
            .core
            .execute("commit", async move { executor.commit(request).await })
            .await;
        self.view = None;
        outcome
    }

    pub async fn push(&mut self) -> SessionResult<ActionOutcome> {
        let view = self.ready_view()?;
        if !view.push.enabled {
            return Err(SessionError::Unavailable { action: "push" });
        }
        let request = PushRequest {
            files: view.push_list.clone(),
            handle: view.handle.clone(),
        };
        let executor = self.core.executor();
        let outcome = self
            .core
            .execute("push", async move { executor.push(request).await })
            .await;
        self.view = None;
        outcome
    }

    fn ready_view(&self) -> SessionResult<&CommitPushView> {
        self.core.require(SessionState::Ready)?;
        self.view.as_ref().ok_or(SessionError::InvalidState {
            expected: SessionState::Ready,
            actual: SessionState::Idle,
        })
    }

    fn block(&mut self, report: ConflictReport) -> SessionOutcome<CommitPushView> {
        warn!(
            session = %self.core.id,
            category = %report.category,
            files = report.files.len(),
            "commit/push blocked by conflicts"
        );
        self.core.state = SessionState::Blocked;
        SessionOutcome::Blocked(report)
    }
}
