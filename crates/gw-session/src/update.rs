//! The update session.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use gw_status::{
    ActionAvailability, Availability, ClassifierConfig, ConflictReport, ConflictResolver,
    UpdateFileSet, UpdateFileSetBuilder,
};
use gw_types::{SessionId, StatusHandle};
use serde::Serialize;
use tracing::{info, warn};

use crate::cancel::AbortHandle;
use crate::error::{SessionError, SessionResult};
use crate::executor::{ActionExecutor, UpdateRequest};
use crate::prefs::TeamPrefs;
use crate::query::{QueryPurpose, StatusQuery};
use crate::session::{Gated, SessionCore};
use crate::state::{ActionOutcome, SessionOutcome, SessionState};

/// Immutable result of an update classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpdateView {
    pub session: SessionId,
    pub files: UpdateFileSet,
    pub handle: StatusHandle,
    pub include_layout: bool,
    pub layout_toggle: bool,
    /// Layout files overwritten by the update for the current toggle.
    pub forced_files: BTreeSet<PathBuf>,
    /// Everything the update list shows for the current toggle.
    pub visible_files: BTreeSet<PathBuf>,
    pub update: Availability,
}

impl UpdateView {
    fn new(session: SessionId, files: UpdateFileSet, handle: StatusHandle, include_layout: bool) -> Self {
        Self {
            session,
            layout_toggle: files.layout_changed(),
            forced_files: files.forced_files(include_layout),
            visible_files: files.visible_files(include_layout),
            update: ActionAvailability::update(&files, &handle, include_layout),
            files,
            handle,
            include_layout,
        }
    }

    pub fn with_include_layout(&self, include_layout: bool) -> Self {
        Self::new(
            self.session,
            self.files.clone(),
            self.handle.clone(),
            include_layout,
        )
    }
}

/// Classifies status for an update, then runs it.
pub struct UpdateSession {
    core: SessionCore,
    builder: UpdateFileSetBuilder,
    resolver: ConflictResolver,
    view: Option<UpdateView>,
}

impl UpdateSession {
    pub fn new(
        query: Arc<dyn StatusQuery>,
        executor: Arc<dyn ActionExecutor>,
        config: &ClassifierConfig,
        prefs: TeamPrefs,
    ) -> SessionResult<Self> {
        config.validate()?;
        Ok(Self {
            core: SessionCore::new(query, executor, prefs),
            builder: UpdateFileSetBuilder::from_config(config),
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

    pub fn view(&self) -> Option<&UpdateView> {
        self.view.as_ref()
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.core.abort_handle()
    }

    /// Query the repository and build the update plan. Any unresolved
    /// conflict blocks the update.
    pub async fn open(&mut self) -> SessionResult<SessionOutcome<UpdateView>> {
        self.view = None;
        let snapshot = match self.core.query(QueryPurpose::Update).await? {
            Gated::Completed(snapshot) => snapshot,
            Gated::Aborted => return Ok(SessionOutcome::Aborted),
        };

        let files = self.builder.build(&snapshot.records);
        if let Some(report) = self.resolver.check_update(&files.conflicts) {
            return Ok(self.block(report));
        }

        let view = UpdateView::new(
            self.core.id,
            files,
            snapshot.handle,
            self.core.prefs.include_layout,
        );
        self.core.state = SessionState::Ready;
        info!(
            session = %self.core.id,
            perspective = %self.builder.perspective(),
            files = view.visible_files.len(),
            forced = view.forced_files.len(),
            enabled = view.update.enabled,
            "update session ready"
        );
        self.view = Some(view.clone());
        Ok(SessionOutcome::Ready(view))
    }

    /// Flip the include-layout toggle; forced files, enablement and the
    /// placeholder are recomputed from the held sets.
    pub fn set_include_layout(&mut self, include_layout: bool) -> SessionResult<UpdateView> {
        let view = self.ready_view()?.with_include_layout(include_layout);
        self.core.prefs.include_layout = include_layout;
        self.view = Some(view.clone());
        Ok(view)
    }

    pub async fn update(&mut self) -> SessionResult<ActionOutcome> {
        let view = self.ready_view()?;
        if !view.update.enabled {
            return Err(SessionError::Unavailable { action: "update" });
        }
        let request = UpdateRequest {
            files: view.files.files_to_update.clone(),
            forced_files: view.forced_files.clone(),
            handle: view.handle.clone(),
        };
        let executor = self.core.executor();
        let outcome = self
            .core
            .execute("update", async move { executor.update(request).await })
            .await;
        self.view = None;
        outcome
    }

    fn ready_view(&self) -> SessionResult<&UpdateView> {
        self.core.require(SessionState::Ready)?;
        self.view.as_ref().ok_or(SessionError::InvalidState {
            expected: SessionState::Ready,
            actual: SessionState::Idle,
        })
    }

    fn block(&mut self, report: ConflictReport) -> SessionOutcome<UpdateView> {
        warn!(
            session = %self.core.id,
            files = report.files.len(),
            "update blocked by unresolved conflicts"
        );
        self.core.state = SessionState::Blocked;
        SessionOutcome::Blocked(report)
    }
}
