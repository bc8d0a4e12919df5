//! Requests handed to the component that performs repository commands.

use std::collections::BTreeSet;
use std::path::PathBuf;

use async_trait::async_trait;
use gw_types::StatusHandle;
use serde::{Deserialize, Serialize};

use crate::error::ExecutionFailure;

/// A commit of the local working copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    pub comment: String,
    /// Every file to commit, including new and deleted ones.
    pub files: BTreeSet<PathBuf>,
    pub new_files: BTreeSet<PathBuf>,
    pub deleted_files: BTreeSet<PathBuf>,
    /// Layout files included by the include-layout toggle.
    pub layout_files: BTreeSet<PathBuf>,
    pub handle: StatusHandle,
}

/// A push of local history to the shared repository.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRequest {
    /// Files the push publishes, for display and logging.
    pub files: BTreeSet<PathBuf>,
    pub handle: StatusHandle,
}

/// An update (pull) of the working copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub files: BTreeSet<PathBuf>,
    /// Layout files overwritten regardless of local edits.
    pub forced_files: BTreeSet<PathBuf>,
    pub handle: StatusHandle,
}

/// Performs commit, push and update commands.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn commit(&self, request: CommitRequest) -> Result<(), ExecutionFailure>;

    async fn push(&self, request: PushRequest) -> Result<(), ExecutionFailure>;

    async fn update(&self, request: UpdateRequest) -> Result<(), ExecutionFailure>;
}
