use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::status::{Perspective, RepoStatus};

/// Per-file status produced by a repository status query.
///
/// Records are immutable once produced: classification reads them, it never
/// edits them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileStatusRecord {
    /// Path of the file, relative to the project root.
    pub path: PathBuf,
    /// Working copy against the last synchronised state.
    pub local: RepoStatus,
    /// Working copy against the repository head.
    pub remote: RepoStatus,
}

impl FileStatusRecord {
    pub fn new(path: impl Into<PathBuf>, local: RepoStatus, remote: RepoStatus) -> Self {
        Self {
            path: path.into(),
            local,
            remote,
        }
    }

    /// A record whose local and remote statuses agree.
    pub fn uniform(path: impl Into<PathBuf>, status: RepoStatus) -> Self {
        Self::new(path, status, status)
    }

    /// The status field selected by `perspective`.
    pub fn status(&self, perspective: Perspective) -> RepoStatus {
        match perspective {
            Perspective::Local => self.local,
            Perspective::Remote => self.remote,
        }
    }

    /// The directory containing this file, if any.
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// The bare file name, as shown in conflict listings.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Terminal token of a status query.
///
/// Carries whether a push or pull is needed even when no individual file
/// differs (a fast-forward or a merge commit waiting to be pushed), plus an
/// opaque token the repository layer uses to resume from this query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHandle {
    #[serde(default)]
    pub push_needed: bool,
    #[serde(default)]
    pub pull_needed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_token: Option<String>,
}

impl StatusHandle {
    pub fn new(push_needed: bool, pull_needed: bool) -> Self {
        Self {
            push_needed,
            pull_needed,
            resume_token: None,
        }
    }

    /// Attach an opaque resume token.
    pub fn with_resume_token(mut self, token: impl Into<String>) -> Self {
        self.resume_token = Some(token.into());
        self
    }
}

/// A completed status query: every record plus the terminal handle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub records: Vec<FileStatusRecord>,
    #[serde(default)]
    pub handle: StatusHandle,
}

impl StatusSnapshot {
    pub fn new(records: Vec<FileStatusRecord>, handle: StatusHandle) -> Self {
        Self { records, handle }
    }

    /// Parse a snapshot from JSON, rejecting records with empty paths.
    pub fn from_json(json: &str) -> TypeResult<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| TypeError::Serialization(e.to_string()))?;
        if let Some(bad) = snapshot
            .records
            .iter()
            .find(|record| record.path.as_os_str().is_empty())
        {
            return Err(TypeError::InvalidPath(format!("{:?}", bad.path)));
        }
        Ok(snapshot)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> TypeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_selects_field_by_perspective() {
        let record = FileStatusRecord::new("src/A.java", RepoStatus::Modified, RepoStatus::NeedsMerge);
        assert_eq!(record.status(Perspective::Local), RepoStatus::Modified);
        assert_eq!(record.status(Perspective::Remote), RepoStatus::NeedsMerge);
    }

    #[test]
    fn file_name_and_parent() {
        let record = FileStatusRecord::uniform("pkg/sub/B.java", RepoStatus::Modified);
        assert_eq!(record.file_name(), "B.java");
        assert_eq!(record.parent(), Some(Path::new("pkg/sub")));
    }

    #[test]
    fn snapshot_from_json() {
        let json = r#"{
            "records": [
                {"path": "A.java", "local": "needs-add", "remote": "needs-add"},
                {"path": "dir/package.bluej", "local": "modified", "remote": "up-to-date"}
            ],
            "handle": {"push_needed": true}
        }"#;
        let snapshot = StatusSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[1].remote, RepoStatus::UpToDate);
        assert!(snapshot.handle.push_needed);
        assert!(!snapshot.handle.pull_needed);
        assert!(snapshot.handle.resume_token.is_none());
    }

    #[test]
    fn snapshot_rejects_unknown_status() {
        let json = r#"{"records": [{"path": "A.java", "local": "weird", "remote": "up-to-date"}]}"#;
        assert!(matches!(
            StatusSnapshot::from_json(json),
            Err(TypeError::Serialization(_))
        ));
    }

    #[test]
    fn snapshot_rejects_empty_path() {
        let json = r#"{"records": [{"path": "", "local": "modified", "remote": "modified"}]}"#;
        assert!(matches!(
            StatusSnapshot::from_json(json),
            Err(TypeError::InvalidPath(_))
        ));
    }

    #[test]
    fn handle_resume_token() {
        let handle = StatusHandle::new(false, true).with_resume_token("abc123");
        assert!(handle.pull_needed);
        assert_eq!(handle.resume_token.as_deref(), Some("abc123"));
    }
}
