use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Status of a single file as reported by one side of a status query.
///
/// A record carries two of these: the local status (working copy against the
/// last synchronised state) and the remote status (working copy against the
/// repository head).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepoStatus {
    /// Nothing to do.
    UpToDate,
    /// New locally, not yet in the repository.
    NeedsAdd,
    /// Deleted locally, still in the repository.
    Deleted,
    /// Modified locally.
    Modified,
    /// New in the repository, absent locally.
    NeedsCheckout,
    /// Modified in the repository.
    NeedsUpdate,
    /// Removed from the repository.
    Removed,
    /// Modified on both sides; needs a merge before commit.
    NeedsMerge,
    /// A merge left conflict markers in the file.
    MergeConflict,
    /// Deleted on one side and changed on the other.
    DeleteConflict,
    /// Added on both sides with different content.
    ConflictAdd,
    /// Modified locally, removed in the repository.
    LocalModifyRemoteDeleteConflict,
    /// Deleted locally, modified in the repository.
    LocalDeleteRemoteModifyConflict,
    /// A previous conflict has not been marked resolved.
    Unresolved,
}

impl RepoStatus {
    /// Every status, in declaration order.
    pub const ALL: [RepoStatus; 14] = [
        Self::UpToDate,
        Self::NeedsAdd,
        Self::Deleted,
        Self::Modified,
        Self::NeedsCheckout,
        Self::NeedsUpdate,
        Self::Removed,
        Self::NeedsMerge,
        Self::MergeConflict,
        Self::DeleteConflict,
        Self::ConflictAdd,
        Self::LocalModifyRemoteDeleteConflict,
        Self::LocalDeleteRemoteModifyConflict,
        Self::Unresolved,
    ];

    /// The kebab-case name used in snapshots and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpToDate => "up-to-date",
            Self::NeedsAdd => "needs-add",
            Self::Deleted => "deleted",
            Self::Modified => "modified",
            Self::NeedsCheckout => "needs-checkout",
            Self::NeedsUpdate => "needs-update",
            Self::Removed => "removed",
            Self::NeedsMerge => "needs-merge",
            Self::MergeConflict => "merge-conflict",
            Self::DeleteConflict => "delete-conflict",
            Self::ConflictAdd => "conflict-add",
            Self::LocalModifyRemoteDeleteConflict => "local-modify-remote-delete-conflict",
            Self::LocalDeleteRemoteModifyConflict => "local-delete-remote-modify-conflict",
            Self::Unresolved => "unresolved",
        }
    }

    /// Returns `true` if a commit with this status creates or removes the file.
    pub fn changes_existence(&self) -> bool {
        matches!(
            self,
            Self::NeedsAdd | Self::Deleted | Self::LocalDeleteRemoteModifyConflict
        )
    }

    /// Returns `true` if the file must be removed from the repository on commit.
    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Deleted | Self::LocalDeleteRemoteModifyConflict)
    }
}

impl fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepoStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}

/// Which status field drives classification.
///
/// The same record list classifies differently depending on the perspective:
/// the commit view reads the local field, the push view the remote one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Perspective {
    /// Working copy against the last synchronised state.
    Local,
    /// Working copy against the repository head.
    Remote,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Perspective {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(TypeError::UnknownPerspective(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_parses_from_its_name() {
        for status in RepoStatus::ALL {
            assert_eq!(status.as_str().parse::<RepoStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_fails_loudly() {
        let err = "needs-coffee".parse::<RepoStatus>().unwrap_err();
        assert_eq!(err, TypeError::UnknownStatus("needs-coffee".into()));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&RepoStatus::LocalDeleteRemoteModifyConflict).unwrap();
        assert_eq!(json, "\"local-delete-remote-modify-conflict\"");
        let parsed: RepoStatus = serde_json::from_str("\"needs-add\"").unwrap();
        assert_eq!(parsed, RepoStatus::NeedsAdd);
    }

    #[test]
    fn serde_rejects_unknown_status() {
        assert!(serde_json::from_str::<RepoStatus>("\"weird\"").is_err());
    }

    #[test]
    fn existence_changes() {
        assert!(RepoStatus::NeedsAdd.changes_existence());
        assert!(RepoStatus::Deleted.changes_existence());
        assert!(RepoStatus::LocalDeleteRemoteModifyConflict.changes_existence());
        assert!(!RepoStatus::Modified.changes_existence());
        assert!(!RepoStatus::NeedsAdd.is_removal());
        assert!(RepoStatus::Deleted.is_removal());
    }

    #[test]
    fn perspective_parse_and_display() {
        assert_eq!("local".parse::<Perspective>().unwrap(), Perspective::Local);
        assert_eq!(Perspective::Remote.to_string(), "remote");
        assert!("sideways".parse::<Perspective>().is_err());
    }
}
