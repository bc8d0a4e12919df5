//! Acceptance filters.
//!
//! Filters are pure predicates over a record and a perspective. The engine
//! treats them as opaque: any `Fn(&FileStatusRecord, Perspective) -> bool`
//! works, and the default filters below encode the usual team-client rules.

use gw_types::{FileStatusRecord, Perspective, RepoStatus};

/// A pure predicate deciding whether a record is actionable.
pub trait StatusFilter: Send + Sync {
    fn accept(&self, record: &FileStatusRecord, perspective: Perspective) -> bool;
}

impl<F> StatusFilter for F
where
    F: Fn(&FileStatusRecord, Perspective) -> bool + Send + Sync,
{
    fn accept(&self, record: &FileStatusRecord, perspective: Perspective) -> bool {
        self(record, perspective)
    }
}

/// Acceptance for the update path, with the force-always rule for files
/// whose existence changes.
pub trait UpdateStatusFilter: StatusFilter {
    /// Returns `true` if the file must be updated regardless of the user's
    /// include-layout choice.
    fn update_always(&self, record: &FileStatusRecord, perspective: Perspective) -> bool;
}

/// Default commit acceptance.
///
/// Accepts local additions, deletions and modifications. A local deletion of
/// a file modified remotely is the user's resolution when seen locally, so it
/// is only accepted under [`Perspective::Local`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CommitFilter;

impl StatusFilter for CommitFilter {
    fn accept(&self, record: &FileStatusRecord, perspective: Perspective) -> bool {
        match record.status(perspective) {
            RepoStatus::NeedsAdd | RepoStatus::Deleted | RepoStatus::Modified => true,
            RepoStatus::LocalDeleteRemoteModifyConflict => perspective == Perspective::Local,
            _ => false,
        }
    }
}

/// Default update acceptance.
#[derive(Clone, Copy, Debug, Default)]
pub struct UpdateFilter;

impl StatusFilter for UpdateFilter {
    fn accept(&self, record: &FileStatusRecord, perspective: Perspective) -> bool {
        matches!(
            record.status(perspective),
            RepoStatus::NeedsCheckout
                | RepoStatus::NeedsUpdate
                | RepoStatus::Removed
                | RepoStatus::NeedsMerge
                | RepoStatus::LocalDeleteRemoteModifyConflict
        )
    }
}

impl UpdateStatusFilter for UpdateFilter {
    fn update_always(&self, record: &FileStatusRecord, perspective: Perspective) -> bool {
        matches!(
            record.status(perspective),
            RepoStatus::NeedsCheckout
                | RepoStatus::Removed
                | RepoStatus::LocalDeleteRemoteModifyConflict
        )
    }
}

/// Visibility filter for layout files on the update path.
///
/// Hides layout files by name, typically the legacy copy that is rewritten
/// whenever the current layout file is.
#[derive(Clone, Debug, Default)]
pub struct LayoutViewFilter {
    hidden: Vec<String>,
}

impl LayoutViewFilter {
    pub fn new(hidden: Vec<String>) -> Self {
        Self { hidden }
    }
}

impl StatusFilter for LayoutViewFilter {
    fn accept(&self, record: &FileStatusRecord, _perspective: Perspective) -> bool {
        let name = record.file_name();
        !self.hidden.iter().any(|hidden| *hidden == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(local: RepoStatus, remote: RepoStatus) -> FileStatusRecord {
        FileStatusRecord::new("src/A.java", local, remote)
    }

    #[test]
    fn commit_filter_reads_selected_perspective() {
        let record = rec(RepoStatus::Modified, RepoStatus::UpToDate);
        assert!(CommitFilter.accept(&record, Perspective::Local));
        assert!(!CommitFilter.accept(&record, Perspective::Remote));
    }

    #[test]
    fn commit_filter_rejects_conflicts() {
        for status in [
            RepoStatus::MergeConflict,
            RepoStatus::Unresolved,
            RepoStatus::ConflictAdd,
            RepoStatus::NeedsMerge,
            RepoStatus::UpToDate,
        ] {
            assert!(!CommitFilter.accept(&rec(status, status), Perspective::Local));
        }
    }

    #[test]
    fn local_delete_remote_modify_accepted_only_locally() {
        let status = RepoStatus::LocalDeleteRemoteModifyConflict;
        let record = rec(status, status);
        assert!(CommitFilter.accept(&record, Perspective::Local));
        assert!(!CommitFilter.accept(&record, Perspective::Remote));
    }

    #[test]
    fn update_filter_accepts_incoming_changes() {
        for status in [
            RepoStatus::NeedsCheckout,
            RepoStatus::NeedsUpdate,
            RepoStatus::Removed,
            RepoStatus::NeedsMerge,
        ] {
            assert!(UpdateFilter.accept(&rec(status, status), Perspective::Remote));
        }
        assert!(!UpdateFilter.accept(
            &rec(RepoStatus::Modified, RepoStatus::Modified),
            Perspective::Remote
        ));
    }

    #[test]
    fn update_always_only_for_existence_changes() {
        let checkout = rec(RepoStatus::NeedsCheckout, RepoStatus::NeedsCheckout);
        let update = rec(RepoStatus::NeedsUpdate, RepoStatus::NeedsUpdate);
        assert!(UpdateFilter.update_always(&checkout, Perspective::Remote));
        assert!(!UpdateFilter.update_always(&update, Perspective::Remote));
    }

    #[test]
    fn layout_view_filter_hides_by_name() {
        let filter = LayoutViewFilter::new(vec!["bluej.pkg".into()]);
        let hidden = FileStatusRecord::uniform("dir/bluej.pkg", RepoStatus::NeedsUpdate);
        let shown = FileStatusRecord::uniform("dir/package.bluej", RepoStatus::NeedsUpdate);
        assert!(!filter.accept(&hidden, Perspective::Remote));
        assert!(filter.accept(&shown, Perspective::Remote));
    }

    #[test]
    fn closures_are_filters() {
        let only_local = |_: &FileStatusRecord, p: Perspective| p == Perspective::Local;
        let record = rec(RepoStatus::UpToDate, RepoStatus::UpToDate);
        assert!(only_local.accept(&record, Perspective::Local));
        assert!(!only_local.accept(&record, Perspective::Remote));
    }
}
