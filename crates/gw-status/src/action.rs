use std::collections::BTreeSet;
use std::path::PathBuf;

use gw_types::FileStatusRecord;
use serde::Serialize;

/// The action sets computed for one perspective.
///
/// Every record lands in exactly one primary bucket (`to_commit`,
/// `modified_layout`, or one of the four conflict sets) or in `unchanged`.
/// `to_add` and `to_delete` mark records that are also in a primary bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ActionSets {
    pub to_commit: BTreeSet<PathBuf>,
    pub to_add: BTreeSet<PathBuf>,
    pub to_delete: BTreeSet<PathBuf>,
    pub merge_conflicts: BTreeSet<PathBuf>,
    pub delete_conflicts: BTreeSet<PathBuf>,
    pub other_conflicts: BTreeSet<PathBuf>,
    pub needs_merge: BTreeSet<PathBuf>,
    /// Layout files whose change is optional, one per directory.
    pub modified_layout: BTreeSet<PathBuf>,
    /// The records behind `modified_layout`, for display.
    pub changed_layout: Vec<FileStatusRecord>,
    /// Records that matched no bucket (up to date, or not actionable here).
    pub unchanged: Vec<PathBuf>,
}

impl ActionSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if any conflict set is non-empty.
    pub fn has_conflicts(&self) -> bool {
        !self.merge_conflicts.is_empty()
            || !self.delete_conflicts.is_empty()
            || !self.other_conflicts.is_empty()
            || !self.needs_merge.is_empty()
    }

    /// Returns `true` if there is anything to push.
    pub fn has_outgoing(&self) -> bool {
        !self.to_commit.is_empty()
            || !self.to_add.is_empty()
            || !self.to_delete.is_empty()
            || !self.modified_layout.is_empty()
    }

    /// Files the user has staged one way or another: commit, add or delete.
    pub fn staged(&self) -> BTreeSet<PathBuf> {
        self.to_commit
            .iter()
            .chain(&self.to_add)
            .chain(&self.to_delete)
            .cloned()
            .collect()
    }

    /// Files listed for commit. Layout representatives are included only
    /// while the include-layout toggle is on.
    pub fn commit_list(&self, include_layout: bool) -> BTreeSet<PathBuf> {
        let mut list = self.staged();
        if include_layout {
            list.extend(self.modified_layout.iter().cloned());
        }
        list
    }

    /// Files listed for push; layout changes always travel with a push.
    pub fn push_list(&self) -> BTreeSet<PathBuf> {
        self.commit_list(true)
    }

    /// Layout files to hand to the committer when the toggle is on.
    pub fn layout_files(&self) -> Vec<PathBuf> {
        self.changed_layout.iter().map(|r| r.path.clone()).collect()
    }

    /// Total number of entries across the primary buckets.
    pub fn total_classified(&self) -> usize {
        self.to_commit.len()
            + self.modified_layout.len()
            + self.merge_conflicts.len()
            + self.delete_conflicts.len()
            + self.other_conflicts.len()
            + self.needs_merge.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paths: &[&str]) -> BTreeSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn empty_sets() {
        let sets = ActionSets::new();
        assert!(!sets.has_conflicts());
        assert!(!sets.has_outgoing());
        assert!(sets.staged().is_empty());
        assert_eq!(sets.total_classified(), 0);
    }

    #[test]
    fn commit_list_respects_layout_toggle() {
        let sets = ActionSets {
            to_commit: set(&["A.java"]),
            to_add: set(&["A.java"]),
            to_delete: set(&["Old.java"]),
            modified_layout: set(&["dir/package.bluej"]),
            ..Default::default()
        };
        assert_eq!(sets.commit_list(false), set(&["A.java", "Old.java"]));
        assert_eq!(
            sets.commit_list(true),
            set(&["A.java", "Old.java", "dir/package.bluej"])
        );
        assert_eq!(sets.push_list(), sets.commit_list(true));
    }

    #[test]
    fn needs_merge_counts_as_conflict() {
        let sets = ActionSets {
            needs_merge: set(&["B.java"]),
            ..Default::default()
        };
        assert!(sets.has_conflicts());
        assert!(!sets.has_outgoing());
    }
}
