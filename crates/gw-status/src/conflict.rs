//! Conflict blocking, the push override, and conflict reports.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::action::ActionSets;
use crate::config::DEFAULT_CONFLICT_LIST_LIMIT;

/// Trailing line shown when a conflict listing is cut short.
pub const MORE_FILES_MARKER: &str = "(and more - check status)";

/// Which conflict dialog to present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictCategory {
    /// Files with merge conflicts; resolve them first.
    MergeConflicts,
    /// Files deleted on one side and changed on the other.
    DeleteConflicts,
    /// Files deleted locally but modified remotely; update first.
    UpdateFirst,
    /// A conflict was detected but none of the listable kinds remain.
    UpToDateCheckFailed,
    /// The update path found unresolved conflicts.
    UnresolvedConflicts,
}

impl ConflictCategory {
    /// Message key of the dialog presenting this category.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::MergeConflicts => "team-resolve-merge-conflicts",
            Self::DeleteConflicts => "team-resolve-conflicts-delete",
            Self::UpdateFirst => "team-update-first",
            Self::UpToDateCheckFailed => "team-uptodate-failed",
            Self::UnresolvedConflicts => "team-unresolved-conflicts",
        }
    }

    /// Short human-readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::MergeConflicts => "files have merge conflicts that must be resolved",
            Self::DeleteConflicts => {
                "files were deleted on one side and changed on the other; resolve by deleting the local copy"
            }
            Self::UpdateFirst => "files deleted locally were modified in the repository; update first",
            Self::UpToDateCheckFailed => "the project is not up to date with the repository",
            Self::UnresolvedConflicts => "files have unresolved conflicts; resolve them before updating",
        }
    }
}

impl fmt::Display for ConflictCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message_key())
    }
}

/// A conflict dialog: category plus a capped list of file names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub category: ConflictCategory,
    /// File names (not paths), at most the configured limit.
    pub files: Vec<String>,
    /// `true` if more files conflicted than are listed.
    pub elided: bool,
}

impl ConflictReport {
    /// Build a report listing at most `limit` names from `paths`.
    pub fn listing(category: ConflictCategory, paths: &BTreeSet<PathBuf>, limit: usize) -> Self {
        let files = paths
            .iter()
            .take(limit)
            .map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string_lossy().into_owned())
            })
            .collect();
        Self {
            category,
            files,
            elided: paths.len() > limit,
        }
    }

    /// A report with no file list.
    pub fn bare(category: ConflictCategory) -> Self {
        Self {
            category,
            files: Vec::new(),
            elided: false,
        }
    }

    /// The file list as shown in the dialog: one indented name per line,
    /// followed by the elision marker if the list was cut short.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for name in &self.files {
            text.push_str("    ");
            text.push_str(name);
            text.push('\n');
        }
        if self.elided {
            text.push_str("    ");
            text.push_str(MORE_FILES_MARKER);
        }
        text
    }
}

/// The four conflict sets of one perspective.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConflictSets {
    pub merge: BTreeSet<PathBuf>,
    pub delete: BTreeSet<PathBuf>,
    pub other: BTreeSet<PathBuf>,
    pub needs_merge: BTreeSet<PathBuf>,
}

impl ConflictSets {
    pub fn from_sets(sets: &ActionSets) -> Self {
        Self {
            merge: sets.merge_conflicts.clone(),
            delete: sets.delete_conflicts.clone(),
            other: sets.other_conflicts.clone(),
            needs_merge: sets.needs_merge.clone(),
        }
    }

    /// Returns `true` if any set is non-empty.
    pub fn is_blocking(&self) -> bool {
        !self.merge.is_empty()
            || !self.delete.is_empty()
            || !self.other.is_empty()
            || !self.needs_merge.is_empty()
    }

    /// Each set minus `resolved`.
    pub fn without(&self, resolved: &BTreeSet<PathBuf>) -> Self {
        let minus = |set: &BTreeSet<PathBuf>| -> BTreeSet<PathBuf> {
            set.difference(resolved).cloned().collect()
        };
        Self {
            merge: minus(&self.merge),
            delete: minus(&self.delete),
            other: minus(&self.other),
            needs_merge: minus(&self.needs_merge),
        }
    }

    /// Write these sets back into `sets`, replacing its conflict sets.
    pub fn apply_to(self, sets: &mut ActionSets) {
        sets.merge_conflicts = self.merge;
        sets.delete_conflicts = self.delete;
        sets.other_conflicts = self.other;
        sets.needs_merge = self.needs_merge;
    }
}

/// Outcome of the push-side conflict check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushResolution {
    /// Remote conflicts left after removing files the user already staged.
    pub remaining: ConflictSets,
    /// Files whose remote conflict was overridden by a local resolution.
    pub overridden: BTreeSet<PathBuf>,
    /// Present if the push is still blocked.
    pub report: Option<ConflictReport>,
}

/// Decides whether conflicts block an action and builds the report.
#[derive(Clone, Copy, Debug)]
pub struct ConflictResolver {
    limit: usize,
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONFLICT_LIST_LIMIT)
    }
}

impl ConflictResolver {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Pick the dialog for blocking conflict sets.
    ///
    /// Priority: merge > delete > other. If only needs-merge files remain the
    /// generic up-to-date fallback is used.
    pub fn report(&self, sets: &ConflictSets) -> ConflictReport {
        if !sets.merge.is_empty() {
            ConflictReport::listing(ConflictCategory::MergeConflicts, &sets.merge, self.limit)
        } else if !sets.delete.is_empty() {
            ConflictReport::listing(ConflictCategory::DeleteConflicts, &sets.delete, self.limit)
        } else if !sets.other.is_empty() {
            ConflictReport::listing(ConflictCategory::UpdateFirst, &sets.other, self.limit)
        } else {
            ConflictReport::bare(ConflictCategory::UpToDateCheckFailed)
        }
    }

    /// Conflicts in the local view block the whole commit/push session.
    pub fn check_local(&self, local: &ActionSets) -> Option<ConflictReport> {
        let sets = ConflictSets::from_sets(local);
        sets.is_blocking().then(|| self.report(&sets))
    }

    /// Remote conflicts, overridden for files the user has already staged
    /// locally for commit, add or delete.
    pub fn resolve_push(&self, local: &ActionSets, remote: &ActionSets) -> PushResolution {
        let conflicts = ConflictSets::from_sets(remote);
        let staged = local.staged();
        let remaining = conflicts.without(&staged);

        let overridden: BTreeSet<PathBuf> = [
            &conflicts.merge,
            &conflicts.delete,
            &conflicts.other,
            &conflicts.needs_merge,
        ]
        .into_iter()
        .flatten()
        .filter(|path| staged.contains(*path))
        .cloned()
        .collect();
        if !overridden.is_empty() {
            debug!(files = overridden.len(), "remote conflicts resolved by local changes");
        }

        let report = remaining.is_blocking().then(|| self.report(&remaining));
        PushResolution {
            remaining,
            overridden,
            report,
        }
    }

    /// Update conflicts always block; there is no override path.
    pub fn check_update(&self, conflicts: &BTreeSet<PathBuf>) -> Option<ConflictReport> {
        (!conflicts.is_empty()).then(|| {
            ConflictReport::listing(ConflictCategory::UnresolvedConflicts, conflicts, self.limit)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paths: &[&str]) -> BTreeSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn merge_conflicts_take_priority() {
        let sets = ConflictSets {
            merge: set(&["M.java"]),
            delete: set(&["D.java"]),
            ..Default::default()
        };
        let report = ConflictResolver::default().report(&sets);
        assert_eq!(report.category, ConflictCategory::MergeConflicts);
        assert_eq!(report.files, vec!["M.java".to_string()]);
    }

    #[test]
    fn delete_before_other() {
        let sets = ConflictSets {
            delete: set(&["D.java"]),
            other: set(&["O.java"]),
            ..Default::default()
        };
        let report = ConflictResolver::default().report(&sets);
        assert_eq!(report.category, ConflictCategory::DeleteConflicts);

        let sets = ConflictSets {
            other: set(&["O.java"]),
            ..Default::default()
        };
        let report = ConflictResolver::default().report(&sets);
        assert_eq!(report.category, ConflictCategory::UpdateFirst);
        assert_eq!(report.category.message_key(), "team-update-first");
    }

    #[test]
    fn needs_merge_alone_falls_back() {
        let sets = ConflictSets {
            needs_merge: set(&["N.java"]),
            ..Default::default()
        };
        let report = ConflictResolver::default().report(&sets);
        assert_eq!(report, ConflictReport::bare(ConflictCategory::UpToDateCheckFailed));
    }

    #[test]
    fn scenario_b_listing_caps_at_ten() {
        let paths: BTreeSet<PathBuf> = (0..11).map(|i| PathBuf::from(format!("src/F{i:02}.java"))).collect();
        let report = ConflictReport::listing(ConflictCategory::MergeConflicts, &paths, 10);
        assert_eq!(report.files.len(), 10);
        assert!(report.elided);

        let rendered = report.render();
        assert_eq!(rendered.lines().count(), 11);
        assert_eq!(rendered.matches(MORE_FILES_MARKER).count(), 1);
        assert!(rendered.starts_with("    F00.java\n"));
    }

    #[test]
    fn exactly_ten_files_not_elided() {
        let paths: BTreeSet<PathBuf> = (0..10).map(|i| PathBuf::from(format!("F{i}.java"))).collect();
        let report = ConflictReport::listing(ConflictCategory::DeleteConflicts, &paths, 10);
        assert_eq!(report.files.len(), 10);
        assert!(!report.elided);
        assert!(!report.render().contains(MORE_FILES_MARKER));
    }

    #[test]
    fn override_removes_locally_staged_files() {
        let local = ActionSets {
            to_commit: set(&["Fixed.java"]),
            to_delete: set(&["Removed.java"]),
            ..Default::default()
        };
        let remote = ActionSets {
            merge_conflicts: set(&["Fixed.java"]),
            other_conflicts: set(&["Removed.java"]),
            ..Default::default()
        };
        let resolution = ConflictResolver::default().resolve_push(&local, &remote);
        assert!(!resolution.remaining.is_blocking());
        assert_eq!(resolution.overridden, set(&["Fixed.java", "Removed.java"]));
        assert!(resolution.report.is_none());
    }

    #[test]
    fn override_keeps_unstaged_conflicts() {
        let local = ActionSets {
            to_add: set(&["New.java"]),
            ..Default::default()
        };
        let remote = ActionSets {
            merge_conflicts: set(&["New.java"]),
            delete_conflicts: set(&["Other.java"]),
            ..Default::default()
        };
        let resolution = ConflictResolver::default().resolve_push(&local, &remote);
        assert!(resolution.remaining.merge.is_empty());
        assert_eq!(resolution.remaining.delete, set(&["Other.java"]));
        let report = resolution.report.unwrap();
        assert_eq!(report.category, ConflictCategory::DeleteConflicts);
    }

    #[test]
    fn update_conflicts_always_block() {
        let resolver = ConflictResolver::new(2);
        assert!(resolver.check_update(&BTreeSet::new()).is_none());
        let report = resolver.check_update(&set(&["a/A.java", "b/B.java", "c/C.java"])).unwrap();
        assert_eq!(report.category, ConflictCategory::UnresolvedConflicts);
        assert_eq!(report.files, vec!["A.java".to_string(), "B.java".to_string()]);
        assert!(report.elided);
    }

    #[test]
    fn check_local_blocks_on_needs_merge() {
        let local = ActionSets {
            needs_merge: set(&["N.java"]),
            ..Default::default()
        };
        let report = ConflictResolver::default().check_local(&local).unwrap();
        assert_eq!(report.category, ConflictCategory::UpToDateCheckFailed);
        assert!(ConflictResolver::default().check_local(&ActionSets::new()).is_none());
    }
}
