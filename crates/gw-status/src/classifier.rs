//! Commit/push classification.

use std::sync::Arc;

use gw_types::{FileStatusRecord, Perspective, RepoStatus};
use tracing::{debug, trace};

use crate::action::ActionSets;
use crate::config::ClassifierConfig;
use crate::filter::{CommitFilter, StatusFilter};
use crate::layout::{LayoutAggregator, LayoutDecision, LayoutMatcher};

/// Partitions status records into action sets for one perspective.
#[derive(Clone)]
pub struct StatusClassifier {
    filter: Arc<dyn StatusFilter>,
    layout: LayoutMatcher,
}

impl StatusClassifier {
    pub fn new(filter: Arc<dyn StatusFilter>, layout: LayoutMatcher) -> Self {
        Self { filter, layout }
    }

    /// A classifier using [`CommitFilter`] and the configured layout names.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(Arc::new(CommitFilter), config.layout_matcher())
    }

    pub fn layout_matcher(&self) -> &LayoutMatcher {
        &self.layout
    }

    /// Classify `records` under `perspective`.
    ///
    /// Pure: the same records always produce the same sets.
    pub fn classify(&self, records: &[FileStatusRecord], perspective: Perspective) -> ActionSets {
        let mut sets = ActionSets::new();
        let mut layouts = LayoutAggregator::new();

        for record in records {
            let path = &record.path;
            let is_layout = self.layout.is_layout(record);
            let status = record.status(perspective);

            if self.filter.accept(record, perspective) {
                if !is_layout || status.changes_existence() {
                    sets.to_commit.insert(path.clone());
                } else {
                    match layouts.offer(path) {
                        LayoutDecision::Representative => {
                            sets.modified_layout.insert(path.clone());
                            sets.changed_layout.push(record.clone());
                        }
                        LayoutDecision::Escalate => {
                            trace!(path = %path.display(), "layout file escalated to commit");
                            sets.to_commit.insert(path.clone());
                        }
                    }
                }

                if status == RepoStatus::NeedsAdd {
                    sets.to_add.insert(path.clone());
                } else if status.is_removal() {
                    sets.to_delete.insert(path.clone());
                }
                continue;
            }

            if is_layout {
                sets.unchanged.push(path.clone());
                continue;
            }

            let bucket = match status {
                RepoStatus::MergeConflict => Some(&mut sets.merge_conflicts),
                RepoStatus::Unresolved
                | RepoStatus::ConflictAdd
                | RepoStatus::LocalModifyRemoteDeleteConflict
                | RepoStatus::DeleteConflict => Some(&mut sets.delete_conflicts),
                RepoStatus::LocalDeleteRemoteModifyConflict => Some(&mut sets.other_conflicts),
                RepoStatus::NeedsMerge => Some(&mut sets.needs_merge),
                RepoStatus::UpToDate
                | RepoStatus::NeedsAdd
                | RepoStatus::Deleted
                | RepoStatus::Modified
                | RepoStatus::NeedsCheckout
                | RepoStatus::NeedsUpdate
                | RepoStatus::Removed => None,
            };
            match bucket {
                Some(bucket) => {
                    trace!(path = %path.display(), %status, "conflict");
                    bucket.insert(path.clone());
                }
                None => sets.unchanged.push(path.clone()),
            }
        }

        debug!(
            %perspective,
            records = records.len(),
            commit = sets.to_commit.len(),
            add = sets.to_add.len(),
            delete = sets.to_delete.len(),
            layout = sets.modified_layout.len(),
            conflicts = sets.has_conflicts(),
            "classified status records"
        );
        sets
    }
}
