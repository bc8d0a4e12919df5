//! Update (pull) classification.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use gw_types::{FileStatusRecord, Perspective, RepoStatus};
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::ClassifierConfig;
use crate::filter::{LayoutViewFilter, StatusFilter, UpdateFilter, UpdateStatusFilter};
use crate::layout::{parent_dir, LayoutMatcher};

/// Files an update would touch, and what blocks it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateFileSet {
    /// Non-layout files to update, after directory suppression.
    pub files_to_update: BTreeSet<PathBuf>,
    /// Files whose conflicts block the update.
    pub conflicts: BTreeSet<PathBuf>,
    /// Layout files updated only while the include-layout toggle is on.
    pub modified_layout: BTreeSet<PathBuf>,
    /// Layout files updated regardless of the toggle.
    pub forced_layout: BTreeSet<PathBuf>,
    /// The records behind `modified_layout`, for display.
    pub changed_layout: Vec<FileStatusRecord>,
    /// Records that matched no bucket.
    pub unchanged: Vec<PathBuf>,
}

impl UpdateFileSet {
    /// Returns `true` if unresolved conflicts block the update.
    pub fn is_blocked(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Files to force-update: the always-forced layout files, plus the
    /// toggle-gated ones while `include_layout` is on.
    pub fn forced_files(&self, include_layout: bool) -> BTreeSet<PathBuf> {
        let mut forced = self.forced_layout.clone();
        if include_layout {
            forced.extend(self.modified_layout.iter().cloned());
        }
        forced
    }

    /// Everything the update list shows for the given toggle state.
    pub fn visible_files(&self, include_layout: bool) -> BTreeSet<PathBuf> {
        let mut visible = self.files_to_update.clone();
        visible.extend(self.forced_files(include_layout));
        visible
    }

    /// Returns `true` if the include-layout toggle has anything to act on.
    pub fn layout_changed(&self) -> bool {
        !self.modified_layout.is_empty()
    }
}

/// Builds the update file set from status records.
#[derive(Clone)]
pub struct UpdateFileSetBuilder {
    filter: Arc<dyn UpdateStatusFilter>,
    view: Arc<dyn StatusFilter>,
    layout: LayoutMatcher,
    perspective: Perspective,
}

impl UpdateFileSetBuilder {
    pub fn new(
        filter: Arc<dyn UpdateStatusFilter>,
        view: Arc<dyn StatusFilter>,
        layout: LayoutMatcher,
        perspective: Perspective,
    ) -> Self {
        Self {
            filter,
            view,
            layout,
            perspective,
        }
    }

    /// A builder using the default update and visibility filters.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            Arc::new(UpdateFilter),
            Arc::new(LayoutViewFilter::new(config.hidden_layout_names.clone())),
            config.layout_matcher(),
            config.update_perspective(),
        )
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn build(&self, records: &[FileStatusRecord]) -> UpdateFileSet {
        let perspective = self.perspective;
        let mut set = UpdateFileSet::default();
        let mut candidates = BTreeSet::new();

        for record in records {
            let path = &record.path;
            let is_layout = self.layout.is_layout(record);

            if self.filter.accept(record, perspective) {
                if !is_layout {
                    candidates.insert(path.clone());
                } else if !self.view.accept(record, perspective) {
                    trace!(path = %path.display(), "hidden layout file ignored");
                    set.unchanged.push(path.clone());
                } else if self.filter.update_always(record, perspective) {
                    set.forced_layout.insert(path.clone());
                } else {
                    set.modified_layout.insert(path.clone());
                    set.changed_layout.push(record.clone());
                }
                continue;
            }

            let conflicting = matches!(
                record.status(perspective),
                RepoStatus::Unresolved
                    | RepoStatus::ConflictAdd
                    | RepoStatus::LocalModifyRemoteDeleteConflict
            );
            match (conflicting, is_layout) {
                (true, false) => {
                    set.conflicts.insert(path.clone());
                }
                // Layout conflicts cannot be resolved by the user here.
                (true, true) => {
                    set.forced_layout.insert(path.clone());
                }
                (false, _) => set.unchanged.push(path.clone()),
            }
        }

        // A directory added or removed as a whole supersedes its contents.
        let (kept, suppressed): (BTreeSet<PathBuf>, BTreeSet<PathBuf>) = candidates
            .iter()
            .cloned()
            .partition(|path| !candidates.contains(&parent_dir(path)));
        let (forced, forced_suppressed): (BTreeSet<PathBuf>, BTreeSet<PathBuf>) =
            std::mem::take(&mut set.forced_layout)
                .into_iter()
                .partition(|path| !candidates.contains(&parent_dir(path)));
        set.forced_layout = forced;
        set.files_to_update = kept;
        set.unchanged.extend(suppressed);
        set.unchanged.extend(forced_suppressed);

        debug!(
            %perspective,
            records = records.len(),
            update = set.files_to_update.len(),
            forced = set.forced_layout.len(),
            layout = set.modified_layout.len(),
            conflicts = set.conflicts.len(),
            "built update file set"
        );
        set
    }
}
