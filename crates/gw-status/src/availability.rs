//! Enable/disable decisions and placeholder selection.

use std::fmt;

use gw_types::StatusHandle;
use serde::Serialize;

use crate::action::ActionSets;
use crate::update::UpdateFileSet;

/// What an empty file list shows instead of files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placeholder {
    /// The list has entries; nothing to show in their place.
    #[default]
    None,
    NothingToUpdate,
    /// No file differs, but the repository head moved and a pull is needed.
    PullNeeded,
    NothingToPush,
    /// No file differs, but local history must still be pushed.
    PushNeeded,
}

impl Placeholder {
    /// Message key for the placeholder label.
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::NothingToUpdate => Some("team.noupdatefiles"),
            Self::PullNeeded => Some("team.pullNeeded"),
            Self::NothingToPush => Some("team.nopushfiles"),
            Self::PushNeeded => Some("team.pushNeeded"),
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::NothingToUpdate => "No files to update",
            Self::PullNeeded => "Pull needed to bring the project up to date",
            Self::NothingToPush => "No files to push",
            Self::PushNeeded => "Push needed to publish local history",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Enabled state of an action plus the placeholder its list shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub enabled: bool,
    pub placeholder: Placeholder,
}

/// Enable/disable rules for commit, push and update.
pub struct ActionAvailability;

impl ActionAvailability {
    /// Push is enabled if the handle says so or anything is outgoing.
    pub fn push(handle: &StatusHandle, remote: &ActionSets) -> Availability {
        let enabled = handle.push_needed || remote.has_outgoing();
        let placeholder = if !remote.push_list().is_empty() {
            Placeholder::None
        } else if enabled {
            Placeholder::PushNeeded
        } else {
            Placeholder::NothingToPush
        };
        Availability {
            enabled,
            placeholder,
        }
    }

    /// Commit needs something listed and a non-blank comment.
    pub fn commit(local: &ActionSets, include_layout: bool, comment: &str) -> bool {
        !local.commit_list(include_layout).is_empty() && !comment.trim().is_empty()
    }

    /// The include-layout toggle is offered only when a layout changed.
    pub fn layout_toggle(local: &ActionSets) -> bool {
        !local.changed_layout.is_empty()
    }

    /// Update is enabled if anything is listed or a pull is needed, and
    /// nothing conflicts.
    pub fn update(
        update: &UpdateFileSet,
        handle: &StatusHandle,
        include_layout: bool,
    ) -> Availability {
        if update.is_blocked() {
            return Availability {
                enabled: false,
                placeholder: Placeholder::None,
            };
        }
        if !update.visible_files(include_layout).is_empty() {
            return Availability {
                enabled: true,
                placeholder: Placeholder::None,
            };
        }
        if handle.pull_needed {
            Availability {
                enabled: true,
                placeholder: Placeholder::PullNeeded,
            }
        } else {
            Availability {
                enabled: false,
                placeholder: Placeholder::NothingToUpdate,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    use super::*;

    fn set(paths: &[&str]) -> BTreeSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn push_disabled_when_nothing_outgoing() {
        let push = ActionAvailability::push(&StatusHandle::default(), &ActionSets::new());
        assert!(!push.enabled);
        assert_eq!(push.placeholder, Placeholder::NothingToPush);
    }

    #[test]
    fn push_needed_without_file_changes() {
        let push = ActionAvailability::push(&StatusHandle::new(true, false), &ActionSets::new());
        assert!(push.enabled);
        assert_eq!(push.placeholder, Placeholder::PushNeeded);
    }

    #[test]
    fn push_enabled_by_any_outgoing_set() {
        let handle = StatusHandle::default();
        for sets in [
            ActionSets { to_commit: set(&["A.java"]), ..Default::default() },
            ActionSets { to_add: set(&["A.java"]), ..Default::default() },
            ActionSets { to_delete: set(&["A.java"]), ..Default::default() },
            ActionSets { modified_layout: set(&["d/package.bluej"]), ..Default::default() },
        ] {
            let push = ActionAvailability::push(&handle, &sets);
            assert!(push.enabled);
            assert_eq!(push.placeholder, Placeholder::None);
        }
    }

    #[test]
    fn commit_requires_files_and_comment() {
        let sets = ActionSets {
            modified_layout: set(&["d/package.bluej"]),
            ..Default::default()
        };
        assert!(!ActionAvailability::commit(&sets, false, "layout tweak"));
        assert!(ActionAvailability::commit(&sets, true, "layout tweak"));
        assert!(!ActionAvailability::commit(&sets, true, "   "));
    }

    #[test]
    fn scenario_c_pull_needed_placeholder() {
        let update = UpdateFileSet::default();
        let availability = ActionAvailability::update(&update, &StatusHandle::new(false, true), true);
        assert!(availability.enabled);
        assert_eq!(availability.placeholder, Placeholder::PullNeeded);

        let availability = ActionAvailability::update(&update, &StatusHandle::default(), true);
        assert!(!availability.enabled);
        assert_eq!(availability.placeholder, Placeholder::NothingToUpdate);
    }

    #[test]
    fn update_blocked_regardless_of_files() {
        let update = UpdateFileSet {
            files_to_update: set(&["A.java"]),
            conflicts: set(&["B.java"]),
            ..Default::default()
        };
        let availability = ActionAvailability::update(&update, &StatusHandle::new(false, true), true);
        assert!(!availability.enabled);
    }

    #[test]
    fn update_layout_only_depends_on_toggle() {
        let update = UpdateFileSet {
            modified_layout: set(&["d/package.bluej"]),
            ..Default::default()
        };
        let handle = StatusHandle::default();
        assert!(ActionAvailability::update(&update, &handle, true).enabled);
        let off = ActionAvailability::update(&update, &handle, false);
        assert!(!off.enabled);
        assert_eq!(off.placeholder, Placeholder::NothingToUpdate);
    }

    #[test]
    fn placeholder_keys() {
        assert_eq!(Placeholder::None.message_key(), None);
        assert_eq!(Placeholder::PullNeeded.message_key(), Some("team.pullNeeded"));
    }
}
