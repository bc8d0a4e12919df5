//! Package layout files and their per-directory deduplication.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gw_types::FileStatusRecord;

/// Recognises layout files by name.
///
/// A pattern is either an exact file name (`package.bluej`) or a `*suffix`
/// wildcard (`*.bluej`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutMatcher {
    patterns: Vec<String>,
}

impl LayoutMatcher {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Returns `true` if `name` matches any pattern.
    pub fn matches_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| match pattern.strip_prefix('*') {
            Some(suffix) => name.ends_with(suffix),
            None => pattern == name,
        })
    }

    /// Returns `true` if the record's file is a layout file.
    pub fn is_layout(&self, record: &FileStatusRecord) -> bool {
        self.matches_name(&record.file_name())
    }
}

/// Per-directory layout state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutSlot {
    /// One layout status seen; it is the directory's representative.
    FirstSeen { representative: PathBuf },
    /// Further statuses arrived for the directory and were escalated.
    Escalated {
        representative: PathBuf,
        escalated: usize,
    },
}

impl LayoutSlot {
    pub fn representative(&self) -> &Path {
        match self {
            Self::FirstSeen { representative } | Self::Escalated { representative, .. } => {
                representative
            }
        }
    }
}

/// What to do with a layout status offered to the aggregator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutDecision {
    /// First for its directory: surface it as an optional layout change.
    Representative,
    /// The directory already has a representative: commit unconditionally.
    Escalate,
}

/// Folds layout statuses so at most one representative surfaces per
/// directory.
#[derive(Clone, Debug, Default)]
pub struct LayoutAggregator {
    slots: BTreeMap<PathBuf, LayoutSlot>,
}

impl LayoutAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a layout file path and advance its directory's state.
    pub fn offer(&mut self, path: &Path) -> LayoutDecision {
        let dir = parent_dir(path);
        match self.slots.get_mut(&dir) {
            None => {
                self.slots.insert(
                    dir,
                    LayoutSlot::FirstSeen {
                        representative: path.to_path_buf(),
                    },
                );
                LayoutDecision::Representative
            }
            Some(slot) => {
                *slot = match slot {
                    LayoutSlot::FirstSeen { representative } => LayoutSlot::Escalated {
                        representative: std::mem::take(representative),
                        escalated: 1,
                    },
                    LayoutSlot::Escalated {
                        representative,
                        escalated,
                    } => LayoutSlot::Escalated {
                        representative: std::mem::take(representative),
                        escalated: *escalated + 1,
                    },
                };
                LayoutDecision::Escalate
            }
        }
    }

    /// State of a directory, if any layout file was offered for it.
    pub fn slot(&self, dir: &Path) -> Option<&LayoutSlot> {
        self.slots.get(dir)
    }

    /// Number of directories tracked.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Directory key for a file; files at the root share the empty path.
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
