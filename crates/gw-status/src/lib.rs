//! Status classification engine.
//!
//! Turns the flat list of per-file status records returned by a repository
//! status query into the sets a commit, push or update acts on, and decides
//! whether that action is currently allowed.
//!
//! Everything in this crate is synchronous and pure: the same records and
//! configuration always produce the same sets.
//!
//! # Quick Start
//!
//! ```rust
//! use gw_status::{ClassifierConfig, StatusClassifier};
//! use gw_types::{FileStatusRecord, Perspective, RepoStatus};
//!
//! let classifier = StatusClassifier::from_config(&ClassifierConfig::default());
//! let records = vec![FileStatusRecord::uniform("src/Main.java", RepoStatus::NeedsAdd)];
//! let sets = classifier.classify(&records, Perspective::Local);
//! assert!(sets.to_add.contains(std::path::Path::new("src/Main.java")));
//! ```

pub mod action;
pub mod availability;
pub mod classifier;
pub mod config;
pub mod conflict;
pub mod error;
pub mod filter;
pub mod layout;
pub mod update;

pub use action::ActionSets;
pub use availability::{ActionAvailability, Availability, Placeholder};
pub use classifier::StatusClassifier;
pub use config::ClassifierConfig;
pub use conflict::{
    ConflictCategory, ConflictReport, ConflictResolver, ConflictSets, PushResolution,
    MORE_FILES_MARKER,
};
pub use error::{StatusError, StatusResult};
pub use filter::{CommitFilter, LayoutViewFilter, StatusFilter, UpdateFilter, UpdateStatusFilter};
pub use layout::{LayoutAggregator, LayoutDecision, LayoutMatcher, LayoutSlot};
pub use update::{UpdateFileSet, UpdateFileSetBuilder};
