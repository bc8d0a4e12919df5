use gw_types::Perspective;
use serde::{Deserialize, Serialize};

use crate::error::{StatusError, StatusResult};
use crate::layout::LayoutMatcher;

/// Layout file name used by current projects.
pub const PACKAGE_LAYOUT_FILE: &str = "package.bluej";

/// Legacy layout file, kept in step with [`PACKAGE_LAYOUT_FILE`].
pub const LEGACY_LAYOUT_FILE: &str = "bluej.pkg";

/// Default cap on the number of file names listed in a conflict report.
pub const DEFAULT_CONFLICT_LIST_LIMIT: usize = 10;

/// Configuration for classification and conflict reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// File names (or `*suffix` patterns) that mark package layout files.
    pub layout_file_names: Vec<String>,
    /// Layout files hidden from the update list.
    pub hidden_layout_names: Vec<String>,
    /// Maximum number of file names listed in a conflict report.
    pub conflict_list_limit: usize,
    /// Whether the repository is distributed. Updates of a distributed
    /// repository read the remote status field; others read the local one.
    pub dvcs: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            layout_file_names: vec![PACKAGE_LAYOUT_FILE.into(), LEGACY_LAYOUT_FILE.into()],
            hidden_layout_names: vec![LEGACY_LAYOUT_FILE.into()],
            conflict_list_limit: DEFAULT_CONFLICT_LIST_LIMIT,
            dvcs: true,
        }
    }
}

impl ClassifierConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> StatusResult<()> {
        if self.layout_file_names.is_empty() {
            return Err(StatusError::Config(
                "at least one layout file name is required".into(),
            ));
        }
        if self.layout_file_names.iter().any(|name| name.trim().is_empty()) {
            return Err(StatusError::Config("layout file names must not be blank".into()));
        }
        if self.layout_file_names.iter().any(|name| name.trim() == "*") {
            return Err(StatusError::Config(
                "layout pattern \"*\" would match every file".into(),
            ));
        }
        if self.conflict_list_limit == 0 {
            return Err(StatusError::Config(
                "conflict_list_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Matcher recognising the configured layout files.
    pub fn layout_matcher(&self) -> LayoutMatcher {
        LayoutMatcher::new(self.layout_file_names.clone())
    }

    /// Perspective the update path classifies under.
    pub fn update_perspective(&self) -> Perspective {
        if self.dvcs {
            Perspective::Remote
        } else {
            Perspective::Local
        }
    }
}
