use gw_types::StatusHandle;
use serde::{Deserialize, Serialize};

/// Team preferences that outlive a single session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamPrefs {
    /// Whether changed layout files are committed or updated.
    pub include_layout: bool,
    /// Handle from the last completed status query.
    #[serde(skip)]
    pub last_handle: Option<StatusHandle>,
}

impl Default for TeamPrefs {
    fn default() -> Self {
        Self {
            include_layout: true,
            last_handle: None,
        }
    }
}

impl TeamPrefs {
    pub fn with_include_layout(include_layout: bool) -> Self {
        Self {
            include_layout,
            ..Default::default()
        }
    }
}
