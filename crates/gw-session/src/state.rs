use std::fmt;

use gw_status::ConflictReport;
use serde::Serialize;

/// Where a session is in its lifecycle.
///
/// `Idle → Querying → {Blocked | Ready} → Executing → Idle`. Abort from
/// `Querying` or `Executing` returns to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    #[default]
    Idle,
    /// A status query is in flight.
    Querying,
    /// A conflict report was produced; the session is over.
    Blocked,
    /// Action sets are available and actions may run.
    Ready,
    /// A commit, push or update command is in flight.
    Executing,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Querying => "querying",
            Self::Blocked => "blocked",
            Self::Ready => "ready",
            Self::Executing => "executing",
        }
    }

    /// Abort only has an effect while work is in flight.
    pub fn is_abortable(&self) -> bool {
        matches!(self, Self::Querying | Self::Executing)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of opening a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome<V> {
    /// Classification finished; the view describes what can be done.
    Ready(V),
    /// Conflicts block the action. Not an error: the user must resolve them
    /// and open a new session.
    Blocked(ConflictReport),
    /// The session was aborted and its result discarded.
    Aborted,
}

impl<V> SessionOutcome<V> {
    pub fn ready(self) -> Option<V> {
        match self {
            Self::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

/// Result of running an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// The command was aborted; any late result was discarded.
    Aborted,
}
