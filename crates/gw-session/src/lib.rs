//! Commit/push and update sessions.
//!
//! A session owns one run of the workflow: it streams status records from a
//! [`StatusQuery`] on a cancellable background task, classifies them with
//! `gw-status`, reports blocking conflicts, and hands the resulting requests
//! to an [`ActionExecutor`]. Every result is an immutable view.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gw_session::{
//!     CommitPushSession, InMemoryStatusQuery, RecordingExecutor, SessionOutcome, TeamPrefs,
//! };
//! use gw_status::ClassifierConfig;
//! use gw_types::StatusSnapshot;
//!
//! # async fn demo() -> gw_session::SessionResult<()> {
//! let query = Arc::new(InMemoryStatusQuery::new(StatusSnapshot::default()));
//! let executor = Arc::new(RecordingExecutor::new());
//! let mut session =
//!     CommitPushSession::new(query, executor, &ClassifierConfig::default(), TeamPrefs::default())?;
//!
//! if let SessionOutcome::Ready(view) = session.open().await? {
//!     println!("{} files to commit", view.commit_list.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod commit_push;
pub mod error;
pub mod executor;
pub mod memory;
pub mod prefs;
pub mod query;
mod session;
pub mod state;
pub mod update;

pub use cancel::{AbortHandle, CancelToken};
pub use commit_push::{CommitPushSession, CommitPushView};
pub use error::{ExecutionFailure, QueryFailure, SessionError, SessionResult};
pub use executor::{ActionExecutor, CommitRequest, PushRequest, UpdateRequest};
pub use memory::{ExecutedAction, InMemoryStatusQuery, RecordingExecutor};
pub use prefs::TeamPrefs;
pub use query::{QueryEvent, QueryPurpose, StatusQuery, StatusRequest, RECORD_BUFFER};
pub use state::{ActionOutcome, SessionOutcome, SessionState};
pub use update::{UpdateSession, UpdateView};
