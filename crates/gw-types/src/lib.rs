//! Foundation types for the groupwork status engine.
//!
//! Every other `gw-*` crate depends on `gw-types`. The types here describe
//! what a repository status query reports: one record per file carrying a
//! local and a remote status, plus a terminal handle saying whether a push or
//! pull is needed even when no file differs.
//!
//! # Key Types
//!
//! - [`RepoStatus`]: Status of a single file from one side of the comparison
//! - [`Perspective`]: Which status field drives classification
//! - [`FileStatusRecord`]: Immutable per-file record produced by a query
//! - [`StatusHandle`]: Push-needed / pull-needed flags plus a resume token
//! - [`StatusSnapshot`]: A completed query: records and handle together
//! - [`SessionId`]: UUID v7 identifier attached to a session's log lines

pub mod error;
pub mod record;
pub mod session;
pub mod status;

pub use error::{TypeError, TypeResult};
pub use record::{FileStatusRecord, StatusHandle, StatusSnapshot};
pub use session::SessionId;
pub use status::{Perspective, RepoStatus};
