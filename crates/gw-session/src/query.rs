//! The repository status query a session consumes.

use async_trait::async_trait;
use gw_types::{FileStatusRecord, StatusHandle, StatusSnapshot};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::trace;

use crate::error::QueryFailure;

/// Capacity of the record channel between a query and its session.
pub const RECORD_BUFFER: usize = 256;

/// Which dialog the status is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryPurpose {
    CommitPush,
    Update,
}

/// Parameters for one status query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub purpose: QueryPurpose,
    /// Ask the repository to also compute the remote-side status.
    pub want_remote_info: bool,
    /// Handle from the previous completed query, if any.
    pub previous_handle: Option<StatusHandle>,
}

impl StatusRequest {
    pub fn new(purpose: QueryPurpose, previous_handle: Option<StatusHandle>) -> Self {
        Self {
            purpose,
            want_remote_info: purpose == QueryPurpose::Update,
            previous_handle,
        }
    }
}

/// One message from a running query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryEvent {
    Record(FileStatusRecord),
    /// Terminal event carrying the repository-level flags.
    Complete(StatusHandle),
}

/// Produces file status records for a repository.
///
/// Implementations send zero or more `Record` events followed by exactly
/// one `Complete`, then return. A send error means the session stopped
/// listening and the query may return early.
#[async_trait]
pub trait StatusQuery: Send + Sync {
    async fn run(
        &self,
        request: &StatusRequest,
        events: mpsc::Sender<QueryEvent>,
    ) -> Result<(), QueryFailure>;
}

/// Run `query` and accumulate its events into a snapshot.
///
/// The channel has one writer (the query) and one reader (this function);
/// the snapshot is only assembled after the query has returned.
pub(crate) async fn collect(
    query: &dyn StatusQuery,
    request: &StatusRequest,
) -> Result<StatusSnapshot, QueryFailure> {
    let (tx, mut rx) = mpsc::channel(RECORD_BUFFER);

    let consume = async {
        let mut records = Vec::new();
        let mut handle = None;
        while let Some(event) = rx.recv().await {
            match event {
                QueryEvent::Record(record) => {
                    trace!(path = %record.path.display(), "status record received");
                    records.push(record);
                }
                QueryEvent::Complete(done) => handle = Some(done),
            }
        }
        (records, handle)
    };

    let (result, (records, handle)) = tokio::join!(query.run(request, tx), consume);
    result?;

    let handle =
        handle.ok_or_else(|| QueryFailure::new("status query ended without a completion event"))?;
    Ok(StatusSnapshot::new(records, handle))
}
