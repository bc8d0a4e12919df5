//! Cancellation for in-flight session work.

use std::sync::Arc;

use tokio::sync::watch;

/// One-shot cancellation flag shared between a session and its background
/// task. Once cancelled it stays cancelled; a new session gets a new token.
#[derive(Clone, Debug)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender outlives `rx` because `self` holds it.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Aborts whatever the owning session currently has in flight.
///
/// Cloneable and usable from another task while the session itself is
/// borrowed by `open()` or an action.
#[derive(Clone, Debug)]
pub struct AbortHandle {
    current: Arc<watch::Sender<CancelToken>>,
}

impl AbortHandle {
    pub(crate) fn new(current: Arc<watch::Sender<CancelToken>>) -> Self {
        Self { current }
    }

    /// Cancel the token of the current session.
    pub fn abort(&self) {
        self.current.borrow().cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.current.borrow().is_cancelled()
    }
}
