//! Fire-and-forget handoff to the send worker.
//!
//! The [`SendQueue`] does not send anything itself. It pushes
//! [`WorkItem`]s onto an `mpsc` channel that the send worker drains; the
//! sender never waits for, or learns about, the outcome.

use chanvote_messages::WorkItem;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::ServiceError;

#[derive(Clone)]
pub struct SendQueue {
    work_tx: mpsc::Sender<WorkItem>,
}

impl SendQueue {
    pub fn new(work_tx: mpsc::Sender<WorkItem>) -> Self {
        Self { work_tx }
    }

    /// Create a queue and the receiver the send worker drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<WorkItem>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Hand one item to the worker without waiting.
    pub fn enqueue(&self, item: WorkItem) -> Result<(), ServiceError> {
        let operation = item.operation();
        self.work_tx.try_send(item).map_err(|e| match e {
            TrySendError::Full(_) => ServiceError::QueueFull,
            TrySendError::Closed(_) => ServiceError::QueueClosed,
        })?;
        debug!(operation, "work item queued");
        Ok(())
    }
}
