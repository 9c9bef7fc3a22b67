use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::core::task::URLTask;

/// Bounded, multi-producer multi-consumer FIFO of `URLTask`s. Producers
/// never block: `try_enqueue` either succeeds or reports the queue was
/// full. Consumers block on `recv` until a task arrives or the queue has
/// been closed and drained.
pub struct URLQueue {
    tx: Mutex<Option<mpsc::Sender<URLTask>>>,
    rx: Arc<Mutex<mpsc::Receiver<URLTask>>>,
}

/// Outcome of a non-blocking enqueue attempt, distinct from the identical
/// `Full`/`Closed` cases in [`crate::core::outcome::AddURLOutcome`] so the
/// queue module stays independent of the crawler's enqueue policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueResult {
    Enqueued,
    Full,
    Closed,
}

impl URLQueue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx: Mutex::new(Some(tx)),
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Non-blocking send; never awaits on backpressure.
    pub async fn try_enqueue(&self, task: URLTask) -> EnqueueResult {
        let sender = {
            let guard = self.tx.lock().await;
            match guard.as_ref() {
                Some(sender) => sender.clone(),
                None => return EnqueueResult::Closed,
            }
        };
        match sender.try_send(task) {
            Ok(()) => EnqueueResult::Enqueued,
            Err(mpsc::error::TrySendError::Full(_)) => EnqueueResult::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => EnqueueResult::Closed,
        }
    }

    /// Blocks until a task is available or the queue is closed and drained.
    pub async fn recv(&self) -> Option<URLTask> {
        self.rx.lock().await.recv().await
    }

    /// Drops the sender side, letting workers drain remaining buffered tasks
    /// and then observe a closed empty queue.
    pub async fn close(&self) {
        let mut guard = self.tx.lock().await;
        *guard = None;
    }
}
