// Serialized outcome delivery
//
// Tasks run in parallel but the caller's callback is driven by a single
// consumer task, so it is never invoked concurrently with itself.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

use super::panic_guard::{execute_guarded, PanicGuardResult};
use crate::domain::TaskOutcome;

/// One outcome plus the acknowledgement fired after the callback returned
pub(crate) struct Delivery {
    outcome: TaskOutcome,
    delivered: oneshot::Sender<()>,
}

/// Sending half held by every task of a batch
#[derive(Clone)]
pub(crate) struct DeliverySender {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl DeliverySender {
    /// Hand an outcome to the dispatcher and wait until the callback consumed it
    pub(crate) async fn deliver(&self, outcome: TaskOutcome) {
        let (ack_tx, ack_rx) = oneshot::channel();
        let delivery = Delivery {
            outcome,
            delivered: ack_tx,
        };

        if self.tx.send(delivery).is_err() {
            warn!("Dispatcher stopped before outcome could be delivered");
            return;
        }
        // Err only if the dispatcher is gone; the task is done either way
        let _ = ack_rx.await;
    }
}

/// Spawn the single consumer that drives `on_task_done`
///
/// The returned handle resolves once every `DeliverySender` clone is dropped
/// and the queue is drained.
pub(crate) fn spawn_dispatcher<F>(mut on_task_done: F) -> (DeliverySender, JoinHandle<()>)
where
    F: FnMut(TaskOutcome) + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();

    let handle = tokio::spawn(async move {
        while let Some(Delivery { outcome, delivered }) = rx.recv().await {
            if let PanicGuardResult::Panicked(msg) = execute_guarded(|| on_task_done(outcome)) {
                warn!(panic_msg = %msg, "Callback panicked; continuing with remaining outcomes");
            }
            let _ = delivered.send(());
        }
    });

    (DeliverySender { tx }, handle)
}
