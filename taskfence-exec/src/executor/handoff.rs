//! Zero-capacity hand-off between the dispatcher and the worker pool.
//!
//! An idle worker announces itself by sending a one-shot slot. The dispatcher
//! only gives up an item once it holds such a slot, so nothing is ever
//! buffered between the two sides and at most one item per worker is in
//! flight.

use tokio::sync::{mpsc, oneshot};

/// Creates a hand-off for up to `workers` concurrent receivers.
pub fn channel<T>(workers: usize) -> (Dispatch<T>, Intake<T>) {
    let (tx, rx) = mpsc::channel(workers.max(1));
    (Dispatch { ready: rx }, Intake { ready: tx })
}

/// Dispatcher side. Dropping it closes the hand-off.
pub struct Dispatch<T> {
    ready: mpsc::Receiver<oneshot::Sender<T>>,
}

impl<T> Dispatch<T> {
    /// Waits for an idle receiver. Returns `None` once every [`Intake`] is
    /// gone.
    pub async fn ready(&mut self) -> Option<Slot<T>> {
        loop {
            let tx = self.ready.recv().await?;
            if !tx.is_closed() {
                return Some(Slot { tx });
            }
        }
    }
}

/// A claim on one idle receiver.
pub struct Slot<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Slot<T> {
    /// Hands `item` over. Gives it back if the receiver went away meanwhile.
    pub fn fill(self, item: T) -> Result<(), T> {
        self.tx.send(item)
    }
}

/// Receiver side, one clone per worker.
pub struct Intake<T> {
    ready: mpsc::Sender<oneshot::Sender<T>>,
}

impl<T> Clone for Intake<T> {
    fn clone(&self) -> Self {
        Self {
            ready: self.ready.clone(),
        }
    }
}

impl<T> Intake<T> {
    /// Waits for the next item. Returns `None` once the dispatcher is closed.
    pub async fn recv(&self) -> Option<T> {
        let (tx, rx) = oneshot::channel();
        self.ready.send(tx).await.ok()?;
        rx.await.ok()
    }
}
