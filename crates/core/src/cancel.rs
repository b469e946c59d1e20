//! Cooperative cancellation built on a watch channel.
//!
//! A pipeline runs under one request-level pair; each synthesis runs under
//! an additional pair owned by the barge-in latch. Workers observe their
//! signal at every suspension point, so cancellation lands within one
//! recv/send boundary.

use tokio::sync::watch;

/// Owning side of a cancellation pair. Cancelling (or dropping) it resolves
/// every associated [`CancelSignal`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer side, cloned into each worker.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// Create a linked handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(true);
    }
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation fires. Dropping the handle counts as
    /// cancellation, so orphaned workers never hang here.
    pub async fn cancelled(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_resolves_waiters() {
        let (handle, mut signal) = cancel_pair();
        assert!(!signal.is_cancelled());

        let waiter = tokio::spawn(async move {
            signal.cancelled().await;
        });
        handle.cancel();
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels() {
        let (handle, mut signal) = cancel_pair();
        drop(handle);
        signal.cancelled().await;
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn cloned_signals_all_observe_cancel() {
        let (handle, signal) = cancel_pair();
        let mut a = signal.clone();
        let mut b = signal;
        handle.cancel();
        a.cancelled().await;
        b.cancelled().await;
    }
}
