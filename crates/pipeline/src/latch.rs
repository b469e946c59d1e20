//! Barge-in latch: the rendezvous point between "speak" and "interrupt".
//!
//! A single slot holding the cancellation handle of the synthesis currently
//! on the air. Respond arms it before each sentence and disarms it after;
//! Recognize takes it and fires when the caller starts talking. The mutex
//! only ever guards a pointer swap, never I/O.

use parking_lot::Mutex;

use callflow_core::{cancel_pair, CancelHandle, CancelSignal};

#[derive(Default)]
pub struct BargeInLatch {
    speaking: Mutex<Option<CancelHandle>>,
}

impl BargeInLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the latch for a new synthesis and return the signal the
    /// synthesizer selects on. A previous occupant is cancelled on the way
    /// out, so at most one synthesis is ever live per call.
    pub fn arm(&self) -> CancelSignal {
        let (handle, signal) = cancel_pair();
        let mut slot = self.speaking.lock();
        if let Some(previous) = slot.replace(handle) {
            previous.cancel();
        }
        signal
    }

    /// Clear the latch after a synthesis finishes naturally.
    pub fn disarm(&self) {
        self.speaking.lock().take();
    }

    /// Caller barge-in: cancel the active synthesis, if any, and return to
    /// idle. Returns whether something was actually silenced.
    pub fn interrupt(&self) -> bool {
        match self.speaking.lock().take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn interrupt_cancels_the_armed_synthesis() {
        let latch = BargeInLatch::new();
        let mut signal = latch.arm();
        assert!(latch.is_speaking());

        assert!(latch.interrupt());
        signal.cancelled().await;
        assert!(!latch.is_speaking());
    }

    #[test]
    fn interrupt_while_idle_is_a_no_op() {
        let latch = BargeInLatch::new();
        assert!(!latch.interrupt());
        latch.disarm();
        assert!(!latch.interrupt());
    }

    #[tokio::test]
    async fn rearming_cancels_the_previous_occupant() {
        let latch = BargeInLatch::new();
        let mut first = latch.arm();
        let second = latch.arm();

        first.cancelled().await;
        assert!(!second.is_cancelled());
        assert!(latch.is_speaking());
    }

    #[test]
    fn disarm_leaves_nothing_to_interrupt() {
        let latch = BargeInLatch::new();
        let _signal = latch.arm();
        latch.disarm();
        assert!(!latch.is_speaking());
        assert!(!latch.interrupt());
    }
}
