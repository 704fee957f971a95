//! Cancellable delayed delivery of the most recent value.
//!
//! Each [`Debouncer::schedule`] aborts the previously scheduled delivery and
//! starts a new quiescence window, so only the last value observed before
//! the window elapses is delivered.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Handle to one scheduled delivery.
#[derive(Debug)]
struct Scheduled {
    task: JoinHandle<()>,
}

impl Scheduled {
    fn cancel(self) -> bool {
        let was_pending = !self.task.is_finished();
        self.task.abort();
        was_pending
    }
}

/// Delivers values on `tx` after `delay` of quiescence.
///
/// Must be used from within a tokio runtime. Dropping the debouncer cancels
/// any pending delivery.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: UnboundedSender<T>,
    pending: Option<Scheduled>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: UnboundedSender<T>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending delivery with `value`, due after the delay.
    pub fn schedule(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the owner is shutting down.
            let _ = tx.send(value);
        });
        self.pending = Some(Scheduled { task });
    }

    /// Cancel the pending delivery, if any.
    ///
    /// # Returns
    /// `true` when a delivery had not fired yet.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().map(Scheduled::cancel).unwrap_or(false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|scheduled| !scheduled.task.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(scheduled) = self.pending.take() {
            scheduled.task.abort();
        }
    }
}
