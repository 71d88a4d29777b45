//! Global refresh trigger.
//!
//! One counter per service. Pages watch it and react to changes, never to
//! the absolute value. Increments that land while a page is busy collapse
//! into a single observed change.

use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct RefreshSignal {
    tx: watch::Sender<u64>,
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Ask every mounted, loaded page to reload from the remote.
    pub fn bump(&self) -> u64 {
        let mut value = 0;
        self.tx.send_modify(|counter| {
            *counter = counter.wrapping_add(1);
            value = *counter;
        });
        tracing::debug!(counter = value, receivers = self.tx.receiver_count(), "refresh bumped");
        value
    }

    pub fn current(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Receiver positioned at the current value; only later bumps wake it.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}
