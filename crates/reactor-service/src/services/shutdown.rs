//! Cooperative shutdown signal
//!
//! One trigger, many cloned signals. Background loops and dispatcher sleeps
//! race their waits against the signal.

use std::time::Duration;

use tokio::sync::watch;

/// Create a connected trigger/signal pair
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownSignal { rx })
}

/// Owner side; firing it is permanent
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Signal shutdown to every receiver
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Additional receiver
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiver side, cheap to clone
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Check whether shutdown was requested
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is requested
    ///
    /// A dropped trigger never fires.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Sleep for `duration` unless shutdown comes first
    ///
    /// Returns `true` when the full duration elapsed.
    pub async fn sleep(&self, duration: Duration) -> bool {
        if self.is_triggered() {
            return false;
        }
        tokio::select! {
            () = tokio::time::sleep(duration) => true,
            () = self.wait() => false,
        }
    }
}
