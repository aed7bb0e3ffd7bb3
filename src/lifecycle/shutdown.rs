//! Shutdown coordination for the balancer.
//!
//! The flag is latched: once triggered it stays set, so a listener that
//! subscribes late (e.g. a server still binding when SIGTERM arrives)
//! stops immediately instead of waiting for a second signal.

use tokio::sync::watch;

/// Trigger side of the shutdown flag. Clones share the same flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// Waiting side handed to the server.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Set the flag. Repeated calls are no-ops.
    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            tracing::debug!(listeners = self.tx.receiver_count(), "Shutdown triggered");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once shutdown has been triggered.
    pub async fn wait(mut self) {
        // Err means every `Shutdown` handle is gone; nobody can stop us then.
        let closed = self.rx.wait_for(|triggered| *triggered).await.map(|_| ()).is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let a = shutdown.subscribe();
        let b = shutdown.subscribe();

        shutdown.trigger();
        a.wait().await;
        b.wait().await;
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn late_subscriber_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let late = shutdown.subscribe();
        tokio::time::timeout(Duration::from_secs(1), late.wait())
            .await
            .expect("late subscriber kept waiting");
    }

    #[tokio::test]
    async fn untriggered_signal_keeps_waiting() {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        assert!(tokio::time::timeout(Duration::from_millis(50), signal.wait())
            .await
            .is_err());
    }

    #[test]
    fn trigger_without_subscribers_is_harmless() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();
        assert!(shutdown.is_triggered());
    }
}
