//! One-time "engine is ready" notification.
//!
//! Map engines load styles and tiles asynchronously. A render pass started
//! before that finishes waits on [`ReadyGate::wait`] instead of being dropped.

use tokio::sync::watch;

use crate::error::RenderError;

/// Held by whatever owns the engine; fires once.
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<bool>,
}

/// Held by the render side; any number of passes may wait on it.
#[derive(Debug, Clone)]
pub struct ReadyGate {
    rx: watch::Receiver<bool>,
}

impl ReadySignal {
    #[must_use]
    pub fn new() -> (Self, ReadyGate) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, ReadyGate { rx })
    }

    /// Marks the engine ready. Later calls are no-ops.
    pub fn mark_ready(&self) {
        self.tx.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        });
    }
}

impl ReadyGate {
    /// A gate for engines that are usable as soon as they are constructed.
    #[must_use]
    pub fn already_ready() -> Self {
        let (tx, rx) = watch::channel(true);
        drop(tx);
        Self { rx }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the engine has signalled readiness.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NeverReady`] if the [`ReadySignal`] is dropped
    /// without ever firing.
    pub async fn wait(&self) -> Result<(), RenderError> {
        let mut rx = self.rx.clone();
        rx.wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| RenderError::NeverReady)
    }
}
