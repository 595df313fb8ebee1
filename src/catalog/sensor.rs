//! Scroll-trigger sensor handle.
//!
//! The view owns a [`ScrollSensor`] and reports whether the end-of-list
//! boundary is visible. The controller receives the signals on its event
//! loop and turns each `true` into one next-page request. Redundant signals
//! are expected and are absorbed by the controller's in-flight guard.

use tokio::sync::mpsc;

/// Sending half of the boundary-visible signal
#[derive(Debug, Clone)]
pub struct ScrollSensor {
    tx: mpsc::UnboundedSender<bool>,
}

impl ScrollSensor {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<bool>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report boundary visibility. Returns `false` once the controller has
    /// unsubscribed.
    pub fn boundary_visible(&self, visible: bool) -> bool {
        self.tx.send(visible).is_ok()
    }

    /// Whether the controller is still listening.
    pub fn is_attached(&self) -> bool {
        !self.tx.is_closed()
    }
}
