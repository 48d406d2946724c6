//! Channel-backed delivery of grant decisions.

use async_channel::{Receiver, Sender};
use log::warn;

use crate::CameraPermissionListener;

/// A listener that forwards each decision into an unbounded channel.
///
/// Sending never blocks, so it is safe to notify from the host's UI thread.
///
/// # Example
///
/// ```ignore
/// let (listener, decisions) = ChannelListener::new();
/// let coordinator = PermissionCoordinator::new(config, cameras, host, listener)?;
/// coordinator.request_camera();
///
/// if decisions.recv().await == Some(true) {
///     // open the camera
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: Sender<bool>,
}

impl ChannelListener {
    /// Create a listener and the receiver that observes its decisions.
    #[must_use]
    pub fn new() -> (Self, GrantReceiver) {
        let (sender, receiver) = async_channel::unbounded();
        (Self { sender }, GrantReceiver { receiver })
    }
}

impl CameraPermissionListener for ChannelListener {
    fn notify_camera_permission(&self, granted: bool) {
        if self.sender.try_send(granted).is_err() {
            warn!("camera permission decision dropped: receiver is gone");
        }
    }
}

/// Receiving half of a [`ChannelListener`].
#[derive(Debug, Clone)]
pub struct GrantReceiver {
    receiver: Receiver<bool>,
}

impl GrantReceiver {
    /// Wait for the next decision.
    ///
    /// Returns `None` once every listener has been dropped and no decision
    /// is left.
    pub async fn recv(&self) -> Option<bool> {
        self.receiver.recv().await.ok()
    }

    /// Wait for the next decision (blocking).
    ///
    /// Use this in non-async contexts (e.g., background threads).
    pub fn recv_blocking(&self) -> Option<bool> {
        self.receiver.recv_blocking().ok()
    }

    /// Take a decision if one is already queued.
    pub fn try_recv(&self) -> Option<bool> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_arrive_in_order() {
        let (listener, decisions) = ChannelListener::new();
        listener.notify_camera_permission(false);
        listener.notify_camera_permission(true);
        assert_eq!(decisions.try_recv(), Some(false));
        assert_eq!(decisions.recv_blocking(), Some(true));
        assert_eq!(decisions.try_recv(), None);
    }

    #[test]
    fn dropped_listener_closes_the_receiver() {
        let (listener, decisions) = ChannelListener::new();
        drop(listener);
        assert_eq!(decisions.recv_blocking(), None);
    }

    #[test]
    fn notifying_without_a_receiver_does_not_panic() {
        let (listener, decisions) = ChannelListener::new();
        drop(decisions);
        listener.notify_camera_permission(true);
    }
}
