//! Fan-out channel for notifications.
//!
//! A publish failure is reported to the caller, which treats delivery as
//! best-effort. The stores hold the record of what happened; the bus only
//! carries alerts about it to whoever listens (a UI push channel, an outbox
//! writer, tests).

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Receiving end returned by [`EventBus::subscribe`].
///
/// Sees every message published after it was created.
#[derive(Debug)]
pub struct Subscription<M> {
    rx: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(rx: Receiver<M>) -> Self {
        Self { rx }
    }

    /// Wait up to `timeout` for the next message.
    ///
    /// `None` on timeout and once the bus is gone.
    pub fn next_within(&self, timeout: Duration) -> Option<M> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Everything queued so far, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.rx.try_iter().collect()
    }
}

/// Broadcast bus shared by request threads.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
