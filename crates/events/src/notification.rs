//! Notification Sink: fire-and-forget alerts for branches and users.
//!
//! A notification targets either a branch (everyone working there sees it)
//! or a single user (personal inbox), or both. Owners read every notification
//! of their tenant, so nothing owner-specific is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockline_core::{BranchId, TenantId, UserId};

use crate::bus::EventBus;

/// Which flow produced the notification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    StockTransfer,
    Pos,
}

/// UI hint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationIcon {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub tenant_id: TenantId,
    pub kind: NotificationKind,
    pub branch_id: Option<BranchId>,
    pub user_id: Option<UserId>,
    /// Transfer or transaction id the notification is about.
    pub ref_id: String,
    /// Domain event type that triggered it (e.g. "pos.transaction.paid").
    pub event_type: String,
    pub title: String,
    pub message: String,
    pub icon: NotificationIcon,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Unavailable(String),
}

/// Consumer-side contract for delivering notifications.
///
/// Callers treat every error as non-fatal: a failed notification never aborts
/// or rolls back the mutation it describes.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

impl<S> NotificationSink for std::sync::Arc<S>
where
    S: NotificationSink + ?Sized,
{
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        (**self).notify(notification)
    }
}

/// Publishes notifications onto an [`EventBus`].
#[derive(Debug)]
pub struct BusNotificationSink<B> {
    bus: B,
}

impl<B> BusNotificationSink<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B> NotificationSink for BusNotificationSink<B>
where
    B: EventBus<Notification>,
{
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.bus
            .publish(notification)
            .map_err(|e| NotifyError::Unavailable(format!("{e:?}")))
    }
}

/// Writes notifications to the log only (used when delivery is disabled).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            tenant_id = %notification.tenant_id,
            kind = ?notification.kind,
            ref_id = %notification.ref_id,
            event_type = %notification.event_type,
            title = %notification.title,
            "notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::InMemoryEventBus;

    fn sample() -> Notification {
        Notification {
            tenant_id: TenantId::new(),
            kind: NotificationKind::Pos,
            branch_id: Some(BranchId::new()),
            user_id: None,
            ref_id: "abc".to_string(),
            event_type: "pos.transaction.paid".to_string(),
            title: "POS Transaction Paid".to_string(),
            message: "Receipt TRX-1".to_string(),
            icon: NotificationIcon::Success,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn bus_sink_publishes_to_subscribers() {
        let bus = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let sink = BusNotificationSink::new(bus.clone());

        let n = sample();
        sink.notify(n.clone()).unwrap();

        assert_eq!(sub.drain(), vec![n]);
    }

    #[test]
    fn tracing_sink_never_fails() {
        assert!(TracingNotificationSink.notify(sample()).is_ok());
    }
}
