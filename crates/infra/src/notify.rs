//! Notification fan-out for committed transfer and POS changes.
//!
//! Delivery is best-effort: a failed notification is logged at `warn` and
//! dropped. Nothing here can fail or roll back the operation it reports.

use stockline_core::UserId;
use stockline_events::{
    Event, Notification, NotificationIcon, NotificationKind, NotificationSink,
    TracingNotificationSink,
};
use stockline_pos::{PosEvent, PosTransaction, format_idr};
use stockline_transfer::{StockTransfer, TransferEvent};

/// Builds notifications for an event on `transfer`.
///
/// A request only alerts the source branch. Every later stage alerts the
/// source branch, the destination branch and the assigned driver personally.
pub fn transfer_notifications(transfer: &StockTransfer, event: &TransferEvent) -> Vec<Notification> {
    let short = transfer.id.short_ref();
    let (title, message, icon) = match event {
        TransferEvent::Requested(_) => (
            "Stock Transfer Requested",
            format!("Transfer #{short} is waiting for warehouse approval."),
            NotificationIcon::Info,
        ),
        TransferEvent::WarehouseApproved(_) => (
            "Stock Transfer Approved",
            format!("Transfer #{short} has been approved. Please check the destination warehouse."),
            NotificationIcon::Success,
        ),
        TransferEvent::DriverAccepted(_) => (
            "Driver Accepted Job",
            format!("The driver accepted transfer job #{short}. Status: IN_PROGRESS."),
            NotificationIcon::Info,
        ),
        TransferEvent::Received(_) => (
            "Stock Transfer Received",
            format!("Transfer #{short} was received by the destination branch. Status: DONE."),
            NotificationIcon::Success,
        ),
    };

    let base = Notification {
        tenant_id: transfer.tenant_id,
        kind: NotificationKind::StockTransfer,
        branch_id: None,
        user_id: None,
        ref_id: transfer.id.to_string(),
        event_type: event.event_type().to_string(),
        title: title.to_string(),
        message,
        icon,
        created_at: event.occurred_at(),
    };

    let mut out = vec![Notification {
        branch_id: Some(transfer.from_branch_id),
        ..base.clone()
    }];
    if !matches!(event, TransferEvent::Requested(_)) {
        out.push(Notification {
            branch_id: Some(transfer.to_branch_id),
            ..base.clone()
        });
        out.push(Notification {
            user_id: Some(transfer.driver_id),
            ..base
        });
    }
    out
}

/// Builds the branch-wide and personal notifications for a POS event.
pub fn pos_notifications(tx: &PosTransaction, event: &PosEvent, actor: UserId) -> Vec<Notification> {
    let total = format_idr(tx.totals.total);
    let (title, message, icon) = match event {
        PosEvent::Paid(_) => (
            "POS Transaction Paid",
            format!("Receipt {} • Total {total} • {}", tx.receipt_no, tx.payment_method),
            NotificationIcon::Success,
        ),
        PosEvent::Voided(_) => (
            "POS Transaction Voided",
            format!("Receipt {} voided • Total {total}", tx.receipt_no),
            NotificationIcon::Warning,
        ),
    };

    let branch = Notification {
        tenant_id: tx.tenant_id,
        kind: NotificationKind::Pos,
        branch_id: Some(tx.branch_id),
        user_id: None,
        ref_id: tx.id.to_string(),
        event_type: event.event_type().to_string(),
        title: title.to_string(),
        message,
        icon,
        created_at: event.occurred_at(),
    };
    let personal = Notification {
        user_id: Some(actor),
        ..branch.clone()
    };
    vec![branch, personal]
}

/// Best-effort delivery front for a [`NotificationSink`].
#[derive(Debug)]
pub struct Notifier<N> {
    sink: N,
    enabled: bool,
}

impl<N> Notifier<N> {
    /// With `enabled == false` notifications are written to the log only.
    pub fn new(sink: N, enabled: bool) -> Self {
        Self { sink, enabled }
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }
}

impl<N: NotificationSink> Notifier<N> {
    /// Returns how many notifications the sink accepted.
    pub fn deliver(&self, batch: Vec<Notification>) -> usize {
        let mut delivered = 0;
        for n in batch {
            let ref_id = n.ref_id.clone();
            let result = if self.enabled {
                self.sink.notify(n)
            } else {
                TracingNotificationSink.notify(n)
            };
            match result {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(%ref_id, error = %e, "notification delivery failed");
                }
            }
        }
        delivered
    }

    pub fn transfer_event(&self, transfer: &StockTransfer, event: &TransferEvent) -> usize {
        trace_event(event);
        self.deliver(transfer_notifications(transfer, event))
    }

    pub fn pos_event(&self, tx: &PosTransaction, event: &PosEvent, actor: UserId) -> usize {
        trace_event(event);
        self.deliver(pos_notifications(tx, event, actor))
    }
}

fn trace_event(event: &impl Event) {
    tracing::debug!(
        event_type = event.event_type(),
        version = event.version(),
        reference = %event.reference(),
        "fanning out notifications"
    );
}

impl Default for Notifier<TracingNotificationSink> {
    fn default() -> Self {
        Self::new(TracingNotificationSink, true)
    }
}
