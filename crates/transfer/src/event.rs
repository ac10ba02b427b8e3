use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{BranchId, TenantId, TransferId, UserId};
use stockline_events::Event;

use crate::transfer::{StockTransfer, TransferStage, TransferStatus};

/// Facts shared by every transfer event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferChanged {
    pub transfer_id: TransferId,
    pub tenant_id: TenantId,
    pub from_branch_id: BranchId,
    pub to_branch_id: BranchId,
    pub driver_id: UserId,
    pub actor_id: UserId,
    pub status: TransferStatus,
    pub total_units: u64,
    pub occurred_at: DateTime<Utc>,
}

impl TransferChanged {
    fn of(transfer: &StockTransfer, actor_id: UserId, occurred_at: DateTime<Utc>) -> Self {
        Self {
            transfer_id: transfer.id,
            tenant_id: transfer.tenant_id,
            from_branch_id: transfer.from_branch_id,
            to_branch_id: transfer.to_branch_id,
            driver_id: transfer.driver_id,
            actor_id,
            status: transfer.status,
            total_units: transfer.total_units(),
            occurred_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TransferEvent {
    Requested(TransferChanged),
    WarehouseApproved(TransferChanged),
    DriverAccepted(TransferChanged),
    Received(TransferChanged),
}

impl TransferEvent {
    pub fn requested(transfer: &StockTransfer) -> Self {
        TransferEvent::Requested(TransferChanged::of(
            transfer,
            transfer.requested.by,
            transfer.requested.at,
        ))
    }

    /// Event for a stage that has just been committed on `transfer`.
    ///
    /// Returns `None` if the transfer carries no audit for that stage.
    pub fn for_stage(transfer: &StockTransfer, stage: TransferStage) -> Option<Self> {
        let audit = transfer.audit_for(stage)?;
        let changed = TransferChanged::of(transfer, audit.by, audit.at);
        Some(match stage {
            TransferStage::WarehouseApprove => TransferEvent::WarehouseApproved(changed),
            TransferStage::DriverAccept => TransferEvent::DriverAccepted(changed),
            TransferStage::ReceiveDone => TransferEvent::Received(changed),
        })
    }

    pub fn data(&self) -> &TransferChanged {
        match self {
            TransferEvent::Requested(e)
            | TransferEvent::WarehouseApproved(e)
            | TransferEvent::DriverAccepted(e)
            | TransferEvent::Received(e) => e,
        }
    }
}

impl Event for TransferEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TransferEvent::Requested(_) => "transfer.requested",
            TransferEvent::WarehouseApproved(_) => "transfer.warehouse_approved",
            TransferEvent::DriverAccepted(_) => "transfer.driver_accepted",
            TransferEvent::Received(_) => "transfer.received",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.data().occurred_at
    }

    fn reference(&self) -> String {
        self.data().transfer_id.to_string()
    }
}
