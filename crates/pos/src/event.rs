use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{BranchId, Money, TenantId, TransactionId, UserId};
use stockline_events::Event;

use crate::transaction::{PaymentMethod, PosTransaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosChanged {
    pub transaction_id: TransactionId,
    pub tenant_id: TenantId,
    pub branch_id: BranchId,
    pub receipt_no: String,
    pub payment_method: PaymentMethod,
    pub total: Money,
    pub actor_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PosEvent {
    Paid(PosChanged),
    Voided(PosChanged),
}

impl PosEvent {
    pub fn paid(tx: &PosTransaction) -> Self {
        PosEvent::Paid(PosChanged {
            transaction_id: tx.id,
            tenant_id: tx.tenant_id,
            branch_id: tx.branch_id,
            receipt_no: tx.receipt_no.clone(),
            payment_method: tx.payment_method,
            total: tx.totals.total,
            actor_id: tx.created_by,
            occurred_at: tx.created_at,
        })
    }

    /// `None` while the transaction carries no void audit.
    pub fn voided(tx: &PosTransaction) -> Option<Self> {
        let audit = tx.void.as_ref()?;
        Some(PosEvent::Voided(PosChanged {
            transaction_id: tx.id,
            tenant_id: tx.tenant_id,
            branch_id: tx.branch_id,
            receipt_no: tx.receipt_no.clone(),
            payment_method: tx.payment_method,
            total: tx.totals.total,
            actor_id: audit.by,
            occurred_at: audit.at,
        }))
    }

    pub fn data(&self) -> &PosChanged {
        match self {
            PosEvent::Paid(e) | PosEvent::Voided(e) => e,
        }
    }
}

impl Event for PosEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PosEvent::Paid(_) => "pos.transaction.paid",
            PosEvent::Voided(_) => "pos.transaction.voided",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.data().occurred_at
    }

    fn reference(&self) -> String {
        self.data().transaction_id.to_string()
    }
}
