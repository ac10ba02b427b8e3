//! Presentation helpers for receipts, notifications and the sales history.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{BranchId, Money, TransactionId, UserId};

use crate::transaction::{PaymentMethod, PosStatus, PosTransaction};

const DISPLAY_LAYOUT: &str = "%d-%m-%Y %H:%M:%S";

/// Whole rupiah with `.` thousands separators, no currency prefix.
pub fn format_idr(amount: Money) -> String {
    let digits = amount.amount().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// `dd-MM-YYYY HH:mm:ss` in the given offset.
pub fn format_display_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format(DISPLAY_LAYOUT).to_string()
}

/// Flattened row for the sales history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosHistoryEntry {
    pub id: TransactionId,
    pub branch_id: BranchId,
    pub receipt_no: String,
    pub status: PosStatus,
    pub payment_method: PaymentMethod,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub paid: Money,
    pub change: Money,
    pub created_by: UserId,
    pub voided_by: Option<UserId>,
    pub note: String,
    pub trx_at: String,
    /// Empty while the transaction is not voided.
    pub void_at: String,
}

impl PosHistoryEntry {
    pub fn from_transaction(tx: &PosTransaction, offset: FixedOffset) -> Self {
        Self {
            id: tx.id,
            branch_id: tx.branch_id,
            receipt_no: tx.receipt_no.clone(),
            status: tx.status,
            payment_method: tx.payment_method,
            subtotal: tx.totals.subtotal,
            discount: tx.totals.discount,
            total: tx.totals.total,
            paid: tx.totals.paid,
            change: tx.totals.change,
            created_by: tx.created_by,
            voided_by: tx.voided_by(),
            note: tx
                .void
                .as_ref()
                .map_or_else(|| tx.note.clone(), |v| v.note.clone()),
            trx_at: format_display_time(tx.created_at, offset),
            void_at: tx
                .void
                .as_ref()
                .map(|v| format_display_time(v.at, offset))
                .unwrap_or_default(),
        }
    }
}
