use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{
    BranchId, DomainError, DomainResult, ProductId, Quantity, TenantId, TransferId, UserId,
};
use stockline_inventory::ProductSnapshot;

/// Transfer status lifecycle. No state is skippable and none is revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    PendingWarehouse,
    WaitingDriver,
    InProgress,
    Done,
}

impl TransferStatus {
    pub fn next(self) -> Option<Self> {
        match self {
            TransferStatus::PendingWarehouse => Some(TransferStatus::WaitingDriver),
            TransferStatus::WaitingDriver => Some(TransferStatus::InProgress),
            TransferStatus::InProgress => Some(TransferStatus::Done),
            TransferStatus::Done => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransferStatus::PendingWarehouse => "PENDING_WAREHOUSE",
            TransferStatus::WaitingDriver => "WAITING_DRIVER",
            TransferStatus::InProgress => "IN_PROGRESS",
            TransferStatus::Done => "DONE",
        }
    }
}

impl core::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three guarded transitions after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStage {
    WarehouseApprove,
    DriverAccept,
    ReceiveDone,
}

impl TransferStage {
    /// Status the transfer must be in for this stage to run.
    pub fn expected_status(self) -> TransferStatus {
        match self {
            TransferStage::WarehouseApprove => TransferStatus::PendingWarehouse,
            TransferStage::DriverAccept => TransferStatus::WaitingDriver,
            TransferStage::ReceiveDone => TransferStatus::InProgress,
        }
    }

    pub fn target_status(self) -> TransferStatus {
        match self {
            TransferStage::WarehouseApprove => TransferStatus::WaitingDriver,
            TransferStage::DriverAccept => TransferStatus::InProgress,
            TransferStage::ReceiveDone => TransferStatus::Done,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransferStage::WarehouseApprove => "warehouse_approve",
            TransferStage::DriverAccept => "driver_accept",
            TransferStage::ReceiveDone => "receive_done",
        }
    }
}

/// Who moved the transfer through a stage, when, and with which note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageAudit {
    pub by: UserId,
    pub note: String,
    pub at: DateTime<Utc>,
}

impl StageAudit {
    pub fn new(by: UserId, note: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            by,
            note: note.into(),
            at,
        }
    }
}

/// Transfer line with catalog data frozen at request time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferItem {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub snapshot: ProductSnapshot,
    pub qty: Quantity,
}

impl TransferItem {
    pub fn label(&self) -> &str {
        if self.snapshot.sku.trim().is_empty() {
            &self.snapshot.name
        } else {
            &self.snapshot.sku
        }
    }
}

/// A stock movement request between two branches of one tenant.
///
/// Append-only audit once created: only `status`, the per-stage audit slots
/// and `updated_at` ever change, and only through [`StockTransfer::advance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransfer {
    pub id: TransferId,
    pub tenant_id: TenantId,
    pub from_branch_id: BranchId,
    pub to_branch_id: BranchId,
    pub driver_id: UserId,
    pub status: TransferStatus,
    pub items: Vec<TransferItem>,

    pub requested: StageAudit,
    pub approved: Option<StageAudit>,
    pub accepted: Option<StageAudit>,
    pub received: Option<StageAudit>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockTransfer {
    pub fn new(
        id: TransferId,
        tenant_id: TenantId,
        request: ValidatedTransfer,
        items: Vec<TransferItem>,
        requested_by: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            tenant_id,
            from_branch_id: request.from_branch_id,
            to_branch_id: request.to_branch_id,
            driver_id: request.driver_id,
            status: TransferStatus::PendingWarehouse,
            items,
            requested: StageAudit::new(requested_by, request.note, now),
            approved: None,
            accepted: None,
            received: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Read-side status check, done before any mutation is attempted.
    pub fn ensure_stage(&self, stage: TransferStage) -> DomainResult<()> {
        let expected = stage.expected_status();
        if self.status != expected {
            return Err(DomainError::invalid_state(format!(
                "transfer {} must be {expected} to {} (is {})",
                self.id.short_ref(),
                stage.as_str(),
                self.status
            )));
        }
        Ok(())
    }

    /// Move to the stage's target status and record its audit.
    ///
    /// Callers must have matched a [`TransitionGuard`] in the same atomic
    /// write; this method does not re-check.
    pub fn advance(&mut self, stage: TransferStage, audit: StageAudit) {
        self.status = stage.target_status();
        self.updated_at = audit.at;
        match stage {
            TransferStage::WarehouseApprove => self.approved = Some(audit),
            TransferStage::DriverAccept => self.accepted = Some(audit),
            TransferStage::ReceiveDone => self.received = Some(audit),
        }
    }

    pub fn audit_for(&self, stage: TransferStage) -> Option<&StageAudit> {
        match stage {
            TransferStage::WarehouseApprove => self.approved.as_ref(),
            TransferStage::DriverAccept => self.accepted.as_ref(),
            TransferStage::ReceiveDone => self.received.as_ref(),
        }
    }

    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|i| i.qty.get()).sum()
    }
}

/// Precondition of a guarded status write.
///
/// Evaluated by the store inside the same atomic update that applies the
/// transition; a non-matching guard means a concurrent caller got there first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionGuard {
    pub stage: TransferStage,
    /// When set, the stored driver must still be this user.
    pub driver_id: Option<UserId>,
}

impl TransitionGuard {
    pub fn status(stage: TransferStage) -> Self {
        Self {
            stage,
            driver_id: None,
        }
    }

    pub fn status_and_driver(stage: TransferStage, driver_id: UserId) -> Self {
        Self {
            stage,
            driver_id: Some(driver_id),
        }
    }

    pub fn matches(&self, transfer: &StockTransfer) -> bool {
        transfer.status == self.stage.expected_status()
            && self.driver_id.is_none_or(|d| transfer.driver_id == d)
    }
}

/// Requested line: which product and how many base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLine {
    pub product_id: ProductId,
    pub qty: i64,
}

/// Input for creating a transfer draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransfer {
    pub from_branch_id: BranchId,
    pub to_branch_id: BranchId,
    pub driver_id: Option<UserId>,
    #[serde(default)]
    pub note: String,
    pub items: Vec<TransferLine>,
}

/// A [`CreateTransfer`] that passed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub from_branch_id: BranchId,
    pub to_branch_id: BranchId,
    pub driver_id: UserId,
    pub note: String,
    pub lines: Vec<(ProductId, Quantity)>,
}

impl CreateTransfer {
    pub fn validate(&self) -> DomainResult<ValidatedTransfer> {
        if self.from_branch_id == self.to_branch_id {
            return Err(DomainError::validation(
                "from_branch_id cannot equal to_branch_id",
            ));
        }
        let driver_id = self
            .driver_id
            .ok_or_else(|| DomainError::validation("driver_id required"))?;
        if self.items.is_empty() {
            return Err(DomainError::validation("items required"));
        }

        let lines = self
            .items
            .iter()
            .map(|line| {
                Quantity::new(line.qty)
                    .map(|q| (line.product_id, q))
                    .map_err(|_| {
                        DomainError::validation(format!(
                            "invalid qty {} for product {}",
                            line.qty, line.product_id
                        ))
                    })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(ValidatedTransfer {
            from_branch_id: self.from_branch_id,
            to_branch_id: self.to_branch_id,
            driver_id,
            note: self.note.trim().to_string(),
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockline_core::Money;

    fn snapshot(sku: &str) -> ProductSnapshot {
        ProductSnapshot {
            sku: sku.to_string(),
            barcode: String::new(),
            name: format!("Product {sku}"),
            description: String::new(),
            base_unit: "pcs".to_string(),
            units: vec![],
            cost: Money::new(100),
            price: Money::new(150),
            image: String::new(),
        }
    }

    fn request() -> CreateTransfer {
        CreateTransfer {
            from_branch_id: BranchId::new(),
            to_branch_id: BranchId::new(),
            driver_id: Some(UserId::new()),
            note: " restock ".to_string(),
            items: vec![TransferLine {
                product_id: ProductId::new(),
                qty: 5,
            }],
        }
    }

    fn transfer() -> StockTransfer {
        let validated = request().validate().unwrap();
        let items = validated
            .lines
            .iter()
            .map(|(product_id, qty)| TransferItem {
                product_id: *product_id,
                snapshot: snapshot("SKU-1"),
                qty: *qty,
            })
            .collect();
        StockTransfer::new(
            TransferId::new(),
            TenantId::new(),
            validated,
            items,
            UserId::new(),
            Utc::now(),
        )
    }

    #[test]
    fn same_branch_is_rejected() {
        let mut req = request();
        req.to_branch_id = req.from_branch_id;
        assert!(matches!(req.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn missing_driver_is_rejected() {
        let mut req = request();
        req.driver_id = None;
        assert!(matches!(req.validate(), Err(DomainError::Validation(m)) if m.contains("driver")));
    }

    #[test]
    fn non_positive_qty_is_rejected() {
        let mut req = request();
        req.items[0].qty = 0;
        assert!(req.validate().is_err());
        req.items[0].qty = -2;
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_items_are_rejected() {
        let mut req = request();
        req.items.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn validate_trims_note() {
        assert_eq!(request().validate().unwrap().note, "restock");
    }

    #[test]
    fn new_transfer_starts_pending_warehouse() {
        let t = transfer();
        assert_eq!(t.status, TransferStatus::PendingWarehouse);
        assert_eq!(t.requested.note, "restock");
        assert!(t.approved.is_none());
        assert_eq!(t.total_units(), 5);
    }

    #[test]
    fn ensure_stage_rejects_out_of_order_calls() {
        let t = transfer();
        assert!(t.ensure_stage(TransferStage::WarehouseApprove).is_ok());
        let err = t.ensure_stage(TransferStage::DriverAccept).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(m) if m.contains("WAITING_DRIVER")));
    }

    #[test]
    fn advance_records_audit_per_stage() {
        let mut t = transfer();
        let approver = UserId::new();
        let at = Utc::now();
        t.advance(TransferStage::WarehouseApprove, StageAudit::new(approver, "ok", at));

        assert_eq!(t.status, TransferStatus::WaitingDriver);
        assert_eq!(t.audit_for(TransferStage::WarehouseApprove).unwrap().by, approver);
        assert_eq!(t.updated_at, at);
        assert!(t.audit_for(TransferStage::DriverAccept).is_none());
    }

    #[test]
    fn guard_checks_status_and_driver() {
        let mut t = transfer();
        assert!(TransitionGuard::status(TransferStage::WarehouseApprove).matches(&t));
        assert!(!TransitionGuard::status(TransferStage::DriverAccept).matches(&t));

        t.advance(
            TransferStage::WarehouseApprove,
            StageAudit::new(UserId::new(), "", Utc::now()),
        );
        let driver = t.driver_id;
        assert!(TransitionGuard::status_and_driver(TransferStage::DriverAccept, driver).matches(&t));
        assert!(
            !TransitionGuard::status_and_driver(TransferStage::DriverAccept, UserId::new())
                .matches(&t)
        );
    }

    #[test]
    fn status_serializes_as_wire_value() {
        let json = serde_json::to_string(&TransferStatus::PendingWarehouse).unwrap();
        assert_eq!(json, "\"PENDING_WAREHOUSE\"");
    }

    #[test]
    fn item_snapshot_is_flattened() {
        let item = TransferItem {
            product_id: ProductId::new(),
            snapshot: snapshot("SKU-9"),
            qty: Quantity::new(3).unwrap(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["sku"], "SKU-9");
        assert_eq!(value["qty"], 3);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn stage_strategy() -> impl Strategy<Value = TransferStage> {
            prop_oneof![
                Just(TransferStage::WarehouseApprove),
                Just(TransferStage::DriverAccept),
                Just(TransferStage::ReceiveDone),
            ]
        }

        proptest! {
            /// Property: applying only guard-matching stages never moves status backward or skips one.
            #[test]
            fn status_is_monotonic(stages in proptest::collection::vec(stage_strategy(), 0..12)) {
                let mut t = transfer();
                for stage in stages {
                    let before = t.status;
                    if TransitionGuard::status(stage).matches(&t) {
                        t.advance(stage, StageAudit::new(UserId::new(), "", Utc::now()));
                        prop_assert_eq!(Some(t.status), before.next());
                    } else {
                        prop_assert!(t.ensure_stage(stage).is_err());
                        prop_assert_eq!(t.status, before);
                    }
                }
            }
        }
    }
}
