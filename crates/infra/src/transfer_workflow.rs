//! Transfer Workflow: `PENDING_WAREHOUSE → WAITING_DRIVER → IN_PROGRESS → DONE`.
//!
//! ```text
//! create           snapshot source products, insert PENDING_WAREHOUSE (no stock moves)
//! warehouse_approve GUDANG; debit source per item; guarded → WAITING_DRIVER
//! driver_accept    assigned DRIVER; guarded (status + driver) → IN_PROGRESS
//! receive_done     KASIR/ADMIN; credit destination per item; guarded → DONE
//! ```
//!
//! Every stock step is recorded in a [`CompensationLog`]. A failed step, a
//! lost guarded write or a persistence failure on the transition reverses the
//! steps of that same call before the error is returned.

use std::time::Duration;

use chrono::Utc;

use stockline_auth::{Actor, ActorDirectory, Role, require_identity, require_role};
use stockline_core::{DomainError, DomainResult, TenantId, TransferId, UserId};
use stockline_events::NotificationSink;
use stockline_transfer::{
    CreateTransfer, StageAudit, StockTransfer, TransferEvent, TransferItem, TransferStage,
    TransitionGuard,
};

use crate::compensation::CompensationLog;
use crate::config::EngineConfig;
use crate::deadline::Deadline;
use crate::ledger::StockLedger;
use crate::notify::Notifier;
use crate::query::{Page, TransferFilter};
use crate::store::{ProductStore, TransferStore};

pub struct TransferService<P, T, D, N> {
    ledger: StockLedger<P>,
    transfers: T,
    directory: D,
    notifier: Notifier<N>,
    timeout: Duration,
    default_page_size: u32,
    max_page_size: u32,
}

impl<P, T, D, N> TransferService<P, T, D, N>
where
    P: ProductStore,
    T: TransferStore,
    D: ActorDirectory,
    N: NotificationSink,
{
    pub fn new(
        ledger: StockLedger<P>,
        transfers: T,
        directory: D,
        notifier: Notifier<N>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            ledger,
            transfers,
            directory,
            notifier,
            timeout: config.persistence_timeout(),
            default_page_size: config.list_default_page_size,
            max_page_size: config.list_max_page_size,
        }
    }

    pub fn ledger(&self) -> &StockLedger<P> {
        &self.ledger
    }

    pub fn transfers(&self) -> &T {
        &self.transfers
    }

    /// Record a draft. Item metadata is frozen from the source branch catalog.
    pub fn create(&self, requester: UserId, request: CreateTransfer) -> DomainResult<StockTransfer> {
        let actor = self.directory.resolve(requester)?;
        let validated = request.validate()?;
        let deadline = Deadline::start(self.timeout);

        let mut items = Vec::with_capacity(validated.lines.len());
        for (product_id, qty) in &validated.lines {
            deadline.check()?;
            let product = self
                .ledger
                .products()
                .get(*product_id)?
                .filter(|p| p.branch_id == validated.from_branch_id)
                .ok_or_else(|| {
                    DomainError::not_found(format!(
                        "product {product_id} in branch {}",
                        validated.from_branch_id
                    ))
                })?;
            if product.sku.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "product {} has no SKU; the destination cannot match it",
                    product.name
                )));
            }
            items.push(TransferItem {
                product_id: product.id,
                snapshot: product.snapshot(),
                qty: *qty,
            });
        }

        let transfer = StockTransfer::new(
            TransferId::new(),
            actor.tenant_id,
            validated,
            items,
            actor.id,
            Utc::now(),
        );

        deadline.check()?;
        self.transfers.insert(transfer.clone())?;

        tracing::info!(
            transfer_id = %transfer.id,
            tenant_id = %transfer.tenant_id,
            from_branch_id = %transfer.from_branch_id,
            to_branch_id = %transfer.to_branch_id,
            items = transfer.items.len(),
            "transfer requested"
        );
        self.notifier
            .transfer_event(&transfer, &TransferEvent::requested(&transfer));

        Ok(transfer)
    }

    pub fn get(&self, tenant_id: TenantId, id: TransferId) -> DomainResult<StockTransfer> {
        self.transfers
            .get(tenant_id, id)?
            .ok_or_else(|| DomainError::not_found(format!("transfer {id}")))
    }

    pub fn list(
        &self,
        tenant_id: TenantId,
        filter: &TransferFilter,
    ) -> DomainResult<Page<StockTransfer>> {
        let matches = self.transfers.list(tenant_id, filter)?;
        let page = filter
            .pagination
            .normalize(self.default_page_size, self.max_page_size);
        Ok(Page::collect(
            matches,
            |t| t.created_at,
            |t| *t.id.as_uuid(),
            filter.sort,
            page,
        ))
    }

    /// Debit the source branch for every item, then move to `WAITING_DRIVER`.
    pub fn warehouse_approve(
        &self,
        actor_id: UserId,
        id: TransferId,
        note: &str,
    ) -> DomainResult<StockTransfer> {
        let stage = TransferStage::WarehouseApprove;
        let actor = self.directory.resolve(actor_id)?;
        require_role(&actor, &[Role::Gudang])?;

        let deadline = Deadline::start(self.timeout);
        let transfer = self.load(&actor, id, &deadline)?;
        transfer.ensure_stage(stage)?;

        let mut log = CompensationLog::new(&self.ledger, stage.as_str());
        for item in &transfer.items {
            match self.ledger.decrement_if_available(
                transfer.from_branch_id,
                item.product_id,
                item.qty,
                &deadline,
            ) {
                Ok(step) => log.record(step),
                Err(e) => {
                    tracing::warn!(transfer_id = %id, product_id = %item.product_id, qty = %item.qty, error = %e, "approval stopped");
                    return Err(log.fail(e));
                }
            }
        }

        let audit = StageAudit::new(actor.id, note.trim(), Utc::now());
        self.commit(log, &actor, id, TransitionGuard::status(stage), audit, &deadline)
    }

    /// The assigned driver takes the job; no stock moves.
    pub fn driver_accept(
        &self,
        actor_id: UserId,
        id: TransferId,
        note: &str,
    ) -> DomainResult<StockTransfer> {
        let stage = TransferStage::DriverAccept;
        let actor = self.directory.resolve(actor_id)?;
        require_role(&actor, &[Role::Driver])?;

        let deadline = Deadline::start(self.timeout);
        let transfer = self.load(&actor, id, &deadline)?;
        require_identity(&actor, transfer.driver_id, "driver")?;
        transfer.ensure_stage(stage)?;

        let log = CompensationLog::new(&self.ledger, stage.as_str());
        let audit = StageAudit::new(actor.id, note.trim(), Utc::now());
        let guard = TransitionGuard::status_and_driver(stage, actor.id);
        self.commit(log, &actor, id, guard, audit, &deadline)
    }

    /// Credit the destination branch for every item, then move to `DONE`.
    pub fn receive_done(
        &self,
        actor_id: UserId,
        id: TransferId,
        note: &str,
    ) -> DomainResult<StockTransfer> {
        let stage = TransferStage::ReceiveDone;
        let actor = self.directory.resolve(actor_id)?;
        require_role(&actor, &[Role::Kasir, Role::Admin])?;

        let deadline = Deadline::start(self.timeout);
        let transfer = self.load(&actor, id, &deadline)?;
        transfer.ensure_stage(stage)?;

        let mut log = CompensationLog::new(&self.ledger, stage.as_str());
        for item in &transfer.items {
            match self.ledger.increment_or_create(
                transfer.to_branch_id,
                &item.snapshot,
                item.qty,
                actor.id,
                &deadline,
            ) {
                Ok((step, _)) => log.record(step),
                Err(e) => {
                    tracing::warn!(transfer_id = %id, sku = %item.snapshot.sku, qty = %item.qty, error = %e, "receipt stopped");
                    return Err(log.fail(e));
                }
            }
        }

        let audit = StageAudit::new(actor.id, note.trim(), Utc::now());
        self.commit(log, &actor, id, TransitionGuard::status(stage), audit, &deadline)
    }

    fn load(&self, actor: &Actor, id: TransferId, deadline: &Deadline) -> DomainResult<StockTransfer> {
        deadline.check()?;
        self.get(actor.tenant_id, id)
    }

    /// Guarded status write closing a stage. Anything but a matched write
    /// reverses the stock steps in `log`.
    fn commit(
        &self,
        log: CompensationLog<'_, StockLedger<P>>,
        actor: &Actor,
        id: TransferId,
        guard: TransitionGuard,
        audit: StageAudit,
        deadline: &Deadline,
    ) -> DomainResult<StockTransfer> {
        let written = deadline
            .check()
            .and_then(|()| self.transfers.transition(actor.tenant_id, id, guard, audit));

        let updated = match written {
            Ok(Some(t)) => {
                log.commit();
                t
            }
            Ok(None) => {
                tracing::warn!(transfer_id = %id, stage = guard.stage.as_str(), "guarded transition lost a race");
                return Err(log.fail(DomainError::conflict(format!(
                    "transfer {} status already changed",
                    id.short_ref()
                ))));
            }
            Err(e) => return Err(log.fail(e.into())),
        };

        tracing::info!(
            transfer_id = %updated.id,
            actor = %actor.id,
            stage = guard.stage.as_str(),
            status = %updated.status,
            "transfer advanced"
        );
        if let Some(event) = TransferEvent::for_stage(&updated, guard.stage) {
            self.notifier.transfer_event(&updated, &event);
        }
        Ok(updated)
    }
}
