//! POS Checkout and Void.
//!
//! Checkout prices every line from the catalog and computes totals before the
//! first stock write, so pure rejections leave no trace. Stock debits are
//! recorded in a [`CompensationLog`] and reversed if a later debit or the
//! final insert fails.
//!
//! Void returns stock line by line. A failed increment stops the loop and
//! surfaces the error, but increments already applied are kept: returning
//! stock is never undone because a later line failed. Only losing the guarded
//! `PAID → VOID` write (or failing it) reverses this call's increments.

use std::time::Duration;

use chrono::{FixedOffset, Utc};

use stockline_auth::ActorDirectory;
use stockline_core::{BranchId, DomainError, DomainResult, TenantId, TransactionId, UserId};
use stockline_events::NotificationSink;
use stockline_inventory::Product;
use stockline_pos::{
    CheckoutRequest, PosEvent, PosHistoryEntry, PosItem, PosTotals, PosTransaction, VoidAudit,
};

use crate::compensation::CompensationLog;
use crate::config::{ConfigError, EngineConfig};
use crate::deadline::Deadline;
use crate::ledger::StockLedger;
use crate::notify::Notifier;
use crate::query::{Page, PosFilter};
use crate::store::{PosTransactionStore, ProductStore};

pub struct PosService<P, S, D, N> {
    ledger: StockLedger<P>,
    transactions: S,
    directory: D,
    notifier: Notifier<N>,
    timeout: Duration,
    display_offset: FixedOffset,
    default_page_size: u32,
    max_page_size: u32,
}

impl<P, S, D, N> PosService<P, S, D, N>
where
    P: ProductStore,
    S: PosTransactionStore,
    D: ActorDirectory,
    N: NotificationSink,
{
    pub fn new(
        ledger: StockLedger<P>,
        transactions: S,
        directory: D,
        notifier: Notifier<N>,
        config: &EngineConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            ledger,
            transactions,
            directory,
            notifier,
            timeout: config.persistence_timeout(),
            display_offset: config.display_offset()?,
            default_page_size: config.list_default_page_size,
            max_page_size: config.list_max_page_size,
        })
    }

    pub fn ledger(&self) -> &StockLedger<P> {
        &self.ledger
    }

    pub fn transactions(&self) -> &S {
        &self.transactions
    }

    /// Sell the requested lines from `request.branch_id`.
    pub fn checkout(&self, cashier: UserId, request: CheckoutRequest) -> DomainResult<PosTransaction> {
        let actor = self.directory.resolve(cashier)?;
        let checkout = request.validate()?;
        let deadline = Deadline::start(self.timeout);

        let mut items = Vec::with_capacity(checkout.lines.len());
        for (product_id, qty) in &checkout.lines {
            deadline.check()?;
            let product = self
                .ledger
                .products()
                .get(*product_id)?
                .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;
            items.push(PosItem::priced(&product, checkout.branch_id, *qty)?);
        }
        let totals = PosTotals::compute(&items, checkout.discount, checkout.paid)?;

        let mut log = CompensationLog::new(&self.ledger, "pos_checkout");
        for item in &items {
            match self.ledger.decrement_if_available(
                checkout.branch_id,
                item.product_id,
                item.qty,
                &deadline,
            ) {
                Ok(step) => log.record(step),
                Err(e) => {
                    tracing::warn!(branch_id = %checkout.branch_id, sku = %item.label(), qty = %item.qty, error = %e, "checkout stopped");
                    return Err(log.fail(e));
                }
            }
        }

        let tx = PosTransaction::paid(
            TransactionId::new(),
            actor.tenant_id,
            actor.id,
            checkout,
            items,
            totals,
            Utc::now(),
        );

        let inserted = deadline
            .check()
            .and_then(|()| self.transactions.insert(tx.clone()));
        if let Err(e) = inserted {
            return Err(log.fail(e.into()));
        }
        log.commit();

        tracing::info!(
            transaction_id = %tx.id,
            receipt_no = %tx.receipt_no,
            branch_id = %tx.branch_id,
            cashier = %actor.id,
            total = %tx.totals.total,
            "pos checkout paid"
        );
        self.notifier.pos_event(&tx, &PosEvent::paid(&tx), actor.id);

        Ok(tx)
    }

    /// Void a paid sale and return its stock. Voiding an already voided sale
    /// returns it unchanged.
    pub fn void(
        &self,
        actor_id: UserId,
        id: TransactionId,
        note: &str,
    ) -> DomainResult<PosTransaction> {
        let actor = self.directory.resolve(actor_id)?;
        let deadline = Deadline::start(self.timeout);

        deadline.check()?;
        let tx = self.get(actor.tenant_id, id)?;
        if tx.is_void() {
            tracing::debug!(transaction_id = %id, "void of already voided transaction");
            return Ok(tx);
        }

        let mut log = CompensationLog::new(&self.ledger, "pos_void");
        for item in &tx.items {
            match self
                .ledger
                .increment(tx.branch_id, item.product_id, item.qty, &deadline)
            {
                Ok(step) => log.record(step),
                Err(e) => {
                    let kept = log
                        .commit()
                        .iter()
                        .map(|step| step.product_id().to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    tracing::error!(
                        transaction_id = %id,
                        sku = %item.label(),
                        qty = %item.qty,
                        kept = %kept,
                        error = %e,
                        "void stopped; earlier stock returns kept"
                    );
                    return Err(e.annotate(format_args!("stock already returned for [{kept}]")));
                }
            }
        }

        let audit = VoidAudit {
            by: actor.id,
            at: Utc::now(),
            note: note.trim().to_string(),
        };
        let written = deadline
            .check()
            .and_then(|()| self.transactions.void_if_paid(actor.tenant_id, id, audit));

        let voided = match written {
            Ok(Some(voided)) => {
                log.commit();
                voided
            }
            Ok(None) => {
                // A concurrent void won; its increments stand, ours are undone.
                let report = log.rollback(&DomainError::conflict(format!(
                    "transaction {} voided concurrently",
                    tx.receipt_no
                )));
                tracing::warn!(transaction_id = %id, reversed = report.reversed, "void lost a race");
                return self.get(actor.tenant_id, id);
            }
            Err(e) => return Err(log.fail(e.into())),
        };

        tracing::info!(
            transaction_id = %voided.id,
            receipt_no = %voided.receipt_no,
            voided_by = %actor.id,
            "pos transaction voided"
        );
        if let Some(event) = PosEvent::voided(&voided) {
            self.notifier.pos_event(&voided, &event, actor.id);
        }

        Ok(voided)
    }

    pub fn get(&self, tenant_id: TenantId, id: TransactionId) -> DomainResult<PosTransaction> {
        self.transactions
            .get(tenant_id, id)?
            .ok_or_else(|| DomainError::not_found(format!("transaction {id}")))
    }

    pub fn list(
        &self,
        tenant_id: TenantId,
        filter: &PosFilter,
    ) -> DomainResult<Page<PosTransaction>> {
        let matches = self.transactions.list(tenant_id, filter)?;
        let page = filter
            .pagination
            .normalize(self.default_page_size, self.max_page_size);
        Ok(Page::collect(
            matches,
            |tx| tx.created_at,
            |tx| *tx.id.as_uuid(),
            filter.sort,
            page,
        ))
    }

    /// [`list`](Self::list) flattened for display in the configured local time.
    pub fn history(
        &self,
        tenant_id: TenantId,
        filter: &PosFilter,
    ) -> DomainResult<Page<PosHistoryEntry>> {
        let offset = self.display_offset;
        Ok(self
            .list(tenant_id, filter)?
            .map(|tx| PosHistoryEntry::from_transaction(&tx, offset)))
    }

    /// Scanner lookup among the branch's active products.
    pub fn find_by_barcode(&self, branch_id: BranchId, barcode: &str) -> DomainResult<Product> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(DomainError::validation("barcode required"));
        }
        self.ledger
            .products()
            .find_by_barcode(branch_id, barcode)?
            .ok_or_else(|| DomainError::not_found(format!("barcode {barcode} in branch {branch_id}")))
    }
}
