//! Stock Ledger: the only code path that changes `Product::stock`.
//!
//! Each operation is one guarded write on the [`ProductStore`]; the store's
//! single-document atomicity is the only concurrency primitive. No in-process
//! lock is taken here.

use chrono::Utc;

use stockline_core::{BranchId, DomainError, DomainResult, ProductId, Quantity, UserId};
use stockline_inventory::{ProductSnapshot, StockMutation};

use crate::compensation::Compensator;
use crate::deadline::Deadline;
use crate::store::{ProductStore, Upserted};

#[derive(Debug)]
pub struct StockLedger<P> {
    products: P,
}

impl<P> StockLedger<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &P {
        &self.products
    }
}

impl<P: ProductStore> StockLedger<P> {
    /// Debit `qty` from `product_id` in `branch_id` if, at the moment of the
    /// write, the product belongs to that branch and holds at least `qty`.
    pub fn decrement_if_available(
        &self,
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
        deadline: &Deadline,
    ) -> DomainResult<StockMutation> {
        deadline.check()?;

        match self
            .products
            .decrement_if_available(branch_id, product_id, qty, Utc::now())?
        {
            Some(p) => {
                tracing::debug!(%branch_id, %product_id, %qty, stock = p.stock, "stock decremented");
                Ok(StockMutation::decrement(branch_id, product_id, qty))
            }
            None => Err(DomainError::insufficient_stock(
                self.describe(product_id),
                qty.get(),
            )),
        }
    }

    /// Credit `qty` to the branch's product with the snapshot's SKU, creating
    /// it from the snapshot when the branch has never stocked that SKU.
    ///
    /// The returned step always names the concrete product that was credited
    /// so its inverse is a plain guarded decrement.
    pub fn increment_or_create(
        &self,
        branch_id: BranchId,
        snapshot: &ProductSnapshot,
        qty: Quantity,
        actor: UserId,
        deadline: &Deadline,
    ) -> DomainResult<(StockMutation, Upserted)> {
        deadline.check()?;

        let upserted =
            self.products
                .increment_or_create(branch_id, snapshot, qty, actor, Utc::now())?;
        let product_id = upserted.product.id;

        if upserted.created {
            tracing::info!(%branch_id, %product_id, sku = %snapshot.sku, %qty, "product provisioned at destination");
        } else {
            tracing::debug!(%branch_id, %product_id, %qty, stock = upserted.product.stock, "stock incremented");
        }

        Ok((StockMutation::increment(branch_id, product_id, qty), upserted))
    }

    /// Credit `qty` to an existing product of `branch_id`.
    pub fn increment(
        &self,
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
        deadline: &Deadline,
    ) -> DomainResult<StockMutation> {
        deadline.check()?;

        match self
            .products
            .increment(branch_id, product_id, qty, Utc::now())?
        {
            Some(p) => {
                tracing::debug!(%branch_id, %product_id, %qty, stock = p.stock, "stock incremented");
                Ok(StockMutation::increment(branch_id, product_id, qty))
            }
            None => Err(DomainError::not_found(format!(
                "product {product_id} in branch {branch_id}"
            ))),
        }
    }

    /// Apply the exact inverse of an applied step.
    ///
    /// Runs without a deadline: rollback must still be attempted after the
    /// forward operation ran out of time.
    pub fn reverse(&self, step: &StockMutation) -> DomainResult<StockMutation> {
        let inverse = step.inverse();
        let now = Utc::now();

        let applied = match inverse {
            StockMutation::Decrement {
                branch_id,
                product_id,
                qty,
            } => self
                .products
                .decrement_if_available(branch_id, product_id, qty, now)?
                .is_some(),
            StockMutation::Increment {
                branch_id,
                product_id,
                qty,
            } => self
                .products
                .increment(branch_id, product_id, qty, now)?
                .is_some(),
        };

        if !applied {
            return Err(DomainError::persistence(format!(
                "reversal of {step:?} matched no document"
            )));
        }
        Ok(inverse)
    }

    /// SKU or name for error messages, falling back to the id.
    fn describe(&self, product_id: ProductId) -> String {
        match self.products.get(product_id) {
            Ok(Some(p)) => p.label().to_string(),
            _ => product_id.to_string(),
        }
    }
}

impl<P: ProductStore> Compensator for StockLedger<P> {
    fn reverse(&self, step: &StockMutation) -> DomainResult<()> {
        StockLedger::reverse(self, step).map(|_| ())
    }
}
