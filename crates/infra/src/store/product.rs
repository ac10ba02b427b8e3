use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use stockline_core::{BranchId, ProductId, Quantity, UserId};
use stockline_inventory::{Product, ProductSnapshot};

use super::StoreError;

/// Outcome of an increment-or-create upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted {
    pub product: Product,
    /// True when no product with the snapshot's SKU existed in the branch.
    pub created: bool,
}

/// Per-branch product catalog holding the authoritative stock figure.
///
/// The three stock writes are conditional updates on one document. A filter
/// that matches nothing returns `Ok(None)` and leaves the store unchanged.
pub trait ProductStore: Send + Sync {
    fn get(&self, product_id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] on an existing id, or on a
    /// non-empty SKU already present in the same branch.
    fn insert(&self, product: Product) -> Result<(), StoreError>;

    /// Active product of `branch_id` carrying `barcode`.
    fn find_by_barcode(
        &self,
        branch_id: BranchId,
        barcode: &str,
    ) -> Result<Option<Product>, StoreError>;

    /// Filter: `id == product_id AND branch == branch_id AND stock >= qty`.
    fn decrement_if_available(
        &self,
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError>;

    /// Filter: `id == product_id AND branch == branch_id`.
    fn increment(
        &self,
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError>;

    /// Upsert keyed by `(branch_id, snapshot.sku)`: increments the existing
    /// product, or inserts one provisioned from the snapshot with `qty` stock.
    fn increment_or_create(
        &self,
        branch_id: BranchId,
        snapshot: &ProductSnapshot,
        qty: Quantity,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<Upserted, StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn get(&self, product_id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(product_id)
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        (**self).insert(product)
    }

    fn find_by_barcode(
        &self,
        branch_id: BranchId,
        barcode: &str,
    ) -> Result<Option<Product>, StoreError> {
        (**self).find_by_barcode(branch_id, barcode)
    }

    fn decrement_if_available(
        &self,
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError> {
        (**self).decrement_if_available(branch_id, product_id, qty, now)
    }

    fn increment(
        &self,
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError> {
        (**self).increment(branch_id, product_id, qty, now)
    }

    fn increment_or_create(
        &self,
        branch_id: BranchId,
        snapshot: &ProductSnapshot,
        qty: Quantity,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<Upserted, StoreError> {
        (**self).increment_or_create(branch_id, snapshot, qty, created_by, now)
    }
}

/// In-memory catalog for tests/dev.
///
/// Every conditional write runs under the map's write lock, which plays the
/// part of a database's single-document atomicity.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stock, or `None` for an unknown product.
    pub fn stock_of(&self, product_id: ProductId) -> Option<u64> {
        let map = self.products.read().ok()?;
        map.get(&product_id).map(|p| p.stock)
    }

    /// Product carrying `sku` (compared trimmed) in the branch.
    pub fn find_by_sku(
        &self,
        branch_id: BranchId,
        sku: &str,
    ) -> Result<Option<Product>, StoreError> {
        let map = self.products.read().map_err(|_| StoreError::poisoned())?;
        Ok(map.values().find(|p| same_sku(p, branch_id, sku)).cloned())
    }

    pub fn len(&self) -> usize {
        self.products.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// SKUs match on their trimmed form; a blank SKU never matches.
fn same_sku(product: &Product, branch_id: BranchId, sku: &str) -> bool {
    let sku = sku.trim();
    product.branch_id == branch_id && !sku.is_empty() && product.sku.trim() == sku
}

impl ProductStore for InMemoryProductStore {
    fn get(&self, product_id: ProductId) -> Result<Option<Product>, StoreError> {
        let map = self.products.read().map_err(|_| StoreError::poisoned())?;
        Ok(map.get(&product_id).cloned())
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut map = self.products.write().map_err(|_| StoreError::poisoned())?;

        if map.contains_key(&product.id) {
            return Err(StoreError::Duplicate(format!("product {}", product.id)));
        }
        let sku = product.sku.trim();
        if map.values().any(|p| same_sku(p, product.branch_id, sku)) {
            return Err(StoreError::Duplicate(format!(
                "sku {sku} in branch {}",
                product.branch_id
            )));
        }

        map.insert(product.id, product);
        Ok(())
    }

    fn find_by_barcode(
        &self,
        branch_id: BranchId,
        barcode: &str,
    ) -> Result<Option<Product>, StoreError> {
        let map = self.products.read().map_err(|_| StoreError::poisoned())?;
        Ok(map
            .values()
            .filter(|p| p.branch_id == branch_id && p.is_active && p.barcode == barcode)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    fn decrement_if_available(
        &self,
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError> {
        let mut map = self.products.write().map_err(|_| StoreError::poisoned())?;

        match map.get_mut(&product_id) {
            Some(p) if p.branch_id == branch_id && p.stock >= qty.get() => {
                p.stock -= qty.get();
                p.updated_at = now;
                Ok(Some(p.clone()))
            }
            _ => Ok(None),
        }
    }

    fn increment(
        &self,
        branch_id: BranchId,
        product_id: ProductId,
        qty: Quantity,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError> {
        let mut map = self.products.write().map_err(|_| StoreError::poisoned())?;

        match map.get_mut(&product_id) {
            Some(p) if p.branch_id == branch_id => {
                p.stock = p.stock.checked_add(qty.get()).ok_or_else(|| {
                    StoreError::Corrupt(format!("stock overflow on product {product_id}"))
                })?;
                p.updated_at = now;
                Ok(Some(p.clone()))
            }
            _ => Ok(None),
        }
    }

    fn increment_or_create(
        &self,
        branch_id: BranchId,
        snapshot: &ProductSnapshot,
        qty: Quantity,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<Upserted, StoreError> {
        let mut map = self.products.write().map_err(|_| StoreError::poisoned())?;

        if let Some(p) = map.values_mut().find(|p| same_sku(p, branch_id, &snapshot.sku)) {
            p.stock = p.stock.checked_add(qty.get()).ok_or_else(|| {
                StoreError::Corrupt(format!("stock overflow on product {}", p.id))
            })?;
            p.updated_at = now;
            return Ok(Upserted {
                product: p.clone(),
                created: false,
            });
        }

        let product = Product::provision(branch_id, snapshot, qty.get(), created_by, now);
        map.insert(product.id, product.clone());
        Ok(Upserted {
            product,
            created: true,
        })
    }
}
