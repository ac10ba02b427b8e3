use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{BranchId, Money, ProductId, UserId};

/// A larger packaging unit expressed in base units (e.g. `box` = 12 `pcs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUnit {
    pub name: String,
    pub conversion_to_base: f64,
}

/// Catalog product as stored per branch.
///
/// `stock` is in base units and only ever changes through the ledger's
/// guarded increment/decrement; it is unsigned so a negative value is not
/// representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub branch_id: BranchId,
    pub sku: String,
    pub barcode: String,
    pub name: String,
    pub description: String,
    pub base_unit: String,
    pub units: Vec<ProductUnit>,
    pub cost: Money,
    pub price: Money,
    pub image: String,
    pub stock: u64,
    pub is_active: bool,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog data copied into transfer and sale records at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub sku: String,
    pub barcode: String,
    pub name: String,
    pub description: String,
    pub base_unit: String,
    pub units: Vec<ProductUnit>,
    pub cost: Money,
    pub price: Money,
    pub image: String,
}

impl Product {
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            sku: self.sku.clone(),
            barcode: self.barcode.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            base_unit: self.base_unit.clone(),
            units: self.units.clone(),
            cost: self.cost,
            price: self.price,
            image: self.image.clone(),
        }
    }

    /// Seed a brand-new catalog entry in `branch_id` from a snapshot.
    ///
    /// Used when a transferred SKU arrives at a branch for the first time.
    pub fn provision(
        branch_id: BranchId,
        snapshot: &ProductSnapshot,
        initial_stock: u64,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProductId::new(),
            branch_id,
            sku: snapshot.sku.trim().to_string(),
            barcode: snapshot.barcode.clone(),
            name: snapshot.name.clone(),
            description: snapshot.description.clone(),
            base_unit: snapshot.base_unit.clone(),
            units: snapshot.units.clone(),
            cost: snapshot.cost,
            price: snapshot.price,
            image: snapshot.image.clone(),
            stock: initial_stock,
            is_active: true,
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
        }
    }

    /// Label used in error messages: SKU when present, otherwise the name.
    pub fn label(&self) -> &str {
        if self.sku.trim().is_empty() {
            &self.name
        } else {
            &self.sku
        }
    }
}
