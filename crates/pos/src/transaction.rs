use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{
    BranchId, DomainError, DomainResult, Money, ProductId, Quantity, TenantId, TransactionId,
    UserId,
};
use stockline_inventory::{Product, ProductUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PosStatus {
    Paid,
    Void,
}

impl PosStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PosStatus::Paid => "PAID",
            PosStatus::Void => "VOID",
        }
    }
}

impl core::fmt::Display for PosStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment category only; no money movement is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
    Qris,
}

impl PaymentMethod {
    /// Accepts any casing and surrounding whitespace; blank means cash.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "" | "CASH" => Ok(PaymentMethod::Cash),
            "TRANSFER" => Ok(PaymentMethod::Transfer),
            "QRIS" => Ok(PaymentMethod::Qris),
            other => Err(DomainError::validation(format!(
                "payment_method must be CASH/TRANSFER/QRIS (got {other})"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::Qris => "QRIS",
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sold line, priced from the catalog at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosItem {
    pub product_id: ProductId,
    pub sku: String,
    pub barcode: String,
    pub name: String,
    pub description: String,
    pub base_unit: String,
    pub units: Vec<ProductUnit>,
    pub price: Money,
    pub qty: Quantity,
    pub line_total: Money,
}

impl PosItem {
    /// Price a line from the authoritative product record.
    ///
    /// Rejects products of another branch, inactive products and products
    /// whose current stock is below `qty`. Client-supplied prices never
    /// reach this point.
    pub fn priced(product: &Product, branch_id: BranchId, qty: Quantity) -> DomainResult<Self> {
        if product.branch_id != branch_id {
            return Err(DomainError::validation(format!(
                "product {} does not belong to branch {branch_id}",
                product.label()
            )));
        }
        if !product.is_active {
            return Err(DomainError::validation(format!(
                "product {} is inactive",
                product.label()
            )));
        }
        if product.stock < qty.get() {
            return Err(DomainError::insufficient_stock(product.label(), qty.get()));
        }

        let line_total = product.price.checked_mul(qty).ok_or_else(|| {
            DomainError::validation(format!("line total overflow for {}", product.label()))
        })?;

        Ok(Self {
            product_id: product.id,
            sku: product.sku.clone(),
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            base_unit: product.base_unit.clone(),
            units: product.units.clone(),
            price: product.price,
            qty,
            line_total,
        })
    }

    pub fn label(&self) -> &str {
        if self.sku.trim().is_empty() {
            &self.name
        } else {
            &self.sku
        }
    }
}

/// Server-computed money fields of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub paid: Money,
    pub change: Money,
}

impl PosTotals {
    /// `total = max(subtotal - discount, 0)`, `change = paid - total`.
    pub fn compute(items: &[PosItem], discount: Money, paid: Money) -> DomainResult<Self> {
        let subtotal = items
            .iter()
            .try_fold(Money::ZERO, |acc, item| acc.checked_add(item.line_total))
            .ok_or_else(|| DomainError::validation("subtotal overflow"))?;

        let total = subtotal.saturating_sub(discount);
        if paid < total {
            return Err(DomainError::validation(format!(
                "payment not enough: paid {paid} < total {total}"
            )));
        }

        Ok(Self {
            subtotal,
            discount,
            total,
            paid,
            change: paid.saturating_sub(total),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub qty: i64,
}

/// Checkout input as received from the caller.
///
/// `discount` and `paid` are signed so negative input can be clamped to zero
/// instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub branch_id: BranchId,
    pub items: Vec<CheckoutLine>,
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub paid: i64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    pub branch_id: BranchId,
    pub lines: Vec<(ProductId, Quantity)>,
    pub discount: Money,
    pub paid: Money,
    pub payment_method: PaymentMethod,
    pub note: String,
}

impl CheckoutRequest {
    pub fn validate(&self) -> DomainResult<ValidatedCheckout> {
        if self.items.is_empty() {
            return Err(DomainError::validation("items required"));
        }
        let payment_method = PaymentMethod::parse(&self.payment_method)?;

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

        Ok(ValidatedCheckout {
            branch_id: self.branch_id,
            lines,
            discount: Money::clamped(self.discount),
            paid: Money::clamped(self.paid),
            payment_method,
            note: self.note.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoidAudit {
    pub by: UserId,
    pub at: DateTime<Utc>,
    pub note: String,
}

/// One completed sale. Only `status`, `void` and `updated_at` change after
/// insert, and only once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosTransaction {
    pub id: TransactionId,
    pub tenant_id: TenantId,
    pub branch_id: BranchId,
    pub receipt_no: String,
    pub items: Vec<PosItem>,
    pub payment_method: PaymentMethod,
    #[serde(flatten)]
    pub totals: PosTotals,
    pub status: PosStatus,
    pub created_by: UserId,
    pub note: String,
    pub void: Option<VoidAudit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PosTransaction {
    #[allow(clippy::too_many_arguments)]
    pub fn paid(
        id: TransactionId,
        tenant_id: TenantId,
        created_by: UserId,
        checkout: ValidatedCheckout,
        items: Vec<PosItem>,
        totals: PosTotals,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            tenant_id,
            branch_id: checkout.branch_id,
            receipt_no: receipt_number(id, now),
            items,
            payment_method: checkout.payment_method,
            totals,
            status: PosStatus::Paid,
            created_by,
            note: checkout.note,
            void: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_void(&self) -> bool {
        self.status == PosStatus::Void
    }

    /// Apply the single `PAID → VOID` transition.
    pub fn mark_void(&mut self, audit: VoidAudit) -> DomainResult<()> {
        if self.is_void() {
            return Err(DomainError::invalid_state(format!(
                "transaction {} already voided",
                self.receipt_no
            )));
        }
        self.status = PosStatus::Void;
        self.updated_at = audit.at;
        self.void = Some(audit);
        Ok(())
    }

    pub fn voided_by(&self) -> Option<UserId> {
        self.void.as_ref().map(|v| v.by)
    }
}

/// `TRX-<unix millis>-<4 hex>`; the suffix comes from the random tail of the
/// transaction id so two sales in the same millisecond still differ.
pub fn receipt_number(id: TransactionId, at: DateTime<Utc>) -> String {
    let hex = id.as_uuid().simple().to_string();
    let suffix = &hex[hex.len() - 4..];
    format!("TRX-{}-{}", at.timestamp_millis(), suffix.to_ascii_uppercase())
}
