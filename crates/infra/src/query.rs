//! List/filter criteria and pagination for transfers and POS transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{BranchId, UserId};
use stockline_pos::{PaymentMethod, PosStatus, PosTransaction};
use stockline_transfer::{StockTransfer, TransferStatus};

/// Raw page request as received from a caller (1-based).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// `page <= 0` becomes 1; a size outside `1..=max` becomes `default`.
    pub fn normalize(&self, default_size: u32, max_size: u32) -> (u32, u32) {
        let page = u32::try_from(self.page.max(1)).unwrap_or(u32::MAX);
        let size = match u32::try_from(self.page_size) {
            Ok(s) if s >= 1 && s <= max_size => s,
            _ => default_size,
        };
        (page, size)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    /// Matches across all pages.
    pub total: u64,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Sort by `created_at` (ties by `tiebreak`) and cut out the requested page.
    pub(crate) fn collect<K: Ord>(
        mut items: Vec<T>,
        created_at: impl Fn(&T) -> DateTime<Utc>,
        tiebreak: impl Fn(&T) -> K,
        sort: SortOrder,
        (page, page_size): (u32, u32),
    ) -> Self {
        items.sort_by(|a, b| {
            created_at(a)
                .cmp(&created_at(b))
                .then_with(|| tiebreak(a).cmp(&tiebreak(b)))
        });
        if sort == SortOrder::NewestFirst {
            items.reverse();
        }

        let total = items.len() as u64;
        let skip = (page as usize - 1).saturating_mul(page_size as usize);
        let items: Vec<T> = items.into_iter().skip(skip).take(page_size as usize).collect();
        let has_more = (skip as u64).saturating_add(items.len() as u64) < total;

        Self {
            items,
            page,
            page_size,
            total,
            has_more,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            has_more: self.has_more,
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn search_term(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferFilter {
    pub from_branch_id: Option<BranchId>,
    pub to_branch_id: Option<BranchId>,
    pub driver_id: Option<UserId>,
    pub status: Option<TransferStatus>,
    /// Case-insensitive match on transfer id, requester note, item name or SKU.
    pub search: Option<String>,
    pub sort: SortOrder,
    pub pagination: Pagination,
}

impl TransferFilter {
    pub fn matches(&self, t: &StockTransfer) -> bool {
        if self.from_branch_id.is_some_and(|b| b != t.from_branch_id)
            || self.to_branch_id.is_some_and(|b| b != t.to_branch_id)
            || self.driver_id.is_some_and(|d| d != t.driver_id)
            || self.status.is_some_and(|s| s != t.status)
        {
            return false;
        }

        match search_term(&self.search) {
            None => true,
            Some(term) => {
                contains_ci(&t.id.to_string(), &term)
                    || contains_ci(&t.requested.note, &term)
                    || t.items.iter().any(|i| {
                        contains_ci(&i.snapshot.name, &term) || contains_ci(&i.snapshot.sku, &term)
                    })
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosFilter {
    pub branch_id: Option<BranchId>,
    pub status: Option<PosStatus>,
    pub payment_method: Option<PaymentMethod>,
    /// Case-insensitive match on receipt number, payment method, item name,
    /// SKU or barcode.
    pub search: Option<String>,
    pub sort: SortOrder,
    pub pagination: Pagination,
}

impl PosFilter {
    pub fn matches(&self, tx: &PosTransaction) -> bool {
        if self.branch_id.is_some_and(|b| b != tx.branch_id)
            || self.status.is_some_and(|s| s != tx.status)
            || self.payment_method.is_some_and(|m| m != tx.payment_method)
        {
            return false;
        }

        match search_term(&self.search) {
            None => true,
            Some(term) => {
                contains_ci(&tx.receipt_no, &term)
                    || contains_ci(tx.payment_method.as_str(), &term)
                    || tx.items.iter().any(|i| {
                        contains_ci(&i.name, &term)
                            || contains_ci(&i.sku, &term)
                            || contains_ci(&i.barcode, &term)
                    })
            }
        }
    }
}
