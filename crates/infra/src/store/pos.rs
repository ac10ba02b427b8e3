use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stockline_core::{TenantId, TransactionId};
use stockline_pos::{PosStatus, PosTransaction, VoidAudit};

use super::StoreError;
use crate::query::PosFilter;

/// Tenant-scoped POS transaction records.
pub trait PosTransactionStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] on an existing id or receipt number.
    fn insert(&self, transaction: PosTransaction) -> Result<(), StoreError>;

    fn get(
        &self,
        tenant_id: TenantId,
        id: TransactionId,
    ) -> Result<Option<PosTransaction>, StoreError>;

    fn list(
        &self,
        tenant_id: TenantId,
        filter: &PosFilter,
    ) -> Result<Vec<PosTransaction>, StoreError>;

    /// Guarded `PAID → VOID` write. `None` when the record is missing or no
    /// longer `PAID`.
    fn void_if_paid(
        &self,
        tenant_id: TenantId,
        id: TransactionId,
        audit: VoidAudit,
    ) -> Result<Option<PosTransaction>, StoreError>;
}

impl<S> PosTransactionStore for Arc<S>
where
    S: PosTransactionStore + ?Sized,
{
    fn insert(&self, transaction: PosTransaction) -> Result<(), StoreError> {
        (**self).insert(transaction)
    }

    fn get(
        &self,
        tenant_id: TenantId,
        id: TransactionId,
    ) -> Result<Option<PosTransaction>, StoreError> {
        (**self).get(tenant_id, id)
    }

    fn list(
        &self,
        tenant_id: TenantId,
        filter: &PosFilter,
    ) -> Result<Vec<PosTransaction>, StoreError> {
        (**self).list(tenant_id, filter)
    }

    fn void_if_paid(
        &self,
        tenant_id: TenantId,
        id: TransactionId,
        audit: VoidAudit,
    ) -> Result<Option<PosTransaction>, StoreError> {
        (**self).void_if_paid(tenant_id, id, audit)
    }
}

/// In-memory POS transaction store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPosStore {
    inner: RwLock<HashMap<(TenantId, TransactionId), PosTransaction>>,
}

impl InMemoryPosStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PosTransactionStore for InMemoryPosStore {
    fn insert(&self, transaction: PosTransaction) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::poisoned())?;
        let key = (transaction.tenant_id, transaction.id);
        if map.contains_key(&key) {
            return Err(StoreError::Duplicate(format!("transaction {}", transaction.id)));
        }
        if map.values().any(|t| t.receipt_no == transaction.receipt_no) {
            return Err(StoreError::Duplicate(format!(
                "receipt {}",
                transaction.receipt_no
            )));
        }
        map.insert(key, transaction);
        Ok(())
    }

    fn get(
        &self,
        tenant_id: TenantId,
        id: TransactionId,
    ) -> Result<Option<PosTransaction>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(map.get(&(tenant_id, id)).cloned())
    }

    fn list(
        &self,
        tenant_id: TenantId,
        filter: &PosFilter,
    ) -> Result<Vec<PosTransaction>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(map
            .iter()
            .filter(|((t, _), tx)| *t == tenant_id && filter.matches(tx))
            .map(|(_, tx)| tx.clone())
            .collect())
    }

    fn void_if_paid(
        &self,
        tenant_id: TenantId,
        id: TransactionId,
        audit: VoidAudit,
    ) -> Result<Option<PosTransaction>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::poisoned())?;

        match map.get_mut(&(tenant_id, id)) {
            Some(tx) if tx.status == PosStatus::Paid => {
                tx.mark_void(audit)
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?;
                Ok(Some(tx.clone()))
            }
            _ => Ok(None),
        }
    }
}
