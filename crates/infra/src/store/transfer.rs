use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stockline_core::{TenantId, TransferId};
use stockline_transfer::{StageAudit, StockTransfer, TransitionGuard};

use super::StoreError;
use crate::query::TransferFilter;

/// Tenant-scoped transfer records.
pub trait TransferStore: Send + Sync {
    fn insert(&self, transfer: StockTransfer) -> Result<(), StoreError>;

    fn get(
        &self,
        tenant_id: TenantId,
        id: TransferId,
    ) -> Result<Option<StockTransfer>, StoreError>;

    /// Every transfer of the tenant matching `filter`, unordered.
    fn list(
        &self,
        tenant_id: TenantId,
        filter: &TransferFilter,
    ) -> Result<Vec<StockTransfer>, StoreError>;

    /// Guarded status write: applies `guard.stage` with `audit` only if the
    /// stored record still satisfies `guard`. Returns the updated record, or
    /// `None` when the guard matched nothing.
    fn transition(
        &self,
        tenant_id: TenantId,
        id: TransferId,
        guard: TransitionGuard,
        audit: StageAudit,
    ) -> Result<Option<StockTransfer>, StoreError>;
}

impl<S> TransferStore for Arc<S>
where
    S: TransferStore + ?Sized,
{
    fn insert(&self, transfer: StockTransfer) -> Result<(), StoreError> {
        (**self).insert(transfer)
    }

    fn get(
        &self,
        tenant_id: TenantId,
        id: TransferId,
    ) -> Result<Option<StockTransfer>, StoreError> {
        (**self).get(tenant_id, id)
    }

    fn list(
        &self,
        tenant_id: TenantId,
        filter: &TransferFilter,
    ) -> Result<Vec<StockTransfer>, StoreError> {
        (**self).list(tenant_id, filter)
    }

    fn transition(
        &self,
        tenant_id: TenantId,
        id: TransferId,
        guard: TransitionGuard,
        audit: StageAudit,
    ) -> Result<Option<StockTransfer>, StoreError> {
        (**self).transition(tenant_id, id, guard, audit)
    }
}

/// In-memory transfer store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTransferStore {
    inner: RwLock<HashMap<(TenantId, TransferId), StockTransfer>>,
}

impl InMemoryTransferStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransferStore for InMemoryTransferStore {
    fn insert(&self, transfer: StockTransfer) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::poisoned())?;
        let key = (transfer.tenant_id, transfer.id);
        if map.contains_key(&key) {
            return Err(StoreError::Duplicate(format!("transfer {}", transfer.id)));
        }
        map.insert(key, transfer);
        Ok(())
    }

    fn get(
        &self,
        tenant_id: TenantId,
        id: TransferId,
    ) -> Result<Option<StockTransfer>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(map.get(&(tenant_id, id)).cloned())
    }

    fn list(
        &self,
        tenant_id: TenantId,
        filter: &TransferFilter,
    ) -> Result<Vec<StockTransfer>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(map
            .iter()
            .filter(|((t, _), tr)| *t == tenant_id && filter.matches(tr))
            .map(|(_, tr)| tr.clone())
            .collect())
    }

    fn transition(
        &self,
        tenant_id: TenantId,
        id: TransferId,
        guard: TransitionGuard,
        audit: StageAudit,
    ) -> Result<Option<StockTransfer>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::poisoned())?;

        match map.get_mut(&(tenant_id, id)) {
            Some(tr) if guard.matches(tr) => {
                tr.advance(guard.stage, audit);
                Ok(Some(tr.clone()))
            }
            _ => Ok(None),
        }
    }
}
