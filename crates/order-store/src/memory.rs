use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    OrderNumber, OrderStoreError, PurchaseRecord, Result,
    store::OrderStore,
};

/// In-memory order store implementation.
///
/// Provides the same interface as the PostgreSQL implementation. The
/// uniqueness check and the insert happen under one write lock, which plays
/// the role of the primary key constraint.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    records: Arc<RwLock<BTreeMap<OrderNumber, PurchaseRecord>>>,
    fail_on_create: Arc<AtomicBool>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to reject every `create` as unavailable.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.fail_on_create.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn next_order_number(&self) -> Result<OrderNumber> {
        let records = self.records.read().await;
        Ok(records
            .keys()
            .next_back()
            .map(OrderNumber::next)
            .unwrap_or(OrderNumber::FIRST))
    }

    #[tracing::instrument(skip(self, record), fields(order_number = %record.order_number))]
    async fn create(&self, record: PurchaseRecord) -> Result<PurchaseRecord> {
        if self.fail_on_create.load(Ordering::SeqCst) {
            return Err(OrderStoreError::Unavailable(
                "in-memory store configured to fail".to_string(),
            ));
        }

        let mut records = self.records.write().await;
        if records.contains_key(&record.order_number) {
            return Err(OrderStoreError::DuplicateOrder(record.order_number));
        }
        records.insert(record.order_number, record.clone());
        Ok(record)
    }

    async fn list_descending_by_order(&self) -> Result<Vec<PurchaseRecord>> {
        let records = self.records.read().await;
        Ok(records.values().rev().cloned().collect())
    }

    async fn find_by_order_number(
        &self,
        order_number: OrderNumber,
    ) -> Result<Option<PurchaseRecord>> {
        Ok(self.records.read().await.get(&order_number).cloned())
    }

    async fn delete_by_order_number(
        &self,
        order_number: OrderNumber,
    ) -> Result<Option<PurchaseRecord>> {
        Ok(self.records.write().await.remove(&order_number))
    }
}
