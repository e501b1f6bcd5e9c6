use async_trait::async_trait;

use crate::{OrderNumber, PurchaseRecord, Result};

/// Core trait for purchase record storage.
///
/// The store is the single authority on order number uniqueness: callers may
/// race on [`OrderStore::next_order_number`], but only one `create` per
/// number ever succeeds. All implementations must be thread-safe.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Returns the number of stored records.
    async fn count(&self) -> Result<u64>;

    /// Returns the next free order number: the highest stored number plus
    /// one, or 1 for an empty store.
    ///
    /// This is a read. Two concurrent callers can observe the same value;
    /// the loser finds out when `create` returns `DuplicateOrder`.
    async fn next_order_number(&self) -> Result<OrderNumber>;

    /// Persists a new record.
    ///
    /// Fails with `DuplicateOrder` if a record with the same order number
    /// already exists.
    async fn create(&self, record: PurchaseRecord) -> Result<PurchaseRecord>;

    /// Returns a snapshot of all records, highest order number first.
    async fn list_descending_by_order(&self) -> Result<Vec<PurchaseRecord>>;

    /// Looks up a single record.
    async fn find_by_order_number(&self, order_number: OrderNumber)
    -> Result<Option<PurchaseRecord>>;

    /// Removes a record, returning it if it existed.
    async fn delete_by_order_number(
        &self,
        order_number: OrderNumber,
    ) -> Result<Option<PurchaseRecord>>;
}

/// Extension trait providing convenience methods for order stores.
#[async_trait]
pub trait OrderStoreExt: OrderStore {
    /// Checks if a record exists for the order number.
    async fn exists(&self, order_number: OrderNumber) -> Result<bool> {
        Ok(self.find_by_order_number(order_number).await?.is_some())
    }
}

// Blanket implementation for all OrderStore implementations
impl<T: OrderStore + ?Sized> OrderStoreExt for T {}

