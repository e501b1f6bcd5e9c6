use thiserror::Error;

use crate::OrderNumber;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// A record with this order number already exists.
    #[error("Duplicate order number: {0}")]
    DuplicateOrder(OrderNumber),

    /// The backing medium cannot be reached or refused the operation.
    #[error("Order store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be mapped back to a purchase record.
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl OrderStoreError {
    /// Returns true when the failure comes from the storage medium rather
    /// than from the data itself.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            OrderStoreError::Unavailable(_)
                | OrderStoreError::Database(_)
                | OrderStoreError::Migration(_)
        )
    }
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
