use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Money, OrderNumber};

/// A completed ticket purchase.
///
/// Records are created once and never mutated. The only way a record leaves
/// the store is an explicit cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Sequential, unique order number.
    pub order_number: OrderNumber,

    /// Name of the buyer, trimmed.
    pub buyer_name: String,

    /// Name of the event the ticket is for, trimmed.
    pub event_name: String,

    /// Price of a single ticket.
    pub unit_price: Money,

    /// Number of tickets bought, at least 1.
    pub quantity: u32,

    /// When the purchase was recorded.
    pub purchased_at: DateTime<Utc>,

    /// Relative location of the ticket code image (`YYYY-MM-DD/<file>`).
    pub artifact_path: String,
}

impl PurchaseRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        order_number: OrderNumber,
        buyer_name: impl Into<String>,
        event_name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
        artifact_path: impl Into<String>,
    ) -> Self {
        Self {
            order_number,
            buyer_name: buyer_name.into(),
            event_name: event_name.into(),
            unit_price,
            quantity,
            purchased_at: Utc::now(),
            artifact_path: artifact_path.into(),
        }
    }

    /// Returns the total charged (unit price times quantity).
    pub fn total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}
