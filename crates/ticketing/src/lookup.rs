//! Buyer-facing ticket retrieval.

use artifact_store::{ArtifactPath, ArtifactStore};
use common::OrderNumber;
use order_store::OrderStore;

use crate::error::{Result, TicketingError};

/// Serves the ticket code image of an existing purchase.
pub struct TicketLookup<O, A>
where
    O: OrderStore,
    A: ArtifactStore,
{
    orders: O,
    artifacts: A,
}

impl<O, A> TicketLookup<O, A>
where
    O: OrderStore,
    A: ArtifactStore,
{
    pub fn new(orders: O, artifacts: A) -> Self {
        Self { orders, artifacts }
    }

    /// Returns the PNG bytes for `order_number`.
    ///
    /// `NotFound` if the purchase does not exist or its artifact is missing.
    #[tracing::instrument(skip(self))]
    pub async fn ticket_image(&self, order_number: OrderNumber) -> Result<Vec<u8>> {
        let record = self
            .orders
            .find_by_order_number(order_number)
            .await?
            .ok_or(TicketingError::NotFound(order_number))?;

        let path: ArtifactPath = record.artifact_path.parse()?;
        match self.artifacts.read(&path).await? {
            Some(bytes) => Ok(bytes),
            None => {
                tracing::error!(%order_number, %path, "purchase record has no artifact");
                Err(TicketingError::NotFound(order_number))
            }
        }
    }
}
