//! Administrative access to purchase history.

use artifact_store::{ArtifactPath, ArtifactStore};
use common::OrderNumber;
use order_store::{OrderStore, PurchaseRecord};
use serde::Serialize;
use subtle::ConstantTimeEq;

use crate::error::{Result, TicketingError};
use crate::payload::TicketPayload;

/// Shared secret guarding the admin operations.
///
/// An empty secret means admin access is disabled: nothing matches it.
#[derive(Clone, Default)]
pub struct AdminSecret(String);

impl AdminSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_configured(&self) -> bool {
        !self.0.is_empty()
    }

    /// Compares in constant time with respect to the secret's contents.
    pub fn verify(&self, supplied: &str) -> bool {
        self.is_configured() && bool::from(self.0.as_bytes().ct_eq(supplied.as_bytes()))
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminSecret(..)")
    }
}

/// Returned after a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancellationConfirmation {
    pub order_number: OrderNumber,
    pub message: String,
}

/// Listing, lookup, cancellation and ticket verification for administrators.
///
/// Every operation requires the admin secret, cancellation included.
pub struct AdminService<O, A>
where
    O: OrderStore,
    A: ArtifactStore,
{
    orders: O,
    artifacts: A,
    secret: AdminSecret,
}

impl<O, A> AdminService<O, A>
where
    O: OrderStore,
    A: ArtifactStore,
{
    pub fn new(orders: O, artifacts: A, secret: AdminSecret) -> Self {
        Self {
            orders,
            artifacts,
            secret,
        }
    }

    fn authorize(&self, supplied: &str) -> Result<()> {
        if self.secret.verify(supplied) {
            Ok(())
        } else {
            metrics::counter!("admin_auth_failures_total").increment(1);
            tracing::warn!(
                configured = self.secret.is_configured(),
                "rejected admin request"
            );
            Err(TicketingError::Unauthorized)
        }
    }

    /// Returns every purchase, highest order number first.
    #[tracing::instrument(skip_all)]
    pub async fn list_history(&self, secret: &str) -> Result<Vec<PurchaseRecord>> {
        self.authorize(secret)?;
        Ok(self.orders.list_descending_by_order().await?)
    }

    /// Returns a single purchase.
    #[tracing::instrument(skip(self, secret))]
    pub async fn find(&self, secret: &str, order_number: OrderNumber) -> Result<PurchaseRecord> {
        self.authorize(secret)?;
        self.orders
            .find_by_order_number(order_number)
            .await?
            .ok_or(TicketingError::NotFound(order_number))
    }

    /// Cancels a purchase: removes its artifact, then its record.
    ///
    /// The artifact goes first so that an interruption leaves a record
    /// without an artifact, which is visible in the history and can be
    /// cancelled again. Cancelling an order that does not exist, including
    /// one already cancelled, returns `NotFound`.
    #[tracing::instrument(skip(self, secret))]
    pub async fn cancel(
        &self,
        secret: &str,
        order_number: OrderNumber,
    ) -> Result<CancellationConfirmation> {
        self.authorize(secret)?;

        let record = self
            .orders
            .find_by_order_number(order_number)
            .await?
            .ok_or(TicketingError::NotFound(order_number))?;

        match record.artifact_path.parse::<ArtifactPath>() {
            Ok(path) => self.artifacts.delete(&path).await?,
            Err(e) => tracing::warn!(
                artifact_path = %record.artifact_path,
                error = %e,
                "stored artifact path is invalid, skipping artifact removal"
            ),
        }

        // A concurrent cancellation may have removed the record meanwhile
        self.orders
            .delete_by_order_number(order_number)
            .await?
            .ok_or(TicketingError::NotFound(order_number))?;

        metrics::counter!("cancellations_total").increment(1);
        tracing::info!(%order_number, "purchase cancelled");

        Ok(CancellationConfirmation {
            order_number,
            message: format!("Order #{order_number} cancelled"),
        })
    }

    /// Checks a scanned ticket payload against the stored purchase.
    #[tracing::instrument(skip_all)]
    pub async fn verify_ticket(&self, secret: &str, payload: &str) -> Result<PurchaseRecord> {
        self.authorize(secret)?;

        let ticket = TicketPayload::decode(payload)?;
        let record = self
            .orders
            .find_by_order_number(ticket.order_number)
            .await?
            .ok_or(TicketingError::NotFound(ticket.order_number))?;

        if !ticket.matches(&record) {
            tracing::warn!(order_number = %ticket.order_number, "ticket does not match stored purchase");
            return Err(TicketingError::TicketMismatch(ticket.order_number));
        }
        Ok(record)
    }
}
