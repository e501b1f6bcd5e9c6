//! Purchase orchestration: order number, ticket code, artifact, record.

use std::time::Instant;

use artifact_store::{ArtifactPath, ArtifactStore, ArtifactStoreError, DayBucket};
use chrono::Utc;
use common::OrderNumber;
use order_store::{OrderStore, OrderStoreError, OrderStoreExt, PurchaseRecord};
use serde::Serialize;

use crate::codegen::CodeGenerator;
use crate::error::{CodeGenError, Result, TicketingError};
use crate::filename::artifact_filename;
use crate::payload::TicketPayload;
use crate::request::{PurchaseRequest, ValidPurchase};

/// Tuning for the purchase flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Total attempts per purchase when the order number is taken by a
    /// concurrent purchase. 2 means one retry with a fresh number.
    pub max_attempts: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { max_attempts: 2 }
    }
}

/// Returned to the buyer after a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseConfirmation {
    pub order_number: OrderNumber,
    pub artifact_path: ArtifactPath,
    pub message: String,
}

/// Outcome of a single attempt, before retry policy is applied.
enum AttemptError {
    /// The order number was taken by someone else. Nothing of ours remains.
    Contended(OrderNumber),
    /// The artifact name is taken but no record holds the order number.
    /// Either a concurrent purchase has not stored its record yet, or the
    /// file was left behind by a failed rollback.
    Occupied(OrderNumber, ArtifactPath),
    /// Any other failure. Nothing of ours remains unless rollback failed,
    /// which has already been logged.
    Failed(TicketingError),
}

impl From<OrderStoreError> for AttemptError {
    fn from(err: OrderStoreError) -> Self {
        AttemptError::Failed(err.into())
    }
}

impl From<ArtifactStoreError> for AttemptError {
    fn from(err: ArtifactStoreError) -> Self {
        AttemptError::Failed(err.into())
    }
}

impl From<CodeGenError> for AttemptError {
    fn from(err: CodeGenError) -> Self {
        AttemptError::Failed(err.into())
    }
}

/// Drives a purchase from validated input to a stored record with its
/// ticket code.
///
/// The record and its artifact are created together or not at all: when
/// the record cannot be stored, the artifact written for it is removed
/// before the error is returned.
pub struct PurchaseOrchestrator<O, A, G>
where
    O: OrderStore,
    A: ArtifactStore,
    G: CodeGenerator,
{
    orders: O,
    artifacts: A,
    generator: G,
    config: OrchestratorConfig,
}

impl<O, A, G> PurchaseOrchestrator<O, A, G>
where
    O: OrderStore,
    A: ArtifactStore,
    G: CodeGenerator,
{
    /// Creates a new orchestrator with the default configuration.
    pub fn new(orders: O, artifacts: A, generator: G) -> Self {
        Self {
            orders,
            artifacts,
            generator,
            config: OrchestratorConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> OrchestratorConfig {
        self.config
    }

    /// Validates the request and performs the purchase.
    ///
    /// Returns `Validation` without side effects for bad input. Every other
    /// failure is reported as `PurchaseFailed` wrapping the cause, after any
    /// artifact already written has been rolled back.
    #[tracing::instrument(skip(self, request))]
    pub async fn purchase(&self, request: &PurchaseRequest) -> Result<PurchaseConfirmation> {
        let purchase = request.validate()?;

        metrics::counter!("purchases_started_total").increment(1);
        let started = Instant::now();
        let max_attempts = self.config.max_attempts.max(1);

        let mut attempt = 1;
        let mut occupied: Option<ArtifactPath> = None;
        let outcome = loop {
            let order_number = match self.attempt_purchase(&purchase).await {
                Ok(confirmation) => break Ok(confirmation),
                Err(AttemptError::Failed(cause)) => break Err(cause),
                Err(AttemptError::Contended(order_number)) => order_number,
                Err(AttemptError::Occupied(order_number, path)) => {
                    // Still recordless after a full attempt: nobody is
                    // about to claim it.
                    if occupied.as_ref() == Some(&path) {
                        metrics::counter!("orphaned_artifacts_total").increment(1);
                        tracing::error!(
                            %path,
                            %order_number,
                            "artifact exists without a purchase record"
                        );
                        break Err(TicketingError::StorageUnavailable(format!(
                            "artifact {path} exists without a purchase record"
                        )));
                    }
                    occupied = Some(path);
                    order_number
                }
            };

            if attempt >= max_attempts {
                break Err(TicketingError::DuplicateOrder(order_number));
            }
            tracing::warn!(%order_number, attempt, "order number taken, retrying");
            metrics::counter!("purchase_retries_total").increment(1);
            attempt += 1;
        };

        metrics::histogram!("purchase_duration_seconds").record(started.elapsed().as_secs_f64());

        match outcome {
            Ok(confirmation) => {
                metrics::counter!("purchases_total").increment(1);
                tracing::info!(
                    order_number = %confirmation.order_number,
                    artifact_path = %confirmation.artifact_path,
                    "purchase completed"
                );
                Ok(confirmation)
            }
            Err(cause) => {
                metrics::counter!("purchases_failed_total", "kind" => cause.kind()).increment(1);
                tracing::warn!(error = %cause, attempts = attempt, "purchase failed");
                Err(TicketingError::purchase_failed(cause))
            }
        }
    }

    async fn attempt_purchase(
        &self,
        purchase: &ValidPurchase,
    ) -> std::result::Result<PurchaseConfirmation, AttemptError> {
        // 1. Order number
        let order_number = self.orders.next_order_number().await?;

        // 2. Day bucket, from the same instant stored on the record
        let purchased_at = Utc::now();
        let bucket = self
            .artifacts
            .ensure_bucket(DayBucket::from(purchased_at))
            .await?;

        // 3-4. Payload and code
        let payload = TicketPayload::for_purchase(order_number, purchase).encode();
        let bytes = self.generator.generate(&payload)?;

        // 5-6. Artifact
        let filename = artifact_filename(order_number, &purchase.buyer_name);
        let artifact_path = match self.artifacts.write(&bucket, &filename, &bytes).await {
            Ok(path) => path,
            Err(ArtifactStoreError::AlreadyExists(path)) => {
                tracing::debug!(%path, "artifact already published for this order number");
                return Err(if self.orders.exists(order_number).await? {
                    AttemptError::Contended(order_number)
                } else {
                    AttemptError::Occupied(order_number, path)
                });
            }
            Err(e) => return Err(e.into()),
        };

        // 7. Record
        let record = PurchaseRecord {
            order_number,
            buyer_name: purchase.buyer_name.clone(),
            event_name: purchase.event_name.clone(),
            unit_price: purchase.unit_price,
            quantity: purchase.quantity,
            purchased_at,
            artifact_path: artifact_path.to_string(),
        };

        if let Err(e) = self.orders.create(record).await {
            self.roll_back_artifact(&artifact_path).await;
            return Err(match e {
                OrderStoreError::DuplicateOrder(n) => AttemptError::Contended(n),
                other => other.into(),
            });
        }

        Ok(PurchaseConfirmation {
            order_number,
            message: format!(
                "Purchase completed: order #{order_number} for {}",
                purchase.event_name
            ),
            artifact_path,
        })
    }

    async fn roll_back_artifact(&self, path: &ArtifactPath) {
        metrics::counter!("artifact_rollbacks_total").increment(1);
        match self.artifacts.delete(path).await {
            Ok(()) => tracing::debug!(%path, "artifact rolled back"),
            Err(e) => {
                metrics::counter!("artifact_rollback_failures_total").increment(1);
                tracing::error!(%path, error = %e, "artifact rollback failed, artifact is orphaned");
            }
        }
    }
}
