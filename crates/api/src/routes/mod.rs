//! HTTP handlers.

pub mod admin;
pub mod codes;
pub mod purchases;
pub mod system;

use artifact_store::ArtifactStore;
use axum::extract::rejection::JsonRejection;
use common::OrderNumber;
use order_store::OrderStore;
use ticketing::{AdminService, PurchaseOrchestrator, QrCodeGenerator, TicketLookup};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<O: OrderStore, A: ArtifactStore> {
    pub orchestrator: PurchaseOrchestrator<O, A, QrCodeGenerator>,
    pub lookup: TicketLookup<O, A>,
    pub admin: AdminService<O, A>,
    pub generator: QrCodeGenerator,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn parse_order_number(raw: &str) -> Result<OrderNumber, ApiError> {
    raw.parse()
        .map_err(|e: common::ParseOrderNumberError| ApiError::BadRequest(e.to_string()))
}
