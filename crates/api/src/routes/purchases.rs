//! Ticket purchase endpoints.

use std::sync::Arc;

use artifact_store::ArtifactStore;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use order_store::OrderStore;
use serde::Serialize;
use ticketing::PurchaseRequest;

use super::{AppState, parse_order_number};
use crate::error::ApiError;

#[derive(Serialize)]
pub struct PurchaseResponse {
    pub order_number: u64,
    pub artifact_path: String,
    pub message: String,
}

/// POST /purchases: buy tickets and generate the ticket code.
#[tracing::instrument(skip_all)]
pub async fn create<O, A>(
    State(state): State<Arc<AppState<O, A>>>,
    body: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PurchaseResponse>), ApiError>
where
    O: OrderStore + 'static,
    A: ArtifactStore + 'static,
{
    let Json(request) = body?;
    let confirmation = state.orchestrator.purchase(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            order_number: confirmation.order_number.get(),
            artifact_path: confirmation.artifact_path.to_string(),
            message: confirmation.message,
        }),
    ))
}

/// GET /purchases/:order_number/ticket: the ticket code as PNG.
#[tracing::instrument(skip(state))]
pub async fn ticket<O, A>(
    State(state): State<Arc<AppState<O, A>>>,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    O: OrderStore + 'static,
    A: ArtifactStore + 'static,
{
    let order_number = parse_order_number(&order_number)?;
    let bytes = state.lookup.ticket_image(order_number).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}
