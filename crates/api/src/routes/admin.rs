//! Admin endpoints. Every request must carry the `x-admin-secret` header.

use std::sync::Arc;

use artifact_store::ArtifactStore;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use order_store::{OrderStore, PurchaseRecord};
use serde::{Deserialize, Serialize};

use super::{AppState, parse_order_number};
use crate::error::ApiError;

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

#[derive(Serialize)]
pub struct PurchaseResponse {
    pub order_number: u64,
    pub buyer_name: String,
    pub event_name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub total: f64,
    pub purchased_at: String,
    pub artifact_path: String,
}

impl From<PurchaseRecord> for PurchaseResponse {
    fn from(record: PurchaseRecord) -> Self {
        Self {
            order_number: record.order_number.get(),
            total: record.total().as_decimal(),
            unit_price: record.unit_price.as_decimal(),
            quantity: record.quantity,
            purchased_at: record.purchased_at.to_rfc3339(),
            buyer_name: record.buyer_name,
            event_name: record.event_name,
            artifact_path: record.artifact_path,
        }
    }
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub order_number: u64,
    pub message: String,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub payload: String,
}

/// A missing or non-UTF-8 header is treated as an empty secret, which
/// never authorizes.
fn admin_secret(headers: &HeaderMap) -> &str {
    headers
        .get(ADMIN_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// GET /admin/purchases: purchase history, newest order first.
#[tracing::instrument(skip_all)]
pub async fn list<O, A>(
    State(state): State<Arc<AppState<O, A>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<PurchaseResponse>>, ApiError>
where
    O: OrderStore + 'static,
    A: ArtifactStore + 'static,
{
    let records = state.admin.list_history(admin_secret(&headers)).await?;
    Ok(Json(records.into_iter().map(PurchaseResponse::from).collect()))
}

/// GET /admin/purchases/:order_number: a single purchase.
#[tracing::instrument(skip(state, headers))]
pub async fn get<O, A>(
    State(state): State<Arc<AppState<O, A>>>,
    Path(order_number): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PurchaseResponse>, ApiError>
where
    O: OrderStore + 'static,
    A: ArtifactStore + 'static,
{
    let order_number = parse_order_number(&order_number)?;
    let record = state
        .admin
        .find(admin_secret(&headers), order_number)
        .await?;
    Ok(Json(record.into()))
}

/// DELETE /admin/purchases/:order_number: cancel a purchase.
#[tracing::instrument(skip(state, headers))]
pub async fn cancel<O, A>(
    State(state): State<Arc<AppState<O, A>>>,
    Path(order_number): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CancelResponse>, ApiError>
where
    O: OrderStore + 'static,
    A: ArtifactStore + 'static,
{
    let order_number = parse_order_number(&order_number)?;
    let confirmation = state
        .admin
        .cancel(admin_secret(&headers), order_number)
        .await?;
    Ok(Json(CancelResponse {
        order_number: confirmation.order_number.get(),
        message: confirmation.message,
    }))
}

/// POST /admin/tickets/verify: check a scanned ticket payload.
#[tracing::instrument(skip_all)]
pub async fn verify<O, A>(
    State(state): State<Arc<AppState<O, A>>>,
    headers: HeaderMap,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<PurchaseResponse>, ApiError>
where
    O: OrderStore + 'static,
    A: ArtifactStore + 'static,
{
    let Json(request) = body?;
    let record = state
        .admin
        .verify_ticket(admin_secret(&headers), &request.payload)
        .await?;
    Ok(Json(record.into()))
}
