//! Standalone code rendering.

use std::sync::Arc;

use artifact_store::ArtifactStore;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use order_store::OrderStore;
use serde::{Deserialize, Serialize};
use ticketing::CodeGenerator;

use super::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CodeRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize)]
pub struct CodeResponse {
    /// `data:image/png;base64,...`
    pub code: String,
}

/// POST /codes: render arbitrary text as a QR code data URL.
///
/// Nothing is stored.
#[tracing::instrument(skip_all)]
pub async fn generate<O, A>(
    State(state): State<Arc<AppState<O, A>>>,
    body: Result<Json<CodeRequest>, JsonRejection>,
) -> Result<Json<CodeResponse>, ApiError>
where
    O: OrderStore + 'static,
    A: ArtifactStore + 'static,
{
    let Json(request) = body?;
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text is required".to_string()));
    }

    let code = state.generator.generate_data_url(&request.text)?;
    Ok(Json(CodeResponse { code }))
}
