//! Premium estimation handler

use axum::{extract::State, Json};
use premium_core::RawInput;

use crate::extract::AppJson;
use crate::middleware::auth::SessionContext;
use crate::models::PredictionResponse;
use crate::{AppResult, AppState};

pub async fn estimate(
    State(state): State<AppState>,
    session: SessionContext,
    AppJson(raw): AppJson<RawInput>,
) -> AppResult<Json<PredictionResponse>> {
    // Snapshot: a concurrent retrain cannot change the bundle mid-request
    let bundle = state.artifacts.current();
    let premium_estimate = bundle.predict(&raw)?;

    tracing::debug!(
        user = %session.username,
        bundle = %bundle.metadata.id,
        premium_estimate,
        "Premium estimated"
    );

    Ok(Json(PredictionResponse { premium_estimate }))
}
