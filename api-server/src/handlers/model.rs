//! Model info and retraining handlers

use std::time::Duration;

use axum::{extract::State, Json};

use crate::middleware::auth::SessionContext;
use crate::models::ModelInfo;
use crate::pipeline;
use crate::{AppError, AppResult, AppState};

pub async fn info(State(state): State<AppState>, _session: SessionContext) -> Json<ModelInfo> {
    Json(ModelInfo::from(state.artifacts.current().as_ref()))
}

/// Retrain from the configured dataset, then save and swap the bundle in service
pub async fn retrain(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<ModelInfo>> {
    if !state.config.allow_retrain {
        return Err(AppError::Forbidden("Retraining is disabled".to_string()));
    }

    // Held until the swap so disk and memory always hold the same bundle
    let _guard = state
        .retrain_lock
        .try_lock()
        .map_err(|_| AppError::Conflict("Retraining already in progress".to_string()))?;

    tracing::info!("Retrain requested by '{}'", session.username);

    let config = state.config.clone();
    let limit = Duration::from_secs(state.config.training_timeout_secs);
    // A timed-out task keeps running on the blocking pool; it writes nothing
    // and its result is dropped
    let task = tokio::task::spawn_blocking(move || pipeline::train(&config));

    let bundle = tokio::time::timeout(limit, task)
        .await
        .map_err(|_| AppError::Timeout(format!("retraining exceeded {}s", limit.as_secs())))?
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .map_err(|e| AppError::TrainingFailed(e.to_string()))?;

    let config = state.config.clone();
    let bundle = tokio::task::spawn_blocking(move || {
        pipeline::persist(&config, &bundle);
        bundle
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    let info = ModelInfo::from(&bundle);
    state.artifacts.replace(bundle);
    Ok(Json(info))
}
