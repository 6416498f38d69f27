//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::AppJson;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::store::Verification;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Username
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at
}

/// Create an account
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    state.credentials.register(&req.username, &req.password)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: req.username,
        }),
    ))
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.trim();

    match state.credentials.verify(username, &req.password) {
        Verification::Verified => {}
        Verification::UnknownUser => {
            tracing::debug!("Login attempt for unregistered user '{}'", username);
            return Err(AppError::RegistrationRequired);
        }
        Verification::WrongPassword => {
            tracing::warn!("Failed login for user '{}'", username);
            return Err(AppError::InvalidCredentials);
        }
    }

    let token = generate_jwt(username, &state.config.jwt_secret, state.config.jwt_expiration_hours)?;

    Ok(Json(LoginResponse {
        token,
        username: username.to_string(),
    }))
}

/// Generate JWT token
pub fn generate_jwt(username: &str, secret: &str, expiration_hours: u64) -> AppResult<String> {
    let now = Utc::now();
    let exp = now + Duration::hours(expiration_hours as i64);

    let claims = Claims {
        sub: username.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes())
    ).map_err(|e| AppError::InternalError(e.to_string()))
}
