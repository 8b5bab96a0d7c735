//! Authentication handlers

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::handlers::users::invalid_json;
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use roster_core::{LoginRequest, LoginResponse};
use tracing::{info, warn};

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload.map_err(invalid_json)?;
    info!("Login attempt for: {}", req.email);

    let token = state.auth.login(&req.email, &req.password).map_err(|e| {
        warn!("Login failed for {}: {}", req.email, e);
        ApiError::Unauthorized("Invalid credentials".to_string())
    })?;

    info!("Login successful for: {}", req.email);
    Ok(Json(LoginResponse { token }))
}

/// Greets the bearer of a valid token
pub async fn restricted(user: AuthUser) -> String {
    format!("Welcome {}!", user.name)
}
