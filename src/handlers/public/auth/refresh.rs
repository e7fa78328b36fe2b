// handlers/public/auth/refresh.rs - POST /auth/refresh handler

use axum::{extract::State, http::StatusCode, response::Response};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::MaybeUser;

use super::session_response;

/// POST /auth/refresh - Exchange a live session token for a fresh one
///
/// The presented token is revoked; only the returned token resolves
/// afterwards.
pub async fn refresh_post(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Result<Response, ApiError> {
    let user = user.ok_or_else(|| ApiError::unauthorized("No active session"))?;
    let session = state.sessions.refresh(&user).await?;
    Ok(session_response(&state.config.security, session, StatusCode::OK))
}
