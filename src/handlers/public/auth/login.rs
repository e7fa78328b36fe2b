// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};

use crate::app::AppState;
use crate::auth::password::verify_password;
use crate::database::models::{Credentials, User};
use crate::error::ApiError;

use super::session_response;

/// POST /auth/login - Sign in with email and password
///
/// Expected Input:
/// ```json
/// { "email": "admin@example.com", "password": "secret" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "user": { "user_id": "uuid", "email": "admin@example.com" },
///     "expires_in": 604800
///   }
/// }
/// ```
///
/// Unknown email and wrong password are indistinguishable (`401`).
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(credentials) = payload?;
    credentials.check_present()?;

    let user = state
        .repo::<User>()
        .find_by("email", credentials.normalized_email())
        .await?;

    let user = match user {
        Some(user) if verify_password(&credentials.password, &user.password_hash) => user,
        _ => {
            tracing::info!("Failed sign-in attempt");
            return Err(ApiError::unauthorized("Invalid email or password"));
        }
    };

    let session = state.sessions.sign_in(&user)?;
    Ok(session_response(&state.config.security, session, StatusCode::OK))
}
