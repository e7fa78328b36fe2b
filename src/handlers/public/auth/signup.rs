// handlers/public/auth/signup.rs - POST /auth/signup handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::password::hash_password;
use crate::crud::Form;
use crate::database::models::{Credentials, User};
use crate::database::Row;
use crate::error::ApiError;

use super::session_response;

/// POST /auth/signup - Create an admin account and sign it in
///
/// Same body as `/auth/login`. Passwords need at least 6 characters.
/// Disabled (`403`) when `SECURITY_ALLOW_SIGNUP` is false; an existing
/// email is a `409`.
pub async fn signup_post(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, ApiError> {
    if !state.config.security.allow_signup {
        return Err(ApiError::forbidden("Sign-up is disabled"));
    }

    let Json(credentials) = payload?;
    credentials.validate()?;

    let users = state.repo::<User>();
    let email = credentials.normalized_email();
    if users.find_by("email", email.as_str()).await?.is_some() {
        return Err(ApiError::conflict("An account with this email already exists"));
    }

    let mut row = Row::new();
    row.insert("email".to_string(), Value::String(email));
    row.insert("password_hash".to_string(), json!(hash_password(&credentials.password)?));
    let user = users.create(row).await?;

    tracing::info!(user_id = %user.id, "Account created");
    let session = state.sessions.sign_in(&user)?;
    Ok(session_response(&state.config.security, session, StatusCode::CREATED))
}
