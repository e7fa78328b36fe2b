// handlers/public/auth/logout.rs - POST /auth/logout handler

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::app::AppState;
use crate::middleware::{ApiResponse, MaybeUser};

use super::session_cookie;

/// POST /auth/logout - Revoke the current token and clear the cookie
///
/// Succeeds whether or not a session was present.
pub async fn logout_post(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Response {
    let signed_out = match user {
        Some(user) => {
            state.sessions.sign_out(&user).await;
            true
        }
        None => false,
    };

    let mut response = ApiResponse::success(json!({ "signed_out": signed_out })).into_response();
    let cleared = session_cookie(&state.config.security, "", 0);
    if let Ok(value) = HeaderValue::from_str(&cleared) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}
