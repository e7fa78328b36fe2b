// handlers/public/auth/landing.rs - GET /auth handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, MaybeUser};

/// GET /auth - Sign-in landing; where signed-out admin requests are redirected
pub async fn landing_get(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "signed_in": user.is_some(),
        "user": user,
        "signup_enabled": state.config.security.allow_signup,
        "endpoints": {
            "login": "POST /auth/login",
            "signup": "POST /auth/signup",
            "refresh": "POST /auth/refresh",
            "logout": "POST /auth/logout",
            "session": "GET /auth/session",
            "admin": "/admin"
        }
    }))
}
