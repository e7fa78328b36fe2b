use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::convert::Infallible;

use crate::app::AppState;
use crate::auth::AuthUser;

/// Where signed-out admin requests are sent
pub const LOGIN_PATH: &str = "/auth";

/// Session gate for the admin routes.
///
/// Resolves the bearer token (or session cookie) and injects the `AuthUser`
/// into request extensions. Anything that does not resolve to a live session
/// is redirected to the sign-in landing with `303 See Other`.
pub async fn require_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let user = current_user(&state, request.headers()).await;

    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "No session, redirecting to {}", LOGIN_PATH);
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    let token = extract_token(headers, &state.config.security.session_cookie)?;
    state.sessions.resolve(&token).await
}

/// `Authorization: Bearer <token>` first, then the session cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Current session on public routes; absent when signed out.
pub struct MaybeUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(current_user(state, &parts.headers).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("folio_session=def"));
        assert_eq!(extract_token(&headers, "folio_session").as_deref(), Some("abc"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; folio_session=def"));
        assert_eq!(extract_token(&headers, "folio_session").as_deref(), Some("def"));
    }

    #[test]
    fn missing_or_malformed_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers, "folio_session"), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("folio_session="));
        assert_eq!(extract_token(&headers, "folio_session"), None);
    }
}
