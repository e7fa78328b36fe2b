// handlers/public/auth/mod.rs - Token acquisition and session lookup
//
// Every handler that issues a token also sets the session cookie, so both
// bearer clients (CLI) and cookie clients (browser) can use the admin area.

pub mod landing;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod session;
pub mod signup;

pub use landing::landing_get;
pub use login::login_post;
pub use logout::logout_post;
pub use refresh::refresh_post;
pub use session::session_get;
pub use signup::signup_post;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::auth::SessionToken;
use crate::config::SecurityConfig;
use crate::middleware::ApiResponse;

/// Session response plus `Set-Cookie` for the new token
pub(crate) fn session_response(security: &SecurityConfig, session: SessionToken, status: StatusCode) -> Response {
    let cookie = session_cookie(security, &session.token, session.expires_in);
    let mut response = ApiResponse::with_status(session, status).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

pub(crate) fn session_cookie(security: &SecurityConfig, token: &str, max_age: i64) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        security.session_cookie, token, max_age
    );
    if security.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn cookie_attributes() {
        let mut security = AppConfig::development().security;
        let cookie = session_cookie(&security, "abc", 60);
        assert_eq!(cookie, "folio_session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=60");

        security.secure_cookie = true;
        assert!(session_cookie(&security, "", 0).ends_with("Max-Age=0; Secure"));
    }
}
