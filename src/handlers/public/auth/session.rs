// handlers/public/auth/session.rs - GET /auth/session handler

use crate::auth::AuthUser;
use crate::middleware::{ApiResponse, MaybeUser};

/// GET /auth/session - Current user, or `null` when signed out
///
/// Never fails: a missing, expired or revoked token is simply no user.
pub async fn session_get(MaybeUser(user): MaybeUser) -> ApiResponse<Option<AuthUser>> {
    ApiResponse::success(user)
}
