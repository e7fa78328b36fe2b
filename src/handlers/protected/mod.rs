// handlers/protected/mod.rs - Session-gated admin handlers
//
// Every route here sits behind `middleware::require_session`, so handlers
// can take `Extension<AuthUser>` unconditionally.
pub mod crud;
pub mod dashboard;
pub mod messages;
pub mod profile;
