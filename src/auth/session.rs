use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::auth::{generate_jwt, validate_jwt, Claims, JwtError};
use crate::config::SecurityConfig;
use crate::database::models::User;

const EVENT_CAPACITY: usize = 64;

/// Signed-in identity resolved from a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    #[serde(skip)]
    pub token_id: Uuid,
    #[serde(skip)]
    pub expires_at: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            token_id: claims.jti,
            expires_at: claims.exp,
        }
    }
}

/// Issued on sign-in, sign-up and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub user: AuthUser,
    /// Seconds until expiry
    pub expires_in: i64,
}

/// Session lifecycle notifications for subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { user_id: Uuid, email: String },
    SignedOut { user_id: Uuid },
    TokenRefreshed { user_id: Uuid },
}

/// Decides whether a request carries a live session.
///
/// Tokens are self-contained JWTs; sign-out and refresh revoke the old
/// token id until its natural expiry. Any failure to resolve a token is
/// reported as "no user", never as an error.
pub struct SessionGate {
    secret: String,
    expiry_hours: u64,
    revoked: RwLock<HashMap<Uuid, i64>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionGate {
    pub fn new(security: &SecurityConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            secret: security.jwt_secret.clone(),
            expiry_hours: security.jwt_expiry_hours,
            revoked: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn resolve(&self, token: &str) -> Option<AuthUser> {
        let claims = match validate_jwt(token, &self.secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                return None;
            }
        };
        if self.revoked.read().await.contains_key(&claims.jti) {
            tracing::debug!(jti = %claims.jti, "Session token revoked");
            return None;
        }
        Some(AuthUser::from(claims))
    }

    pub fn sign_in(&self, user: &User) -> Result<SessionToken, JwtError> {
        let session = self.issue(user.id, &user.email)?;
        self.publish(SessionEvent::SignedIn { user_id: user.id, email: user.email.clone() });
        Ok(session)
    }

    pub async fn sign_out(&self, user: &AuthUser) {
        self.revoke(user).await;
        self.publish(SessionEvent::SignedOut { user_id: user.user_id });
    }

    /// New token for the same user; the presented one stops resolving.
    pub async fn refresh(&self, user: &AuthUser) -> Result<SessionToken, JwtError> {
        let session = self.issue(user.user_id, &user.email)?;
        self.revoke(user).await;
        self.publish(SessionEvent::TokenRefreshed { user_id: user.user_id });
        Ok(session)
    }

    fn issue(&self, user_id: Uuid, email: &str) -> Result<SessionToken, JwtError> {
        let claims = Claims::new(user_id, email, self.expiry_hours);
        let token = generate_jwt(&claims, &self.secret)?;
        let expires_in = claims.exp - claims.iat;
        Ok(SessionToken { token, user: AuthUser::from(claims), expires_in })
    }

    async fn revoke(&self, user: &AuthUser) {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(user.token_id, user.expires_at);
    }

    fn publish(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn gate() -> SessionGate {
        SessionGate::new(&AppConfig::in_memory().security)
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn issued_token_resolves() {
        let gate = gate();
        let user = user();
        let session = gate.sign_in(&user).unwrap();
        let resolved = gate.resolve(&session.token).await.unwrap();
        assert_eq!(resolved.user_id, user.id);
        assert_eq!(resolved.email, "ada@example.com");
        assert!(session.expires_in > 0);
    }

    #[tokio::test]
    async fn garbage_resolves_to_no_user() {
        assert!(gate().resolve("not-a-token").await.is_none());
        assert!(gate().resolve("").await.is_none());
    }

    #[tokio::test]
    async fn sign_out_revokes_token() {
        let gate = gate();
        let session = gate.sign_in(&user()).unwrap();
        let current = gate.resolve(&session.token).await.unwrap();
        gate.sign_out(&current).await;
        assert!(gate.resolve(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn refresh_replaces_token() {
        let gate = gate();
        let old = gate.sign_in(&user()).unwrap();
        let current = gate.resolve(&old.token).await.unwrap();
        let new = gate.refresh(&current).await.unwrap();
        assert!(gate.resolve(&old.token).await.is_none());
        assert!(gate.resolve(&new.token).await.is_some());
    }

    #[tokio::test]
    async fn publishes_lifecycle_events() {
        let gate = gate();
        let mut events = gate.subscribe();
        let user = user();
        let session = gate.sign_in(&user).unwrap();
        let current = gate.resolve(&session.token).await.unwrap();
        let refreshed = gate.refresh(&current).await.unwrap();
        gate.sign_out(&refreshed.user).await;

        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::SignedIn { user_id: user.id, email: user.email.clone() }
        );
        assert_eq!(events.recv().await.unwrap(), SessionEvent::TokenRefreshed { user_id: user.id });
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut { user_id: user.id });
    }
}
