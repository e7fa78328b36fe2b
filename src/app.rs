use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{any, get, post},
    Router,
};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{SessionEvent, SessionGate};
use crate::config::{AppConfig, SecurityConfig};
use crate::crud::{Entity, Record};
use crate::database::models::{Education, Experience, Skill};
use crate::database::{Repository, TableStore};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{require_session, SubmitGuard};

/// Shared per-process state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn TableStore>,
    pub sessions: Arc<SessionGate>,
    pub submissions: SubmitGuard,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn TableStore>) -> Self {
        let sessions = Arc::new(SessionGate::new(&config.security));
        Self {
            config: Arc::new(config),
            store,
            sessions,
            submissions: SubmitGuard::new(),
        }
    }

    pub fn repo<T: Record>(&self) -> Repository<T> {
        Repository::new(Arc::clone(&self.store))
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::site::index))
        .route("/health", get(health))
        .route("/contact", post(public::contact::contact_post))
        // Public auth routes
        .merge(auth_public_routes())
        // Session-gated admin
        .merge(admin_routes(state.clone()))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth", get(auth::landing_get))
        .route("/auth/login", post(auth::login_post))
        .route("/auth/signup", post(auth::signup_post))
        .route("/auth/refresh", post(auth::refresh_post))
        .route("/auth/logout", post(auth::logout_post))
        .route("/auth/session", get(auth::session_get))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use protected::{dashboard, messages, profile};

    Router::new()
        .route("/admin", get(dashboard::dashboard_get))
        .route("/admin/profile", get(profile::profile_get).put(profile::profile_put))
        .merge(crud_routes::<Experience>())
        .merge(crud_routes::<Education>())
        .merge(crud_routes::<Skill>())
        .route("/admin/messages", get(messages::list))
        .route("/admin/messages/:id", get(messages::show).delete(messages::delete))
        .route("/admin/messages/:id/read", post(messages::mark_read))
        // unknown admin paths are gated too, then 404
        .route("/admin/*rest", any(not_found))
        .route_layer(from_fn_with_state(state, require_session))
}

/// Collection and member routes for one admin table.
fn crud_routes<E: Entity>() -> Router<AppState> {
    use protected::crud;

    Router::new()
        .route(
            &format!("/admin/{}", E::PATH),
            get(crud::list::<E>).post(crud::create::<E>),
        )
        .route(
            &format!("/admin/{}/:id", E::PATH),
            get(crud::show::<E>)
                .put(crud::update::<E>)
                .patch(crud::update::<E>)
                .delete(crud::delete::<E>),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Logs session lifecycle events until the gate is dropped.
pub fn spawn_session_audit(sessions: &SessionGate) -> JoinHandle<()> {
    let mut events = sessions.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedIn { user_id, email }) => {
                    tracing::info!(%user_id, %email, "User signed in");
                }
                Ok(SessionEvent::SignedOut { user_id }) => {
                    tracing::info!(%user_id, "User signed out");
                }
                Ok(SessionEvent::TokenRefreshed { user_id }) => {
                    tracing::info!(%user_id, "Session token refreshed");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session audit fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;
    use uuid::Uuid;

    use crate::database::models::User;

    #[tokio::test]
    async fn session_audit_stops_when_gate_is_dropped() {
        let gate = SessionGate::new(&AppConfig::in_memory().security);
        let mut events = gate.subscribe();
        let audit = spawn_session_audit(&gate);

        let user = User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        };
        gate.sign_in(&user).unwrap();
        assert!(matches!(events.recv().await, Ok(SessionEvent::SignedIn { user_id, .. }) if user_id == user.id));
        assert!(!audit.is_finished());

        drop(gate);
        tokio::time::timeout(Duration::from_secs(1), audit)
            .await
            .expect("audit task exits once the gate is gone")
            .unwrap();
    }
}
