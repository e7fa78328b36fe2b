//! Typed HTTP client for the folio API and the screen state machines built
//! on it. Redirects are never followed: a redirect to the sign-in landing is
//! how the server reports "no session", and it surfaces as
//! [`ClientError::SignedOut`].

pub mod inbox;
pub mod screen;
pub mod session;

use std::sync::{Arc, RwLock};

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{AuthUser, SessionToken};
use crate::crud::{Entity, FieldErrors};
use crate::database::models::{ContactForm, ContactMessage, Credentials, Profile, ProfileForm};

pub use inbox::InboxScreen;
pub use screen::{CrudScreen, Notice};
pub use session::{Gate, SessionSnapshot, SessionState};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not signed in")]
    SignedOut,

    #[error("a submission is already in progress")]
    Busy,

    #[error("invalid input: {0}")]
    Invalid(FieldErrors),

    #[error("{message} ({status})")]
    Status {
        status: u16,
        code: String,
        message: String,
        field_errors: Option<FieldErrors>,
    },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    field_errors: Option<FieldErrors>,
}

/// Cheap to clone; clones share the session token.
#[derive(Clone)]
pub struct FolioClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl FolioClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn with_token(self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    // Public site

    pub async fn site(&self) -> Result<Value, ClientError> {
        self.get("/").await
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get("/health").await
    }

    pub async fn contact(&self, form: &ContactForm) -> Result<ContactMessage, ClientError> {
        self.send(Method::POST, "/contact", Some(form)).await
    }

    // Identity

    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ClientError> {
        let session: SessionToken = self.send(Method::POST, "/auth/login", Some(credentials)).await?;
        self.set_token(Some(session.token.clone()));
        Ok(session)
    }

    pub async fn signup(&self, credentials: &Credentials) -> Result<SessionToken, ClientError> {
        let session: SessionToken = self.send(Method::POST, "/auth/signup", Some(credentials)).await?;
        self.set_token(Some(session.token.clone()));
        Ok(session)
    }

    pub async fn refresh(&self) -> Result<SessionToken, ClientError> {
        let session: SessionToken = self.send(Method::POST, "/auth/refresh", None::<&()>).await?;
        self.set_token(Some(session.token.clone()));
        Ok(session)
    }

    /// Revokes the token server-side; the local token is dropped either way.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result: Result<Value, _> = self.send(Method::POST, "/auth/logout", None::<&()>).await;
        self.set_token(None);
        result.map(|_| ())
    }

    pub async fn session(&self) -> Result<Option<AuthUser>, ClientError> {
        self.get("/auth/session").await
    }

    // Admin

    pub async fn dashboard(&self) -> Result<Value, ClientError> {
        self.get("/admin").await
    }

    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, ClientError> {
        self.get(&format!("/admin/{}", E::PATH)).await
    }

    pub async fn show<E: Entity>(&self, id: Uuid) -> Result<E, ClientError> {
        self.get(&format!("/admin/{}/{}", E::PATH, id)).await
    }

    pub async fn create<E: Entity>(&self, draft: &E::Draft) -> Result<E, ClientError> {
        self.send(Method::POST, &format!("/admin/{}", E::PATH), Some(draft)).await
    }

    pub async fn update<E: Entity>(&self, id: Uuid, patch: &E::Patch) -> Result<E, ClientError> {
        self.send(Method::PATCH, &format!("/admin/{}/{}", E::PATH, id), Some(patch)).await
    }

    pub async fn delete<E: Entity>(&self, id: Uuid) -> Result<(), ClientError> {
        let _: Value = self.send(Method::DELETE, &format!("/admin/{}/{}", E::PATH, id), None::<&()>).await?;
        Ok(())
    }

    pub async fn profile(&self) -> Result<Option<Profile>, ClientError> {
        self.get("/admin/profile").await
    }

    pub async fn save_profile(&self, form: &ProfileForm) -> Result<Profile, ClientError> {
        self.send(Method::PUT, "/admin/profile", Some(form)).await
    }

    pub async fn messages(&self) -> Result<Vec<ContactMessage>, ClientError> {
        self.get("/admin/messages").await
    }

    pub async fn message(&self, id: Uuid) -> Result<ContactMessage, ClientError> {
        self.get(&format!("/admin/messages/{}", id)).await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<ContactMessage, ClientError> {
        self.send(Method::POST, &format!("/admin/messages/{}/read", id), None::<&()>).await
    }

    pub async fn delete_message(&self, id: Uuid) -> Result<(), ClientError> {
        let _: Value = self.send(Method::DELETE, &format!("/admin/messages/{}", id), None::<&()>).await?;
        Ok(())
    }

    /// Untyped request for callers that work with raw JSON (the CLI).
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ClientError> {
        self.send(method, path, body).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(Method::GET, path, None::<&()>).await
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            tracing::debug!(%status, location, "Redirected, treating as signed out");
            return Err(ClientError::SignedOut);
        }

        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(error_from(status, &bytes));
        }

        serde_json::from_slice::<Envelope<T>>(&bytes)
            .map(|envelope| envelope.data)
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn error_from(status: StatusCode, bytes: &[u8]) -> ClientError {
    let body: ErrorBody = serde_json::from_slice(bytes).unwrap_or(ErrorBody {
        error: String::from_utf8_lossy(bytes).into_owned(),
        code: String::new(),
        field_errors: None,
    });
    if status == StatusCode::CONFLICT && body.code == "SUBMISSION_IN_PROGRESS" {
        return ClientError::Busy;
    }
    ClientError::Status {
        status: status.as_u16(),
        code: body.code,
        message: body.error,
        field_errors: body.field_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_is_recognized_by_code() {
        let body = br#"{"success":false,"error":"busy","code":"SUBMISSION_IN_PROGRESS"}"#;
        assert!(matches!(error_from(StatusCode::CONFLICT, body), ClientError::Busy));

        let body = br#"{"success":false,"error":"exists","code":"CONFLICT"}"#;
        assert_eq!(error_from(StatusCode::CONFLICT, body).status(), Some(409));
    }

    #[test]
    fn field_errors_are_kept() {
        let body = br#"{"success":false,"error":"bad","code":"VALIDATION_ERROR","field_errors":{"name":"This field is required"}}"#;
        match error_from(StatusCode::BAD_REQUEST, body) {
            ClientError::Status { field_errors: Some(errors), .. } => {
                assert_eq!(errors.get("name"), Some("This field is required"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn non_json_errors_keep_body_text() {
        let err = error_from(StatusCode::BAD_GATEWAY, b"upstream down");
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn base_url_is_normalized() {
        let client = FolioClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.token(), None);
        let client = client.with_token(Some("abc".into()));
        assert_eq!(client.clone().token().as_deref(), Some("abc"));
    }
}
