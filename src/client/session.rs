use tokio::sync::watch;

use crate::auth::AuthUser;
use crate::client::{ClientError, FolioClient};
use crate::crud::Form;
use crate::database::models::Credentials;
use crate::middleware::LOGIN_PATH;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<AuthUser>,
    pub loading: bool,
}

/// What an admin screen should do with the current session.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    Loading,
    Redirect(&'static str),
    Allowed(AuthUser),
}

/// Client-side session context: current user or none, plus a loading flag,
/// published on a watch channel.
pub struct SessionState {
    client: FolioClient,
    state: watch::Sender<SessionSnapshot>,
}

impl SessionState {
    pub fn new(client: FolioClient) -> Self {
        let (state, _) = watch::channel(SessionSnapshot { user: None, loading: true });
        Self { client, state }
    }

    pub fn client(&self) -> &FolioClient {
        &self.client
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Asks the service for the existing session. Any failure is "no user".
    pub async fn initialize(&self) -> Option<AuthUser> {
        let user = match self.client.token() {
            None => None,
            Some(_) => self.client.session().await.unwrap_or_else(|e| {
                tracing::debug!("Session lookup failed: {}", e);
                None
            }),
        };
        self.publish(user.clone());
        user
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, ClientError> {
        credentials.check_present().map_err(ClientError::Invalid)?;
        let session = self.client.login(credentials).await?;
        self.publish(Some(session.user.clone()));
        Ok(session.user)
    }

    pub async fn sign_up(&self, credentials: &Credentials) -> Result<AuthUser, ClientError> {
        credentials.validate().map_err(ClientError::Invalid)?;
        let session = self.client.signup(credentials).await?;
        self.publish(Some(session.user.clone()));
        Ok(session.user)
    }

    pub async fn refresh(&self) -> Result<AuthUser, ClientError> {
        match self.client.refresh().await {
            Ok(session) => {
                self.publish(Some(session.user.clone()));
                Ok(session.user)
            }
            Err(e) => {
                self.client.set_token(None);
                self.publish(None);
                Err(e)
            }
        }
    }

    /// Always ends signed out locally, even if the server call fails.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let result = self.client.logout().await;
        self.publish(None);
        result
    }

    pub fn require_user(&self) -> Gate {
        gate_for(&self.snapshot())
    }

    fn publish(&self, user: Option<AuthUser>) {
        self.state.send_replace(SessionSnapshot { user, loading: false });
    }
}

pub fn gate_for(snapshot: &SessionSnapshot) -> Gate {
    match (&snapshot.user, snapshot.loading) {
        (Some(user), _) => Gate::Allowed(user.clone()),
        (None, true) => Gate::Loading,
        (None, false) => Gate::Redirect(LOGIN_PATH),
    }
}
