#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use folio_api::client::FolioClient;
use folio_api::config::AppConfig;
use folio_api::database::models::Credentials;
use folio_api::database::{DatabaseError, MemoryStore, Row, Table, TableStore};
use folio_api::filter::Filter;
use folio_api::{app, AppState};

pub const PASSWORD: &str = "correct-horse";

/// The router served in-process on a free port, backed by its own memory
/// store so tests never share rows.
pub struct TestServer {
    pub base_url: String,
    pub memory: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(AppConfig::in_memory(), Duration::ZERO).await
    }

    /// Writes to the store take at least `write_delay`, which keeps a
    /// submission in flight long enough to race a second one against it.
    pub async fn spawn_with(config: AppConfig, write_delay: Duration) -> Result<Self> {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn TableStore> = if write_delay.is_zero() {
            memory.clone()
        } else {
            Arc::new(SlowStore { inner: memory.clone(), delay: write_delay })
        };
        let state = AppState::new(config, store);

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        let router = app(state.clone());
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("test server stopped: {}", e);
            }
        });

        Ok(Self { base_url: format!("http://127.0.0.1:{}", port), memory, state })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Raw HTTP client that reports redirects instead of following them.
    pub fn http(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("reqwest client")
    }

    pub fn client(&self) -> FolioClient {
        FolioClient::new(self.base_url.clone()).expect("folio client")
    }

    /// Client signed in as a freshly created account.
    pub async fn signed_in(&self) -> Result<FolioClient> {
        let client = self.client();
        client.signup(&Credentials::new(unique_email(), PASSWORD)).await?;
        Ok(client)
    }

    pub fn writes(&self) -> usize {
        self.memory.write_count()
    }
}

pub fn unique_email() -> String {
    format!("owner-{}@example.com", Uuid::new_v4().simple())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Delays every write, then delegates.
struct SlowStore {
    inner: Arc<MemoryStore>,
    delay: Duration,
}

#[async_trait]
impl TableStore for SlowStore {
    async fn select(&self, table: Table, filter: Filter) -> Result<Vec<Row>, DatabaseError> {
        self.inner.select(table, filter).await
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, DatabaseError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: Table, id: Uuid, changes: Row) -> Result<Option<Row>, DatabaseError> {
        tokio::time::sleep(self.delay).await;
        self.inner.update(table, id, changes).await
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, DatabaseError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(table, id).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.inner.health_check().await
    }
}
