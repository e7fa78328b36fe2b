use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Saved server selection and sign-in state, kept in `session.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliSession {
    #[serde(default)]
    pub server_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub signed_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_ping: Option<DateTime<Utc>>,
}

impl CliSession {
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn sign_in(&mut self, token: Option<String>, email: &str) {
        self.token = token;
        self.email = Some(email.to_string());
        self.signed_in_at = Some(Utc::now());
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.email = None;
        self.signed_in_at = None;
    }

    /// Switching servers drops any token issued by the previous one.
    pub fn use_server(&mut self, url: &str) {
        let url = url.trim_end_matches('/').to_string();
        if self.server_url.as_deref() != Some(url.as_str()) {
            self.sign_out();
            self.last_ping = None;
        }
        self.server_url = Some(url);
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("FOLIO_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("folio").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<CliSession> {
    let session_file = get_config_dir()?.join("session.json");

    if !session_file.exists() {
        return Ok(CliSession::default());
    }

    let content = fs::read_to_string(session_file)?;
    let session: CliSession = serde_json::from_str(&content)?;
    Ok(session)
}

pub fn save_session(session: &CliSession) -> anyhow::Result<()> {
    let session_file = get_config_dir()?.join("session.json");

    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_file, content)?;
    Ok(())
}
