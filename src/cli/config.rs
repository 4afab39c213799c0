use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8081";
const SESSION_FILE: &str = "session.json";

/// Server URL and, once signed in, the bearer token and who it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub server_url: String,
    pub token: Option<String>,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub signed_in_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
            user_id: None,
            username: None,
            signed_in_at: None,
        }
    }
}

impl Session {
    pub fn sign_in(&mut self, token: String, user_id: Uuid, username: String) {
        self.token = Some(token);
        self.user_id = Some(user_id);
        self.username = Some(username);
        self.signed_in_at = Some(Utc::now());
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.user_id = None;
        self.username = None;
        self.signed_in_at = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn require_user(&self) -> anyhow::Result<Uuid> {
        self.user_id
            .ok_or_else(|| anyhow::anyhow!("Not signed in; run `drycraft auth login` first"))
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("DRYCRAFT_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("drycraft").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Session> {
    let session_file = get_config_dir()?.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(Session::default());
    }

    let content = fs::read_to_string(session_file)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(session)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    let session_file = get_config_dir()?.join(SESSION_FILE);

    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_file, content)?;
    Ok(())
}
