use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

fn default_session_idle() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub addr: SocketAddr,
    pub max_file_size: usize,
    pub session_idle: Duration,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = lookup("SHEET_AUDIT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("bot_data"));

        let addr = match lookup("SHEET_AUDIT_ADDR") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid SHEET_AUDIT_ADDR: {}", raw))?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let max_file_size = match lookup("SHEET_AUDIT_MAX_FILE_SIZE") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid SHEET_AUDIT_MAX_FILE_SIZE: {}", raw))?,
            None => default_max_file_size(),
        };

        let session_idle = match lookup("SHEET_AUDIT_SESSION_IDLE_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("Invalid SHEET_AUDIT_SESSION_IDLE_SECS: {}", raw))?,
            ),
            None => default_session_idle(),
        };

        Ok(Config {
            data_dir,
            addr,
            max_file_size,
            session_idle,
        })
    }
}
