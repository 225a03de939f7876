use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use parking_lot::Mutex;

use crate::error::AppError;
use crate::services::sheet::utils::clean_path_segment;

const UPLOAD_FILE_NAME: &str = "data";
const PARTIAL_UPLOAD_FILE_NAME: &str = "data.tmp";
const MAX_SESSIONS: u64 = 10_000;

/// One conversation's upload slot.
///
/// The mutex serializes uploads against analyses of the same session.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub dir: PathBuf,
    uploaded_at: Mutex<Option<DateTime<Utc>>>,
}

impl Session {
    fn new(id: String, dir: PathBuf) -> Self {
        Self {
            id,
            dir,
            uploaded_at: Mutex::new(None),
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir.join(UPLOAD_FILE_NAME)
    }

    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        *self.uploaded_at.lock()
    }

    /// Replace the session's file. Blocks, so call it off the async runtime.
    ///
    /// The new content is written aside and renamed over the old file, so a
    /// failed write leaves the previous upload intact.
    pub fn store_upload(&self, bytes: &[u8]) -> Result<DateTime<Utc>, AppError> {
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("uploaded file is empty".to_string()));
        }

        let mut uploaded_at = self.uploaded_at.lock();
        fs::create_dir_all(&self.dir)?;
        let partial = self.dir.join(PARTIAL_UPLOAD_FILE_NAME);
        fs::write(&partial, bytes)?;
        fs::rename(&partial, self.file_path())?;

        let now = Utc::now();
        *uploaded_at = Some(now);
        tracing::info!("Session {} stored {} bytes", self.id, bytes.len());
        Ok(now)
    }

    /// Run `f` on the uploaded file while holding the session lock.
    pub fn with_loaded_file<T>(&self, f: impl FnOnce(&Path) -> T) -> Result<T, AppError> {
        let uploaded_at = self.uploaded_at.lock();
        if uploaded_at.is_none() {
            return Err(AppError::NoFileLoaded);
        }
        Ok(f(&self.file_path()))
    }
}

/// Sessions keyed by sanitized id, dropped after a period of inactivity.
#[derive(Clone)]
pub struct SessionStore {
    data_dir: PathBuf,
    sessions: Cache<String, Arc<Session>>,
}

impl SessionStore {
    pub fn new(data_dir: PathBuf, idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(idle)
            .build();
        Self { data_dir, sessions }
    }

    pub fn session(&self, raw_id: &str) -> Arc<Session> {
        let id = clean_path_segment(raw_id);
        let dir = self.data_dir.join(&id);
        self.sessions
            .get_with(id.clone(), || Arc::new(Session::new(id, dir)))
    }
}
