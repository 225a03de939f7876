use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// What an analyzer hands back: flagged rows, or a single status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Flagged(Vec<String>),
    Status(String),
}

impl AnalysisOutcome {
    /// Collapse a pipeline result, rendering any error as its status line.
    pub fn from_result(result: Result<AnalysisOutcome, AnalysisError>) -> Self {
        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Analysis ended early: {}", e);
                AnalysisOutcome::Status(e.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FileUrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub bytes: usize,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResponse {
    Flagged {
        lines: Vec<String>,
        report_path: String,
    },
    Status {
        message: String,
    },
}
