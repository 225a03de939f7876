use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use thiserror::Error;

/// Failures inside the sheet analysis pipelines.
///
/// These never leave an analyzer: `AnalysisOutcome::from_result` turns each
/// one into the user-facing status line given by its `Display` impl.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required column had no header within the mismatch budget.
    #[error("column '{target}' not found. Available: {available:?}")]
    ColumnNotFound {
        target: String,
        available: Vec<String>,
    },

    /// None of the checked-count placeholder columns resolved.
    #[error("checked columns '{sought}' not found. Available: {available:?}")]
    NoCheckedColumns {
        sought: String,
        available: Vec<String>,
    },

    /// Both the delimited-text and the spreadsheet parse failed.
    #[error("processing error: {detail}")]
    Load { detail: String },

    #[error("processing error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    /// The table had no rows left after dropping non-numeric ones.
    #[error("{0}")]
    EmptyAfterFilter(&'static str),

    /// Every row totals zero, so there is nothing to normalize against.
    #[error("nothing has been checked yet")]
    NoSignal,
}

impl AnalysisError {
    pub fn load(detail: impl Into<String>) -> Self {
        AnalysisError::Load { detail: detail.into() }
    }
}

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    IoError(std::io::Error),
    NoFileLoaded,
    HttpError(String),
    Internal(String),
    FileProcessingError(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::HttpError(msg) => write!(f, "HTTP Error: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::IoError(err) => write!(f, "IO error: {}", err),
            AppError::NoFileLoaded => write!(f, "upload a file first"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::FileProcessingError(msg) => write!(f, "File processing error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::HttpError(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NoFileLoaded => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::FileProcessingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
