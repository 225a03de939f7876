use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::post,
    Router,
    Json,
    http::Method,
};
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::{AnalysisOutcome, AnalysisResponse, FileUrlRequest, UploadResponse},
    services::{
        report::{save_report, ReportKind},
        sheet::{analyze_grades, analyze_homework, utils::load_file_from_url},
    },
};
use tower_http::cors::{CorsLayer, Any};

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/sessions/:session_id/file", post(upload_file))
        .route("/sessions/:session_id/file-url", post(upload_file_from_url))
        .route("/sessions/:session_id/homework", post(check_homework))
        .route("/sessions/:session_id/grades", post(check_grades))
        .layer(cors)
}

async fn upload_file(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<Json<UploadResponse>, AppError> {
    store_upload(&state, &session_id, body).await
}

async fn upload_file_from_url(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<FileUrlRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    tracing::info!("Downloading upload for session {}", session_id);
    let download_start = std::time::Instant::now();
    let body = load_file_from_url(&request.url).await?;
    tracing::info!(
        "File downloaded, size: {}KB, took: {:?}",
        body.len() / 1024,
        download_start.elapsed()
    );
    store_upload(&state, &session_id, body).await
}

async fn check_homework(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<AnalysisResponse>, AppError> {
    run_analysis(&state, &session_id, ReportKind::Homework).await
}

async fn check_grades(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<AnalysisResponse>, AppError> {
    run_analysis(&state, &session_id, ReportKind::Grades).await
}

async fn store_upload(
    state: &AppState,
    session_id: &str,
    body: Bytes,
) -> Result<Json<UploadResponse>, AppError> {
    let session = state.sessions.session(session_id);
    let bytes = body.len();
    let id = session.id.clone();

    let uploaded_at = tokio::task::spawn_blocking(move || session.store_upload(&body)).await??;

    Ok(Json(UploadResponse {
        session_id: id,
        bytes,
        uploaded_at,
    }))
}

/// Analyze the session's file; flagged rows are also saved as a report
/// next to the upload.
async fn run_analysis(
    state: &AppState,
    session_id: &str,
    kind: ReportKind,
) -> Result<Json<AnalysisResponse>, AppError> {
    let start = std::time::Instant::now();
    let session = state.sessions.session(session_id);

    let response = tokio::task::spawn_blocking(move || -> Result<AnalysisResponse, AppError> {
        session.with_loaded_file(|path| -> Result<AnalysisResponse, AppError> {
            let outcome = match kind {
                ReportKind::Homework => analyze_homework(path),
                ReportKind::Grades => analyze_grades(path),
            };
            match outcome {
                AnalysisOutcome::Flagged(lines) => {
                    let report = save_report(&lines, kind, &session.dir)?;
                    Ok(AnalysisResponse::Flagged {
                        lines,
                        report_path: report.display().to_string(),
                    })
                }
                AnalysisOutcome::Status(message) => Ok(AnalysisResponse::Status { message }),
            }
        })?
    })
    .await??;

    tracing::info!("{:?} analysis for session {} took {:?}", kind, session_id, start.elapsed());
    Ok(Json(response))
}
