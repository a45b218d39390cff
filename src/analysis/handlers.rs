use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{error, info, instrument, warn};

use super::{
    dto::SkinResponse,
    error::AnalysisError,
    pipeline::{quick_check, run_blocking, skin_report},
    quality::QualityReport,
};
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze/check", post(check))
        .route("/analyze/skin", post(analyze_skin))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// An uploaded image plus the optional text fields sent alongside it.
pub struct Upload {
    pub body: Bytes,
    pub filename: Option<String>,
    pub content_type: String,
    pub angle: Option<String>,
}

/// Pull the `file` part (and optional `angle`) out of a multipart body.
pub async fn read_upload(mut mp: Multipart) -> Result<Upload, (StatusCode, String)> {
    let mut file = None;
    let mut angle = None;
    loop {
        let field = match mp.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "malformed multipart body");
                return Err((StatusCode::BAD_REQUEST, format!("invalid multipart body: {e}")));
            }
        };
        match field.name() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("failed to read file: {e}")))?;
                file = Some((body, filename, content_type));
            }
            Some("angle") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("failed to read angle: {e}")))?;
                let text = text.trim();
                if !text.is_empty() && text != "auto" {
                    angle = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    let (body, filename, content_type) = file.ok_or((StatusCode::BAD_REQUEST, "file is required".to_string()))?;
    if body.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "file is empty".into()));
    }
    Ok(Upload {
        body,
        filename,
        content_type,
        angle,
    })
}

/// Map a pipeline failure to the response surfaced to clients.
pub fn analysis_rejection(e: AnalysisError) -> (StatusCode, String) {
    match e {
        AnalysisError::Decode(_) | AnalysisError::ZeroDimensions => {
            warn!(error = %e, "undecodable upload");
            (StatusCode::BAD_REQUEST, "cannot read image".into())
        }
        other => {
            error!(error = %other, "analysis failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("analysis failed: {other}"))
        }
    }
}

/// POST /analyze/check (multipart `file`)
#[instrument(skip(state, mp))]
pub async fn check(
    State(state): State<AppState>,
    mp: Multipart,
) -> Result<Json<QualityReport>, (StatusCode, String)> {
    let upload = read_upload(mp).await?;
    let report = run_blocking(state.detector.clone(), upload.body, |d, img| Ok(quick_check(d, img)))
        .await
        .map_err(analysis_rejection)?;
    info!(face_ok = report.face_ok, lighting_ok = report.lighting_ok, "quick check");
    Ok(Json(report))
}

/// POST /analyze/skin (multipart `file`). Stateless; nothing is persisted.
#[instrument(skip(state, mp))]
pub async fn analyze_skin(
    State(state): State<AppState>,
    mp: Multipart,
) -> Result<Json<SkinResponse>, (StatusCode, String)> {
    let upload = read_upload(mp).await?;
    let report = run_blocking(state.detector.clone(), upload.body, skin_report)
        .await
        .map_err(analysis_rejection)?;
    match report {
        Some(report) => Ok(Json(SkinResponse::found(report))),
        None => {
            info!("no face found");
            Ok(Json(SkinResponse::no_face()))
        }
    }
}
