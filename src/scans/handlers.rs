use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateScanResponse, ListQuery, ScanListItem, ScanPage, SummaryQuery},
    repo,
    repo_types::Scan,
    services::{create_scan, CreateScanError},
    trend::{summarize_window, Period, TrendSummary},
};
use crate::{
    analysis::handlers::{analysis_rejection, read_upload, MAX_UPLOAD_BYTES},
    auth::jwt::CurrentUser,
    state::AppState,
};

pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/scans", post(create))
        .route("/scans/summary", get(summary))
        .route("/scans/list", get(list))
        .route("/scans/:id", get(get_scan))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "scan request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// POST /scans (multipart `file`, optional `angle`)
#[instrument(skip(state, user, mp), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mp: Multipart,
) -> Result<(StatusCode, Json<CreateScanResponse>), (StatusCode, String)> {
    let upload = read_upload(mp).await?;
    match create_scan(&state, user.id, upload).await {
        Ok(res @ CreateScanResponse::Created(_)) => Ok((StatusCode::CREATED, Json(res))),
        Ok(res) => Ok((StatusCode::OK, Json(res))),
        Err(CreateScanError::Analysis(e)) => Err(analysis_rejection(e)),
        Err(CreateScanError::Internal(e)) => Err(internal(e)),
    }
}

/// GET /scans/summary?period=7d|15d|30d
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<SummaryQuery>,
) -> Result<Json<TrendSummary>, (StatusCode, String)> {
    let period = Period::parse(q.period.as_deref());
    let rows = repo::since(&state.db, user.id, period.since(OffsetDateTime::now_utc()))
        .await
        .map_err(internal)?;
    let summary = summarize_window(&rows);
    info!(
        days = period.days(),
        count = summary.count,
        best = summary.best_dimension.map(|d| d.as_str()),
        "trend summary"
    );
    Ok(Json(summary))
}

/// GET /scans/list?page=&page_size=
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<ScanPage>, (StatusCode, String)> {
    let (page, page_size, offset) = q.window();
    let (total, rows) = repo::list_page(&state.db, user.id, page_size, offset)
        .await
        .map_err(internal)?;
    Ok(Json(ScanPage {
        total,
        page,
        page_size,
        items: rows.into_iter().map(ScanListItem::from).collect(),
    }))
}

/// GET /scans/:id, only the caller's own scans.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_scan(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Scan>, (StatusCode, String)> {
    repo::find(&state.db, user.id, id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "scan not found".into()))
}
