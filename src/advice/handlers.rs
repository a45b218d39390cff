use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info, instrument};

use super::{
    dto::{AdviseRequest, AdviseResponse},
    services::advise,
};
use crate::{auth::jwt::CurrentUser, scans::repo, state::AppState};

pub fn advice_routes() -> Router<AppState> {
    Router::new().route("/advise", post(advise_me))
}

/// POST /advise `{question?}`
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn advise_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Option<Json<AdviseRequest>>,
) -> Result<Json<AdviseResponse>, (StatusCode, String)> {
    let question = body.and_then(|Json(b)| b.question);
    let latest = repo::latest(&state.db, user.id).await.map_err(|e| {
        error!(error = %e, "load latest scan failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let radar = latest.as_ref().map(|s| s.radar());
    let res = advise(
        latest
            .as_ref()
            .zip(radar.as_ref())
            .map(|(scan, radar)| (radar, scan.summary.as_deref())),
    );
    info!(has_scan = latest.is_some(), asked = question.is_some(), "advice served");
    Ok(Json(res))
}
