use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, info, instrument, warn};

use super::{dto::ProfileUpdate, repo::Profile};
use crate::{auth::jwt::CurrentUser, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_me).put(update_me))
}

/// Profile of the caller, `null` until the first update.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Option<Profile>>, (StatusCode, String)> {
    let profile = Profile::find(&state.db, user.id).await.map_err(|e| {
        error!(error = %e, "load profile failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(profile))
}

#[instrument(skip(state, user, update), fields(user_id = %user.id))]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, (StatusCode, String)> {
    if let Err(msg) = update.validate() {
        warn!(%msg, "invalid profile update");
        return Err((StatusCode::UNPROCESSABLE_ENTITY, msg));
    }

    let existing = Profile::find(&state.db, user.id).await.map_err(|e| {
        error!(error = %e, "load profile failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let created = existing.is_none();
    let mut profile = existing.unwrap_or_else(|| Profile::empty(user.id));
    profile.merge(update);

    let saved = profile.upsert(&state.db).await.map_err(|e| {
        error!(error = %e, "save profile failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    info!(created, "profile saved");
    Ok(Json(saved))
}
