use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{ProfileResponse, UpdateProfileRequest};
use super::services;
use crate::{auth::AuthUser, error::internal, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/profile", put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let profile = services::get_or_create(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(profile.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    if let Err(msg) = payload.validate() {
        warn!(%user_id, %msg, "invalid profile");
        return Err((StatusCode::BAD_REQUEST, msg));
    }

    let profile = services::save(
        &state.db,
        user_id,
        payload.full_name.trim(),
        &payload.anthropometrics(),
    )
    .await
    .map_err(internal)?;
    Ok(Json(profile.into()))
}
