use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::nutrition::NutritionSummary;
use super::series::{DailySeries, ReportQuery, TodaySnapshot};
use super::services::{self, Records};
use crate::{auth::AuthUser, error::internal, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/summary", get(summary))
        .route("/reports/records", get(records))
        .route("/reports/today", get(today))
        .route("/reports/nutrition", get(nutrition))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ReportQuery>,
) -> Result<Json<DailySeries>, (StatusCode, String)> {
    let today = state.config.today();
    let range = q
        .resolve(today, state.config.report_default_days)
        .map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;
    let series = services::summary(&state.db, user_id, range, today)
        .await
        .map_err(internal)?;
    Ok(Json(series))
}

#[instrument(skip(state))]
pub async fn records(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ReportQuery>,
) -> Result<Json<Records>, (StatusCode, String)> {
    let range = q
        .resolve(state.config.today(), state.config.report_default_days)
        .map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;
    let records = services::records(&state.db, user_id, range)
        .await
        .map_err(internal)?;
    Ok(Json(records))
}

#[instrument(skip(state))]
pub async fn today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TodaySnapshot>, (StatusCode, String)> {
    let snapshot = services::today(&state.db, user_id, state.config.today())
        .await
        .map_err(internal)?;
    Ok(Json(snapshot))
}

#[instrument(skip(state))]
pub async fn nutrition(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<NutritionSummary>, (StatusCode, String)> {
    let summary = services::nutrition(&state.db, user_id, state.config.today())
        .await
        .map_err(internal)?;
    Ok(Json(summary))
}
