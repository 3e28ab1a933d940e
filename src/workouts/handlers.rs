use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreatedResponse, WorkoutListQuery, WorkoutListResponse, WorkoutRequest, WorkoutSummary};
use super::repo::{self, WorkoutFilter};
use super::repo_types::WorkoutEntry;
use super::services;
use crate::{auth::AuthUser, error::internal, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts))
        .route("/workouts/summary", get(summary))
        .route("/workouts/:id", get(get_workout))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", post(create_workout))
        .route("/workouts/:id", put(update_workout).delete(delete_workout))
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<WorkoutListQuery>,
) -> Result<Json<WorkoutListResponse>, (StatusCode, String)> {
    let filter = WorkoutFilter {
        start: p.start,
        end: p.end,
        activity_type: p.q.as_deref().map(str::trim).filter(|s| !s.is_empty()),
    };
    let limit = p.limit.clamp(1, 200);
    let offset = p.offset.max(0);

    let items = repo::list_by_user(&state.db, user_id, &filter, limit, offset)
        .await
        .map_err(internal)?;
    let totals = repo::totals(&state.db, user_id, &filter)
        .await
        .map_err(internal)?;
    Ok(Json(WorkoutListResponse { items, totals }))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<WorkoutSummary>, (StatusCode, String)> {
    let summary = services::summary(&state.db, user_id, state.config.today())
        .await
        .map_err(internal)?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn get_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkoutEntry>, (StatusCode, String)> {
    repo::get(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Workout not found".into()))
}

#[instrument(skip(state, body))]
pub async fn create_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<WorkoutRequest>,
) -> Result<(StatusCode, HeaderMap, Json<CreatedResponse>), (StatusCode, String)> {
    body.validate().map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    let (id, calories_out) =
        services::create_workout(&state.db, user_id, &body, state.config.today()).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/v1/workouts/{id}")).map_err(|e| internal(e.into()))?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(CreatedResponse { id, calories_out })))
}

#[instrument(skip(state, body))]
pub async fn update_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<WorkoutRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    body.validate().map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;
    services::update_workout(&state.db, user_id, id, &body, state.config.today()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if repo::delete(&state.db, user_id, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Workout not found".into()))
    }
}
