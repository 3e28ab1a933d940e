use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use super::dto::{CreateGoalRequest, GoalResponse};
use super::repo;
use super::services::{self, Overview};
use crate::{auth::AuthUser, error::internal, ledger::DateRange, ledger::Kpis, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals))
        .route("/goals/overview", get(overview))
        .route("/goals/history", get(history))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/goals", post(create_goal))
        .route("/goals/:id/finish/:result", post(finish_goal))
        .route("/goals/:id", delete(delete_goal))
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub kpi_range: DateRange,
    pub kpis: Kpis,
    pub active_goal: Option<GoalResponse>,
    pub goals: Vec<GoalResponse>,
}

impl From<Overview> for OverviewResponse {
    fn from(o: Overview) -> Self {
        Self {
            kpi_range: o.kpi_range,
            kpis: o.kpis,
            active_goal: o
                .active_goal
                .map(|a| GoalResponse::with_progress(a.goal, a.progress)),
            goals: o.goals.into_iter().map(GoalResponse::from).collect(),
        }
    }
}

#[instrument(skip(state))]
pub async fn list_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<GoalResponse>>, (StatusCode, String)> {
    let goals = repo::list_by_user(&state.db, user_id, false)
        .await
        .map_err(internal)?;
    Ok(Json(goals.into_iter().map(GoalResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<GoalResponse>>, (StatusCode, String)> {
    let today = state.config.today();
    services::refresh_due_goals(&state.db, user_id, today)
        .await
        .map_err(internal)?;
    let goals = repo::list_by_user(&state.db, user_id, true)
        .await
        .map_err(internal)?;
    Ok(Json(goals.into_iter().map(GoalResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn overview(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<OverviewResponse>, (StatusCode, String)> {
    let today = state.config.today();
    services::refresh_due_goals(&state.db, user_id, today)
        .await
        .map_err(internal)?;
    let overview = services::overview(&state.db, user_id, today)
        .await
        .map_err(internal)?;
    Ok(Json(overview.into()))
}

#[instrument(skip(state, body))]
pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalResponse>), (StatusCode, String)> {
    let today = state.config.today();
    if let Err(msg) = body.validate(today) {
        warn!(%user_id, %msg, "invalid goal");
        return Err((StatusCode::BAD_REQUEST, msg));
    }
    // A stale overdue goal must not block a new one.
    services::refresh_due_goals(&state.db, user_id, today)
        .await
        .map_err(internal)?;

    let goal = services::create_goal(&state.db, user_id, &body, today).await?;
    Ok((StatusCode::CREATED, Json(goal.into())))
}

#[instrument(skip(state))]
pub async fn finish_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, result)): Path<(Uuid, String)>,
) -> Result<Json<GoalResponse>, (StatusCode, String)> {
    let goal = services::finish_goal(&state.db, user_id, id, &result).await?;
    Ok(Json(goal.into()))
}

#[instrument(skip(state))]
pub async fn delete_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if repo::delete(&state.db, user_id, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Goal not found".into()))
    }
}
