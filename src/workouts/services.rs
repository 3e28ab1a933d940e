use sqlx::PgPool;
use time::Date;
use tracing::info;
use uuid::Uuid;

use super::calories::{self, WorkoutEffort};
use super::dto::{WorkoutRequest, WorkoutSummary};
use super::repo::{self, WorkoutFilter};
use super::repo_types::WorkoutWrite;
use crate::error::{ServiceError, ServiceResult};
use crate::{goals, profiles};

async fn derive_write<'a>(
    db: &PgPool,
    user_id: Uuid,
    req: &'a WorkoutRequest,
    today: Date,
) -> anyhow::Result<WorkoutWrite<'a>> {
    let profile = profiles::repo::find_by_user(db, user_id).await?;
    let weight = calories::effective_weight(profile.map(|p| p.weight_kg));
    let effort = WorkoutEffort {
        kind: Some(req.activity_type),
        duration_min: req.duration_min,
        distance_km: req.distance_km,
        steps: req.steps,
    };
    Ok(WorkoutWrite {
        date: req.date.unwrap_or(today),
        activity_type: req.activity_type.as_str(),
        duration_min: req.duration_min,
        distance_km: req.distance_km,
        steps: req.steps,
        note: req.note.trim(),
        calories_out: calories::calories_out(&effort, weight),
    })
}

pub async fn create_workout(
    db: &PgPool,
    user_id: Uuid,
    req: &WorkoutRequest,
    today: Date,
) -> ServiceResult<(Uuid, f64)> {
    let write = derive_write(db, user_id, req, today).await?;
    let id = repo::insert(db, user_id, &write).await?;
    info!(%user_id, workout_id = %id, calories_out = write.calories_out, "workout logged");
    Ok((id, write.calories_out))
}

pub async fn update_workout(
    db: &PgPool,
    user_id: Uuid,
    workout_id: Uuid,
    req: &WorkoutRequest,
    today: Date,
) -> ServiceResult<()> {
    let write = derive_write(db, user_id, req, today).await?;
    if !repo::update(db, user_id, workout_id, &write).await? {
        return Err(ServiceError::NotFound("Workout"));
    }
    Ok(())
}

pub async fn summary(db: &PgPool, user_id: Uuid, today: Date) -> anyhow::Result<WorkoutSummary> {
    let active = goals::repo::find_active(db, user_id).await?;
    let range = goals::services::kpi_range(active.as_ref(), today);
    let filter = WorkoutFilter {
        start: Some(range.start),
        end: Some(range.end),
        activity_type: None,
    };
    let totals = repo::totals(db, user_id, &filter).await?;
    let goal_progress = match active {
        Some(goal) => Some(goals::services::goal_progress(db, &goal, today).await?),
        None => None,
    };
    Ok(WorkoutSummary {
        range,
        totals,
        goal_progress,
    })
}
