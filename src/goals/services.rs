use serde::Serialize;
use sqlx::PgPool;
use time::Date;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::CreateGoalRequest;
use super::engine::{self, FinishResult, Goal, GoalError, GoalPlan, GoalProgress, GoalStatus};
use super::repo;
use super::repo_types::NewGoal;
use crate::error::{ServiceError, ServiceResult};
use crate::ledger::{self, DateRange, Kpis};
use crate::profiles;

impl From<GoalError> for ServiceError {
    fn from(e: GoalError) -> Self {
        match e {
            GoalError::InvalidResult(_) => ServiceError::BadRequest(e.to_string()),
            GoalError::DuplicateActiveGoal | GoalError::AlreadyFinished(_) => {
                ServiceError::Conflict(e.to_string())
            }
        }
    }
}

/// Window used for overview KPIs when the user has no active goal.
const FALLBACK_KPI_DAYS: i64 = 7;

pub async fn create_goal(
    db: &PgPool,
    user_id: Uuid,
    req: &CreateGoalRequest,
    today: Date,
) -> ServiceResult<Goal> {
    let profile = profiles::repo::find_by_user(db, user_id).await?;
    let plan = GoalPlan::derive(
        req.goal_type,
        req.target_value,
        profile.as_ref().map(|p| p.weight_kg),
        profiles::services::tdee_of(profile.as_ref()),
        today,
        req.deadline,
    );

    let mut tx = db.begin().await?;
    repo::lock_user_goals_tx(&mut tx, user_id).await?;
    if let Err(e) = engine::check_can_create(repo::has_active_tx(&mut tx, user_id).await?) {
        warn!(%user_id, "goal creation refused: active goal exists");
        return Err(e.into());
    }
    let goal = repo::insert_tx(
        &mut tx,
        user_id,
        &NewGoal {
            goal_type: req.goal_type.as_str(),
            target_value: req.target_value,
            start_weight_kg: plan.start_weight_kg,
            start_date: today,
            deadline: req.deadline,
            daily_calorie_target_in: plan.daily_calorie_target_in,
            daily_calorie_target_out: plan.daily_calorie_target_out,
            note: req.note.trim(),
        },
    )
    .await?;
    tx.commit().await?;

    info!(
        %user_id,
        goal_id = %goal.id,
        required_kcal = plan.required_kcal,
        per_day = plan.required_kcal_per_day,
        "goal created"
    );
    Ok(goal)
}

/// kcal burned inside the goal's progress window.
pub async fn burned_kcal(db: &PgPool, goal: &Goal, today: Date) -> anyhow::Result<f64> {
    let window = goal.progress_window(today);
    Ok(ledger::aggregate_for_user(db, goal.user_id, window).await?.total_out)
}

pub async fn goal_progress(db: &PgPool, goal: &Goal, today: Date) -> anyhow::Result<GoalProgress> {
    let burned = burned_kcal(db, goal, today).await?;
    Ok(engine::progress(goal, burned, today))
}

/// Closes every overdue in-progress goal. Safe to run concurrently and repeatedly:
/// a goal that is no longer in progress is left untouched.
pub async fn refresh_due_goals(db: &PgPool, user_id: Uuid, today: Date) -> anyhow::Result<Vec<(Uuid, GoalStatus)>> {
    let mut applied = Vec::new();
    for goal in repo::list_overdue(db, user_id, today).await? {
        let burned = burned_kcal(db, &goal, today).await?;
        let Some(next) = engine::auto_transition(&goal, burned, today) else {
            continue;
        };
        if repo::close(db, user_id, goal.id, next).await? {
            info!(%user_id, goal_id = %goal.id, status = next.as_str(), burned, "goal closed at deadline");
            applied.push((goal.id, next));
        }
    }
    Ok(applied)
}

pub async fn finish_goal(db: &PgPool, user_id: Uuid, goal_id: Uuid, result: &str) -> ServiceResult<Goal> {
    let result: FinishResult = result.parse()?;
    let goal = repo::get(db, user_id, goal_id)
        .await?
        .ok_or(ServiceError::NotFound("Goal"))?;

    if let Some(next) = engine::finish(goal.status, result)? {
        if !repo::close(db, user_id, goal_id, next).await? {
            // Closed concurrently; accept it only if it landed on the same status.
            let current = repo::get(db, user_id, goal_id)
                .await?
                .ok_or(ServiceError::NotFound("Goal"))?;
            engine::finish(current.status, result)?;
        }
        info!(%user_id, %goal_id, status = next.as_str(), "goal finished");
    }

    repo::get(db, user_id, goal_id)
        .await?
        .ok_or(ServiceError::NotFound("Goal"))
}

/// KPI window: the active goal's `[start, min(deadline, today)]`, else the last week.
pub fn kpi_range(active: Option<&Goal>, today: Date) -> DateRange {
    match active {
        Some(g) => {
            let end = g.deadline.map_or(today, |d| d.min(today));
            DateRange::normalized(g.start_date, end)
        }
        None => DateRange::ending_on(today, FALLBACK_KPI_DAYS),
    }
}

#[derive(Debug, Serialize)]
pub struct ActiveGoal {
    pub goal: Goal,
    pub progress: GoalProgress,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub kpi_range: DateRange,
    pub kpis: Kpis,
    pub active_goal: Option<ActiveGoal>,
    pub goals: Vec<Goal>,
}

/// Read-only overview; run [`refresh_due_goals`] first for up-to-date statuses.
pub async fn overview(db: &PgPool, user_id: Uuid, today: Date) -> anyhow::Result<Overview> {
    let active = repo::find_active(db, user_id).await?;
    let range = kpi_range(active.as_ref(), today);
    let kpis = ledger::kpis_for_user(db, user_id, range).await?;

    let active_goal = match active {
        Some(goal) => {
            let progress = goal_progress(db, &goal, today).await?;
            Some(ActiveGoal { goal, progress })
        }
        None => None,
    };

    Ok(Overview {
        kpi_range: range,
        kpis,
        active_goal,
        goals: repo::list_by_user(db, user_id, false).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use time::macros::{date, datetime};

    fn goal(deadline: Option<Date>) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            goal_type: engine::GoalType::LoseWeight,
            target_value: 75.0,
            start_weight_kg: Some(80.0),
            start_date: date!(2024 - 01 - 01),
            deadline,
            status: GoalStatus::InProgress,
            daily_calorie_target_in: None,
            daily_calorie_target_out: None,
            note: String::new(),
            created_at: datetime!(2024-01-01 0:00 UTC),
            updated_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    #[test]
    fn kpi_range_follows_active_goal() {
        let today = date!(2024 - 01 - 05);
        let g = goal(Some(date!(2024 - 01 - 10)));
        assert_eq!(
            kpi_range(Some(&g), today),
            DateRange::new(date!(2024 - 01 - 01), today)
        );

        let past = goal(Some(date!(2024 - 01 - 03)));
        assert_eq!(kpi_range(Some(&past), today).end, date!(2024 - 01 - 03));
    }

    #[test]
    fn kpi_range_without_goal_is_last_week() {
        let today = date!(2024 - 01 - 10);
        let r = kpi_range(None, today);
        assert_eq!(r, DateRange::new(date!(2024 - 01 - 04), today));
    }

    fn lose_request(deadline: Date) -> CreateGoalRequest {
        CreateGoalRequest {
            goal_type: engine::GoalType::LoseWeight,
            target_value: 70.0,
            deadline: Some(deadline),
            note: String::new(),
        }
    }

    // The two tests below need a Postgres reachable through DATABASE_URL.
    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn second_active_goal_is_refused(db: PgPool) {
        let user_id = Uuid::new_v4();
        let today = date!(2024 - 01 - 05);
        let req = lose_request(date!(2024 - 01 - 10));

        create_goal(&db, user_id, &req, today).await.unwrap();
        let err = create_goal(&db, user_id, &req, today).await.unwrap_err();
        let (status, _): (StatusCode, String) = err.into();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(repo::list_by_user(&db, user_id, false).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore]
    async fn repeated_refresh_closes_a_goal_once(db: PgPool) {
        let user_id = Uuid::new_v4();
        let goal = create_goal(&db, user_id, &lose_request(date!(2024 - 01 - 10)), date!(2024 - 01 - 05))
            .await
            .unwrap();
        let after = date!(2024 - 01 - 11);

        let first = refresh_due_goals(&db, user_id, after).await.unwrap();
        assert_eq!(first.len(), 1);
        let closed = repo::get(&db, user_id, goal.id).await.unwrap().unwrap();
        assert!(closed.status.is_terminal());

        let second = refresh_due_goals(&db, user_id, after).await.unwrap();
        assert!(second.is_empty());
        let again = repo::get(&db, user_id, goal.id).await.unwrap().unwrap();
        assert_eq!((again.status, again.updated_at), (closed.status, closed.updated_at));
    }

    #[test]
    fn goal_errors_map_to_http() {
        let (s, _): (StatusCode, String) = ServiceError::from(GoalError::DuplicateActiveGoal).into();
        assert_eq!(s, StatusCode::CONFLICT);
        let (s, _): (StatusCode, String) =
            ServiceError::from(GoalError::InvalidResult("maybe".into())).into();
        assert_eq!(s, StatusCode::BAD_REQUEST);
        let (s, m): (StatusCode, String) =
            ServiceError::from(GoalError::AlreadyFinished(GoalStatus::Failed)).into();
        assert_eq!(s, StatusCode::CONFLICT);
        assert_eq!(m, "goal is already failed");
    }
}
