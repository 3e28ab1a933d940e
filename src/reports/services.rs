use serde::Serialize;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::nutrition::{self, NutritionInputs, NutritionSummary, HISTORY_DAYS, TOP_FOODS};
use super::repo;
use super::series::{self, DailySeries, TodaySnapshot};
use crate::ledger::{self, DateRange};
use crate::meals::{self, MealEntry};
use crate::workouts::{self, WorkoutEntry};
use crate::{goals, profiles};

/// Energy report over `range`. Goal statuses are reported as stored.
pub async fn summary(db: &PgPool, user_id: Uuid, range: DateRange, today: Date) -> anyhow::Result<DailySeries> {
    let ledger = ledger::aggregate_for_user(db, user_id, range).await?;
    let profile = profiles::repo::find_by_user(db, user_id).await?;
    let progress = match goals::repo::find_active(db, user_id).await? {
        Some(goal) => Some(goals::services::goal_progress(db, &goal, today).await?),
        None => None,
    };
    Ok(series::summarize(
        &ledger,
        profiles::services::tdee_of(profile.as_ref()),
        progress.as_ref(),
    ))
}

pub async fn today(db: &PgPool, user_id: Uuid, today: Date) -> anyhow::Result<TodaySnapshot> {
    let ledger = ledger::aggregate_for_user(db, user_id, DateRange::new(today, today)).await?;
    let profile = profiles::repo::find_by_user(db, user_id).await?;
    Ok(series::today_snapshot(
        &ledger,
        profiles::services::tdee_of(profile.as_ref()),
        profile.map_or(0.0, |p| p.bmi),
    ))
}

pub async fn nutrition(db: &PgPool, user_id: Uuid, today: Date) -> anyhow::Result<NutritionSummary> {
    let window = DateRange::ending_on(today, HISTORY_DAYS);
    let profile = profiles::repo::find_by_user(db, user_id).await?;
    let goal = goals::repo::find_active(db, user_id).await?;

    let inputs = NutritionInputs {
        by_meal_type: repo::intake_by_meal_type(db, user_id, today).await?,
        history: ledger::repo::daily_calories_in(db, user_id, window).await?,
        top_foods: repo::top_foods(db, user_id, window, TOP_FOODS).await?,
        goal_daily_in: goal.and_then(|g| g.daily_calorie_target_in),
    };
    Ok(nutrition::nutrition_summary(
        today,
        profiles::services::tdee_of(profile.as_ref()),
        inputs,
    ))
}

/// Raw entries for exporters, oldest first.
#[derive(Debug, Serialize)]
pub struct Records {
    pub range: DateRange,
    pub meals: Vec<MealEntry>,
    pub workouts: Vec<WorkoutEntry>,
}

pub async fn records(db: &PgPool, user_id: Uuid, range: DateRange) -> anyhow::Result<Records> {
    Ok(Records {
        range,
        meals: meals::repo::list_in_range(db, user_id, range.start, range.end).await?,
        workouts: workouts::repo::list_in_range(db, user_id, range.start, range.end).await?,
    })
}
