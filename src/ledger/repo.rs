use std::collections::HashSet;

use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::aggregate::{DailyEnergy, DateRange};
use super::repo_types::DailyEnergyRow;

/// Meal intake summed per calendar day.
pub async fn daily_calories_in(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
) -> anyhow::Result<Vec<DailyEnergy>> {
    let rows = sqlx::query_as::<_, DailyEnergyRow>(
        r#"
        SELECT date, COALESCE(SUM(calories_in), 0)::float8 AS kcal
          FROM meals
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
         GROUP BY date
         ORDER BY date
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(db)
    .await
    .context("sum calories_in per day")?;
    Ok(rows.into_iter().map(DailyEnergy::from).collect())
}

/// Workout expenditure summed per calendar day.
pub async fn daily_calories_out(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
) -> anyhow::Result<Vec<DailyEnergy>> {
    let rows = sqlx::query_as::<_, DailyEnergyRow>(
        r#"
        SELECT date, COALESCE(SUM(calories_out), 0)::float8 AS kcal
          FROM workouts
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
         GROUP BY date
         ORDER BY date
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(db)
    .await
    .context("sum calories_out per day")?;
    Ok(rows.into_iter().map(DailyEnergy::from).collect())
}

/// Days with at least one meal or workout entry.
pub async fn logged_dates(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
) -> anyhow::Result<HashSet<Date>> {
    let rows: Vec<(Date,)> = sqlx::query_as(
        r#"
        SELECT date FROM meals
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
        UNION
        SELECT date FROM workouts
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(db)
    .await
    .context("list logged dates")?;
    Ok(rows.into_iter().map(|(d,)| d).collect())
}

pub async fn workout_sessions(db: &PgPool, user_id: Uuid, range: DateRange) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
          FROM workouts
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_one(db)
    .await
    .context("count workout sessions")?;
    Ok(count)
}
