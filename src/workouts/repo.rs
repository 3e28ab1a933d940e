use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::query::contains_pattern;

use super::repo_types::{WorkoutEntry, WorkoutTotals, WorkoutWrite};

const WORKOUT_COLUMNS: &str = "id, user_id, date, activity_type, duration_min, distance_km, steps, \
                               note, calories_out, created_at";

#[derive(Debug, Default, Clone)]
pub struct WorkoutFilter<'a> {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub activity_type: Option<&'a str>,
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    filter: &WorkoutFilter<'_>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<WorkoutEntry>> {
    let sql = format!(
        r#"
        SELECT {WORKOUT_COLUMNS}
          FROM workouts
         WHERE user_id = $1
           AND ($2::date IS NULL OR date >= $2)
           AND ($3::date IS NULL OR date <= $3)
           AND ($4::text IS NULL OR activity_type ILIKE $4 ESCAPE '\')
         ORDER BY date DESC, created_at DESC
         LIMIT $5 OFFSET $6
        "#
    );
    let rows = sqlx::query_as::<_, WorkoutEntry>(&sql)
        .bind(user_id)
        .bind(filter.start)
        .bind(filter.end)
        .bind(filter.activity_type.map(contains_pattern))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("list workouts")?;
    Ok(rows)
}

pub async fn totals(db: &PgPool, user_id: Uuid, filter: &WorkoutFilter<'_>) -> anyhow::Result<WorkoutTotals> {
    let row = sqlx::query_as::<_, WorkoutTotals>(
        r#"
        SELECT COALESCE(SUM(duration_min), 0)::int8   AS total_minutes,
               COALESCE(SUM(calories_out), 0)::float8 AS total_kcal,
               COALESCE(SUM(steps), 0)::int8          AS total_steps,
               COALESCE(SUM(distance_km), 0)::float8  AS total_distance
          FROM workouts
         WHERE user_id = $1
           AND ($2::date IS NULL OR date >= $2)
           AND ($3::date IS NULL OR date <= $3)
           AND ($4::text IS NULL OR activity_type ILIKE $4 ESCAPE '\')
        "#,
    )
    .bind(user_id)
    .bind(filter.start)
    .bind(filter.end)
    .bind(filter.activity_type.map(contains_pattern))
    .fetch_one(db)
    .await
    .context("sum workouts")?;
    Ok(row)
}

/// All workouts in the inclusive range, oldest first.
pub async fn list_in_range(db: &PgPool, user_id: Uuid, start: Date, end: Date) -> anyhow::Result<Vec<WorkoutEntry>> {
    let sql = format!(
        r#"
        SELECT {WORKOUT_COLUMNS}
          FROM workouts
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
         ORDER BY date ASC, created_at ASC
        "#
    );
    let rows = sqlx::query_as::<_, WorkoutEntry>(&sql)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
        .context("list workouts in range")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, user_id: Uuid, workout_id: Uuid) -> anyhow::Result<Option<WorkoutEntry>> {
    let sql = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2");
    let row = sqlx::query_as::<_, WorkoutEntry>(&sql)
        .bind(workout_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("get workout")?;
    Ok(row)
}

pub async fn insert(db: &PgPool, user_id: Uuid, w: &WorkoutWrite<'_>) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO workouts (id, user_id, date, activity_type, duration_min, distance_km, steps,
                              note, calories_out)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(w.date)
    .bind(w.activity_type)
    .bind(w.duration_min)
    .bind(w.distance_km)
    .bind(w.steps)
    .bind(w.note)
    .bind(w.calories_out)
    .execute(db)
    .await
    .context("insert workout")?;
    Ok(id)
}

pub async fn update(db: &PgPool, user_id: Uuid, workout_id: Uuid, w: &WorkoutWrite<'_>) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE workouts
           SET date = $3, activity_type = $4, duration_min = $5, distance_km = $6,
               steps = $7, note = $8, calories_out = $9
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(workout_id)
    .bind(user_id)
    .bind(w.date)
    .bind(w.activity_type)
    .bind(w.duration_min)
    .bind(w.distance_km)
    .bind(w.steps)
    .bind(w.note)
    .bind(w.calories_out)
    .execute(db)
    .await
    .context("update workout")?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, user_id: Uuid, workout_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
        .bind(workout_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete workout")?;
    Ok(res.rows_affected() > 0)
}
