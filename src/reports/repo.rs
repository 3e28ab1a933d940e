use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{MealTypeTotal, TopFood};
use crate::ledger::DateRange;

pub async fn intake_by_meal_type(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<Vec<MealTypeTotal>> {
    let rows = sqlx::query_as::<_, MealTypeTotal>(
        r#"
        SELECT meal_type, COALESCE(SUM(calories_in), 0)::float8 AS total_kcal
          FROM meals
         WHERE user_id = $1 AND date = $2
         GROUP BY meal_type
         ORDER BY meal_type
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await
    .context("sum intake by meal type")?;
    Ok(rows)
}

/// Foods with the most kcal eaten over the range.
pub async fn top_foods(db: &PgPool, user_id: Uuid, range: DateRange, limit: i64) -> anyhow::Result<Vec<TopFood>> {
    let rows = sqlx::query_as::<_, TopFood>(
        r#"
        SELECT f.name                                     AS name,
               COUNT(m.id)::int8                          AS times,
               COALESCE(SUM(m.quantity_grams), 0)::float8 AS total_grams,
               COALESCE(SUM(m.calories_in), 0)::float8    AS total_kcal
          FROM meals m
          JOIN foods f ON f.id = m.food_id
         WHERE m.user_id = $1 AND m.date BETWEEN $2 AND $3
         GROUP BY f.name
         ORDER BY total_kcal DESC, f.name
         LIMIT $4
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list top foods")?;
    Ok(rows)
}
