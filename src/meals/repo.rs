use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::query::contains_pattern;

use super::repo_types::{Food, MealEntry, MealWrite};

const MEAL_SELECT: &str = r#"
    SELECT m.id, m.user_id, m.date, m.meal_type, m.food_id, f.name AS food_name,
           m.portion, m.quantity_grams, m.calories_in, m.created_at
      FROM meals m
      JOIN foods f ON f.id = m.food_id
"#;

// ---- Foods ----

pub async fn list_foods(db: &PgPool, q: Option<&str>) -> anyhow::Result<Vec<Food>> {
    let rows = sqlx::query_as::<_, Food>(
        r#"
        SELECT id, name, kcal_per_100g
          FROM foods
         WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
         ORDER BY name
        "#,
    )
    .bind(q.map(contains_pattern))
    .fetch_all(db)
    .await
    .context("list foods")?;
    Ok(rows)
}

pub async fn find_food(db: &PgPool, food_id: Uuid) -> anyhow::Result<Option<Food>> {
    let row = sqlx::query_as::<_, Food>("SELECT id, name, kcal_per_100g FROM foods WHERE id = $1")
        .bind(food_id)
        .fetch_optional(db)
        .await
        .context("find food")?;
    Ok(row)
}

/// Returns `None` when the name is already taken.
pub async fn insert_food(db: &PgPool, name: &str, kcal_per_100g: f64) -> anyhow::Result<Option<Food>> {
    let row = sqlx::query_as::<_, Food>(
        r#"
        INSERT INTO foods (id, name, kcal_per_100g)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO NOTHING
        RETURNING id, name, kcal_per_100g
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(kcal_per_100g)
    .fetch_optional(db)
    .await
    .context("insert food")?;
    Ok(row)
}

// ---- Meals ----

#[derive(Debug, Default, Clone)]
pub struct MealFilter<'a> {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub food_name: Option<&'a str>,
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    filter: &MealFilter<'_>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<MealEntry>> {
    let sql = format!(
        r#"{MEAL_SELECT}
         WHERE m.user_id = $1
           AND ($2::date IS NULL OR m.date >= $2)
           AND ($3::date IS NULL OR m.date <= $3)
           AND ($4::text IS NULL OR f.name ILIKE $4 ESCAPE '\')
         ORDER BY m.date DESC, m.created_at DESC
         LIMIT $5 OFFSET $6
        "#
    );
    let rows = sqlx::query_as::<_, MealEntry>(&sql)
        .bind(user_id)
        .bind(filter.start)
        .bind(filter.end)
        .bind(filter.food_name.map(contains_pattern))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("list meals")?;
    Ok(rows)
}

/// Sum of `calories_in` over every meal matching the filter (ignores paging).
pub async fn total_calories(db: &PgPool, user_id: Uuid, filter: &MealFilter<'_>) -> anyhow::Result<f64> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(m.calories_in), 0)::float8
          FROM meals m
          JOIN foods f ON f.id = m.food_id
         WHERE m.user_id = $1
           AND ($2::date IS NULL OR m.date >= $2)
           AND ($3::date IS NULL OR m.date <= $3)
           AND ($4::text IS NULL OR f.name ILIKE $4 ESCAPE '\')
        "#,
    )
    .bind(user_id)
    .bind(filter.start)
    .bind(filter.end)
    .bind(filter.food_name.map(contains_pattern))
    .fetch_one(db)
    .await
    .context("sum meal calories")?;
    Ok(total)
}

/// All meals in the inclusive range, oldest first.
pub async fn list_in_range(db: &PgPool, user_id: Uuid, start: Date, end: Date) -> anyhow::Result<Vec<MealEntry>> {
    let sql = format!(
        r#"{MEAL_SELECT}
         WHERE m.user_id = $1 AND m.date BETWEEN $2 AND $3
         ORDER BY m.date ASC, m.created_at ASC
        "#
    );
    let rows = sqlx::query_as::<_, MealEntry>(&sql)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
        .context("list meals in range")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<MealEntry>> {
    let sql = format!("{MEAL_SELECT} WHERE m.id = $1 AND m.user_id = $2");
    let row = sqlx::query_as::<_, MealEntry>(&sql)
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("get meal")?;
    Ok(row)
}

pub async fn insert(db: &PgPool, user_id: Uuid, w: &MealWrite<'_>) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO meals (id, user_id, date, meal_type, food_id, portion, quantity_grams, calories_in)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(w.date)
    .bind(w.meal_type)
    .bind(w.food_id)
    .bind(w.portion)
    .bind(w.quantity_grams)
    .bind(w.calories_in)
    .execute(db)
    .await
    .context("insert meal")?;
    Ok(id)
}

/// Returns false when no meal with that id belongs to the user.
pub async fn update(db: &PgPool, user_id: Uuid, meal_id: Uuid, w: &MealWrite<'_>) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE meals
           SET date = $3, meal_type = $4, food_id = $5, portion = $6,
               quantity_grams = $7, calories_in = $8
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(meal_id)
    .bind(user_id)
    .bind(w.date)
    .bind(w.meal_type)
    .bind(w.food_id)
    .bind(w.portion)
    .bind(w.quantity_grams)
    .bind(w.calories_in)
    .execute(db)
    .await
    .context("update meal")?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
        .bind(meal_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete meal")?;
    Ok(res.rows_affected() > 0)
}
