use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use super::engine::{Goal, GoalStatus};
use super::repo_types::{GoalRow, NewGoal};

const GOAL_COLUMNS: &str = "id, user_id, goal_type, target_value, start_weight_kg, start_date, deadline, \
                            status, daily_calorie_target_in, daily_calorie_target_out, note, \
                            created_at, updated_at";

fn into_goals(rows: Vec<GoalRow>) -> anyhow::Result<Vec<Goal>> {
    rows.into_iter().map(Goal::try_from).collect()
}

/// Serialises goal creation per user for the rest of the transaction.
pub async fn lock_user_goals_tx(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .context("lock user goals")?;
    Ok(())
}

pub async fn has_active_tx(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> anyhow::Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM goals WHERE user_id = $1 AND status = 'in_progress')",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
    .context("check active goal")?;
    Ok(exists)
}

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    g: &NewGoal<'_>,
) -> anyhow::Result<Goal> {
    let sql = format!(
        r#"
        INSERT INTO goals (id, user_id, goal_type, target_value, start_weight_kg, start_date, deadline,
                           status, daily_calorie_target_in, daily_calorie_target_out, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'in_progress', $8, $9, $10)
        RETURNING {GOAL_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, GoalRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(g.goal_type)
        .bind(g.target_value)
        .bind(g.start_weight_kg)
        .bind(g.start_date)
        .bind(g.deadline)
        .bind(g.daily_calorie_target_in)
        .bind(g.daily_calorie_target_out)
        .bind(g.note)
        .fetch_one(&mut **tx)
        .await
        .context("insert goal")?;
    Goal::try_from(row)
}

/// Most recently created in-progress goal.
pub async fn find_active(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Goal>> {
    let sql = format!(
        "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = $1 AND status = 'in_progress' \
         ORDER BY created_at DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, GoalRow>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find active goal")?;
    row.map(Goal::try_from).transpose()
}

pub async fn get(db: &PgPool, user_id: Uuid, goal_id: Uuid) -> anyhow::Result<Option<Goal>> {
    let sql = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1 AND user_id = $2");
    let row = sqlx::query_as::<_, GoalRow>(&sql)
        .bind(goal_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("get goal")?;
    row.map(Goal::try_from).transpose()
}

/// All goals of a user, newest first; `finished_only` drops in-progress ones.
pub async fn list_by_user(db: &PgPool, user_id: Uuid, finished_only: bool) -> anyhow::Result<Vec<Goal>> {
    let sql = format!(
        "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = $1 \
         AND (NOT $2 OR status <> 'in_progress') ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, GoalRow>(&sql)
        .bind(user_id)
        .bind(finished_only)
        .fetch_all(db)
        .await
        .context("list goals")?;
    into_goals(rows)
}

/// In-progress goals whose deadline is before `today`.
pub async fn list_overdue(db: &PgPool, user_id: Uuid, today: Date) -> anyhow::Result<Vec<Goal>> {
    let sql = format!(
        "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = $1 AND status = 'in_progress' \
         AND deadline IS NOT NULL AND deadline < $2"
    );
    let rows = sqlx::query_as::<_, GoalRow>(&sql)
        .bind(user_id)
        .bind(today)
        .fetch_all(db)
        .await
        .context("list overdue goals")?;
    into_goals(rows)
}

/// Moves an in-progress goal to `status`. Returns false if it was no longer in progress.
pub async fn close(db: &PgPool, user_id: Uuid, goal_id: Uuid, status: GoalStatus) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE goals
           SET status = $3, updated_at = now()
         WHERE id = $1 AND user_id = $2 AND status = 'in_progress'
        "#,
    )
    .bind(goal_id)
    .bind(user_id)
    .bind(status.as_str())
    .execute(db)
    .await
    .context("close goal")?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, user_id: Uuid, goal_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
        .bind(goal_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete goal")?;
    Ok(res.rows_affected() > 0)
}
