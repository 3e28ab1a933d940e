use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::aggregate::{aggregate, streak, DateRange, LedgerAggregate};
use super::repo;

/// Headline figures over a date range.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Kpis {
    pub calories_in: f64,
    pub calories_out: f64,
    pub sessions: i64,
    pub streak_days: u32,
}

pub async fn aggregate_for_user(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
) -> anyhow::Result<LedgerAggregate> {
    if range.is_empty() {
        return Ok(aggregate(&[], &[], range));
    }
    let meals = repo::daily_calories_in(db, user_id, range).await?;
    let workouts = repo::daily_calories_out(db, user_id, range).await?;
    Ok(aggregate(&meals, &workouts, range))
}

pub async fn kpis_for_user(db: &PgPool, user_id: Uuid, range: DateRange) -> anyhow::Result<Kpis> {
    let ledger = aggregate_for_user(db, user_id, range).await?;
    if range.is_empty() {
        return Ok(Kpis {
            calories_in: 0.0,
            calories_out: 0.0,
            sessions: 0,
            streak_days: 0,
        });
    }
    let sessions = repo::workout_sessions(db, user_id, range).await?;
    let logged = repo::logged_dates(db, user_id, range).await?;
    Ok(Kpis {
        calories_in: ledger.total_in,
        calories_out: ledger.total_out,
        sessions,
        streak_days: streak(&logged, range),
    })
}
