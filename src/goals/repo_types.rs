use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::engine::Goal;

/// Goal row as stored; enums are kept as text columns.
#[derive(Debug, FromRow)]
pub struct GoalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: String,
    pub target_value: f64,
    pub start_weight_kg: Option<f64>,
    pub start_date: Date,
    pub deadline: Option<Date>,
    pub status: String,
    pub daily_calorie_target_in: Option<f64>,
    pub daily_calorie_target_out: Option<f64>,
    pub note: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<GoalRow> for Goal {
    type Error = anyhow::Error;

    fn try_from(r: GoalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            goal_type: r.goal_type.parse().map_err(anyhow::Error::msg)?,
            target_value: r.target_value,
            start_weight_kg: r.start_weight_kg,
            start_date: r.start_date,
            deadline: r.deadline,
            status: r.status.parse().map_err(anyhow::Error::msg)?,
            daily_calorie_target_in: r.daily_calorie_target_in,
            daily_calorie_target_out: r.daily_calorie_target_out,
            note: r.note,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Fields of a goal about to be inserted.
#[derive(Debug, Clone)]
pub struct NewGoal<'a> {
    pub goal_type: &'a str,
    pub target_value: f64,
    pub start_weight_kg: Option<f64>,
    pub start_date: Date,
    pub deadline: Option<Date>,
    pub daily_calorie_target_in: Option<f64>,
    pub daily_calorie_target_out: Option<f64>,
    pub note: &'a str,
}
