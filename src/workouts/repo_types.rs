use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutEntry {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub date: Date,
    pub activity_type: String,
    pub duration_min: i32,
    pub distance_km: f64,
    pub steps: i32,
    pub note: String,
    pub calories_out: f64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Serialize, FromRow, PartialEq)]
pub struct WorkoutTotals {
    pub total_minutes: i64,
    pub total_kcal: f64,
    pub total_steps: i64,
    pub total_distance: f64,
}

#[derive(Debug, Clone)]
pub struct WorkoutWrite<'a> {
    pub date: Date,
    pub activity_type: &'a str,
    pub duration_min: i32,
    pub distance_km: f64,
    pub steps: i32,
    pub note: &'a str,
    pub calories_out: f64,
}
