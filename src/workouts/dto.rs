use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::calories::WorkoutKind;
use super::repo_types::{WorkoutEntry, WorkoutTotals};
use crate::goals::GoalProgress;
use crate::ledger::DateRange;

/// Body of POST /workouts and PUT /workouts/:id. `calories_out` is always derived.
#[derive(Debug, Deserialize)]
pub struct WorkoutRequest {
    pub date: Option<Date>, // defaults to today
    pub activity_type: WorkoutKind,
    pub duration_min: i32,
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub steps: i32,
    #[serde(default)]
    pub note: String,
}

impl WorkoutRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.duration_min < 1 {
            return Err("duration_min must be at least 1".into());
        }
        if !(self.distance_km >= 0.0) {
            return Err("distance_km must not be negative".into());
        }
        if self.steps < 0 {
            return Err("steps must not be negative".into());
        }
        if self.note.chars().count() > 500 {
            return Err("note is too long".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkoutListQuery {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub q: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }

#[derive(Debug, Serialize)]
pub struct WorkoutListResponse {
    pub items: Vec<WorkoutEntry>,
    pub totals: WorkoutTotals,
}

/// Totals over the active goal window (last week without a goal).
#[derive(Debug, Serialize)]
pub struct WorkoutSummary {
    pub range: DateRange,
    pub totals: WorkoutTotals,
    pub goal_progress: Option<GoalProgress>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
    pub calories_out: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_body() {
        let req: WorkoutRequest =
            serde_json::from_str(r#"{"activity_type":"run","duration_min":30,"calories_out":1}"#).unwrap();
        assert_eq!(req.activity_type, WorkoutKind::Run);
        assert_eq!((req.distance_km, req.steps), (0.0, 0));
        assert!(req.date.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn unknown_activity_is_rejected_at_parse() {
        let res = serde_json::from_str::<WorkoutRequest>(r#"{"activity_type":"swim","duration_min":30}"#);
        assert!(res.is_err());
    }

    #[test]
    fn validation_bounds() {
        let base = || WorkoutRequest {
            date: None,
            activity_type: WorkoutKind::Walk,
            duration_min: 10,
            distance_km: 1.0,
            steps: 100,
            note: String::new(),
        };
        assert!(base().validate().is_ok());
        assert!(WorkoutRequest { duration_min: 0, ..base() }.validate().is_err());
        assert!(WorkoutRequest { distance_km: -0.1, ..base() }.validate().is_err());
        assert!(WorkoutRequest { steps: -1, ..base() }.validate().is_err());
    }
}
