use serde::{Deserialize, Serialize};
use time::Date;

use super::engine::{Goal, GoalProgress, GoalType};

const MAX_NOTE_CHARS: usize = 1000;

/// Body of POST /goals.
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_value: f64,
    pub deadline: Option<Date>,
    #[serde(default)]
    pub note: String,
}

impl CreateGoalRequest {
    pub fn validate(&self, today: Date) -> Result<(), String> {
        if !(self.target_value > 0.0) {
            return Err("target_value must be greater than 0".into());
        }
        if self.deadline.is_some_and(|d| d < today) {
            return Err("deadline must not be in the past".into());
        }
        if self.note.chars().count() > MAX_NOTE_CHARS {
            return Err("note is too long".into());
        }
        Ok(())
    }
}

/// A goal with the figures derived from it.
#[derive(Debug, Serialize)]
pub struct GoalResponse {
    #[serde(flatten)]
    pub goal: Goal,
    pub label: &'static str,
    pub required_kcal: f64,
    pub total_days: i64,
    pub required_kcal_per_day: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<GoalProgress>,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        Self {
            label: goal.goal_type.label(),
            required_kcal: goal.required_kcal(),
            total_days: goal.total_days(),
            required_kcal_per_day: goal.required_kcal_per_day(),
            progress: None,
            goal,
        }
    }
}

impl GoalResponse {
    pub fn with_progress(goal: Goal, progress: GoalProgress) -> Self {
        Self {
            progress: Some(progress),
            ..Self::from(goal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::engine::GoalStatus;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    #[test]
    fn parses_type_field() {
        let req: CreateGoalRequest = serde_json::from_str(
            r#"{"type":"lose_weight","target_value":75,"deadline":"2024-01-10"}"#,
        )
        .unwrap();
        assert_eq!(req.goal_type, GoalType::LoseWeight);
        assert_eq!(req.deadline, Some(date!(2024 - 01 - 10)));
        assert!(req.note.is_empty());
    }

    #[test]
    fn validation() {
        let today = date!(2024 - 01 - 05);
        let mut req = CreateGoalRequest {
            goal_type: GoalType::GainWeight,
            target_value: 70.0,
            deadline: Some(today),
            note: String::new(),
        };
        assert!(req.validate(today).is_ok());

        req.deadline = Some(date!(2024 - 01 - 04));
        assert!(req.validate(today).is_err());

        req.deadline = None;
        req.target_value = 0.0;
        assert!(req.validate(today).is_err());

        req.target_value = 70.0;
        req.note = "x".repeat(1001);
        assert!(req.validate(today).is_err());
    }

    #[test]
    fn response_includes_derived_figures() {
        let goal = Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            goal_type: GoalType::LoseWeight,
            target_value: 75.0,
            start_weight_kg: Some(80.0),
            start_date: date!(2024 - 01 - 01),
            deadline: Some(date!(2024 - 01 - 10)),
            status: GoalStatus::InProgress,
            daily_calorie_target_in: None,
            daily_calorie_target_out: None,
            note: String::new(),
            created_at: datetime!(2024-01-01 0:00 UTC),
            updated_at: datetime!(2024-01-01 0:00 UTC),
        };
        let json = serde_json::to_value(GoalResponse::from(goal)).unwrap();
        assert_eq!(json["type"], "lose_weight");
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["required_kcal"], 38500.0);
        assert_eq!(json["total_days"], 10);
        assert_eq!(json["required_kcal_per_day"], 3850.0);
        assert!(json.get("user_id").is_none());
        assert!(json.get("progress").is_none());
    }
}
