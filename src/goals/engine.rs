//! Goal lifecycle: plan derivation, progress and status transitions.
//!
//! Everything here is pure. Callers supply the burned kcal (from the ledger) and
//! the current date; persisting a transition is the job of `services`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::ledger::DateRange;

/// Empirical energy content of one kilogram of body weight.
pub const KCAL_PER_KG: f64 = 7700.0;
/// Share of the required kcal that counts as done once the deadline passed.
pub const COMPLETION_RATIO: f64 = 0.99;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    LoseWeight,
    GainWeight,
    Maintain,
}

impl GoalType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoseWeight => "lose_weight",
            Self::GainWeight => "gain_weight",
            Self::Maintain => "maintain",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LoseWeight => "Lose weight",
            Self::GainWeight => "Gain weight",
            Self::Maintain => "Maintain weight",
        }
    }
}

impl FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lose_weight" => Ok(Self::LoseWeight),
            "gain_weight" => Ok(Self::GainWeight),
            "maintain" => Ok(Self::Maintain),
            other => Err(format!("unknown goal type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    InProgress,
    Completed,
    Failed,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown goal status: {other}")),
        }
    }
}

/// Outcome a user picks when closing a goal by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishResult {
    Success,
    Fail,
}

impl FinishResult {
    pub fn status(self) -> GoalStatus {
        match self {
            Self::Success => GoalStatus::Completed,
            Self::Fail => GoalStatus::Failed,
        }
    }
}

impl FromStr for FinishResult {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "fail" => Ok(Self::Fail),
            other => Err(GoalError::InvalidResult(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GoalError {
    #[error("an in-progress goal already exists; finish it before creating a new one")]
    DuplicateActiveGoal,

    #[error("invalid finish result: {0:?} (expected \"success\" or \"fail\")")]
    InvalidResult(String),

    #[error("goal is already {}", .0.as_str())]
    AlreadyFinished(GoalStatus),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_value: f64,
    pub start_weight_kg: Option<f64>,
    pub start_date: Date,
    pub deadline: Option<Date>,
    pub status: GoalStatus,
    pub daily_calorie_target_in: Option<f64>,
    pub daily_calorie_target_out: Option<f64>,
    pub note: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// kg to gain or lose; 0 for maintain or when no start weight was captured.
pub fn required_delta_kg(goal_type: GoalType, target_value: f64, start_weight_kg: Option<f64>) -> f64 {
    match (goal_type, start_weight_kg) {
        (GoalType::Maintain, _) | (_, None) => 0.0,
        (_, Some(start)) => (target_value - start).abs(),
    }
}

/// Inclusive day count of the goal window; 0 without a deadline.
pub fn total_days(start_date: Date, deadline: Option<Date>) -> i64 {
    deadline.map_or(0, |d| (d - start_date).whole_days() + 1)
}

pub fn required_kcal_per_day(required_kcal: f64, total_days: i64) -> f64 {
    if total_days <= 0 {
        0.0
    } else {
        required_kcal / total_days as f64
    }
}

impl Goal {
    pub fn required_delta_kg(&self) -> f64 {
        required_delta_kg(self.goal_type, self.target_value, self.start_weight_kg)
    }

    pub fn required_kcal(&self) -> f64 {
        self.required_delta_kg() * KCAL_PER_KG
    }

    pub fn total_days(&self) -> i64 {
        total_days(self.start_date, self.deadline)
    }

    pub fn required_kcal_per_day(&self) -> f64 {
        required_kcal_per_day(self.required_kcal(), self.total_days())
    }

    /// Days whose workouts count toward the goal: `[start_date, min(today, deadline)]`.
    pub fn progress_window(&self, today: Date) -> DateRange {
        let end = self.deadline.map_or(today, |d| d.min(today));
        DateRange::new(self.start_date, end)
    }

    pub fn is_overdue(&self, today: Date) -> bool {
        self.deadline.is_some_and(|d| today > d)
    }
}

/// Figures fixed when a goal is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalPlan {
    pub start_weight_kg: Option<f64>,
    pub required_kcal: f64,
    pub total_days: i64,
    pub required_kcal_per_day: f64,
    pub daily_calorie_target_in: Option<f64>,
    pub daily_calorie_target_out: Option<f64>,
}

impl GoalPlan {
    /// `weight_kg` / `tdee` come from the current profile; `None` / 0 when absent.
    pub fn derive(
        goal_type: GoalType,
        target_value: f64,
        weight_kg: Option<f64>,
        tdee: f64,
        start_date: Date,
        deadline: Option<Date>,
    ) -> Self {
        let start_weight_kg = weight_kg.filter(|w| *w > 0.0);
        let required_kcal = required_delta_kg(goal_type, target_value, start_weight_kg) * KCAL_PER_KG;
        let total_days = total_days(start_date, deadline);
        let per_day = required_kcal_per_day(required_kcal, total_days);

        let (target_in, target_out) = if tdee > 0.0 {
            let target_in = match goal_type {
                GoalType::LoseWeight => tdee - per_day,
                GoalType::GainWeight => tdee + per_day,
                GoalType::Maintain => tdee,
            };
            (Some(target_in), Some(tdee))
        } else {
            (None, None)
        };

        Self {
            start_weight_kg,
            required_kcal,
            total_days,
            required_kcal_per_day: per_day,
            daily_calorie_target_in: target_in,
            daily_calorie_target_out: target_out,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalProgress {
    pub window: DateRange,
    pub burned_kcal: f64,
    pub required_kcal: f64,
    pub progress_pct: f64,
    /// `None` without a deadline.
    pub days_left: Option<i64>,
    pub description: String,
}

pub fn progress_pct(burned_kcal: f64, required_kcal: f64) -> f64 {
    if required_kcal > 0.0 {
        (burned_kcal / required_kcal * 100.0).min(100.0)
    } else {
        0.0
    }
}

fn describe(burned: f64, required: f64, deadline: Option<Date>, today: Date) -> String {
    let mut parts = Vec::new();
    if required > 0.0 {
        parts.push(format!(
            "Burned about {} / {} kcal of the goal.",
            burned.trunc() as i64,
            required.trunc() as i64
        ));
    }
    if let Some(deadline) = deadline {
        let days = (deadline - today).whole_days();
        parts.push(match days {
            d if d > 0 => format!("{d} days left until the deadline."),
            0 => "Today is the deadline.".to_string(),
            d => format!("{} days past the deadline.", -d),
        });
    }
    if parts.is_empty() {
        "Not enough data to compute progress.".into()
    } else {
        parts.join(" ")
    }
}

/// Progress of `goal` given the kcal burned over `goal.progress_window(today)`.
pub fn progress(goal: &Goal, burned_kcal: f64, today: Date) -> GoalProgress {
    let required = goal.required_kcal();
    GoalProgress {
        window: goal.progress_window(today),
        burned_kcal,
        required_kcal: required,
        progress_pct: progress_pct(burned_kcal, required),
        days_left: goal.deadline.map(|d| (d - today).whole_days().max(0)),
        description: describe(burned_kcal, required, goal.deadline, today),
    }
}

/// Status an overdue in-progress goal should move to, if any.
pub fn auto_transition(goal: &Goal, burned_kcal: f64, today: Date) -> Option<GoalStatus> {
    if goal.status.is_terminal() || !goal.is_overdue(today) {
        return None;
    }
    if burned_kcal >= goal.required_kcal() * COMPLETION_RATIO {
        Some(GoalStatus::Completed)
    } else {
        Some(GoalStatus::Failed)
    }
}

/// A user may hold at most one in-progress goal.
pub fn check_can_create(has_active_goal: bool) -> Result<(), GoalError> {
    if has_active_goal {
        Err(GoalError::DuplicateActiveGoal)
    } else {
        Ok(())
    }
}

/// Status to write for a manual finish; `None` when the goal already has it.
/// Terminal statuses are one-way, so completed and failed never swap.
pub fn finish(current: GoalStatus, result: FinishResult) -> Result<Option<GoalStatus>, GoalError> {
    let next = result.status();
    match current {
        GoalStatus::InProgress => Ok(Some(next)),
        s if s == next => Ok(None),
        s => Err(GoalError::AlreadyFinished(s)),
    }
}
