use serde::Serialize;
use time::Date;

use super::repo_types::{MealTypeTotal, TopFood};
use crate::ledger::DailyEnergy;
use crate::metrics::round_to;

/// Intake within this many kcal of TDEE counts as balanced.
pub const BALANCE_BAND_KCAL: f64 = 150.0;
pub const HISTORY_DAYS: i64 = 7;
pub const TOP_FOODS: i64 = 5;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    Under,
    Balanced,
    Over,
}

/// `None` when no TDEE is available.
pub fn intake_status(total_in: f64, tdee: f64) -> Option<IntakeStatus> {
    if !(tdee > 0.0) {
        return None;
    }
    let diff = total_in - tdee;
    Some(if diff < -BALANCE_BAND_KCAL {
        IntakeStatus::Under
    } else if diff > BALANCE_BAND_KCAL {
        IntakeStatus::Over
    } else {
        IntakeStatus::Balanced
    })
}

pub fn advice(status: Option<IntakeStatus>) -> &'static str {
    match status {
        Some(IntakeStatus::Under) => {
            "You are eating below your maintenance needs. If you aim to gain weight, eat a little more."
        }
        Some(IntakeStatus::Over) => {
            "You are eating above your maintenance needs. If you aim to lose weight, reduce portions."
        }
        Some(IntakeStatus::Balanced) => "Today's intake is well balanced against your TDEE.",
        None => "No TDEE on your profile yet; add height and weight for calorie suggestions.",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryPoint {
    pub label: String,
    pub date: Date,
    pub calories_in: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NutritionSummary {
    pub date: Date,
    pub total_today: f64,
    pub by_meal_type: Vec<MealTypeTotal>,
    pub tdee: f64,
    /// Intake minus TDEE; 0 without TDEE.
    pub diff: f64,
    pub status: Option<IntakeStatus>,
    pub advice: &'static str,
    /// Advisory intake of the active goal.
    pub goal_daily_in: Option<f64>,
    pub history: Vec<HistoryPoint>,
    pub top_foods: Vec<TopFood>,
}

/// Inputs gathered from the store for one nutrition summary.
#[derive(Debug, Default)]
pub struct NutritionInputs {
    pub by_meal_type: Vec<MealTypeTotal>,
    /// Days with intake only, oldest first.
    pub history: Vec<DailyEnergy>,
    pub top_foods: Vec<TopFood>,
    pub goal_daily_in: Option<f64>,
}

pub fn nutrition_summary(today: Date, tdee: f64, inputs: NutritionInputs) -> NutritionSummary {
    let total_today = round_to(inputs.by_meal_type.iter().map(|m| m.total_kcal).sum(), 1);
    let status = intake_status(total_today, tdee);
    NutritionSummary {
        date: today,
        total_today,
        by_meal_type: inputs.by_meal_type,
        tdee: tdee.max(0.0),
        diff: if status.is_some() { round_to(total_today - tdee, 1) } else { 0.0 },
        status,
        advice: advice(status),
        goal_daily_in: inputs.goal_daily_in.filter(|v| *v > 0.0),
        history: inputs
            .history
            .into_iter()
            .map(|d| HistoryPoint {
                label: super::series::day_label(d.date),
                date: d.date,
                calories_in: round_to(d.kcal, 1),
            })
            .collect(),
        top_foods: inputs.top_foods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn meal_type(name: &str, kcal: f64) -> MealTypeTotal {
        MealTypeTotal {
            meal_type: name.into(),
            total_kcal: kcal,
        }
    }

    #[test]
    fn band_edges() {
        assert_eq!(intake_status(2150.0, 2000.0), Some(IntakeStatus::Balanced));
        assert_eq!(intake_status(2150.1, 2000.0), Some(IntakeStatus::Over));
        assert_eq!(intake_status(1850.0, 2000.0), Some(IntakeStatus::Balanced));
        assert_eq!(intake_status(1849.9, 2000.0), Some(IntakeStatus::Under));
        assert_eq!(intake_status(1000.0, 0.0), None);
    }

    #[test]
    fn summary_totals_meal_types() {
        let today = date!(2024 - 03 - 14);
        let s = nutrition_summary(
            today,
            2259.0,
            NutritionInputs {
                by_meal_type: vec![meal_type("breakfast", 450.5), meal_type("lunch", 800.0)],
                history: vec![DailyEnergy { date: today, kcal: 1250.5 }],
                ..Default::default()
            },
        );
        assert_eq!(s.total_today, 1250.5);
        assert_eq!(s.status, Some(IntakeStatus::Under));
        assert_eq!(s.diff, -1008.5);
        assert_eq!(s.history[0].label, "14/03");
    }

    #[test]
    fn no_tdee_gives_setup_advice() {
        let s = nutrition_summary(date!(2024 - 03 - 14), 0.0, NutritionInputs::default());
        assert_eq!(s.status, None);
        assert_eq!(s.diff, 0.0);
        assert!(s.advice.contains("No TDEE"));
    }
}
