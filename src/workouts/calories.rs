//! MET-based energy expenditure for a logged workout.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::metrics::round_to;

/// Weight assumed when the profile has none.
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
const UNKNOWN_MET: f64 = 4.0;
const BONUS_CAP: f64 = 0.3;
const KCAL_PER_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Run,
    Walk,
    Bike,
    Gym,
    Yoga,
}

impl WorkoutKind {
    pub fn met(self) -> f64 {
        match self {
            Self::Run => 9.8,
            Self::Walk => 3.5,
            Self::Bike => 7.5,
            Self::Gym => 6.0,
            Self::Yoga => 3.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Walk => "walk",
            Self::Bike => "bike",
            Self::Gym => "gym",
            Self::Yoga => "yoga",
        }
    }

    fn counts_distance(self) -> bool {
        matches!(self, Self::Run | Self::Walk)
    }
}

impl FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "run" => Ok(Self::Run),
            "walk" => Ok(Self::Walk),
            "bike" => Ok(Self::Bike),
            "gym" => Ok(Self::Gym),
            "yoga" => Ok(Self::Yoga),
            other => Err(format!("unknown workout type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutEffort {
    pub kind: Option<WorkoutKind>,
    pub duration_min: i32,
    pub distance_km: f64,
    pub steps: i32,
}

pub fn effective_weight(profile_weight_kg: Option<f64>) -> f64 {
    profile_weight_kg
        .filter(|w| *w > 0.0)
        .unwrap_or(DEFAULT_WEIGHT_KG)
}

fn base_kcal(effort: &WorkoutEffort, weight_kg: f64) -> f64 {
    let met = effort.kind.map_or(UNKNOWN_MET, WorkoutKind::met);
    let minutes = f64::from(effort.duration_min.max(0));
    met * 3.5 * weight_kg / 200.0 * minutes
}

fn bonus_kcal(effort: &WorkoutEffort, weight_kg: f64, base: f64) -> f64 {
    let mut bonus = 0.0;
    if effort.kind.is_some_and(WorkoutKind::counts_distance) && effort.distance_km > 0.0 {
        bonus += weight_kg * effort.distance_km;
    }
    if effort.steps > 0 {
        bonus += KCAL_PER_STEP * f64::from(effort.steps);
    }
    if base > 0.0 {
        bonus.min(base * BONUS_CAP)
    } else {
        bonus
    }
}

/// kcal burned, to one decimal. `weight_kg` should come from [`effective_weight`].
pub fn calories_out(effort: &WorkoutEffort, weight_kg: f64) -> f64 {
    let base = base_kcal(effort, weight_kg);
    let bonus = bonus_kcal(effort, weight_kg, base);
    round_to(base + bonus, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effort(kind: WorkoutKind, duration_min: i32, distance_km: f64, steps: i32) -> WorkoutEffort {
        WorkoutEffort {
            kind: Some(kind),
            duration_min,
            distance_km,
            steps,
        }
    }

    #[test]
    fn thirty_minute_5k_run() {
        // base 360.15, bonus capped at 108.045
        let kcal = calories_out(&effort(WorkoutKind::Run, 30, 5.0, 0), 70.0);
        assert_eq!(kcal, 468.2);
    }

    #[test]
    fn distance_ignored_for_bike() {
        let kcal = calories_out(&effort(WorkoutKind::Bike, 60, 20.0, 0), 70.0);
        // 7.5 * 3.5 * 70 / 200 * 60
        assert_eq!(kcal, 551.3);
    }

    #[test]
    fn step_bonus_below_cap() {
        // base = 3.5*3.5*70/200*40 = 171.5, bonus = 0.05*1000 = 50 < 51.45
        let kcal = calories_out(&effort(WorkoutKind::Walk, 40, 0.0, 1000), 70.0);
        assert_eq!(kcal, 221.5);
    }

    #[test]
    fn unknown_type_uses_default_met() {
        let e = WorkoutEffort {
            kind: None,
            duration_min: 10,
            distance_km: 3.0,
            steps: 0,
        };
        // 4.0 * 3.5 * 70 / 200 * 10, no distance bonus
        assert_eq!(calories_out(&e, 70.0), 49.0);
    }

    #[test]
    fn zero_duration_keeps_uncapped_bonus() {
        let kcal = calories_out(&effort(WorkoutKind::Gym, 0, 0.0, 200), 70.0);
        assert_eq!(kcal, 10.0);
    }

    #[test]
    fn weight_defaults_to_70() {
        assert_eq!(effective_weight(None), 70.0);
        assert_eq!(effective_weight(Some(0.0)), 70.0);
        assert_eq!(effective_weight(Some(82.5)), 82.5);
    }

    #[test]
    fn parses_kinds() {
        assert_eq!("yoga".parse::<WorkoutKind>(), Ok(WorkoutKind::Yoga));
        assert!("swim".parse::<WorkoutKind>().is_err());
    }
}
