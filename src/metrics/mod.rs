//! Body metrics derived from anthropometric inputs.
//!
//! Every function here is total: zero, negative or unrecognised inputs yield a
//! zero result instead of an error.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sex code as stored on the profile (`M` / `F`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "M" | "m" => Some(Self::Male),
            "F" | "f" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    #[default]
    Light,
    Moderate,
    Active,
    Very,
}

impl ActivityLevel {
    pub fn factor(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::Very => 1.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::Very => "very",
        }
    }

    /// Unknown levels fall back to `light`.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "very" => Ok(Self::Very),
            other => Err(format!("unknown activity level: {other}")),
        }
    }
}

/// Inputs the metrics are computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anthropometrics {
    pub age: i32,
    pub sex: Option<Sex>,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BodyMetrics {
    pub bmi: f64,
    pub bmr: f64,
    pub tdee: f64,
}

/// WHO adult BMI classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiClass {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiClass {
    /// `None` when no BMI is available (bmi <= 0).
    pub fn classify(bmi: f64) -> Option<Self> {
        if !(bmi > 0.0) {
            return None;
        }
        Some(if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Underweight => "underweight",
            Self::Normal => "normal",
            Self::Overweight => "overweight",
            Self::Obese => "obese",
        }
    }
}

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    if !(height_cm > 0.0 && weight_kg > 0.0) {
        return 0.0;
    }
    let h_m = height_cm / 100.0;
    round_to(weight_kg / (h_m * h_m), 2)
}

/// Mifflin–St Jeor.
pub fn bmr(weight_kg: f64, height_cm: f64, age: i32, sex: Option<Sex>) -> f64 {
    let Some(sex) = sex else {
        return 0.0;
    };
    if !(weight_kg > 0.0 && height_cm > 0.0 && age > 0) {
        return 0.0;
    }
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    let offset = match sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
    };
    round_to(base + offset, 0)
}

pub fn tdee(bmr: f64, level: ActivityLevel) -> f64 {
    if !(bmr > 0.0) {
        return 0.0;
    }
    round_to(bmr * level.factor(), 0)
}

pub fn recalc(input: &Anthropometrics) -> BodyMetrics {
    let bmr = bmr(input.weight_kg, input.height_cm, input.age, input.sex);
    BodyMetrics {
        bmi: bmi(input.height_cm, input.weight_kg),
        bmr,
        tdee: tdee(bmr, input.activity_level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn male_25() -> Anthropometrics {
        Anthropometrics {
            age: 25,
            sex: Some(Sex::Male),
            height_cm: 170.0,
            weight_kg: 70.0,
            activity_level: ActivityLevel::Light,
        }
    }

    #[test]
    fn reference_male_profile() {
        let m = recalc(&male_25());
        assert_eq!(m.bmi, 24.22);
        // 700 + 1062.5 - 125 + 5 = 1642.5
        assert_eq!(m.bmr, 1643.0);
        // 1643 * 1.375 = 2259.125
        assert_eq!(m.tdee, 2259.0);
    }

    #[test]
    fn female_offset() {
        let input = Anthropometrics {
            sex: Some(Sex::Female),
            ..male_25()
        };
        // 700 + 1062.5 - 125 - 161
        assert_eq!(recalc(&input).bmr, 1477.0);
    }

    #[test]
    fn non_positive_inputs_give_zero_metrics() {
        for (h, w) in [(0.0, 70.0), (170.0, 0.0), (-1.0, 70.0), (170.0, -5.0)] {
            let m = recalc(&Anthropometrics {
                height_cm: h,
                weight_kg: w,
                ..male_25()
            });
            assert_eq!(m, BodyMetrics::default(), "h={h} w={w}");
        }
    }

    #[test]
    fn zero_age_or_unknown_sex_zeroes_bmr_but_keeps_bmi() {
        let m = recalc(&Anthropometrics { age: 0, ..male_25() });
        assert_eq!(m.bmr, 0.0);
        assert_eq!(m.tdee, 0.0);
        assert_eq!(m.bmi, 24.22);

        let m = recalc(&Anthropometrics { sex: None, ..male_25() });
        assert_eq!((m.bmr, m.tdee), (0.0, 0.0));
    }

    #[test]
    fn tdee_is_bmr_times_factor() {
        let levels = [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::Very,
        ];
        for level in levels {
            let m = recalc(&Anthropometrics {
                activity_level: level,
                ..male_25()
            });
            assert_eq!(m.tdee, (m.bmr * level.factor()).round());
        }
    }

    #[test]
    fn unknown_activity_level_defaults_to_light() {
        assert_eq!(ActivityLevel::parse_or_default("couch"), ActivityLevel::Light);
        assert_eq!(ActivityLevel::parse_or_default("very"), ActivityLevel::Very);
    }

    #[test]
    fn sex_codes() {
        assert_eq!(Sex::from_code("M"), Some(Sex::Male));
        assert_eq!(Sex::from_code("f"), Some(Sex::Female));
        assert_eq!(Sex::from_code("X"), None);
    }

    #[test]
    fn bmi_classes_follow_who_cutoffs() {
        assert_eq!(BmiClass::classify(0.0), None);
        assert_eq!(BmiClass::classify(18.49), Some(BmiClass::Underweight));
        assert_eq!(BmiClass::classify(18.5), Some(BmiClass::Normal));
        assert_eq!(BmiClass::classify(24.99), Some(BmiClass::Normal));
        assert_eq!(BmiClass::classify(25.0), Some(BmiClass::Overweight));
        assert_eq!(BmiClass::classify(30.0), Some(BmiClass::Obese));
    }

    #[test]
    fn nan_inputs_do_not_panic() {
        let m = recalc(&Anthropometrics {
            height_cm: f64::NAN,
            ..male_25()
        });
        assert_eq!(m, BodyMetrics::default());
    }
}
