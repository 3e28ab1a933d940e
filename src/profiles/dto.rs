use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::Profile;
use crate::metrics::{ActivityLevel, Anthropometrics, BmiClass, Sex};

/// Request body of a profile edit.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: String,
    pub age: i32,
    pub sex: Sex,
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.height_cm > 0.0) || !(self.weight_kg > 0.0) {
            return Err("height_cm and weight_kg must be greater than 0".into());
        }
        if self.age <= 0 {
            return Err("age must be greater than 0".into());
        }
        if self.full_name.chars().count() > 120 {
            return Err("full_name is too long".into());
        }
        Ok(())
    }

    pub fn anthropometrics(&self) -> Anthropometrics {
        Anthropometrics {
            age: self.age,
            sex: Some(self.sex),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            activity_level: self.activity_level,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsView {
    pub bmi: f64,
    pub bmr: f64,
    pub tdee: f64,
    pub bmi_class: Option<BmiClass>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub full_name: String,
    pub age: i32,
    pub sex: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub metrics: MetricsView,
    pub updated_at: OffsetDateTime,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            metrics: MetricsView {
                bmi: p.bmi,
                bmr: p.bmr,
                tdee: p.tdee,
                bmi_class: BmiClass::classify(p.bmi),
            },
            full_name: p.full_name,
            age: p.age,
            sex: p.sex,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            activity_level: p.activity_level,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_payload() {
        let req: UpdateProfileRequest = serde_json::from_str(
            r#"{"age":25,"sex":"M","height_cm":170,"weight_kg":70,"activity_level":"moderate"}"#,
        )
        .unwrap();
        assert_eq!(req.sex, Sex::Male);
        assert_eq!(req.activity_level, ActivityLevel::Moderate);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_body_size() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"age":25,"sex":"F","height_cm":0,"weight_kg":70}"#).unwrap();
        assert!(req.validate().is_err());
        assert_eq!(req.activity_level, ActivityLevel::Light);
    }

    #[test]
    fn response_carries_bmi_class() {
        let p = Profile {
            user_id: uuid::Uuid::new_v4(),
            full_name: "An".into(),
            age: 25,
            sex: "M".into(),
            height_cm: 170.0,
            weight_kg: 70.0,
            activity_level: "light".into(),
            bmi: 24.22,
            bmr: 1643.0,
            tdee: 2259.0,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(ProfileResponse::from(p)).unwrap();
        assert_eq!(json["metrics"]["bmi_class"], "normal");
        assert_eq!(json["metrics"]["tdee"], 2259.0);
    }
}
