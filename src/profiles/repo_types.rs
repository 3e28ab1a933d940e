use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::metrics::{ActivityLevel, Anthropometrics, BodyMetrics, Sex};

/// Profile record in the database. `bmi`/`bmr`/`tdee` are cached derivations.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: String,
    pub age: i32,
    pub sex: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub bmi: f64,
    pub bmr: f64,
    pub tdee: f64,
    pub updated_at: OffsetDateTime,
}

impl Profile {
    pub fn anthropometrics(&self) -> Anthropometrics {
        Anthropometrics {
            age: self.age,
            sex: Sex::from_code(&self.sex),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            activity_level: ActivityLevel::parse_or_default(&self.activity_level),
        }
    }

    pub fn metrics(&self) -> BodyMetrics {
        BodyMetrics {
            bmi: self.bmi,
            bmr: self.bmr,
            tdee: self.tdee,
        }
    }
}
