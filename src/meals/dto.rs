use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::repo_types::MealEntry;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

/// Body of POST /meals and PUT /meals/:id. `calories_in` is not accepted.
#[derive(Debug, Deserialize)]
pub struct MealRequest {
    pub date: Option<Date>, // defaults to today
    pub meal_type: MealType,
    pub food_id: Uuid,
    #[serde(default)]
    pub portion: String,
    pub quantity_grams: f64,
}

impl MealRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.quantity_grams >= 1.0) {
            return Err("quantity_grams must be at least 1".into());
        }
        if self.portion.chars().count() > 100 {
            return Err("portion is too long".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFoodRequest {
    pub name: String,
    pub kcal_per_100g: f64,
}

impl CreateFoodRequest {
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > 200 {
            return Err("name must be 1-200 characters".into());
        }
        if !(self.kcal_per_100g >= 0.0) {
            return Err("kcal_per_100g must not be negative".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MealListQuery {
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
pub struct MealListResponse {
    pub items: Vec<MealEntry>,
    pub total_kcal: f64,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}
