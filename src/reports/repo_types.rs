use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct MealTypeTotal {
    pub meal_type: String,
    pub total_kcal: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct TopFood {
    pub name: String,
    pub times: i64,
    pub total_grams: f64,
    pub total_kcal: f64,
}
