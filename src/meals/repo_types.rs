use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Catalog food with a fixed energy density.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub kcal_per_100g: f64,
}

/// Meal entry joined with the food name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealEntry {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub date: Date,
    pub meal_type: String,
    pub food_id: Uuid,
    pub food_name: String,
    pub portion: String,
    pub quantity_grams: f64,
    pub calories_in: f64, // derived from food density, never client-supplied
    pub created_at: OffsetDateTime,
}

/// Fields written for a meal after `calories_in` was derived.
#[derive(Debug, Clone)]
pub struct MealWrite<'a> {
    pub date: Date,
    pub meal_type: &'a str,
    pub food_id: Uuid,
    pub portion: &'a str,
    pub quantity_grams: f64,
    pub calories_in: f64,
}
