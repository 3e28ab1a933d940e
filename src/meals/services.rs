use sqlx::PgPool;
use time::Date;
use tracing::info;
use uuid::Uuid;

use super::dto::MealRequest;
use super::repo;
use super::repo_types::MealWrite;
use crate::error::{ServiceError, ServiceResult};
use crate::metrics::round_to;

/// kcal eaten for `quantity_grams` of a food, to one decimal.
pub fn calories_in(kcal_per_100g: f64, quantity_grams: f64) -> f64 {
    if !(quantity_grams > 0.0) || !(kcal_per_100g > 0.0) {
        return 0.0;
    }
    round_to(kcal_per_100g * quantity_grams / 100.0, 1)
}

async fn derive_write<'a>(db: &PgPool, req: &'a MealRequest, today: Date) -> ServiceResult<MealWrite<'a>> {
    let food = repo::find_food(db, req.food_id)
        .await?
        .ok_or(ServiceError::NotFound("Food"))?;
    Ok(MealWrite {
        date: req.date.unwrap_or(today),
        meal_type: req.meal_type.as_str(),
        food_id: food.id,
        portion: req.portion.trim(),
        quantity_grams: req.quantity_grams,
        calories_in: calories_in(food.kcal_per_100g, req.quantity_grams),
    })
}

pub async fn create_meal(db: &PgPool, user_id: Uuid, req: &MealRequest, today: Date) -> ServiceResult<Uuid> {
    let write = derive_write(db, req, today).await?;
    let id = repo::insert(db, user_id, &write).await?;
    info!(%user_id, meal_id = %id, calories_in = write.calories_in, "meal logged");
    Ok(id)
}

pub async fn update_meal(
    db: &PgPool,
    user_id: Uuid,
    meal_id: Uuid,
    req: &MealRequest,
    today: Date,
) -> ServiceResult<()> {
    let write = derive_write(db, req, today).await?;
    if !repo::update(db, user_id, meal_id, &write).await? {
        return Err(ServiceError::NotFound("Meal"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chicken_breast_150g() {
        assert_eq!(calories_in(165.0, 150.0), 247.5);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(calories_in(52.0, 33.0), 17.2);
    }

    #[test]
    fn zero_quantity_or_density_is_zero() {
        assert_eq!(calories_in(165.0, 0.0), 0.0);
        assert_eq!(calories_in(0.0, 100.0), 0.0);
    }
}
