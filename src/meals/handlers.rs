use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::dto::{
    CreateFoodRequest, CreatedResponse, MealListQuery, MealListResponse, MealRequest, SearchQuery,
};
use super::repo::{self, MealFilter};
use super::repo_types::{Food, MealEntry};
use super::services;
use crate::{auth::AuthUser, error::internal, state::AppState};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods))
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", post(create_food))
        .route("/meals", post(create_meal))
        .route("/meals/:id", axum::routing::put(update_meal).delete(delete_meal))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(p): Query<SearchQuery>,
) -> Result<Json<Vec<Food>>, (StatusCode, String)> {
    let q = p.q.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let foods = repo::list_foods(&state.db, q).await.map_err(internal)?;
    Ok(Json(foods))
}

#[instrument(skip(state, body))]
pub async fn create_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateFoodRequest>,
) -> Result<(StatusCode, Json<Food>), (StatusCode, String)> {
    body.validate().map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;
    match repo::insert_food(&state.db, body.name.trim(), body.kcal_per_100g)
        .await
        .map_err(internal)?
    {
        Some(food) => Ok((StatusCode::CREATED, Json(food))),
        None => {
            warn!(%user_id, name = %body.name, "food already exists");
            Err((StatusCode::CONFLICT, "Food already exists".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<MealListQuery>,
) -> Result<Json<MealListResponse>, (StatusCode, String)> {
    let filter = MealFilter {
        start: p.start,
        end: p.end,
        food_name: p.q.as_deref().map(str::trim).filter(|s| !s.is_empty()),
    };
    let limit = p.limit.clamp(1, 200);
    let offset = p.offset.max(0);

    let items = repo::list_by_user(&state.db, user_id, &filter, limit, offset)
        .await
        .map_err(internal)?;
    let total_kcal = repo::total_calories(&state.db, user_id, &filter)
        .await
        .map_err(internal)?;
    Ok(Json(MealListResponse { items, total_kcal }))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealEntry>, (StatusCode, String)> {
    repo::get(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Meal not found".into()))
}

#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<MealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<CreatedResponse>), (StatusCode, String)> {
    body.validate().map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    let id = services::create_meal(&state.db, user_id, &body, state.config.today()).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/v1/meals/{id}")).map_err(|e| internal(e.into()))?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(CreatedResponse { id })))
}

#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<MealRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    body.validate().map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;
    services::update_meal(&state.db, user_id, id, &body, state.config.today()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if repo::delete(&state.db, user_id, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Meal not found".into()))
    }
}
