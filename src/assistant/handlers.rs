use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::responder::{self, Topic, UserContext};
use crate::{auth::AuthUser, error::internal, goals, profiles, state::AppState};

const MAX_MESSAGE_CHARS: usize = 1000;

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/assistant", post(ask))
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub topic: Option<Topic>,
    pub reply: String,
}

#[instrument(skip(state, body))]
pub async fn ask(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "empty message".into()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err((StatusCode::BAD_REQUEST, "message is too long".into()));
    }

    let profile = profiles::repo::find_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    let goal = goals::repo::find_active(&state.db, user_id)
        .await
        .map_err(internal)?;
    let ctx = UserContext {
        metrics: profile.as_ref().map(|p| p.metrics()),
        active_goal: goal.as_ref().map(|g| (g.goal_type, g.target_value)),
        daily_target_in: goal.and_then(|g| g.daily_calorie_target_in),
    };

    let (topic, reply) = responder::respond(message, &ctx);
    debug!(%user_id, ?topic, "assistant replied");
    Ok(Json(AskResponse { topic, reply }))
}
