//! Read-only reports over the energy ledger.

pub mod handlers;
pub mod nutrition;
mod repo;
mod repo_types;
pub mod series;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::read_routes()
}
