pub mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
mod service;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
