use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{error, instrument};

use super::client::UpstreamError;
use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile/github/:username", get(github_repos))
        .route("/profile/spotify", get(spotify_profile))
}

/// Any upstream non-success becomes the fixed not-found body; transport
/// failures stay generic.
fn map_upstream(err: UpstreamError, not_found_msg: &'static str, context: &'static str) -> ApiError {
    match err {
        UpstreamError::Status(_) => ApiError::upstream_not_found(not_found_msg),
        UpstreamError::Transport(e) => {
            error!(error = %e, "{context} request failed");
            ApiError::Internal(e.into())
        }
    }
}

#[instrument(skip(state))]
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let repos = state
        .upstream
        .github_repos(&username)
        .await
        .map_err(|e| map_upstream(e, "No Github profile found", "github"))?;
    Ok(Json(repos))
}

#[instrument(skip(state))]
pub async fn spotify_profile(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let profile = state
        .upstream
        .spotify_profile()
        .await
        .map_err(|e| map_upstream(e, "No Spotify profile found", "spotify"))?;
    Ok(Json(profile))
}
