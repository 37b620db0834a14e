use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    EducationBody, ExperienceBody, MsgResponse, OwnerSummary, ProfileResponse, UpsertProfileBody,
};
use super::repo_types::Profile;
use super::service;
use crate::{auth::AuthUser, error::ApiError, state::AppState, users::User};

const NO_PROFILE: &str = "There is no profile for this user";
const PROFILE_NOT_FOUND: &str = "Profile not found";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            post(upsert_profile).get(list_profiles).delete(remove_profile),
        )
        .route("/profile/me", get(my_profile))
        .route("/profile/user/:user_id", get(profile_by_user))
        .route("/profile/experience", put(add_experience))
        .route(
            "/profile/experience/:id",
            put(update_experience).delete(remove_experience),
        )
        .route("/profile/education", put(add_education))
        .route("/profile/education/:id", delete(remove_education))
}

async fn load_profile(state: &AppState, user_id: Uuid) -> Result<Profile, ApiError> {
    Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(NO_PROFILE))
}

#[instrument(skip(state))]
pub async fn my_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = load_profile(&state, user_id).await?;
    let owner = User::find_by_id(&state.db, user_id).await?;
    Ok(Json(ProfileResponse {
        user: owner.map(OwnerSummary::from),
        profile,
    }))
}

#[instrument(skip(state, body))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpsertProfileBody>,
) -> Result<Json<Profile>, ApiError> {
    let errors = body.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let profile = match Profile::find_by_user(&state.db, user_id).await? {
        Some(mut existing) => {
            service::apply_update(&mut existing, &body);
            existing
        }
        None => service::new_profile(user_id, &body),
    };

    let stored = Profile::upsert(&state.db, &profile).await?;
    info!(user_id = %user_id, "profile upserted");
    Ok(Json(stored))
}

#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let profiles = Profile::list_all(&state.db).await?;
    let ids: Vec<Uuid> = profiles.iter().map(|p| p.user_id).collect();
    let owners: HashMap<Uuid, User> = User::find_by_ids(&state.db, &ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let items = profiles
        .into_iter()
        .map(|p| {
            let user = owners.get(&p.user_id).cloned().map(OwnerSummary::from);
            ProfileResponse { user, profile: p }
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    // A malformed id answers exactly like an absent profile.
    let Ok(user_id) = user_id.parse::<Uuid>() else {
        warn!(user_id = %user_id, "malformed user id");
        return Err(ApiError::not_found(PROFILE_NOT_FOUND));
    };

    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))?;
    let owner = User::find_by_id(&state.db, user_id).await?;
    Ok(Json(ProfileResponse {
        user: owner.map(OwnerSummary::from),
        profile,
    }))
}

#[instrument(skip(state))]
pub async fn remove_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MsgResponse>, ApiError> {
    Profile::delete_with_user(&state.db, user_id).await?;
    info!(user_id = %user_id, "profile and user removed");
    Ok(Json(MsgResponse { msg: "User removed" }))
}

#[instrument(skip(state, body))]
pub async fn add_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ExperienceBody>,
) -> Result<Json<Profile>, ApiError> {
    let errors = body.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let mut profile = load_profile(&state, user_id).await?;
    service::push_experience(&mut profile.experience.0, &body);
    let stored = Profile::upsert(&state.db, &profile).await?;
    Ok(Json(stored))
}

#[instrument(skip(state, body))]
pub async fn add_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<EducationBody>,
) -> Result<Json<Profile>, ApiError> {
    let errors = body.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let mut profile = load_profile(&state, user_id).await?;
    service::push_education(&mut profile.education.0, &body);
    let stored = Profile::upsert(&state.db, &profile).await?;
    Ok(Json(stored))
}

#[instrument(skip(state, body))]
pub async fn update_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ExperienceBody>,
) -> Result<Json<Profile>, ApiError> {
    let errors = body.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let Ok(id) = id.parse::<Uuid>() else {
        return Err(ApiError::not_found("Experience entry not found"));
    };

    let mut profile = load_profile(&state, user_id).await?;
    service::update_experience(&mut profile.experience.0, id, &body)
        .map_err(|_| ApiError::not_found("Experience entry not found"))?;
    let stored = Profile::upsert(&state.db, &profile).await?;
    Ok(Json(stored))
}

#[instrument(skip(state))]
pub async fn remove_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let Ok(id) = id.parse::<Uuid>() else {
        return Err(ApiError::not_found("Experience entry not found"));
    };

    let mut profile = load_profile(&state, user_id).await?;
    service::remove_entry(&mut profile.experience.0, id)
        .map_err(|_| ApiError::not_found("Experience entry not found"))?;
    let stored = Profile::upsert(&state.db, &profile).await?;
    Ok(Json(stored))
}

#[instrument(skip(state))]
pub async fn remove_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let Ok(id) = id.parse::<Uuid>() else {
        return Err(ApiError::not_found("Education entry not found"));
    };

    let mut profile = load_profile(&state, user_id).await?;
    service::remove_entry(&mut profile.education.0, id)
        .map_err(|_| ApiError::not_found("Education entry not found"))?;
    let stored = Profile::upsert(&state.db, &profile).await?;
    Ok(Json(stored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn upsert_without_required_fields_fails_validation_before_the_db() {
        let state = AppState::fake();
        let err = upsert_profile(
            State(state),
            AuthUser(Uuid::new_v4()),
            Json(UpsertProfileBody::default()),
        )
        .await
        .err()
        .expect("should fail validation");

        match err {
            ApiError::Validation(errors) => {
                let params: Vec<_> = errors.iter().map(|e| e.param).collect();
                assert_eq!(params, ["status", "skills"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn add_experience_without_required_fields_fails_validation() {
        let state = AppState::fake();
        let err = add_experience(
            State(state),
            AuthUser(Uuid::new_v4()),
            Json(ExperienceBody::default()),
        )
        .await
        .err()
        .expect("should fail validation");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_user_id_answers_like_an_absent_profile() {
        let state = AppState::fake();
        let err = profile_by_user(State(state), Path("definitely-not-a-uuid".into()))
            .await
            .err()
            .expect("should be rejected");

        match err {
            ApiError::NotFound { status, msg } => {
                assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
                assert_eq!(msg, PROFILE_NOT_FOUND);
            }
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_entry_id_is_not_found_not_a_crash() {
        let state = AppState::fake();
        let err = remove_experience(
            State(state),
            AuthUser(Uuid::new_v4()),
            Path("nope".into()),
        )
        .await
        .err()
        .expect("should be rejected");
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
