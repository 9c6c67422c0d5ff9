//! Profile API endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::{success, ApiResult};
use crate::models::{CreateProfileRequest, Profile, UpdateProfileRequest};
use crate::validation::{validate_new_profile, validate_profile_update};
use crate::AppState;

/// GET /api/profile - Get the profile, `null` when none exists.
pub async fn get_profile(State(state): State<AppState>) -> ApiResult<Option<Profile>> {
    success(state.repo.get_profile().await)
}

/// POST /api/profile - Create the profile.
pub async fn create_profile(
    State(state): State<AppState>,
    payload: Result<Json<CreateProfileRequest>, JsonRejection>,
) -> ApiResult<Profile> {
    let Json(request) = payload?;
    validate_new_profile(&request)?;

    let profile = state.repo.create_profile(&request).await?;
    tracing::info!(id = profile.id, "Profile created");
    success(profile)
}

/// PUT /api/profile - Merge the supplied fields into the profile.
pub async fn update_profile(
    State(state): State<AppState>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Profile> {
    let Json(request) = payload?;
    validate_profile_update(&request)?;

    let profile = state.repo.update_profile(&request).await?;
    tracing::info!(id = profile.id, "Profile updated");
    success(profile)
}
