//! User profile API routes

use crate::error::ApiError;
use crate::identity::Owner;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use fouxd_training_shared::health_metrics::BmiResult;
use fouxd_training_shared::models::UserProfile;
use fouxd_training_shared::types::ProfileUpdatedResponse;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/bmi", get(get_bmi))
}

/// GET /api/v1/profile - Stored profile, or defaults for a new user
async fn get_profile(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = ProfileService::get_profile(state.storage(), owner.id()).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile - Save the profile and regenerate the weekly plan
async fn update_profile(
    State(state): State<AppState>,
    owner: Owner,
    Json(profile): Json<UserProfile>,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    let (profile, generated) =
        ProfileService::update_profile(state.storage(), state.planner(), owner.id(), profile)
            .await?;
    Ok(Json(ProfileUpdatedResponse {
        profile,
        plan: generated.plan,
        plan_persisted: generated.persisted,
    }))
}

/// GET /api/v1/profile/bmi
async fn get_bmi(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<BmiResult>, ApiError> {
    let bmi = ProfileService::bmi(state.storage(), owner.id()).await?;
    Ok(Json(bmi))
}
