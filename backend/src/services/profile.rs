//! Profile service - business logic for the user profile

use crate::error::ApiError;
use crate::repositories::{ProfileStore, Storage};
use crate::services::plan::{PlanService, Planner};
use chrono::Utc;
use fouxd_training_shared::health_metrics::{calculate_bmi_result, BmiResult};
use fouxd_training_shared::models::UserProfile;
use fouxd_training_shared::types::GeneratedPlan;
use fouxd_training_shared::validation::validate_profile;
use tracing::{info, warn};

/// Profile service for user profile operations
pub struct ProfileService;

impl ProfileService {
    /// Stored profile, or the default one for a new user
    pub async fn get_profile(
        storage: &dyn Storage,
        owner: Option<&str>,
    ) -> Result<UserProfile, ApiError> {
        Ok(storage.load_profile(owner).await?.unwrap_or_default())
    }

    /// Validate and store a profile, then regenerate the plan from it.
    /// The profile save is fatal; the plan save is not.
    pub async fn update_profile(
        storage: &dyn Storage,
        planner: &Planner,
        owner: Option<&str>,
        mut profile: UserProfile,
    ) -> Result<(UserProfile, GeneratedPlan), ApiError> {
        if let Err(err) = validate_profile(&profile) {
            warn!(field = %err.field, "Rejected profile update");
            return Err(err.into());
        }

        profile.last_updated = Utc::now();
        storage.save_profile(owner, &profile).await?;
        info!(owner = owner.unwrap_or("local"), "Profile saved");

        let generated = PlanService::regenerate(storage, planner, owner, &profile).await?;
        Ok((profile, generated))
    }

    /// BMI value, category and healthy range for the stored profile
    pub async fn bmi(storage: &dyn Storage, owner: Option<&str>) -> Result<BmiResult, ApiError> {
        let profile = Self::get_profile(storage, owner).await?;
        Ok(calculate_bmi_result(profile.weight, profile.height))
    }
}
