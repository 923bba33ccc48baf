//! Weekly plan service
//!
//! Owns the plan generator and its random source, and keeps the stored plan
//! in step with the stored profile.

use crate::error::ApiError;
use crate::repositories::{PlanStore, Storage};
use crate::services::profile::ProfileService;
use chrono::{DateTime, Utc};
use fouxd_training_shared::errors::PlanError;
use fouxd_training_shared::models::{DayPlan, UserProfile, WeekDay, WeeklyPlan};
use fouxd_training_shared::planner::PlanGenerator;
use fouxd_training_shared::types::GeneratedPlan;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Plan generator plus the RNG it draws from
#[derive(Debug)]
pub struct Planner {
    generator: PlanGenerator,
    rng: Mutex<StdRng>,
}

impl Planner {
    /// Seeded planners reproduce the same sequence of plans
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            generator: PlanGenerator::default(),
            rng: Mutex::new(rng),
        }
    }

    pub fn generate(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<WeeklyPlan, PlanError> {
        // Poisoning leaves the RNG state intact
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.generator.generate(profile, &mut *rng, now)
    }
}

/// Plan service for weekly plan operations
pub struct PlanService;

impl PlanService {
    /// Generate and store a fresh plan for `profile`, replacing any existing one
    ///
    /// A failed save is logged and reported through `persisted`; the plan is
    /// still returned.
    pub async fn regenerate(
        storage: &dyn Storage,
        planner: &Planner,
        owner: Option<&str>,
        profile: &UserProfile,
    ) -> Result<GeneratedPlan, ApiError> {
        let plan = planner.generate(profile, Utc::now())?;
        let persisted = match storage.save_plan(owner, &plan).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    owner = owner.unwrap_or("local"),
                    error = %err,
                    "Failed to store generated plan"
                );
                false
            }
        };

        info!(
            owner = owner.unwrap_or("local"),
            days = plan.len(),
            sessions = plan.days().iter().map(|d| d.exercises.len()).sum::<usize>(),
            persisted,
            "Weekly plan generated"
        );

        Ok(GeneratedPlan { plan, persisted })
    }

    /// Stored plan, generated from the stored (or default) profile if absent
    pub async fn get_or_create(
        storage: &dyn Storage,
        planner: &Planner,
        owner: Option<&str>,
    ) -> Result<WeeklyPlan, ApiError> {
        if let Some(plan) = storage.load_plan(owner).await? {
            return Ok(plan);
        }

        debug!(owner = owner.unwrap_or("local"), "No stored plan, generating one");
        let profile = ProfileService::get_profile(storage, owner).await?;
        let plan = planner.generate(&profile, Utc::now())?;
        match storage.create_plan_if_absent(owner, plan.clone()).await {
            Ok(stored) => Ok(stored),
            Err(err) => {
                warn!(
                    owner = owner.unwrap_or("local"),
                    error = %err,
                    "Failed to store generated plan"
                );
                Ok(plan)
            }
        }
    }

    /// Regenerate the whole week from the stored profile
    pub async fn reshuffle(
        storage: &dyn Storage,
        planner: &Planner,
        owner: Option<&str>,
    ) -> Result<GeneratedPlan, ApiError> {
        let profile = ProfileService::get_profile(storage, owner).await?;
        Self::regenerate(storage, planner, owner, &profile).await
    }

    /// Day plan for one weekday; `None` when the day has no free time
    pub async fn day_plan(
        storage: &dyn Storage,
        planner: &Planner,
        owner: Option<&str>,
        week_day: WeekDay,
    ) -> Result<Option<DayPlan>, ApiError> {
        let plan = Self::get_or_create(storage, planner, owner).await?;
        Ok(plan.day(week_day).cloned())
    }
}
