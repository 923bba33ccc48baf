//! Weekly plan generation
//!
//! Fills each day's free time with exercises drawn from the catalog. The
//! body-mass category picks the category weights and the rest penalty; the
//! activity level picks reps, sets and rest.
//!
//! Structure is deterministic (one day plan per weekday with free time, every
//! day within budget); content depends on the injected random source, so a
//! seeded RNG reproduces a plan exactly.

use crate::catalog::{ExerciseCatalog, ExerciseCategory, StaticCatalog};
use crate::errors::PlanError;
use crate::health_metrics::{bmi_category, BmiCategory};
use crate::models::{
    ActivityLevel, DayPlan, ExerciseConfiguration, ExerciseSession, Gender, UserProfile, WeekDay,
    WeeklyPlan,
};
use crate::validation::validate_profile;
use chrono::{DateTime, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

/// Draw weights for `[upper, lower, core, full]`, indexed like
/// [`ExerciseCategory::ALL`]
pub fn category_weights(bmi: BmiCategory) -> [u32; 4] {
    match bmi {
        BmiCategory::Underweight => [1, 1, 2, 3],
        BmiCategory::Normal => [2, 2, 2, 2],
        BmiCategory::Overweight => [1, 3, 2, 1],
        BmiCategory::Obese => [1, 4, 3, 1],
    }
}

/// Configuration for one exercise given the profile's activity level,
/// gender and body-mass category
pub fn standard_configuration(
    level: ActivityLevel,
    gender: Gender,
    bmi: BmiCategory,
) -> ExerciseConfiguration {
    let base = level.base_configuration();
    let reps = match gender {
        Gender::Female if base.reps > 60 => base.reps - 20,
        Gender::Female => base.reps.saturating_sub(10),
        Gender::Male | Gender::Other => base.reps,
    };

    ExerciseConfiguration {
        reps,
        extra_rest_seconds: bmi.extra_rest_seconds(),
        ..base
    }
}

/// Plan generator over an exercise catalog
#[derive(Debug, Clone, Default)]
pub struct PlanGenerator<C = StaticCatalog> {
    catalog: C,
}

impl<C: ExerciseCatalog> PlanGenerator<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Generate a full week for the profile
    ///
    /// Weekdays with no free time are omitted. Fails on an invalid profile
    /// or an empty catalog category.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        profile: &UserProfile,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<WeeklyPlan, PlanError> {
        validate_profile(profile)?;

        let bmi = bmi_category(profile.weight, profile.height);
        let configuration = standard_configuration(profile.activity_level, profile.gender, bmi);

        let days = profile
            .availability
            .active_days()
            .map(|day| self.generate_day(day.week_day, day.free_time, bmi, configuration, rng, now))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WeeklyPlan::from_unique_days(days))
    }

    /// Fill one day's budget
    ///
    /// Exercises are appended until the budget is used up; the last one is
    /// dropped only if it overflowed, so an exact fit is kept. The budget
    /// takes priority: a day too short for a single exercise comes out empty.
    pub fn generate_day<R: Rng + ?Sized>(
        &self,
        week_day: WeekDay,
        free_time_hours: f64,
        bmi: BmiCategory,
        configuration: ExerciseConfiguration,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<DayPlan, PlanError> {
        let budget = (free_time_hours * 3600.0) as i64;
        let cost = configuration.estimated_seconds() as i64;
        let mut remaining = budget;
        let mut exercises = Vec::new();

        while remaining > 0 {
            let category = self.pick_category(bmi, rng);
            let exercise = self.pick_exercise(category, rng)?;
            exercises.push(ExerciseSession::new(exercise, configuration));
            remaining -= cost.max(1);
        }

        if remaining < 0 {
            exercises.pop();
        }

        Ok(DayPlan {
            week_day,
            exercises,
            last_updated: now,
        })
    }

    fn pick_category<R: Rng + ?Sized>(&self, bmi: BmiCategory, rng: &mut R) -> ExerciseCategory {
        let weights = category_weights(bmi);
        match WeightedIndex::new(weights) {
            Ok(dist) => ExerciseCategory::ALL[dist.sample(rng)],
            // All tables are non-zero; fall back to a uniform draw if that changes
            Err(_) => ExerciseCategory::ALL[rng.gen_range(0..ExerciseCategory::ALL.len())],
        }
    }

    fn pick_exercise<R: Rng + ?Sized>(
        &self,
        category: ExerciseCategory,
        rng: &mut R,
    ) -> Result<crate::catalog::Exercise, PlanError> {
        self.catalog
            .exercises(category)
            .choose(rng)
            .copied()
            .ok_or(PlanError::EmptyCategory(category))
    }
}
