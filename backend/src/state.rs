//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state extraction.
//! Every field is an `Arc` or wraps one, so cloning per request is cheap.

use crate::config::AppConfig;
use crate::repositories::Storage;
use crate::services::{Planner, WorkoutService};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Profile, plan and history storage
    pub storage: Arc<dyn Storage>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Plan generator with its random source
    pub planner: Arc<Planner>,
    /// Running workout sessions
    pub workouts: WorkoutService,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: AppConfig) -> Self {
        let planner = Arc::new(Planner::new(config.planner.seed));
        let workouts = WorkoutService::new(
            Arc::clone(&storage),
            config.workout.tick_interval(),
            config.workout.finished_retention(),
        );

        Self {
            storage,
            config: Arc::new(config),
            planner,
            workouts,
        }
    }

    #[inline]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn planner(&self) -> &Planner {
        &self.planner
    }
}
