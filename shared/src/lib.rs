//! Fouxd Training Shared Library
//!
//! Domain core used by the backend: data model, exercise catalog, body-mass
//! metrics, weekly plan generation, the workout session state machine and
//! history statistics. No I/O lives here.

pub mod catalog;
pub mod errors;
pub mod health_metrics;
pub mod history;
pub mod models;
pub mod planner;
pub mod session;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use catalog::{Exercise, ExerciseCatalog, ExerciseCategory, ExerciseDefinition, StaticCatalog};
pub use errors::*;
pub use health_metrics::*;
pub use history::HistoryStatistics;
pub use models::*;
pub use planner::PlanGenerator;
pub use session::{SessionSnapshot, TickOutcome, WorkoutPhase, WorkoutSession};
pub use types::*;
pub use validation::ValidationError;
