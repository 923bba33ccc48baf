//! Business logic services
//!
//! Services encapsulate business logic and coordinate between the storage
//! collaborators and the shared planning and session core.

pub mod history;
pub mod plan;
pub mod profile;
pub mod workout;

pub use history::HistoryService;
pub use plan::{PlanService, Planner};
pub use profile::ProfileService;
pub use workout::WorkoutService;
