//! API request and response types

use crate::catalog::ExerciseCategory;
use crate::history::HistoryStatistics;
use crate::models::{UserProfile, WeekDay, WeeklyPlan, WorkoutHistoryRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Profile
// ============================================================================

/// Saved profile together with the plan regenerated from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdatedResponse {
    pub profile: UserProfile,
    pub plan: WeeklyPlan,
    /// False when the regenerated plan could not be stored
    pub plan_persisted: bool,
}

// ============================================================================
// Plan
// ============================================================================

/// Freshly generated plan and whether storing it succeeded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub plan: WeeklyPlan,
    pub persisted: bool,
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExercisesQuery {
    #[serde(default)]
    pub category: Option<ExerciseCategory>,
}

// ============================================================================
// Workout
// ============================================================================

/// Start a session; defaults to today's weekday
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartWorkoutRequest {
    #[serde(default)]
    pub week_day: Option<WeekDay>,
}

// ============================================================================
// History
// ============================================================================

/// Optional completion filter for listing history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Inclusive date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHistoryRequest {
    pub ids: Vec<Uuid>,
}

/// Retention delete: drop records dated strictly before `before`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBeforeQuery {
    pub before: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// Import records; without `merge` the existing history is replaced.
/// Merging skips records whose id is already stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportHistoryRequest {
    pub records: Vec<WorkoutHistoryRecord>,
    #[serde(default)]
    pub merge: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub total: usize,
}

/// Statistics window; unbounded on either side when omitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryStatsQuery {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStatisticsResponse {
    #[serde(flatten)]
    pub statistics: HistoryStatistics,
    /// Completed sessions over the last seven days, percent of one per day
    pub weekly_completion: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<WorkoutHistoryRecord>,
}
