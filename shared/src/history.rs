//! Workout history statistics
//!
//! Pure functions over history records; storage lives in the backend.

use crate::models::WorkoutHistoryRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Summary over a set of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryStatistics {
    pub total: usize,
    pub completed: usize,
    /// Percentage of records marked completed, 0 when there are none
    pub completion_rate: f64,
    pub total_duration_seconds: i64,
}

impl HistoryStatistics {
    pub fn from_records(records: &[WorkoutHistoryRecord]) -> Self {
        let total = records.len();
        let completed = records.iter().filter(|r| r.is_completed).count();
        let completion_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            completed,
            completion_rate,
            total_duration_seconds: records.iter().map(|r| r.duration_seconds).sum(),
        }
    }
}

/// Completed sessions in the seven days before `now`, as a percentage of
/// one session per day (capped at 100). Sessions without exercises, such as
/// a start on a rest day, do not count.
pub fn weekly_completion(records: &[WorkoutHistoryRecord], now: DateTime<Utc>) -> f64 {
    let since = now - Duration::days(7);
    let completed = records
        .iter()
        .filter(|r| r.is_completed && r.total_exercises > 0)
        .filter(|r| r.date >= since && r.date <= now)
        .count();
    (completed as f64 / 7.0 * 100.0).min(100.0)
}

/// Most recent record by date
pub fn latest(records: &[WorkoutHistoryRecord]) -> Option<&WorkoutHistoryRecord> {
    records.iter().max_by_key(|r| r.date)
}
