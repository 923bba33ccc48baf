//! Workout history service
//!
//! Queries, statistics, deletion and backup/restore of history records.
//! Exports come as a JSON document or as CSV for spreadsheets; the JSON
//! document's `records` can be posted back to the import endpoint.

use crate::error::ApiError;
use crate::repositories::{HistoryStore, Storage};
use chrono::{DateTime, Utc};
use fouxd_training_shared::history::{self, weekly_completion, HistoryStatistics};
use fouxd_training_shared::models::WorkoutHistoryRecord;
use fouxd_training_shared::types::{ExportFormat, HistoryStatisticsResponse};
use fouxd_training_shared::validation::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub const EXPORT_VERSION: &str = "1.0";

/// Exercise counts are stored as 32-bit signed integers
const MAX_EXERCISES_PER_RECORD: u32 = i32::MAX as u32;

/// JSON history export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryExport {
    pub export_version: String,
    pub exported_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub records: Vec<WorkoutHistoryRecord>,
}

/// CSV export row for history records
#[derive(Debug, Clone, Serialize)]
pub struct HistoryCsvRow {
    pub id: String,
    pub date: String,
    pub duration_seconds: i64,
    pub exercises_completed: u32,
    pub total_exercises: u32,
    pub completion_percent: f64,
    pub is_completed: bool,
}

impl From<&WorkoutHistoryRecord> for HistoryCsvRow {
    fn from(r: &WorkoutHistoryRecord) -> Self {
        Self {
            id: r.id.to_string(),
            date: r.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            duration_seconds: r.duration_seconds,
            exercises_completed: r.exercises_completed,
            total_exercises: r.total_exercises,
            completion_percent: (r.completion_percentage() * 10.0).round() / 10.0,
            is_completed: r.is_completed,
        }
    }
}

/// Rendered export body
#[derive(Debug, Clone)]
pub struct ExportedHistory {
    pub content_type: &'static str,
    pub file_name: &'static str,
    pub body: String,
}

/// History service for workout history operations
pub struct HistoryService;

impl HistoryService {
    /// All records, newest first, optionally filtered by completion
    pub async fn list(
        storage: &dyn Storage,
        owner: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Vec<WorkoutHistoryRecord>, ApiError> {
        let records = match completed {
            Some(completed) => storage.list_records_by_completion(owner, completed).await?,
            None => storage.list_records(owner).await?,
        };
        Ok(records)
    }

    pub async fn range(
        storage: &dyn Storage,
        owner: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutHistoryRecord>, ApiError> {
        if start > end {
            return Err(ApiError::BadRequest(
                "Range start must not be after its end".to_string(),
            ));
        }
        Ok(storage.list_records_in_range(owner, start, end).await?)
    }

    /// Statistics over an optional window plus the rolling weekly completion
    pub async fn statistics(
        storage: &dyn Storage,
        owner: Option<&str>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<HistoryStatisticsResponse, ApiError> {
        let all = storage.list_records(owner).await?;
        let in_window: Vec<_> = all
            .iter()
            .filter(|r| start.map_or(true, |s| r.date >= s) && end.map_or(true, |e| r.date <= e))
            .cloned()
            .collect();

        Ok(HistoryStatisticsResponse {
            statistics: HistoryStatistics::from_records(&in_window),
            weekly_completion: weekly_completion(&all, now),
            latest: history::latest(&all).cloned(),
        })
    }

    pub async fn latest(
        storage: &dyn Storage,
        owner: Option<&str>,
    ) -> Result<WorkoutHistoryRecord, ApiError> {
        storage
            .latest_record(owner)
            .await?
            .ok_or_else(|| ApiError::NotFound("No workout history yet".to_string()))
    }

    pub async fn delete(storage: &dyn Storage, owner: Option<&str>, id: Uuid) -> Result<(), ApiError> {
        storage.delete_record(owner, id).await?;
        info!(record_id = %id, "Workout history record deleted");
        Ok(())
    }

    /// Batch delete; rejected wholesale if any id is missing or foreign
    pub async fn delete_batch(
        storage: &dyn Storage,
        owner: Option<&str>,
        ids: &[Uuid],
    ) -> Result<u64, ApiError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let deleted = storage.delete_records(owner, ids).await?;
        info!(deleted, "Workout history records deleted");
        Ok(deleted)
    }

    pub async fn delete_before(
        storage: &dyn Storage,
        owner: Option<&str>,
        before: DateTime<Utc>,
    ) -> Result<u64, ApiError> {
        let deleted = storage.delete_records_before(owner, before).await?;
        info!(deleted, before = %before, "Old workout history pruned");
        Ok(deleted)
    }

    pub async fn clear(storage: &dyn Storage, owner: Option<&str>) -> Result<u64, ApiError> {
        let deleted = storage.clear_records(owner).await?;
        info!(deleted, "Workout history cleared");
        Ok(deleted)
    }

    pub async fn export(
        storage: &dyn Storage,
        owner: Option<&str>,
        format: ExportFormat,
    ) -> Result<ExportedHistory, ApiError> {
        let records = storage.list_records(owner).await?;

        match format {
            ExportFormat::Json => {
                let export = HistoryExport {
                    export_version: EXPORT_VERSION.to_string(),
                    exported_at: Utc::now(),
                    owner_id: owner.map(str::to_string),
                    records,
                };
                let body = serde_json::to_string_pretty(&export).map_err(|e| {
                    ApiError::Internal(anyhow::anyhow!("JSON serialization error: {}", e))
                })?;
                Ok(ExportedHistory {
                    content_type: "application/json",
                    file_name: "workout-history.json",
                    body,
                })
            }
            ExportFormat::Csv => {
                let rows: Vec<HistoryCsvRow> = records.iter().map(HistoryCsvRow::from).collect();
                Ok(ExportedHistory {
                    content_type: "text/csv",
                    file_name: "workout-history.csv",
                    body: Self::to_csv(&rows)?,
                })
            }
        }
    }

    /// Import records under the caller's owner id; returns how many were
    /// written and how many the owner now has
    pub async fn import(
        storage: &dyn Storage,
        owner: Option<&str>,
        records: Vec<WorkoutHistoryRecord>,
        merge: bool,
    ) -> Result<(usize, usize), ApiError> {
        for (i, record) in records.iter().enumerate() {
            Self::validate_record(i, record)?;
        }

        let imported = storage.import_records(owner, records, merge).await?;
        let total = storage.list_records(owner).await?.len();
        info!(imported, total, merge, "Workout history imported");
        Ok((imported, total))
    }

    fn validate_record(index: usize, record: &WorkoutHistoryRecord) -> Result<(), ValidationError> {
        if record.duration_seconds < 0 {
            return Err(ValidationError::new(
                &format!("records[{}].duration_seconds", index),
                "Duration cannot be negative",
            ));
        }
        if record.total_exercises > MAX_EXERCISES_PER_RECORD {
            return Err(ValidationError::new(
                &format!("records[{}].total_exercises", index),
                &format!("Total exercises cannot exceed {}", MAX_EXERCISES_PER_RECORD),
            ));
        }
        if record.exercises_completed > record.total_exercises {
            return Err(ValidationError::new(
                &format!("records[{}].exercises_completed", index),
                "Completed exercises cannot exceed the total",
            ));
        }
        Ok(())
    }

    fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{HistoryStore, MemoryStorage};
    use chrono::Duration;

    fn record(days_ago: i64, completed: bool) -> WorkoutHistoryRecord {
        WorkoutHistoryRecord {
            id: Uuid::new_v4(),
            owner_id: None,
            date: Utc::now() - Duration::days(days_ago),
            duration_seconds: 900,
            exercises_completed: if completed { 4 } else { 2 },
            total_exercises: 4,
            is_completed: completed,
        }
    }

    async fn seeded() -> MemoryStorage {
        let storage = MemoryStorage::new();
        for r in [record(1, true), record(2, false), record(3, true), record(20, true)] {
            storage.append_record(&r).await.unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn test_statistics_window_and_weekly() {
        let storage = seeded().await;
        let now = Utc::now();

        let stats = HistoryService::statistics(&storage, None, None, None, now)
            .await
            .unwrap();
        assert_eq!(stats.statistics.total, 4);
        assert_eq!(stats.statistics.completion_rate, 75.0);
        assert!((stats.weekly_completion - 2.0 / 7.0 * 100.0).abs() < 1e-9);
        assert!(stats.latest.is_some());

        let recent = HistoryService::statistics(
            &storage,
            None,
            Some(now - Duration::days(7)),
            Some(now),
            now,
        )
        .await
        .unwrap();
        assert_eq!(recent.statistics.total, 3);
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let storage = MemoryStorage::new();
        let now = Utc::now();
        let result = HistoryService::range(&storage, None, now, now - Duration::days(1)).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_latest_on_empty_history() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            HistoryService::latest(&storage, None).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_csv_export_has_header_and_rows() {
        let storage = seeded().await;
        let export = HistoryService::export(&storage, None, ExportFormat::Csv)
            .await
            .unwrap();

        assert_eq!(export.content_type, "text/csv");
        let lines: Vec<_> = export.body.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("id,date,duration_seconds"));
        assert!(lines[2].ends_with("50.0,false"));
    }

    #[tokio::test]
    async fn test_json_export_reimports_into_fresh_store() {
        let storage = seeded().await;
        let export = HistoryService::export(&storage, None, ExportFormat::Json)
            .await
            .unwrap();
        let parsed: HistoryExport = serde_json::from_str(&export.body).unwrap();
        assert_eq!(parsed.export_version, EXPORT_VERSION);

        let fresh = MemoryStorage::new();
        let (imported, total) =
            HistoryService::import(&fresh, Some("restored"), parsed.records, false)
                .await
                .unwrap();
        assert_eq!((imported, total), (4, 4));
        let restored = fresh.list_records(Some("restored")).await.unwrap();
        assert!(restored.iter().all(|r| r.owner_id.as_deref() == Some("restored")));
    }

    #[tokio::test]
    async fn test_import_rejects_inconsistent_record() {
        let storage = MemoryStorage::new();
        let mut bad = record(0, false);
        bad.exercises_completed = 9;

        let err = HistoryService::import(&storage, None, vec![record(1, true), bad], true)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v.field == "records[1].exercises_completed"));
        assert!(storage.list_records(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_rejects_counts_beyond_storage_range() {
        let storage = MemoryStorage::new();
        let mut huge = record(0, true);
        huge.total_exercises = u32::MAX;
        huge.exercises_completed = u32::MAX;

        let err = HistoryService::import(&storage, None, vec![huge], false)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v.field == "records[0].total_exercises"));
        assert!(storage.list_records(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_delete_is_noop() {
        let storage = seeded().await;
        assert_eq!(HistoryService::delete_batch(&storage, None, &[]).await.unwrap(), 0);
        assert_eq!(storage.list_records(None).await.unwrap().len(), 4);
    }
}
