//! Storage collaborators
//!
//! Profiles, plans and workout history sit behind async traits so services
//! can run against PostgreSQL or an in-process store. Every call takes the
//! owner id; `None` is the local (anonymous) user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fouxd_training_shared::models::{UserProfile, WeeklyPlan, WorkoutHistoryRecord};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;
#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Workout history record not found: {0}")]
    NotFound(Uuid),

    #[error("Workout history record {0} belongs to another owner")]
    OwnershipMismatch(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored document could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load_profile(&self, owner: Option<&str>) -> StoreResult<Option<UserProfile>>;

    async fn save_profile(&self, owner: Option<&str>, profile: &UserProfile) -> StoreResult<()>;
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn load_plan(&self, owner: Option<&str>) -> StoreResult<Option<WeeklyPlan>>;

    /// Replace the stored plan wholesale
    async fn save_plan(&self, owner: Option<&str>, plan: &WeeklyPlan) -> StoreResult<()>;

    /// Store `plan` unless the owner already has one; returns whichever plan
    /// is stored afterwards
    async fn create_plan_if_absent(
        &self,
        owner: Option<&str>,
        plan: WeeklyPlan,
    ) -> StoreResult<WeeklyPlan>;
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a record under its own `owner_id`
    async fn append_record(&self, record: &WorkoutHistoryRecord) -> StoreResult<()>;

    async fn get_record(
        &self,
        owner: Option<&str>,
        id: Uuid,
    ) -> StoreResult<Option<WorkoutHistoryRecord>>;

    /// All records, newest first
    async fn list_records(&self, owner: Option<&str>) -> StoreResult<Vec<WorkoutHistoryRecord>>;

    /// Records dated within `[start, end]`, newest first
    async fn list_records_in_range(
        &self,
        owner: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<WorkoutHistoryRecord>>;

    async fn list_records_by_completion(
        &self,
        owner: Option<&str>,
        completed: bool,
    ) -> StoreResult<Vec<WorkoutHistoryRecord>>;

    async fn latest_record(&self, owner: Option<&str>) -> StoreResult<Option<WorkoutHistoryRecord>>;

    /// Fails with `NotFound` when the owner has no such record
    async fn delete_record(&self, owner: Option<&str>, id: Uuid) -> StoreResult<()>;

    /// Delete several records; nothing is deleted unless every id belongs to
    /// the owner
    async fn delete_records(&self, owner: Option<&str>, ids: &[Uuid]) -> StoreResult<u64>;

    /// Delete records dated strictly before `before`
    async fn delete_records_before(
        &self,
        owner: Option<&str>,
        before: DateTime<Utc>,
    ) -> StoreResult<u64>;

    async fn clear_records(&self, owner: Option<&str>) -> StoreResult<u64>;

    /// Import records under `owner`. Merging keeps existing records and skips
    /// ids already stored; otherwise the owner's history is replaced.
    /// Returns how many records were written.
    async fn import_records(
        &self,
        owner: Option<&str>,
        records: Vec<WorkoutHistoryRecord>,
        merge: bool,
    ) -> StoreResult<usize>;
}

/// Everything the services need from a storage backend
#[async_trait]
pub trait Storage: ProfileStore + PlanStore + HistoryStore {
    fn backend_name(&self) -> &'static str;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> StoreResult<()>;
}
