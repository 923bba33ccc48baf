//! In-memory storage that can be told to fail selected writes

use super::{
    HistoryStore, MemoryStorage, PlanStore, ProfileStore, Storage, StoreError, StoreResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fouxd_training_shared::models::{UserProfile, WeeklyPlan, WorkoutHistoryRecord};
use uuid::Uuid;

#[derive(Default)]
pub struct FaultyStorage {
    pub inner: MemoryStorage,
    pub fail_plan_saves: bool,
    pub fail_history_appends: bool,
}

impl FaultyStorage {
    pub fn failing_plan_saves() -> Self {
        Self {
            fail_plan_saves: true,
            ..Self::default()
        }
    }

    pub fn failing_history_appends() -> Self {
        Self {
            fail_history_appends: true,
            ..Self::default()
        }
    }
}

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ProfileStore for FaultyStorage {
    async fn load_profile(&self, owner: Option<&str>) -> StoreResult<Option<UserProfile>> {
        self.inner.load_profile(owner).await
    }

    async fn save_profile(&self, owner: Option<&str>, profile: &UserProfile) -> StoreResult<()> {
        self.inner.save_profile(owner, profile).await
    }
}

#[async_trait]
impl PlanStore for FaultyStorage {
    async fn load_plan(&self, owner: Option<&str>) -> StoreResult<Option<WeeklyPlan>> {
        self.inner.load_plan(owner).await
    }

    async fn save_plan(&self, owner: Option<&str>, plan: &WeeklyPlan) -> StoreResult<()> {
        if self.fail_plan_saves {
            return Err(unavailable());
        }
        self.inner.save_plan(owner, plan).await
    }

    async fn create_plan_if_absent(
        &self,
        owner: Option<&str>,
        plan: WeeklyPlan,
    ) -> StoreResult<WeeklyPlan> {
        if self.fail_plan_saves {
            return Err(unavailable());
        }
        self.inner.create_plan_if_absent(owner, plan).await
    }
}

#[async_trait]
impl HistoryStore for FaultyStorage {
    async fn append_record(&self, record: &WorkoutHistoryRecord) -> StoreResult<()> {
        if self.fail_history_appends {
            return Err(unavailable());
        }
        self.inner.append_record(record).await
    }

    async fn get_record(
        &self,
        owner: Option<&str>,
        id: Uuid,
    ) -> StoreResult<Option<WorkoutHistoryRecord>> {
        self.inner.get_record(owner, id).await
    }

    async fn list_records(&self, owner: Option<&str>) -> StoreResult<Vec<WorkoutHistoryRecord>> {
        self.inner.list_records(owner).await
    }

    async fn list_records_in_range(
        &self,
        owner: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<WorkoutHistoryRecord>> {
        self.inner.list_records_in_range(owner, start, end).await
    }

    async fn list_records_by_completion(
        &self,
        owner: Option<&str>,
        completed: bool,
    ) -> StoreResult<Vec<WorkoutHistoryRecord>> {
        self.inner.list_records_by_completion(owner, completed).await
    }

    async fn latest_record(&self, owner: Option<&str>) -> StoreResult<Option<WorkoutHistoryRecord>> {
        self.inner.latest_record(owner).await
    }

    async fn delete_record(&self, owner: Option<&str>, id: Uuid) -> StoreResult<()> {
        self.inner.delete_record(owner, id).await
    }

    async fn delete_records(&self, owner: Option<&str>, ids: &[Uuid]) -> StoreResult<u64> {
        self.inner.delete_records(owner, ids).await
    }

    async fn delete_records_before(
        &self,
        owner: Option<&str>,
        before: DateTime<Utc>,
    ) -> StoreResult<u64> {
        self.inner.delete_records_before(owner, before).await
    }

    async fn clear_records(&self, owner: Option<&str>) -> StoreResult<u64> {
        self.inner.clear_records(owner).await
    }

    async fn import_records(
        &self,
        owner: Option<&str>,
        records: Vec<WorkoutHistoryRecord>,
        merge: bool,
    ) -> StoreResult<usize> {
        self.inner.import_records(owner, records, merge).await
    }
}

#[async_trait]
impl Storage for FaultyStorage {
    fn backend_name(&self) -> &'static str {
        "faulty"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
