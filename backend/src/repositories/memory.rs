//! In-process storage backed by `RwLock`ed maps
//!
//! Used for local mode and tests. Nothing survives a restart.

use super::{HistoryStore, PlanStore, ProfileStore, Storage, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fouxd_training_shared::models::{UserProfile, WeeklyPlan, WorkoutHistoryRecord};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

type OwnerKey = Option<String>;

fn key(owner: Option<&str>) -> OwnerKey {
    owner.map(str::to_string)
}

fn newest_first(mut records: Vec<WorkoutHistoryRecord>) -> Vec<WorkoutHistoryRecord> {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    profiles: RwLock<HashMap<OwnerKey, UserProfile>>,
    plans: RwLock<HashMap<OwnerKey, WeeklyPlan>>,
    history: RwLock<Vec<WorkoutHistoryRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    async fn owned_where<F>(&self, owner: Option<&str>, keep: F) -> Vec<WorkoutHistoryRecord>
    where
        F: Fn(&WorkoutHistoryRecord) -> bool,
    {
        let history = self.history.read().await;
        let records = history
            .iter()
            .filter(|r| r.owner_id.as_deref() == owner && keep(r))
            .cloned()
            .collect();
        newest_first(records)
    }
}

#[async_trait]
impl ProfileStore for MemoryStorage {
    async fn load_profile(&self, owner: Option<&str>) -> StoreResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(&key(owner)).cloned())
    }

    async fn save_profile(&self, owner: Option<&str>, profile: &UserProfile) -> StoreResult<()> {
        self.profiles
            .write()
            .await
            .insert(key(owner), profile.clone());
        Ok(())
    }
}

#[async_trait]
impl PlanStore for MemoryStorage {
    async fn load_plan(&self, owner: Option<&str>) -> StoreResult<Option<WeeklyPlan>> {
        Ok(self.plans.read().await.get(&key(owner)).cloned())
    }

    async fn save_plan(&self, owner: Option<&str>, plan: &WeeklyPlan) -> StoreResult<()> {
        self.plans.write().await.insert(key(owner), plan.clone());
        Ok(())
    }

    async fn create_plan_if_absent(
        &self,
        owner: Option<&str>,
        plan: WeeklyPlan,
    ) -> StoreResult<WeeklyPlan> {
        let mut plans = self.plans.write().await;
        Ok(plans.entry(key(owner)).or_insert(plan).clone())
    }
}

#[async_trait]
impl HistoryStore for MemoryStorage {
    async fn append_record(&self, record: &WorkoutHistoryRecord) -> StoreResult<()> {
        self.history.write().await.push(record.clone());
        Ok(())
    }

    async fn get_record(
        &self,
        owner: Option<&str>,
        id: Uuid,
    ) -> StoreResult<Option<WorkoutHistoryRecord>> {
        let history = self.history.read().await;
        Ok(history
            .iter()
            .find(|r| r.id == id && r.owner_id.as_deref() == owner)
            .cloned())
    }

    async fn list_records(&self, owner: Option<&str>) -> StoreResult<Vec<WorkoutHistoryRecord>> {
        Ok(self.owned_where(owner, |_| true).await)
    }

    async fn list_records_in_range(
        &self,
        owner: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<WorkoutHistoryRecord>> {
        Ok(self
            .owned_where(owner, |r| r.date >= start && r.date <= end)
            .await)
    }

    async fn list_records_by_completion(
        &self,
        owner: Option<&str>,
        completed: bool,
    ) -> StoreResult<Vec<WorkoutHistoryRecord>> {
        Ok(self
            .owned_where(owner, |r| r.is_completed == completed)
            .await)
    }

    async fn latest_record(&self, owner: Option<&str>) -> StoreResult<Option<WorkoutHistoryRecord>> {
        Ok(self.owned_where(owner, |_| true).await.into_iter().next())
    }

    async fn delete_record(&self, owner: Option<&str>, id: Uuid) -> StoreResult<()> {
        let mut history = self.history.write().await;
        let before = history.len();
        history.retain(|r| !(r.id == id && r.owner_id.as_deref() == owner));
        if history.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_records(&self, owner: Option<&str>, ids: &[Uuid]) -> StoreResult<u64> {
        let mut history = self.history.write().await;

        for id in ids {
            match history.iter().find(|r| r.id == *id) {
                None => return Err(StoreError::NotFound(*id)),
                Some(r) if r.owner_id.as_deref() != owner => {
                    return Err(StoreError::OwnershipMismatch(*id))
                }
                Some(_) => {}
            }
        }

        let doomed: HashSet<&Uuid> = ids.iter().collect();
        let before = history.len();
        history.retain(|r| !doomed.contains(&r.id));
        Ok((before - history.len()) as u64)
    }

    async fn delete_records_before(
        &self,
        owner: Option<&str>,
        before: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut history = self.history.write().await;
        let len = history.len();
        history.retain(|r| !(r.owner_id.as_deref() == owner && r.date < before));
        Ok((len - history.len()) as u64)
    }

    async fn clear_records(&self, owner: Option<&str>) -> StoreResult<u64> {
        let mut history = self.history.write().await;
        let len = history.len();
        history.retain(|r| r.owner_id.as_deref() != owner);
        Ok((len - history.len()) as u64)
    }

    async fn import_records(
        &self,
        owner: Option<&str>,
        records: Vec<WorkoutHistoryRecord>,
        merge: bool,
    ) -> StoreResult<usize> {
        let mut history = self.history.write().await;
        if !merge {
            history.retain(|r| r.owner_id.as_deref() != owner);
        }

        let mut seen: HashSet<Uuid> = history.iter().map(|r| r.id).collect();
        let mut imported = 0;
        for mut record in records {
            if !seen.insert(record.id) {
                continue;
            }
            record.owner_id = key(owner);
            history.push(record);
            imported += 1;
        }
        Ok(imported)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
