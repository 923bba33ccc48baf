//! PostgreSQL storage
//!
//! Profiles and plans are stored as JSONB documents keyed by owner; the
//! local user is keyed by the empty string. History records are plain rows
//! with a nullable `owner_id`.

use super::{HistoryStore, PlanStore, ProfileStore, Storage, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fouxd_training_shared::models::{UserProfile, WeeklyPlan, WorkoutHistoryRecord};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Owner key for the document tables
fn owner_key(owner: Option<&str>) -> &str {
    owner.unwrap_or("")
}

/// Exercise counts are INTEGER columns; saturate rather than wrap
fn count_column(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Workout history row from database
#[derive(Debug, Clone, sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    owner_id: Option<String>,
    date: DateTime<Utc>,
    duration_seconds: i64,
    exercises_completed: i32,
    total_exercises: i32,
    is_completed: bool,
}

impl From<HistoryRow> for WorkoutHistoryRecord {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            date: row.date,
            duration_seconds: row.duration_seconds,
            exercises_completed: row.exercises_completed.max(0) as u32,
            total_exercises: row.total_exercises.max(0) as u32,
            is_completed: row.is_completed,
        }
    }
}

fn into_records(rows: Vec<HistoryRow>) -> Vec<WorkoutHistoryRecord> {
    rows.into_iter().map(Into::into).collect()
}

#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProfileStore for PgStorage {
    async fn load_profile(&self, owner: Option<&str>) -> StoreResult<Option<UserProfile>> {
        let row: Option<(Json<UserProfile>,)> = sqlx::query_as(
            r#"
            SELECT profile FROM user_profiles WHERE owner_key = $1
            "#,
        )
        .bind(owner_key(owner))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(profile),)| profile))
    }

    async fn save_profile(&self, owner: Option<&str>, profile: &UserProfile) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (owner_key, profile, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (owner_key)
            DO UPDATE SET profile = EXCLUDED.profile, updated_at = NOW()
            "#,
        )
        .bind(owner_key(owner))
        .bind(Json(profile))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl PlanStore for PgStorage {
    async fn load_plan(&self, owner: Option<&str>) -> StoreResult<Option<WeeklyPlan>> {
        let row: Option<(Json<WeeklyPlan>,)> = sqlx::query_as(
            r#"
            SELECT plan FROM weekly_plans WHERE owner_key = $1
            "#,
        )
        .bind(owner_key(owner))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(plan),)| plan))
    }

    async fn save_plan(&self, owner: Option<&str>, plan: &WeeklyPlan) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO weekly_plans (owner_key, plan, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (owner_key)
            DO UPDATE SET plan = EXCLUDED.plan, updated_at = NOW()
            "#,
        )
        .bind(owner_key(owner))
        .bind(Json(plan))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_plan_if_absent(
        &self,
        owner: Option<&str>,
        plan: WeeklyPlan,
    ) -> StoreResult<WeeklyPlan> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO weekly_plans (owner_key, plan, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (owner_key) DO NOTHING
            "#,
        )
        .bind(owner_key(owner))
        .bind(Json(&plan))
        .execute(&mut *tx)
        .await?;

        let (Json(stored),): (Json<WeeklyPlan>,) = sqlx::query_as(
            r#"
            SELECT plan FROM weekly_plans WHERE owner_key = $1
            "#,
        )
        .bind(owner_key(owner))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(stored)
    }
}

#[async_trait]
impl HistoryStore for PgStorage {
    async fn append_record(&self, record: &WorkoutHistoryRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO workout_history
                (id, owner_id, date, duration_seconds, exercises_completed, total_exercises, is_completed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(&record.owner_id)
        .bind(record.date)
        .bind(record.duration_seconds)
        .bind(count_column(record.exercises_completed))
        .bind(count_column(record.total_exercises))
        .bind(record.is_completed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_record(
        &self,
        owner: Option<&str>,
        id: Uuid,
    ) -> StoreResult<Option<WorkoutHistoryRecord>> {
        let row = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, owner_id, date, duration_seconds, exercises_completed, total_exercises, is_completed
            FROM workout_history
            WHERE id = $1 AND owner_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_records(&self, owner: Option<&str>) -> StoreResult<Vec<WorkoutHistoryRecord>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, owner_id, date, duration_seconds, exercises_completed, total_exercises, is_completed
            FROM workout_history
            WHERE owner_id IS NOT DISTINCT FROM $1
            ORDER BY date DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_records(rows))
    }

    async fn list_records_in_range(
        &self,
        owner: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<WorkoutHistoryRecord>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, owner_id, date, duration_seconds, exercises_completed, total_exercises, is_completed
            FROM workout_history
            WHERE owner_id IS NOT DISTINCT FROM $1 AND date >= $2 AND date <= $3
            ORDER BY date DESC
            "#,
        )
        .bind(owner)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_records(rows))
    }

    async fn list_records_by_completion(
        &self,
        owner: Option<&str>,
        completed: bool,
    ) -> StoreResult<Vec<WorkoutHistoryRecord>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, owner_id, date, duration_seconds, exercises_completed, total_exercises, is_completed
            FROM workout_history
            WHERE owner_id IS NOT DISTINCT FROM $1 AND is_completed = $2
            ORDER BY date DESC
            "#,
        )
        .bind(owner)
        .bind(completed)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_records(rows))
    }

    async fn latest_record(&self, owner: Option<&str>) -> StoreResult<Option<WorkoutHistoryRecord>> {
        let row = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, owner_id, date, duration_seconds, exercises_completed, total_exercises, is_completed
            FROM workout_history
            WHERE owner_id IS NOT DISTINCT FROM $1
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_record(&self, owner: Option<&str>, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM workout_history
            WHERE id = $1 AND owner_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_records(&self, owner: Option<&str>, ids: &[Uuid]) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;

        let found: Vec<(Uuid, Option<String>)> = sqlx::query_as(
            r#"
            SELECT id, owner_id FROM workout_history
            WHERE id = ANY($1)
            FOR UPDATE
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *tx)
        .await?;

        for id in ids {
            match found.iter().find(|(found_id, _)| found_id == id) {
                None => return Err(StoreError::NotFound(*id)),
                Some((_, found_owner)) if found_owner.as_deref() != owner => {
                    return Err(StoreError::OwnershipMismatch(*id))
                }
                Some(_) => {}
            }
        }

        let result = sqlx::query(
            r#"
            DELETE FROM workout_history WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn delete_records_before(
        &self,
        owner: Option<&str>,
        before: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM workout_history
            WHERE owner_id IS NOT DISTINCT FROM $1 AND date < $2
            "#,
        )
        .bind(owner)
        .bind(before)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn clear_records(&self, owner: Option<&str>) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM workout_history WHERE owner_id IS NOT DISTINCT FROM $1
            "#,
        )
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn import_records(
        &self,
        owner: Option<&str>,
        records: Vec<WorkoutHistoryRecord>,
        merge: bool,
    ) -> StoreResult<usize> {
        let mut tx = self.pool.begin().await?;

        if !merge {
            sqlx::query(
                r#"
                DELETE FROM workout_history WHERE owner_id IS NOT DISTINCT FROM $1
                "#,
            )
            .bind(owner)
            .execute(&mut *tx)
            .await?;
        }

        let mut imported = 0;
        for record in &records {
            let result = sqlx::query(
                r#"
                INSERT INTO workout_history
                    (id, owner_id, date, duration_seconds, exercises_completed, total_exercises, is_completed)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(record.id)
            .bind(owner)
            .bind(record.date)
            .bind(record.duration_seconds)
            .bind(count_column(record.exercises_completed))
            .bind(count_column(record.total_exercises))
            .bind(record.is_completed)
            .execute(&mut *tx)
            .await?;
            imported += result.rows_affected() as usize;
        }

        tx.commit().await?;

        Ok(imported)
    }
}

#[async_trait]
impl Storage for PgStorage {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
