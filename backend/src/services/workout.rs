//! Workout session runner
//!
//! Keeps at most one session per owner and drives it with a ticker task on a
//! `tokio::time::interval`. The session sits behind a `tokio::sync::Mutex`;
//! the ticker and the command handlers only touch it under that lock.
//! Pause and end abort the ticker while still holding the lock, so no tick
//! lands after either returns. Finished sessions stay readable for the
//! retention period and are then dropped from the registry.

use crate::error::ApiError;
use crate::repositories::{HistoryStore, Storage};
use chrono::Utc;
use fouxd_training_shared::errors::SessionError;
use fouxd_training_shared::models::{ExerciseSession, WorkoutHistoryRecord};
use fouxd_training_shared::session::{SessionSnapshot, TickOutcome, WorkoutSession};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

type OwnerKey = Option<String>;

struct RunningWorkout {
    session: WorkoutSession,
    ticker: Option<JoinHandle<()>>,
    /// Bumped on every new ticker; stale tickers stop when they see a newer one
    generation: u64,
}

impl RunningWorkout {
    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for RunningWorkout {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

type SharedWorkout = Arc<Mutex<RunningWorkout>>;

struct Registry {
    sessions: Mutex<HashMap<OwnerKey, SharedWorkout>>,
    storage: Arc<dyn Storage>,
    tick_interval: Duration,
    retention: Duration,
}

impl Registry {
    /// Drop the owner's entry after the retention period, unless a newer
    /// session has replaced it by then
    fn schedule_eviction(self: &Arc<Self>, key: OwnerKey, workout: &SharedWorkout) {
        let registry = Arc::clone(self);
        let finished = Arc::downgrade(workout);

        tokio::spawn(async move {
            tokio::time::sleep(registry.retention).await;

            let mut sessions = registry.sessions.lock().await;
            let current = sessions
                .get(&key)
                .is_some_and(|w| Weak::as_ptr(&finished) == Arc::as_ptr(w));
            if current {
                sessions.remove(&key);
                debug!(owner = key.as_deref().unwrap_or("local"), "Finished workout evicted");
            }
        });
    }
}

/// Per-owner workout sessions
#[derive(Clone)]
pub struct WorkoutService {
    inner: Arc<Registry>,
}

impl WorkoutService {
    /// `retention` is how long a finished session stays readable
    pub fn new(storage: Arc<dyn Storage>, tick_interval: Duration, retention: Duration) -> Self {
        Self {
            inner: Arc::new(Registry {
                sessions: Mutex::new(HashMap::new()),
                storage,
                tick_interval,
                retention,
            }),
        }
    }

    /// Start a session over `exercises`. A finished session for the same
    /// owner is replaced; an unfinished one is a conflict.
    pub async fn start(
        &self,
        owner: Option<&str>,
        exercises: Vec<ExerciseSession>,
    ) -> Result<SessionSnapshot, ApiError> {
        let key = owner.map(str::to_string);
        let mut sessions = self.inner.sessions.lock().await;

        if let Some(existing) = sessions.get(&key) {
            if !existing.lock().await.session.is_finished() {
                return Err(SessionError::AlreadyStarted.into());
            }
        }

        let total = exercises.len();
        let mut session = WorkoutSession::new(exercises, key.clone());
        let immediate = session.start(Utc::now())?;

        let workout = Arc::new(Mutex::new(RunningWorkout {
            session,
            ticker: None,
            generation: 0,
        }));
        sessions.insert(key.clone(), Arc::clone(&workout));
        drop(sessions);

        info!(owner = owner.unwrap_or("local"), exercises = total, "Workout started");

        let mut running = workout.lock().await;
        match immediate {
            Some(record) => {
                let snapshot = running.session.snapshot();
                drop(running);
                persist(self.inner.storage.as_ref(), &record).await;
                self.inner.schedule_eviction(key, &workout);
                Ok(snapshot)
            }
            None => {
                self.spawn_ticker(key, &workout, &mut running);
                Ok(running.session.snapshot())
            }
        }
    }

    pub async fn snapshot(&self, owner: Option<&str>) -> Result<SessionSnapshot, ApiError> {
        let workout = self.lookup(owner).await?;
        let running = workout.lock().await;
        Ok(running.session.snapshot())
    }

    pub async fn pause(&self, owner: Option<&str>) -> Result<SessionSnapshot, ApiError> {
        let workout = self.lookup(owner).await?;
        let mut running = workout.lock().await;
        if running.session.is_finished() {
            return Err(SessionError::AlreadyFinished.into());
        }

        if running.session.pause() {
            running.stop_ticker();
            debug!(
                owner = owner.unwrap_or("local"),
                remaining = running.session.seconds_remaining(),
                "Workout paused"
            );
        }
        Ok(running.session.snapshot())
    }

    pub async fn resume(&self, owner: Option<&str>) -> Result<SessionSnapshot, ApiError> {
        let workout = self.lookup(owner).await?;
        let mut running = workout.lock().await;
        if running.session.is_finished() {
            return Err(SessionError::AlreadyFinished.into());
        }

        if running.session.resume() {
            self.spawn_ticker(owner.map(str::to_string), &workout, &mut running);
            debug!(
                owner = owner.unwrap_or("local"),
                remaining = running.session.seconds_remaining(),
                "Workout resumed"
            );
        }
        Ok(running.session.snapshot())
    }

    /// End the session early and record it
    pub async fn end(&self, owner: Option<&str>) -> Result<SessionSnapshot, ApiError> {
        let workout = self.lookup(owner).await?;
        let mut running = workout.lock().await;

        let record = running.session.end_early(Utc::now())?;
        running.stop_ticker();
        let snapshot = running.session.snapshot();
        drop(running);

        info!(
            owner = owner.unwrap_or("local"),
            completed = record.exercises_completed,
            total = record.total_exercises,
            "Workout ended early"
        );
        persist(self.inner.storage.as_ref(), &record).await;
        self.inner.schedule_eviction(owner.map(str::to_string), &workout);
        Ok(snapshot)
    }

    async fn lookup(&self, owner: Option<&str>) -> Result<SharedWorkout, ApiError> {
        let sessions = self.inner.sessions.lock().await;
        sessions
            .get(&owner.map(str::to_string))
            .cloned()
            .ok_or_else(|| SessionError::NotStarted.into())
    }

    /// Arm a fresh ticker. Caller holds the session lock.
    fn spawn_ticker(&self, key: OwnerKey, workout: &SharedWorkout, running: &mut RunningWorkout) {
        running.stop_ticker();
        running.generation += 1;

        let generation = running.generation;
        let workout = Arc::clone(workout);
        let registry = Arc::clone(&self.inner);
        let period = registry.tick_interval;

        running.ticker = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

            loop {
                interval.tick().await;

                let mut running = workout.lock().await;
                if running.generation != generation {
                    break;
                }

                match running.session.tick(Utc::now()) {
                    TickOutcome::Finished(record) => {
                        // Detach our own handle rather than aborting it
                        drop(running.ticker.take());
                        drop(running);
                        info!(
                            record_id = %record.id,
                            duration = record.duration_seconds,
                            "Workout completed"
                        );
                        persist(registry.storage.as_ref(), &record).await;
                        registry.schedule_eviction(key, &workout);
                        break;
                    }
                    TickOutcome::Ignored => break,
                    TickOutcome::Counted | TickOutcome::Transitioned(_) => {}
                }
            }
        }));
    }
}

/// Append a finished record; failures are logged and the in-memory
/// session keeps its copy
async fn persist(storage: &dyn Storage, record: &WorkoutHistoryRecord) {
    if let Err(e) = storage.append_record(record).await {
        warn!(record_id = %record.id, error = %e, "Failed to persist workout record");
    }
}
