//! Workout session state machine
//!
//! A session walks an ordered list of exercise sessions through
//! `preparing → exercising → resting → (exercising | completed)`. It has no
//! timer of its own: the caller feeds it one [`WorkoutSession::tick`] per
//! elapsed second, along with the wall-clock time used for the record.

use crate::errors::SessionError;
use crate::models::{CompletedExercise, CompletedSet, ExerciseSession, WorkoutHistoryRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Countdown before the first exercise
pub const PREPARATION_SECONDS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutPhase {
    Preparing,
    Exercising,
    Resting,
    Completed,
}

/// What a single tick did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not started, paused or already completed
    Ignored,
    /// Countdown decremented, phase unchanged
    Counted,
    /// Countdown expired and the session moved to a new phase
    Transitioned(WorkoutPhase),
    /// The last set of the last exercise finished
    Finished(WorkoutHistoryRecord),
}

#[derive(Debug, Clone)]
pub struct WorkoutSession {
    exercises: Vec<ExerciseSession>,
    owner_id: Option<String>,
    phase: WorkoutPhase,
    started_at: Option<DateTime<Utc>>,
    seconds_remaining: u32,
    phase_total: u32,
    paused: bool,
    exercise_index: usize,
    /// Sets finished for the current exercise
    sets_done: u32,
    exercise_started_at: Option<DateTime<Utc>>,
    completed: Vec<CompletedExercise>,
    record: Option<WorkoutHistoryRecord>,
}

impl WorkoutSession {
    pub fn new(exercises: Vec<ExerciseSession>, owner_id: Option<String>) -> Self {
        Self {
            exercises,
            owner_id,
            phase: WorkoutPhase::Preparing,
            started_at: None,
            seconds_remaining: PREPARATION_SECONDS,
            phase_total: PREPARATION_SECONDS,
            paused: false,
            exercise_index: 0,
            sets_done: 0,
            exercise_started_at: None,
            completed: Vec::new(),
            record: None,
        }
    }

    /// Enter `preparing`. An empty exercise list completes on the spot and
    /// returns its record.
    pub fn start(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Option<WorkoutHistoryRecord>, SessionError> {
        if self.is_finished() {
            return Err(SessionError::AlreadyFinished);
        }
        if self.is_started() {
            return Err(SessionError::AlreadyStarted);
        }

        self.started_at = Some(now);
        if self.exercises.is_empty() {
            return Ok(Some(self.finish(now, true)));
        }

        self.enter(WorkoutPhase::Preparing, PREPARATION_SECONDS);
        Ok(None)
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.is_started() || self.paused || self.is_finished() {
            return TickOutcome::Ignored;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return TickOutcome::Counted;
        }

        self.expire(now)
    }

    /// Halt counting; returns whether anything changed
    pub fn pause(&mut self) -> bool {
        if !self.is_started() || self.is_finished() || self.paused {
            return false;
        }
        self.paused = true;
        true
    }

    /// Continue from the remaining time; returns whether anything changed
    pub fn resume(&mut self) -> bool {
        if self.is_finished() || !self.paused {
            return false;
        }
        self.paused = false;
        true
    }

    /// Flip the pause flag and return the new value
    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }

    /// Finalize now with whatever has been completed so far
    pub fn end_early(&mut self, now: DateTime<Utc>) -> Result<WorkoutHistoryRecord, SessionError> {
        if self.is_finished() {
            return Err(SessionError::AlreadyFinished);
        }
        if !self.is_started() {
            return Err(SessionError::NotStarted);
        }
        Ok(self.finish(now, false))
    }

    /// Share of the current phase already elapsed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.is_finished() {
            return 1.0;
        }
        if !self.is_started() {
            return 0.0;
        }
        if self.phase_total == 0 {
            return 1.0;
        }
        let ratio = f64::from(self.seconds_remaining) / f64::from(self.phase_total);
        (1.0 - ratio).clamp(0.0, 1.0)
    }

    pub fn phase(&self) -> WorkoutPhase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.phase == WorkoutPhase::Completed
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn exercises(&self) -> &[ExerciseSession] {
        &self.exercises
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn current_exercise(&self) -> Option<&ExerciseSession> {
        if self.is_finished() {
            return None;
        }
        self.exercises.get(self.exercise_index)
    }

    /// One-based set number of the current exercise
    pub fn current_set(&self) -> u32 {
        self.sets_done + 1
    }

    pub fn completed_exercises(&self) -> &[CompletedExercise] {
        &self.completed
    }

    pub fn record(&self) -> Option<&WorkoutHistoryRecord> {
        self.record.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let current = self.current_exercise().cloned();
        SessionSnapshot {
            phase: self.phase,
            is_started: self.is_started(),
            is_paused: self.paused,
            seconds_remaining: self.seconds_remaining,
            phase_total_seconds: self.phase_total,
            progress: self.progress(),
            exercise_index: self.exercise_index,
            current_set: current.as_ref().map(|_| self.current_set()),
            total_sets: current.as_ref().map(|s| s.configuration.sets),
            current_exercise: current,
            exercises_completed: self.completed.len() as u32,
            total_exercises: self.exercises.len() as u32,
            started_at: self.started_at,
            record: self.record.clone(),
        }
    }

    fn enter(&mut self, phase: WorkoutPhase, seconds: u32) {
        self.phase = phase;
        self.seconds_remaining = seconds;
        self.phase_total = seconds;
    }

    fn expire(&mut self, now: DateTime<Utc>) -> TickOutcome {
        match self.phase {
            WorkoutPhase::Preparing | WorkoutPhase::Resting => {
                self.begin_set(now);
                TickOutcome::Transitioned(WorkoutPhase::Exercising)
            }
            WorkoutPhase::Exercising => self.finish_set(now),
            WorkoutPhase::Completed => TickOutcome::Ignored,
        }
    }

    fn begin_set(&mut self, now: DateTime<Utc>) {
        let reps = match self.exercises.get(self.exercise_index) {
            Some(session) => session.configuration.reps,
            None => 0,
        };
        if self.exercise_started_at.is_none() {
            self.exercise_started_at = Some(now);
        }
        self.enter(WorkoutPhase::Exercising, reps);
    }

    fn finish_set(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let Some(session) = self.exercises.get(self.exercise_index).cloned() else {
            return TickOutcome::Finished(self.finish(now, true));
        };
        let config = session.configuration;

        self.sets_done += 1;
        if self.sets_done < config.sets {
            return self.rest(config.rest_seconds, now);
        }

        self.completed.push(CompletedExercise {
            id: session.id,
            exercise: session.exercise,
            configuration: config,
            completed_sets: (0..self.sets_done)
                .map(|_| CompletedSet {
                    reps: config.reps,
                    timestamp: now,
                })
                .collect(),
            start_time: self.exercise_started_at.unwrap_or(now),
            end_time: now,
        });
        self.exercise_index += 1;
        self.sets_done = 0;
        self.exercise_started_at = None;

        if self.exercise_index >= self.exercises.len() {
            return TickOutcome::Finished(self.finish(now, true));
        }

        self.rest(config.rest_seconds + config.extra_rest_seconds, now)
    }

    /// Zero-length rests go straight to the next set
    fn rest(&mut self, seconds: u32, now: DateTime<Utc>) -> TickOutcome {
        if seconds == 0 {
            self.begin_set(now);
            return TickOutcome::Transitioned(WorkoutPhase::Exercising);
        }
        self.enter(WorkoutPhase::Resting, seconds);
        TickOutcome::Transitioned(WorkoutPhase::Resting)
    }

    fn finish(&mut self, now: DateTime<Utc>, completed: bool) -> WorkoutHistoryRecord {
        let started_at = self.started_at.unwrap_or(now);
        let total = self.exercises.len() as u32;
        let record = WorkoutHistoryRecord {
            id: Uuid::new_v4(),
            owner_id: self.owner_id.clone(),
            date: started_at,
            duration_seconds: (now - started_at).num_seconds(),
            exercises_completed: if completed {
                total
            } else {
                self.completed.len() as u32
            },
            total_exercises: total,
            is_completed: completed,
        };

        self.enter(WorkoutPhase::Completed, 0);
        self.paused = false;
        self.record = Some(record.clone());
        record
    }
}

/// Serializable view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: WorkoutPhase,
    pub is_started: bool,
    pub is_paused: bool,
    pub seconds_remaining: u32,
    pub phase_total_seconds: u32,
    pub progress: f64,
    pub exercise_index: usize,
    pub current_exercise: Option<ExerciseSession>,
    pub current_set: Option<u32>,
    pub total_sets: Option<u32>,
    pub exercises_completed: u32,
    pub total_exercises: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub record: Option<WorkoutHistoryRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CoreExercise, Exercise, LowerBodyExercise};
    use crate::models::ExerciseConfiguration;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap()
    }

    fn session(reps: u32, sets: u32, rest: u32, extra: u32) -> ExerciseSession {
        ExerciseSession::new(
            Exercise::Core(CoreExercise::Plank),
            ExerciseConfiguration {
                reps,
                sets,
                rest_seconds: rest,
                extra_rest_seconds: extra,
            },
        )
    }

    /// Tick once per second from `from` until the session finishes
    fn run_to_end(workout: &mut WorkoutSession, from: i64) -> (i64, WorkoutHistoryRecord) {
        let mut second = from;
        loop {
            second += 1;
            if let TickOutcome::Finished(record) = workout.tick(t0() + Duration::seconds(second)) {
                return (second, record);
            }
            assert!(second < 100_000, "session never finished");
        }
    }

    #[test]
    fn test_single_set_runs_prepare_exercise_complete() {
        let mut workout = WorkoutSession::new(vec![session(5, 1, 10, 0)], None);
        assert_eq!(workout.start(t0()).unwrap(), None);
        assert_eq!(workout.phase(), WorkoutPhase::Preparing);

        for s in 1..5 {
            assert_eq!(workout.tick(t0() + Duration::seconds(s)), TickOutcome::Counted);
        }
        assert_eq!(
            workout.tick(t0() + Duration::seconds(5)),
            TickOutcome::Transitioned(WorkoutPhase::Exercising)
        );
        assert_eq!(workout.seconds_remaining(), 5);

        for s in 6..10 {
            assert_eq!(workout.tick(t0() + Duration::seconds(s)), TickOutcome::Counted);
        }
        let TickOutcome::Finished(record) = workout.tick(t0() + Duration::seconds(10)) else {
            panic!("expected the session to finish");
        };

        assert_eq!(workout.phase(), WorkoutPhase::Completed);
        assert_eq!(record.exercises_completed, 1);
        assert_eq!(record.total_exercises, 1);
        assert!(record.is_completed);
        assert_eq!(record.duration_seconds, 10);
        assert_eq!(record.date, t0());
        assert_eq!(workout.completed_exercises().len(), 1);
        assert_eq!(workout.completed_exercises()[0].completed_sets.len(), 1);
    }

    #[test]
    fn test_end_early_while_exercising() {
        let mut workout = WorkoutSession::new(vec![session(30, 3, 10, 0)], Some("u1".into()));
        workout.start(t0()).unwrap();
        for s in 1..=7 {
            workout.tick(t0() + Duration::seconds(s));
        }
        assert_eq!(workout.phase(), WorkoutPhase::Exercising);

        let record = workout.end_early(t0() + Duration::seconds(7)).unwrap();
        assert_eq!(record.exercises_completed, 0);
        assert!(!record.is_completed);
        assert_eq!(record.duration_seconds, 7);
        assert_eq!(record.owner_id.as_deref(), Some("u1"));
        assert_eq!(workout.record(), Some(&record));
    }

    #[test]
    fn test_end_early_counts_finalized_exercises() {
        let mut workout =
            WorkoutSession::new(vec![session(2, 1, 5, 0), session(2, 1, 5, 0)], None);
        workout.start(t0()).unwrap();
        // prepare 5 + exercise 2, now resting before the second exercise
        for s in 1..=8 {
            workout.tick(t0() + Duration::seconds(s));
        }
        assert_eq!(workout.phase(), WorkoutPhase::Resting);

        let record = workout.end_early(t0() + Duration::seconds(8)).unwrap();
        assert_eq!(record.exercises_completed, 1);
        assert_eq!(record.total_exercises, 2);
        assert!(!record.is_completed);
    }

    #[test]
    fn test_pause_during_rest_keeps_remaining_time() {
        let mut workout = WorkoutSession::new(vec![session(5, 2, 10, 0)], None);
        workout.start(t0()).unwrap();
        for s in 1..=10 {
            workout.tick(t0() + Duration::seconds(s));
        }
        assert_eq!(workout.phase(), WorkoutPhase::Resting);
        for s in 11..=13 {
            workout.tick(t0() + Duration::seconds(s));
        }
        assert_eq!(workout.seconds_remaining(), 7);

        assert!(workout.pause());
        for s in 14..=30 {
            assert_eq!(workout.tick(t0() + Duration::seconds(s)), TickOutcome::Ignored);
        }
        assert_eq!(workout.seconds_remaining(), 7);
        assert_eq!(workout.phase(), WorkoutPhase::Resting);

        assert!(workout.resume());
        for s in 31..37 {
            assert_eq!(workout.tick(t0() + Duration::seconds(s)), TickOutcome::Counted);
        }
        assert_eq!(
            workout.tick(t0() + Duration::seconds(37)),
            TickOutcome::Transitioned(WorkoutPhase::Exercising)
        );
        assert_eq!(workout.current_set(), 2);
    }

    #[test]
    fn test_pause_during_preparing() {
        let mut workout = WorkoutSession::new(vec![session(5, 1, 10, 0)], None);
        workout.start(t0()).unwrap();
        workout.tick(t0() + Duration::seconds(1));
        assert!(workout.toggle_pause());
        workout.tick(t0() + Duration::seconds(2));
        assert_eq!(workout.seconds_remaining(), 4);
        assert!(!workout.toggle_pause());
        assert_eq!(workout.phase(), WorkoutPhase::Preparing);
    }

    #[test]
    fn test_empty_list_completes_on_start() {
        let mut workout = WorkoutSession::new(Vec::new(), None);
        let record = workout.start(t0()).unwrap().expect("record on empty start");

        assert_eq!(workout.phase(), WorkoutPhase::Completed);
        assert_eq!(record.exercises_completed, 0);
        assert_eq!(record.total_exercises, 0);
        assert!(record.is_completed);
        assert_eq!(record.duration_seconds, 0);
        assert_eq!(workout.tick(t0() + Duration::seconds(1)), TickOutcome::Ignored);
    }

    #[test]
    fn test_rest_between_exercises_includes_extra_rest() {
        let mut workout = WorkoutSession::new(
            vec![
                session(2, 1, 3, 20),
                ExerciseSession::new(
                    Exercise::LowerBody(LowerBodyExercise::Squats),
                    ExerciseConfiguration {
                        reps: 2,
                        sets: 1,
                        rest_seconds: 3,
                        extra_rest_seconds: 20,
                    },
                ),
            ],
            None,
        );
        workout.start(t0()).unwrap();
        for s in 1..=7 {
            workout.tick(t0() + Duration::seconds(s));
        }

        assert_eq!(workout.phase(), WorkoutPhase::Resting);
        assert_eq!(workout.seconds_remaining(), 23);
        assert_eq!(workout.exercise_index(), 1);

        // Rest leads straight into the next exercise, never back to preparing
        for s in 8..=30 {
            workout.tick(t0() + Duration::seconds(s));
        }
        assert_eq!(workout.phase(), WorkoutPhase::Exercising);
        assert_eq!(workout.current_set(), 1);
    }

    #[test]
    fn test_ticks_before_start_are_ignored() {
        let mut workout = WorkoutSession::new(vec![session(5, 1, 10, 0)], None);
        assert_eq!(workout.tick(t0()), TickOutcome::Ignored);
        assert!(!workout.pause());
        assert_eq!(workout.end_early(t0()), Err(SessionError::NotStarted));
        assert_eq!(workout.progress(), 0.0);
    }

    #[test]
    fn test_commands_after_completion() {
        let mut workout = WorkoutSession::new(vec![session(1, 1, 0, 0)], None);
        workout.start(t0()).unwrap();
        run_to_end(&mut workout, 0);

        assert_eq!(workout.start(t0()), Err(SessionError::AlreadyFinished));
        assert_eq!(workout.end_early(t0()), Err(SessionError::AlreadyFinished));
        assert!(!workout.pause());
        assert!(!workout.resume());
        assert_eq!(workout.progress(), 1.0);
    }

    #[test]
    fn test_start_twice_fails() {
        let mut workout = WorkoutSession::new(vec![session(5, 1, 10, 0)], None);
        workout.start(t0()).unwrap();
        assert_eq!(workout.start(t0()), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn test_progress_in_preparing() {
        let mut workout = WorkoutSession::new(vec![session(5, 1, 10, 0)], None);
        workout.start(t0()).unwrap();
        assert_eq!(workout.progress(), 0.0);
        workout.tick(t0() + Duration::seconds(1));
        assert!((workout.progress() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut workout = WorkoutSession::new(vec![session(5, 3, 10, 0)], None);
        workout.start(t0()).unwrap();
        for s in 1..=6 {
            workout.tick(t0() + Duration::seconds(s));
        }

        let snapshot = workout.snapshot();
        assert_eq!(snapshot.phase, WorkoutPhase::Exercising);
        assert_eq!(snapshot.seconds_remaining, 4);
        assert_eq!(snapshot.current_set, Some(1));
        assert_eq!(snapshot.total_sets, Some(3));
        assert_eq!(snapshot.total_exercises, 1);
        assert!(snapshot.record.is_none());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phase"], "exercising");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Natural completion takes exactly the scheduled number of seconds
        /// and always yields a single completed record
        #[test]
        fn prop_runs_for_scheduled_duration(
            configs in prop::collection::vec((1u32..8, 1u32..4, 0u32..6, 0u32..21), 1..5)
        ) {
            let sessions: Vec<_> = configs
                .iter()
                .map(|&(reps, sets, rest, extra)| session(reps, sets, rest, extra))
                .collect();
            let last = configs.len() - 1;
            let expected: u32 = PREPARATION_SECONDS
                + configs
                    .iter()
                    .enumerate()
                    .map(|(i, &(reps, sets, rest, extra))| {
                        let between_exercises = if i == last { 0 } else { rest + extra };
                        sets * reps + (sets - 1) * rest + between_exercises
                    })
                    .sum::<u32>();

            let mut workout = WorkoutSession::new(sessions, None);
            workout.start(t0()).unwrap();
            let (seconds, record) = run_to_end(&mut workout, 0);

            prop_assert_eq!(seconds, i64::from(expected));
            prop_assert_eq!(record.duration_seconds, i64::from(expected));
            prop_assert!(record.is_completed);
            prop_assert_eq!(record.exercises_completed as usize, configs.len());
            prop_assert_eq!(workout.tick(t0()), TickOutcome::Ignored);
        }

        #[test]
        fn prop_progress_stays_in_unit_interval(ticks in 0usize..60) {
            let mut workout = WorkoutSession::new(vec![session(7, 2, 4, 10)], None);
            workout.start(t0()).unwrap();
            for s in 0..ticks {
                workout.tick(t0() + Duration::seconds(s as i64 + 1));
                let p = workout.progress();
                prop_assert!((0.0..=1.0).contains(&p));
            }
        }
    }
}
