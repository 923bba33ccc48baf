//! Data models for the Fouxd Training application

use crate::catalog::Exercise;
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Calendar
// ============================================================================

/// Day of the week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    /// Zero-based position, Monday = 0
    pub fn index(&self) -> usize {
        Weekday::from(*self).num_days_from_monday() as usize
    }

    /// Weekday of a point in time (UTC)
    pub fn of(at: DateTime<Utc>) -> Self {
        use chrono::Datelike;
        at.weekday().into()
    }
}

impl From<Weekday> for WeekDay {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => WeekDay::Monday,
            Weekday::Tue => WeekDay::Tuesday,
            Weekday::Wed => WeekDay::Wednesday,
            Weekday::Thu => WeekDay::Thursday,
            Weekday::Fri => WeekDay::Friday,
            Weekday::Sat => WeekDay::Saturday,
            Weekday::Sun => WeekDay::Sunday,
        }
    }
}

impl From<WeekDay> for Weekday {
    fn from(day: WeekDay) -> Self {
        match day {
            WeekDay::Monday => Weekday::Mon,
            WeekDay::Tuesday => Weekday::Tue,
            WeekDay::Wednesday => Weekday::Wed,
            WeekDay::Thursday => Weekday::Thu,
            WeekDay::Friday => Weekday::Fri,
            WeekDay::Saturday => Weekday::Sat,
            WeekDay::Sunday => Weekday::Sun,
        }
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeekDay::Monday => "Monday",
            WeekDay::Tuesday => "Tuesday",
            WeekDay::Wednesday => "Wednesday",
            WeekDay::Thursday => "Thursday",
            WeekDay::Friday => "Friday",
            WeekDay::Saturday => "Saturday",
            WeekDay::Sunday => "Sunday",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// User Profile
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

/// Self-reported activity level, drives the base exercise configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
}

impl ActivityLevel {
    /// Base (reps-or-seconds, sets, rest seconds) for this level
    pub fn base_configuration(&self) -> ExerciseConfiguration {
        let (reps, sets) = match self {
            ActivityLevel::Sedentary => (120, 3),
            ActivityLevel::Light => (90, 4),
            ActivityLevel::Moderate => (60, 3),
            ActivityLevel::Active => (30, 3),
        };
        ExerciseConfiguration {
            reps,
            sets,
            rest_seconds: 30,
            extra_rest_seconds: 0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::Light => "Light exercise 1-3 days/week",
            ActivityLevel::Moderate => "Moderate exercise 3-5 days/week",
            ActivityLevel::Active => "Hard exercise 6-7 days/week",
        }
    }
}

/// Free time on one weekday, in hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub week_day: WeekDay,
    #[serde(default)]
    pub free_time: f64,
}

/// Free time for every weekday, always exactly one entry per day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayAvailability>", into = "Vec<DayAvailability>")]
pub struct WeeklyAvailability {
    hours: [f64; 7],
}

impl WeeklyAvailability {
    pub fn new(hours: [f64; 7]) -> Self {
        Self { hours }
    }

    pub fn hours(&self, day: WeekDay) -> f64 {
        self.hours[day.index()]
    }

    pub fn set_hours(&mut self, day: WeekDay, hours: f64) {
        self.hours[day.index()] = hours;
    }

    pub fn with_hours(mut self, day: WeekDay, hours: f64) -> Self {
        self.set_hours(day, hours);
        self
    }

    /// Entries in weekday order
    pub fn iter(&self) -> impl Iterator<Item = DayAvailability> + '_ {
        WeekDay::ALL.into_iter().map(|week_day| DayAvailability {
            week_day,
            free_time: self.hours(week_day),
        })
    }

    /// Days with any free time
    pub fn active_days(&self) -> impl Iterator<Item = DayAvailability> + '_ {
        self.iter().filter(|d| d.free_time > 0.0)
    }
}

impl TryFrom<Vec<DayAvailability>> for WeeklyAvailability {
    type Error = String;

    fn try_from(entries: Vec<DayAvailability>) -> Result<Self, Self::Error> {
        if entries.len() != 7 {
            return Err(format!(
                "availability must have exactly 7 entries, got {}",
                entries.len()
            ));
        }

        let mut seen = [false; 7];
        let mut hours = [0.0; 7];
        for entry in entries {
            let idx = entry.week_day.index();
            if seen[idx] {
                return Err(format!("duplicate availability for {}", entry.week_day));
            }
            seen[idx] = true;
            hours[idx] = entry.free_time;
        }

        Ok(Self { hours })
    }
}

impl From<WeeklyAvailability> for Vec<DayAvailability> {
    fn from(availability: WeeklyAvailability) -> Self {
        availability.iter().collect()
    }
}

/// Profile data the plan generator works from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub availability: WeeklyAvailability,
    pub activity_level: ActivityLevel,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            weight: 62.0,
            height: 175.0,
            age: 18,
            gender: Gender::default(),
            availability: WeeklyAvailability::default(),
            activity_level: ActivityLevel::default(),
            last_updated: Utc::now(),
        }
    }
}

// ============================================================================
// Plans
// ============================================================================

/// Sets, reps and rest for one exercise instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseConfiguration {
    /// Repetitions, which double as the duration of one set in seconds
    pub reps: u32,
    pub sets: u32,
    /// Rest between sets
    pub rest_seconds: u32,
    /// Body-mass rest penalty, taken once after the exercise
    #[serde(default)]
    pub extra_rest_seconds: u32,
}

impl ExerciseConfiguration {
    /// `sets × (rest + reps) + extra_rest`, in seconds
    pub fn estimated_seconds(&self) -> u64 {
        u64::from(self.sets) * (u64::from(self.rest_seconds) + u64::from(self.reps))
            + u64::from(self.extra_rest_seconds)
    }
}

/// One exercise paired with its configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub id: Uuid,
    pub exercise: Exercise,
    pub configuration: ExerciseConfiguration,
}

impl ExerciseSession {
    pub fn new(exercise: Exercise, configuration: ExerciseConfiguration) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise,
            configuration,
        }
    }
}

/// Ordered exercises for one weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub week_day: WeekDay,
    pub exercises: Vec<ExerciseSession>,
    pub last_updated: DateTime<Utc>,
}

impl DayPlan {
    pub fn estimated_seconds(&self) -> u64 {
        self.exercises
            .iter()
            .map(|s| s.configuration.estimated_seconds())
            .sum()
    }
}

/// Day plans for a week, at most one per weekday, in weekday order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayPlan>", into = "Vec<DayPlan>")]
pub struct WeeklyPlan {
    days: Vec<DayPlan>,
}

impl WeeklyPlan {
    /// Build a plan, rejecting duplicate weekdays
    pub fn from_days(mut days: Vec<DayPlan>) -> Result<Self, String> {
        days.sort_by_key(|d| d.week_day);
        if let Some(pair) = days.windows(2).find(|w| w[0].week_day == w[1].week_day) {
            return Err(format!("duplicate day plan for {}", pair[0].week_day));
        }
        Ok(Self { days })
    }

    /// Build from days already known to be one per weekday, in weekday order
    pub(crate) fn from_unique_days(days: Vec<DayPlan>) -> Self {
        debug_assert!(days.windows(2).all(|w| w[0].week_day < w[1].week_day));
        Self { days }
    }

    pub fn days(&self) -> &[DayPlan] {
        &self.days
    }

    pub fn day(&self, week_day: WeekDay) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.week_day == week_day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl TryFrom<Vec<DayPlan>> for WeeklyPlan {
    type Error = String;

    fn try_from(days: Vec<DayPlan>) -> Result<Self, Self::Error> {
        Self::from_days(days)
    }
}

impl From<WeeklyPlan> for Vec<DayPlan> {
    fn from(plan: WeeklyPlan) -> Self {
        plan.days
    }
}

// ============================================================================
// Workout history
// ============================================================================

/// A set recorded by the session timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSet {
    pub reps: u32,
    pub timestamp: DateTime<Utc>,
}

/// An exercise whose every set ran to completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedExercise {
    pub id: Uuid,
    pub exercise: Exercise,
    pub configuration: ExerciseConfiguration,
    pub completed_sets: Vec<CompletedSet>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CompletedExercise {
    pub fn duration_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }
}

/// Immutable record of one finished or abandoned session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutHistoryRecord {
    pub id: Uuid,
    /// Account id for cloud users, `None` for local users
    pub owner_id: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_seconds: i64,
    pub exercises_completed: u32,
    pub total_exercises: u32,
    pub is_completed: bool,
}

impl WorkoutHistoryRecord {
    /// Share of exercises finished, 0-100
    pub fn completion_percentage(&self) -> f64 {
        if self.total_exercises == 0 {
            return 0.0;
        }
        f64::from(self.exercises_completed) / f64::from(self.total_exercises) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CoreExercise, Exercise};
    use chrono::TimeZone;
    use rstest::rstest;

    fn record(completed: u32, total: u32) -> WorkoutHistoryRecord {
        WorkoutHistoryRecord {
            id: Uuid::new_v4(),
            owner_id: None,
            date: Utc::now(),
            duration_seconds: 600,
            exercises_completed: completed,
            total_exercises: total,
            is_completed: completed == total,
        }
    }

    #[rstest]
    #[case(ActivityLevel::Sedentary, 120, 3)]
    #[case(ActivityLevel::Light, 90, 4)]
    #[case(ActivityLevel::Moderate, 60, 3)]
    #[case(ActivityLevel::Active, 30, 3)]
    fn test_activity_base_configuration(
        #[case] level: ActivityLevel,
        #[case] reps: u32,
        #[case] sets: u32,
    ) {
        let config = level.base_configuration();
        assert_eq!(config.reps, reps);
        assert_eq!(config.sets, sets);
        assert_eq!(config.rest_seconds, 30);
        assert_eq!(config.extra_rest_seconds, 0);
    }

    #[test]
    fn test_estimated_seconds() {
        let config = ExerciseConfiguration {
            reps: 60,
            sets: 3,
            rest_seconds: 30,
            extra_rest_seconds: 10,
        };
        assert_eq!(config.estimated_seconds(), 3 * 90 + 10);
    }

    #[test]
    fn test_completion_percentage_zero_total() {
        let r = record(0, 0);
        assert_eq!(r.completion_percentage(), 0.0);
        assert!(!r.completion_percentage().is_nan());
    }

    #[test]
    fn test_completion_percentage() {
        assert!((record(3, 4).completion_percentage() - 75.0).abs() < 1e-9);
        assert!((record(4, 4).completion_percentage() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekday_from_date() {
        // 2024-10-14 was a Monday
        let monday = Utc.with_ymd_and_hms(2024, 10, 14, 9, 0, 0).unwrap();
        assert_eq!(WeekDay::of(monday), WeekDay::Monday);
        let sunday = Utc.with_ymd_and_hms(2024, 10, 20, 23, 59, 0).unwrap();
        assert_eq!(WeekDay::of(sunday), WeekDay::Sunday);
    }

    #[test]
    fn test_availability_round_trips_as_list() {
        let availability = WeeklyAvailability::default()
            .with_hours(WeekDay::Monday, 1.0)
            .with_hours(WeekDay::Friday, 0.5);

        let json = serde_json::to_value(availability).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0]["week_day"], "monday");
        assert_eq!(entries[0]["free_time"], 1.0);

        let parsed: WeeklyAvailability = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, availability);
    }

    #[test]
    fn test_availability_rejects_missing_day() {
        let json = serde_json::json!([
            { "week_day": "monday", "free_time": 1.0 },
            { "week_day": "tuesday", "free_time": 1.0 }
        ]);
        assert!(serde_json::from_value::<WeeklyAvailability>(json).is_err());
    }

    #[test]
    fn test_availability_rejects_duplicate_day() {
        let mut entries: Vec<DayAvailability> = WeeklyAvailability::default().into();
        entries[6].week_day = WeekDay::Monday;
        let json = serde_json::to_value(entries).unwrap();
        let err = serde_json::from_value::<WeeklyAvailability>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_active_days_skip_zero() {
        let availability = WeeklyAvailability::default()
            .with_hours(WeekDay::Tuesday, 2.0)
            .with_hours(WeekDay::Sunday, 0.25);
        let days: Vec<_> = availability.active_days().map(|d| d.week_day).collect();
        assert_eq!(days, vec![WeekDay::Tuesday, WeekDay::Sunday]);
    }

    #[test]
    fn test_weekly_plan_rejects_duplicate_days() {
        let day = DayPlan {
            week_day: WeekDay::Wednesday,
            exercises: vec![],
            last_updated: Utc::now(),
        };
        assert!(WeeklyPlan::from_days(vec![day.clone(), day]).is_err());
    }

    #[test]
    fn test_weekly_plan_is_kept_in_weekday_order() {
        let make = |week_day| DayPlan {
            week_day,
            exercises: vec![ExerciseSession::new(
                Exercise::Core(CoreExercise::Plank),
                ActivityLevel::Active.base_configuration(),
            )],
            last_updated: Utc::now(),
        };
        let plan = WeeklyPlan::from_days(vec![make(WeekDay::Sunday), make(WeekDay::Monday)]).unwrap();
        assert_eq!(plan.days()[0].week_day, WeekDay::Monday);
        assert_eq!(plan.days()[1].week_day, WeekDay::Sunday);
        assert!(plan.day(WeekDay::Sunday).is_some());
        assert!(plan.day(WeekDay::Tuesday).is_none());
    }
}
