//! Static exercise catalog
//!
//! Every exercise belongs to exactly one of four fixed categories. The
//! catalog is reference data: it is built once and never edited at runtime.
//!
//! [`Exercise`] is a tagged union over the per-category exercise enums, which
//! is also its persisted form:
//!
//! ```json
//! { "category": "lower_body", "exercise": "squats" }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Categories
// ============================================================================

/// Exercise category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    UpperBody,
    LowerBody,
    Core,
    FullBody,
}

impl ExerciseCategory {
    /// All categories in a stable order
    pub const ALL: [ExerciseCategory; 4] = [
        ExerciseCategory::UpperBody,
        ExerciseCategory::LowerBody,
        ExerciseCategory::Core,
        ExerciseCategory::FullBody,
    ];

    /// Position of the category in [`ExerciseCategory::ALL`]
    pub fn index(&self) -> usize {
        match self {
            ExerciseCategory::UpperBody => 0,
            ExerciseCategory::LowerBody => 1,
            ExerciseCategory::Core => 2,
            ExerciseCategory::FullBody => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseCategory::UpperBody => "Upper Body",
            ExerciseCategory::LowerBody => "Lower Body",
            ExerciseCategory::Core => "Core",
            ExerciseCategory::FullBody => "Full Body",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExerciseCategory::UpperBody => "upper_body",
            ExerciseCategory::LowerBody => "lower_body",
            ExerciseCategory::Core => "core",
            ExerciseCategory::FullBody => "full_body",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Per-category exercises
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBodyExercise {
    PushUps,
    DiamondPushUps,
    PikePushUps,
    TricepDips,
    ArmCircles,
    ShoulderTaps,
}

impl UpperBodyExercise {
    pub const ALL: [UpperBodyExercise; 6] = [
        UpperBodyExercise::PushUps,
        UpperBodyExercise::DiamondPushUps,
        UpperBodyExercise::PikePushUps,
        UpperBodyExercise::TricepDips,
        UpperBodyExercise::ArmCircles,
        UpperBodyExercise::ShoulderTaps,
    ];

    fn info(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            UpperBodyExercise::PushUps => (
                "Push-ups",
                "Lower your chest to the floor with a straight body, then press back up.",
                "push_ups",
            ),
            UpperBodyExercise::DiamondPushUps => (
                "Diamond Push-ups",
                "Push-ups with hands together under the chest to load the triceps.",
                "diamond_push_ups",
            ),
            UpperBodyExercise::PikePushUps => (
                "Pike Push-ups",
                "Hips high in an inverted V, bend the elbows to bring the head toward the floor.",
                "pike_push_ups",
            ),
            UpperBodyExercise::TricepDips => (
                "Tricep Dips",
                "Hands on a bench behind you, lower the hips by bending the elbows.",
                "tricep_dips",
            ),
            UpperBodyExercise::ArmCircles => (
                "Arm Circles",
                "Arms extended to the sides, draw small controlled circles.",
                "arm_circles",
            ),
            UpperBodyExercise::ShoulderTaps => (
                "Shoulder Taps",
                "From a high plank, tap each shoulder with the opposite hand without rocking.",
                "shoulder_taps",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowerBodyExercise {
    Squats,
    Lunges,
    GluteBridges,
    CalfRaises,
    WallSit,
    StepUps,
}

impl LowerBodyExercise {
    pub const ALL: [LowerBodyExercise; 6] = [
        LowerBodyExercise::Squats,
        LowerBodyExercise::Lunges,
        LowerBodyExercise::GluteBridges,
        LowerBodyExercise::CalfRaises,
        LowerBodyExercise::WallSit,
        LowerBodyExercise::StepUps,
    ];

    fn info(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            LowerBodyExercise::Squats => (
                "Squats",
                "Feet shoulder-width apart, sit the hips back and down, then stand tall.",
                "squats",
            ),
            LowerBodyExercise::Lunges => (
                "Lunges",
                "Step forward and lower until both knees reach ninety degrees, alternate legs.",
                "lunges",
            ),
            LowerBodyExercise::GluteBridges => (
                "Glute Bridges",
                "Lying on your back with knees bent, drive the hips up and squeeze the glutes.",
                "glute_bridges",
            ),
            LowerBodyExercise::CalfRaises => (
                "Calf Raises",
                "Rise onto the balls of the feet, pause, and lower slowly.",
                "calf_raises",
            ),
            LowerBodyExercise::WallSit => (
                "Wall Sit",
                "Back against a wall, hold a seated position with thighs parallel to the floor.",
                "wall_sit",
            ),
            LowerBodyExercise::StepUps => (
                "Step-ups",
                "Step onto a sturdy platform, drive through the heel, step back down.",
                "step_ups",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreExercise {
    Plank,
    Crunches,
    BicycleCrunches,
    LegRaises,
    RussianTwists,
    SidePlank,
}

impl CoreExercise {
    pub const ALL: [CoreExercise; 6] = [
        CoreExercise::Plank,
        CoreExercise::Crunches,
        CoreExercise::BicycleCrunches,
        CoreExercise::LegRaises,
        CoreExercise::RussianTwists,
        CoreExercise::SidePlank,
    ];

    fn info(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            CoreExercise::Plank => (
                "Plank",
                "Hold a straight line from head to heels on the forearms.",
                "plank",
            ),
            CoreExercise::Crunches => (
                "Crunches",
                "Curl the shoulders off the floor using the abdominals.",
                "crunches",
            ),
            CoreExercise::BicycleCrunches => (
                "Bicycle Crunches",
                "Bring elbow to the opposite knee while extending the other leg, alternate sides.",
                "bicycle_crunches",
            ),
            CoreExercise::LegRaises => (
                "Leg Raises",
                "Lying flat, raise straight legs to vertical and lower without touching the floor.",
                "leg_raises",
            ),
            CoreExercise::RussianTwists => (
                "Russian Twists",
                "Seated and leaning back, rotate the torso from side to side.",
                "russian_twists",
            ),
            CoreExercise::SidePlank => (
                "Side Plank",
                "Support the body on one forearm with hips lifted, switch sides halfway.",
                "side_plank",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullBodyExercise {
    JumpingJacks,
    Burpees,
    MountainClimbers,
    HighKnees,
    SquatThrusts,
    BearCrawl,
}

impl FullBodyExercise {
    pub const ALL: [FullBodyExercise; 6] = [
        FullBodyExercise::JumpingJacks,
        FullBodyExercise::Burpees,
        FullBodyExercise::MountainClimbers,
        FullBodyExercise::HighKnees,
        FullBodyExercise::SquatThrusts,
        FullBodyExercise::BearCrawl,
    ];

    fn info(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            FullBodyExercise::JumpingJacks => (
                "Jumping Jacks",
                "Jump the feet apart while raising the arms overhead, then return.",
                "jumping_jacks",
            ),
            FullBodyExercise::Burpees => (
                "Burpees",
                "Squat, kick back to a plank, return to the squat and jump up.",
                "burpees",
            ),
            FullBodyExercise::MountainClimbers => (
                "Mountain Climbers",
                "From a high plank, drive the knees toward the chest in quick alternation.",
                "mountain_climbers",
            ),
            FullBodyExercise::HighKnees => (
                "High Knees",
                "Run in place lifting the knees to hip height.",
                "high_knees",
            ),
            FullBodyExercise::SquatThrusts => (
                "Squat Thrusts",
                "Drop into a squat, shoot the feet back to a plank and jump them back in.",
                "squat_thrusts",
            ),
            FullBodyExercise::BearCrawl => (
                "Bear Crawl",
                "On hands and feet with knees hovering, crawl forward and back.",
                "bear_crawl",
            ),
        }
    }
}

// ============================================================================
// Tagged union
// ============================================================================

/// An exercise from the static catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "exercise", rename_all = "snake_case")]
pub enum Exercise {
    UpperBody(UpperBodyExercise),
    LowerBody(LowerBodyExercise),
    Core(CoreExercise),
    FullBody(FullBodyExercise),
}

impl Exercise {
    pub fn category(&self) -> ExerciseCategory {
        match self {
            Exercise::UpperBody(_) => ExerciseCategory::UpperBody,
            Exercise::LowerBody(_) => ExerciseCategory::LowerBody,
            Exercise::Core(_) => ExerciseCategory::Core,
            Exercise::FullBody(_) => ExerciseCategory::FullBody,
        }
    }

    fn info(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            Exercise::UpperBody(e) => e.info(),
            Exercise::LowerBody(e) => e.info(),
            Exercise::Core(e) => e.info(),
            Exercise::FullBody(e) => e.info(),
        }
    }

    /// Stable human-readable title
    pub fn title(&self) -> &'static str {
        self.info().0
    }

    pub fn description(&self) -> &'static str {
        self.info().1
    }

    /// Name of the animated demonstration asset
    pub fn media(&self) -> &'static str {
        self.info().2
    }

    pub fn definition(&self) -> ExerciseDefinition {
        ExerciseDefinition {
            exercise: *self,
            title: self.title().to_string(),
            description: self.description().to_string(),
            media: self.media().to_string(),
        }
    }
}

/// Flattened, display-ready view of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub title: String,
    pub description: String,
    pub media: String,
}

// ============================================================================
// Catalog
// ============================================================================

/// Source of exercises per category for the plan generator
pub trait ExerciseCatalog {
    fn exercises(&self, category: ExerciseCategory) -> &[Exercise];
}

/// The built-in catalog
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    by_category: [Vec<Exercise>; 4],
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self {
            by_category: [
                UpperBodyExercise::ALL.into_iter().map(Exercise::UpperBody).collect(),
                LowerBodyExercise::ALL.into_iter().map(Exercise::LowerBody).collect(),
                CoreExercise::ALL.into_iter().map(Exercise::Core).collect(),
                FullBodyExercise::ALL.into_iter().map(Exercise::FullBody).collect(),
            ],
        }
    }

    /// Every exercise, grouped by category in [`ExerciseCategory::ALL`] order
    pub fn all(&self) -> impl Iterator<Item = &Exercise> {
        self.by_category.iter().flatten()
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseCatalog for StaticCatalog {
    fn exercises(&self, category: ExerciseCategory) -> &[Exercise] {
        &self.by_category[category.index()]
    }
}
