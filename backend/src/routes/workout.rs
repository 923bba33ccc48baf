//! Workout session API routes
//!
//! One session per owner. Starting takes the exercises from the owner's
//! plan for the requested weekday (today when omitted); the countdown then
//! runs on the server and clients poll `GET /workout` for its state.

use crate::error::ApiError;
use crate::identity::Owner;
use crate::services::PlanService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fouxd_training_shared::models::WeekDay;
use fouxd_training_shared::session::SessionSnapshot;
use fouxd_training_shared::types::StartWorkoutRequest;
use tracing::debug;

/// Create workout routes
pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_workout).post(start_workout))
        .route("/pause", post(pause_workout))
        .route("/resume", post(resume_workout))
        .route("/end", post(end_workout))
}

/// POST /api/v1/workout - Start a session from a day's plan
async fn start_workout(
    State(state): State<AppState>,
    owner: Owner,
    body: Option<Json<StartWorkoutRequest>>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    let week_day = body
        .and_then(|Json(req)| req.week_day)
        .unwrap_or_else(|| WeekDay::of(Utc::now()));

    let exercises =
        PlanService::day_plan(state.storage(), state.planner(), owner.id(), week_day)
            .await?
            .map(|day| day.exercises)
            .unwrap_or_default();
    debug!(%week_day, exercises = exercises.len(), "Starting workout from plan");

    let snapshot = state.workouts.start(owner.id(), exercises).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/workout - Current session state
async fn get_workout(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.workouts.snapshot(owner.id()).await?))
}

/// POST /api/v1/workout/pause
async fn pause_workout(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.workouts.pause(owner.id()).await?))
}

/// POST /api/v1/workout/resume
async fn resume_workout(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.workouts.resume(owner.id()).await?))
}

/// POST /api/v1/workout/end - Finish early and record the partial session
async fn end_workout(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.workouts.end(owner.id()).await?))
}
