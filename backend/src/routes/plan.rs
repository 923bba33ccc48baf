//! Weekly plan API routes

use crate::error::ApiError;
use crate::identity::Owner;
use crate::services::PlanService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fouxd_training_shared::models::{DayPlan, WeekDay, WeeklyPlan};
use fouxd_training_shared::types::GeneratedPlan;

/// Create plan routes
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_plan))
        .route("/reshuffle", post(reshuffle_plan))
        .route("/today", get(get_today))
        .route("/days/:week_day", get(get_day))
}

/// GET /api/v1/plan - Stored plan, generated on first request
async fn get_plan(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<WeeklyPlan>, ApiError> {
    let plan = PlanService::get_or_create(state.storage(), state.planner(), owner.id()).await?;
    Ok(Json(plan))
}

/// POST /api/v1/plan/reshuffle - Regenerate the week from the stored profile
async fn reshuffle_plan(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<GeneratedPlan>, ApiError> {
    let generated = PlanService::reshuffle(state.storage(), state.planner(), owner.id()).await?;
    Ok(Json(generated))
}

/// GET /api/v1/plan/today
async fn get_today(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<DayPlan>, ApiError> {
    day_plan(&state, &owner, WeekDay::of(Utc::now())).await
}

/// GET /api/v1/plan/days/:week_day
async fn get_day(
    State(state): State<AppState>,
    owner: Owner,
    Path(week_day): Path<WeekDay>,
) -> Result<Json<DayPlan>, ApiError> {
    day_plan(&state, &owner, week_day).await
}

async fn day_plan(
    state: &AppState,
    owner: &Owner,
    week_day: WeekDay,
) -> Result<Json<DayPlan>, ApiError> {
    PlanService::day_plan(state.storage(), state.planner(), owner.id(), week_day)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No workout planned for {}", week_day)))
}
