//! Exercise catalog API routes

use crate::state::AppState;
use axum::{extract::Query, routing::get, Json, Router};
use fouxd_training_shared::catalog::{ExerciseCatalog, ExerciseDefinition, StaticCatalog};
use fouxd_training_shared::types::ExercisesQuery;

/// Create exercise catalog routes
pub fn exercise_routes() -> Router<AppState> {
    Router::new().route("/", get(list_exercises))
}

/// GET /api/v1/exercises - Catalog entries, optionally for one category
async fn list_exercises(Query(query): Query<ExercisesQuery>) -> Json<Vec<ExerciseDefinition>> {
    let catalog = StaticCatalog::new();
    let definitions = match query.category {
        Some(category) => catalog
            .exercises(category)
            .iter()
            .map(|e| e.definition())
            .collect(),
        None => catalog.all().map(|e| e.definition()).collect(),
    };
    Json(definitions)
}
