use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::store::RoutineStore;

#[derive(Clone)]
pub struct HealthState {
    pub store: Arc<RoutineStore>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Whether the service is running
    pub healthy: bool,
    /// Number of routines currently in the collection
    pub routine_count: usize,
    /// Whether a computed schedule is cached for display
    pub schedule_cached: bool,
    /// Whether a routine is currently selected
    pub routine_selected: bool,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        routine_count: state.store.routine_count().await,
        schedule_cached: state.store.last_schedule().await.is_some(),
        routine_selected: state.store.selected_routine().await.is_some(),
    })
}

pub fn router(store: Arc<RoutineStore>) -> Router {
    let state = HealthState { store };
    Router::new()
        .route("/", get(health_check))
        .with_state(state)
}
