use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::{internal_error, ErrorResponse};
use crate::store::types::{CreateRoutineRequest, Routine, UpdateRoutineRequest};

use super::RoutinesState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoutineListResponse {
    pub routines: Vec<Routine>,
}

/// List all commute routines
#[utoipa::path(
    get,
    path = "/api/routines",
    responses(
        (status = 200, description = "All routines in the collection", body = RoutineListResponse)
    ),
    tag = "routines"
)]
pub async fn list_routines(State(state): State<RoutinesState>) -> Json<RoutineListResponse> {
    Json(RoutineListResponse {
        routines: state.store.list().await,
    })
}

/// Get a single routine by id
#[utoipa::path(
    get,
    path = "/api/routines/{id}",
    params(
        ("id" = String, Path, description = "Routine id")
    ),
    responses(
        (status = 200, description = "The routine", body = Routine),
        (status = 404, description = "Routine not found", body = ErrorResponse)
    ),
    tag = "routines"
)]
pub async fn get_routine(
    State(state): State<RoutinesState>,
    Path(id): Path<String>,
) -> Result<Json<Routine>, (StatusCode, Json<ErrorResponse>)> {
    let routine = state.store.get(&id).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Routine not found".to_string(),
            }),
        )
    })?;
    Ok(Json(routine))
}

/// Create a commute routine
#[utoipa::path(
    post,
    path = "/api/routines",
    request_body = CreateRoutineRequest,
    responses(
        (status = 200, description = "The created routine", body = Routine),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "routines"
)]
pub async fn create_routine(
    State(state): State<RoutinesState>,
    Json(request): Json<CreateRoutineRequest>,
) -> Result<Json<Routine>, (StatusCode, Json<ErrorResponse>)> {
    let routine = state
        .store
        .add_routine(request)
        .await
        .map_err(internal_error)?;
    Ok(Json(routine))
}

/// Update fields of an existing routine
#[utoipa::path(
    put,
    path = "/api/routines/{id}",
    params(
        ("id" = String, Path, description = "Routine id")
    ),
    request_body = UpdateRoutineRequest,
    responses(
        (status = 200, description = "The updated routine", body = Routine),
        (status = 404, description = "Routine not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "routines"
)]
pub async fn update_routine(
    State(state): State<RoutinesState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoutineRequest>,
) -> Result<Json<Routine>, (StatusCode, Json<ErrorResponse>)> {
    let updated = state
        .store
        .update_routine(&id, request)
        .await
        .map_err(internal_error)?;

    let routine = updated.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Routine not found".to_string(),
            }),
        )
    })?;
    Ok(Json(routine))
}

/// Delete a routine
#[utoipa::path(
    delete,
    path = "/api/routines/{id}",
    params(
        ("id" = String, Path, description = "Routine id")
    ),
    responses(
        (status = 204, description = "Routine deleted"),
        (status = 404, description = "Routine not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "routines"
)]
pub async fn delete_routine(
    State(state): State<RoutinesState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let deleted = state
        .store
        .delete_routine(&id)
        .await
        .map_err(internal_error)?;

    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Routine not found".to_string(),
            }),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}
