use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::ErrorResponse;
use crate::schedule::parse_time;
use crate::store::types::{CalculateResponse, Routine};

use super::RoutinesState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    /// Target arrival time, "HH:mm" 24h
    pub arrival_time: String,
    /// Signed adjustment in minutes applied to the arrival time before
    /// computing; any magnitude is legal and wraps across midnight
    #[serde(default)]
    pub offset_minutes: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LastScheduleResponse {
    /// The most recent computation, if any. Clients must check its
    /// `routineId` against the routine they are displaying before
    /// rendering it.
    pub schedule: Option<CalculateResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectRoutineRequest {
    /// Routine to focus, or null to clear the selection
    pub routine_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SelectedRoutineResponse {
    pub routine: Option<Routine>,
}

/// Compute the schedule for a routine
///
/// Walks the routine's steps backward from the adjusted arrival time
/// and caches the result as the last computed schedule.
#[utoipa::path(
    post,
    path = "/api/routines/{id}/calculate",
    params(
        ("id" = String, Path, description = "Routine id")
    ),
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "The computed schedule", body = CalculateResponse),
        (status = 400, description = "Malformed arrival time", body = ErrorResponse),
        (status = 404, description = "Routine not found", body = ErrorResponse)
    ),
    tag = "routines"
)]
pub async fn calculate_schedule(
    State(state): State<RoutinesState>,
    Path(id): Path<String>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Reject malformed times up front so a store miss below can only
    // mean an unknown routine.
    if parse_time(&request.arrival_time).is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid arrival time: {}", request.arrival_time),
            }),
        ));
    }

    let result = state
        .store
        .calculate_schedule_local(&id, &request.arrival_time, request.offset_minutes)
        .await
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Routine not found".to_string(),
                }),
            )
        })?;
    Ok(Json(result))
}

/// Get the last computed schedule
#[utoipa::path(
    get,
    path = "/api/routines/last-schedule",
    responses(
        (status = 200, description = "The cached schedule, if one exists", body = LastScheduleResponse)
    ),
    tag = "routines"
)]
pub async fn last_schedule(State(state): State<RoutinesState>) -> Json<LastScheduleResponse> {
    Json(LastScheduleResponse {
        schedule: state.store.last_schedule().await,
    })
}

/// Get the currently selected routine
#[utoipa::path(
    get,
    path = "/api/routines/selected",
    responses(
        (status = 200, description = "The selected routine, if any", body = SelectedRoutineResponse)
    ),
    tag = "routines"
)]
pub async fn get_selected_routine(
    State(state): State<RoutinesState>,
) -> Json<SelectedRoutineResponse> {
    Json(SelectedRoutineResponse {
        routine: state.store.selected_routine().await,
    })
}

/// Select a routine (or clear the selection)
#[utoipa::path(
    put,
    path = "/api/routines/selected",
    request_body = SelectRoutineRequest,
    responses(
        (status = 200, description = "The new selection", body = SelectedRoutineResponse),
        (status = 404, description = "Routine not found", body = ErrorResponse)
    ),
    tag = "routines"
)]
pub async fn set_selected_routine(
    State(state): State<RoutinesState>,
    Json(request): Json<SelectRoutineRequest>,
) -> Result<Json<SelectedRoutineResponse>, (StatusCode, Json<ErrorResponse>)> {
    let routine = match request.routine_id {
        Some(id) => {
            let routine = state.store.select_routine(&id).await.ok_or_else(|| {
                (
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse {
                        error: "Routine not found".to_string(),
                    }),
                )
            })?;
            Some(routine)
        }
        None => {
            state.store.clear_selection().await;
            None
        }
    };
    Ok(Json(SelectedRoutineResponse { routine }))
}
