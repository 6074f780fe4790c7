use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::CalculatorConfig;

#[derive(Clone)]
pub struct CalculatorState {
    pub config: CalculatorConfig,
}

/// Calculator defaults the client UI renders: the pre-filled arrival
/// time, the increment/decrement step, and the quick-select buttons.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSettingsResponse {
    pub default_arrival_time: String,
    pub offset_step_minutes: i64,
    pub preset_offsets: Vec<i64>,
}

/// Get the calculator UI defaults
#[utoipa::path(
    get,
    path = "/api/calculator",
    responses(
        (status = 200, description = "Calculator defaults for the client", body = CalculatorSettingsResponse)
    ),
    tag = "calculator"
)]
pub async fn get_calculator_settings(
    State(state): State<CalculatorState>,
) -> Json<CalculatorSettingsResponse> {
    Json(CalculatorSettingsResponse {
        default_arrival_time: state.config.default_arrival_time.clone(),
        offset_step_minutes: state.config.offset_step_minutes,
        preset_offsets: state.config.preset_offsets.clone(),
    })
}

pub fn router(config: CalculatorConfig) -> Router {
    let state = CalculatorState { config };
    Router::new()
        .route("/", get(get_calculator_settings))
        .with_state(state)
}
