//! Type definitions for the routine store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// Kind of commute leg. Classification for display only; the schedule
/// computation never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Prepare,
    Walk,
    Bus,
    Subway,
    Taxi,
    Car,
    Bike,
    Other,
}

/// One leg of a commute routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommuteStep {
    pub id: String,
    pub label: String,
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Position within the routine. Unique per routine and usually
    /// dense, but consumers sort by it rather than index with it.
    pub order: i32,
}

/// A named, reusable sequence of commute steps.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub steps: Vec<CommuteStep>,
    /// Sum of step durations; maintained whenever steps change.
    pub total_minutes: u32,
    /// Pre-fills the calculator's arrival time input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_arrival_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Step payload as supplied by clients; ids and order are assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    pub label: String,
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub step_type: StepType,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoutineRequest {
    pub name: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepInput>,
    #[serde(default)]
    pub default_arrival_time: Option<String>,
}

/// Partial update; absent fields are left unchanged. `destination` and
/// `defaultArrivalTime` additionally distinguish an omitted key (no
/// change) from an explicit `null` (clear the field). A new `steps`
/// list replaces the old one wholesale and gets fresh ids and order
/// values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoutineRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "patch_field",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub destination: Option<Option<String>>,
    #[serde(default)]
    pub steps: Option<Vec<StepInput>>,
    #[serde(
        default,
        deserialize_with = "patch_field",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub default_arrival_time: Option<Option<String>>,
}

/// Keeps key presence visible through deserialization: an absent key
/// takes the serde default (`None`), while a present key, `null`
/// included, lands in `Some(..)`.
fn patch_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The result of projecting one commute step onto a concrete timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStep {
    /// Back-reference to the source step
    pub step_id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// "HH:mm" wall-clock start of this leg
    pub start_time: String,
    /// "HH:mm" wall-clock end of this leg
    pub end_time: String,
    pub duration_minutes: u32,
}

/// Full result of one schedule computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    pub routine_id: String,
    /// The adjusted arrival: requested arrival plus the offset, "HH:mm"
    pub arrival_time: String,
    /// The signed adjustment that was applied, in minutes
    pub offset_minutes: i64,
    /// Per-step windows in forward chronological order
    pub schedule: Vec<ScheduleStep>,
    /// "HH:mm" time to leave in order to arrive on time
    pub departure_time: String,
    /// Sum of all step durations
    pub total_minutes: u32,
}

/// In-memory routine collection; authoritative between flushes.
pub type RoutineList = Arc<RwLock<Vec<Routine>>>;

/// Single slot holding the most recent computation result. Session
/// scoped: overwritten on every successful calculation, never persisted.
pub type ScheduleCache = Arc<RwLock<Option<CalculateResponse>>>;

/// Id of the routine currently focused in the UI, if any.
pub type SelectedRoutine = Arc<RwLock<Option<String>>>;

/// Raw SQLite row; steps are stored as a JSON array in a TEXT column and
/// timestamps as RFC 3339 strings.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RoutineRow {
    pub id: String,
    pub name: String,
    pub destination: Option<String>,
    pub steps: String,
    pub default_arrival_time: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
