//! The routine collection, its persistence, and the schedule cache.
//!
//! This module handles:
//! - Loading the persisted routine collection on startup
//! - CRUD over routines, flushing the affected row to SQLite after each
//!   mutation while the in-memory state stays authoritative
//! - The UI selection and the single last-computed-schedule cache slot,
//!   both session scoped

pub mod types;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::schedule::compute_schedule;
use types::{
    CalculateResponse, CommuteStep, CreateRoutineRequest, Routine, RoutineList, RoutineRow,
    ScheduleCache, SelectedRoutine, StepInput, UpdateRoutineRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Owns the routine collection and the last computed schedule.
///
/// All state lives behind `RwLock`s so the store can be shared across
/// request handlers; operations are short and non-blocking apart from
/// the SQLite flush.
pub struct RoutineStore {
    pool: SqlitePool,
    routines: RoutineList,
    selected: SelectedRoutine,
    schedule_cache: ScheduleCache,
}

impl RoutineStore {
    /// Load the persisted routine collection and build the store.
    ///
    /// Rows that cannot be read back (corrupt steps JSON, unparseable
    /// timestamps) are skipped with a warning rather than failing
    /// startup.
    pub async fn load(pool: SqlitePool) -> Result<Self, StoreError> {
        let rows: Vec<RoutineRow> = sqlx::query_as(
            "SELECT id, name, destination, steps, default_arrival_time, created_at, updated_at \
             FROM routines ORDER BY created_at",
        )
        .fetch_all(&pool)
        .await?;

        let total = rows.len();
        let routines: Vec<Routine> = rows.into_iter().filter_map(routine_from_row).collect();
        if routines.len() < total {
            warn!(
                skipped = total - routines.len(),
                "Some persisted routines could not be read"
            );
        }
        info!(count = routines.len(), "Loaded routine collection");

        Ok(Self {
            pool,
            routines: Arc::new(RwLock::new(routines)),
            selected: Arc::new(RwLock::new(None)),
            schedule_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// All routines, in load/insertion order.
    pub async fn list(&self) -> Vec<Routine> {
        self.routines.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Routine> {
        self.routines.read().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn routine_count(&self) -> usize {
        self.routines.read().await.len()
    }

    /// Create a routine with a fresh id; steps get ids and dense order
    /// values from their position in the request.
    pub async fn add_routine(&self, draft: CreateRoutineRequest) -> Result<Routine, StoreError> {
        let now = Utc::now();
        let steps = build_steps(draft.steps);
        let routine = Routine {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            destination: draft.destination,
            total_minutes: total_minutes(&steps),
            steps,
            default_arrival_time: draft.default_arrival_time,
            created_at: now,
            updated_at: now,
        };

        // Flush before committing to memory so a failed write leaves
        // the collection untouched.
        self.flush_routine(&routine).await?;
        self.routines.write().await.push(routine.clone());
        debug!(id = %routine.id, "Added routine");
        Ok(routine)
    }

    /// Merge the given fields into the routine; `Ok(None)` when the id
    /// is unknown. Any successful update bumps `updated_at`. For the
    /// clearable fields an explicit `null` clears, an absent key leaves
    /// the value unchanged.
    pub async fn update_routine(
        &self,
        id: &str,
        update: UpdateRoutineRequest,
    ) -> Result<Option<Routine>, StoreError> {
        let Some(mut updated) = self.get(id).await else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            updated.name = name;
        }
        if let Some(destination) = update.destination {
            updated.destination = destination;
        }
        if let Some(default_arrival_time) = update.default_arrival_time {
            updated.default_arrival_time = default_arrival_time;
        }
        if let Some(steps) = update.steps {
            updated.steps = build_steps(steps);
            updated.total_minutes = total_minutes(&updated.steps);
        }
        updated.updated_at = Utc::now();

        // Flush first so a failed write leaves the collection
        // untouched; the write lock only covers the in-memory splice.
        self.flush_routine(&updated).await?;
        let mut routines = self.routines.write().await;
        if let Some(existing) = routines.iter_mut().find(|r| r.id == id) {
            *existing = updated.clone();
        }
        Ok(Some(updated))
    }

    /// Remove a routine; returns whether anything was deleted. Clears
    /// the selection when it pointed at the deleted routine.
    pub async fn delete_routine(&self, id: &str) -> Result<bool, StoreError> {
        if self.get(id).await.is_none() {
            return Ok(false);
        }

        // Delete the row first; the write lock only covers the
        // in-memory splice.
        sqlx::query("DELETE FROM routines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.routines.write().await.retain(|r| r.id != id);

        let mut selected = self.selected.write().await;
        if selected.as_deref() == Some(id) {
            *selected = None;
        }
        debug!(id, "Deleted routine");
        Ok(true)
    }

    /// Focus a routine in the UI; returns it, or `None` for an unknown
    /// id (in which case the selection is left unchanged).
    pub async fn select_routine(&self, id: &str) -> Option<Routine> {
        let routine = self.get(id).await?;
        *self.selected.write().await = Some(routine.id.clone());
        Some(routine)
    }

    pub async fn clear_selection(&self) {
        *self.selected.write().await = None;
    }

    pub async fn selected_routine(&self) -> Option<Routine> {
        let id = self.selected.read().await.clone()?;
        self.get(&id).await
    }

    /// Run the schedule computation for a routine and cache the result
    /// as the last computed schedule.
    ///
    /// Returns `None` without touching the cache when the routine does
    /// not exist (or, defensively, when `arrival_time` fails to parse —
    /// the API layer rejects that case up front).
    pub async fn calculate_schedule_local(
        &self,
        routine_id: &str,
        arrival_time: &str,
        offset_minutes: i64,
    ) -> Option<CalculateResponse> {
        let result = {
            let routines = self.routines.read().await;
            let routine = routines.iter().find(|r| r.id == routine_id)?;
            compute_schedule(routine_id, &routine.steps, arrival_time, offset_minutes)?
        };

        *self.schedule_cache.write().await = Some(result.clone());
        debug!(
            routine_id,
            departure = %result.departure_time,
            "Computed schedule"
        );
        Some(result)
    }

    /// The most recent computation result, if any. Callers must check
    /// that its `routine_id` matches the routine they are displaying.
    pub async fn last_schedule(&self) -> Option<CalculateResponse> {
        self.schedule_cache.read().await.clone()
    }

    /// Write one routine row; `INSERT OR REPLACE` keeps the flush a
    /// single atomic statement.
    async fn flush_routine(&self, routine: &Routine) -> Result<(), StoreError> {
        let steps_json = serde_json::to_string(&routine.steps)?;
        sqlx::query(
            "INSERT OR REPLACE INTO routines \
             (id, name, destination, steps, default_arrival_time, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&routine.id)
        .bind(&routine.name)
        .bind(&routine.destination)
        .bind(steps_json)
        .bind(&routine.default_arrival_time)
        .bind(routine.created_at.to_rfc3339())
        .bind(routine.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Assign ids and dense order values to client-supplied steps.
fn build_steps(inputs: Vec<StepInput>) -> Vec<CommuteStep> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(position, input)| CommuteStep {
            id: Uuid::new_v4().to_string(),
            label: input.label,
            duration_minutes: input.duration_minutes,
            step_type: input.step_type,
            order: position as i32,
        })
        .collect()
}

fn total_minutes(steps: &[CommuteStep]) -> u32 {
    steps.iter().map(|s| s.duration_minutes).sum()
}

fn routine_from_row(row: RoutineRow) -> Option<Routine> {
    let steps: Vec<CommuteStep> = match serde_json::from_str(&row.steps) {
        Ok(steps) => steps,
        Err(e) => {
            warn!(id = %row.id, error = %e, "Skipping routine with unreadable steps");
            return None;
        }
    };
    let created_at = parse_timestamp(&row.id, "created_at", &row.created_at)?;
    let updated_at = parse_timestamp(&row.id, "updated_at", &row.updated_at)?;

    Some(Routine {
        id: row.id,
        name: row.name,
        destination: row.destination,
        total_minutes: total_minutes(&steps),
        steps,
        default_arrival_time: row.default_arrival_time,
        created_at,
        updated_at,
    })
}

fn parse_timestamp(id: &str, field: &str, value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!(id, field, error = %e, "Skipping routine with unreadable timestamp");
            None
        }
    }
}
