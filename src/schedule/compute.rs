use crate::store::types::{CalculateResponse, CommuteStep, ScheduleStep};

use super::clock::{format_time, parse_time};

/// Compute the full schedule for arriving at `arrival_time` shifted by
/// `offset_minutes`.
///
/// The pass walks the steps backward from the (adjusted) arrival time,
/// which makes the fixed-arrival constraint exact: duration is known per
/// step, so each start instant falls out of the end instant above it.
/// The running minute count is unbounded and only folded into a day when
/// a wall-clock string is rendered, so schedules may cross midnight in
/// either direction.
///
/// Returns `None` only when `arrival_time` is not a valid "HH:mm"
/// string; given a well-formed time the computation is total.
pub fn compute_schedule(
    routine_id: &str,
    steps: &[CommuteStep],
    arrival_time: &str,
    offset_minutes: i64,
) -> Option<CalculateResponse> {
    let arrival_minutes = parse_time(arrival_time)? + offset_minutes;

    // Caller-supplied order is not guaranteed sorted, and gaps between
    // order values are legal.
    let mut sorted: Vec<&CommuteStep> = steps.iter().collect();
    sorted.sort_by_key(|step| step.order);

    let total_minutes: u32 = sorted.iter().map(|step| step.duration_minutes).sum();
    let departure_time = format_time(arrival_minutes - i64::from(total_minutes));

    // Walk last-to-first, each step ending where the next one starts.
    let mut cursor = arrival_minutes;
    let mut schedule = Vec::with_capacity(sorted.len());
    for step in sorted.iter().rev() {
        let end_minutes = cursor;
        let start_minutes = end_minutes - i64::from(step.duration_minutes);
        schedule.push(ScheduleStep {
            step_id: step.id.clone(),
            label: step.label.clone(),
            step_type: step.step_type,
            start_time: format_time(start_minutes),
            end_time: format_time(end_minutes),
            duration_minutes: step.duration_minutes,
        });
        cursor = start_minutes;
    }
    // Emitted in reverse; flip back into chronological order.
    schedule.reverse();

    Some(CalculateResponse {
        routine_id: routine_id.to_string(),
        arrival_time: format_time(arrival_minutes),
        offset_minutes,
        schedule,
        departure_time,
        total_minutes,
    })
}
