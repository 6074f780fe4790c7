//! Commute schedule computation.
//!
//! This module handles:
//! - Wall-clock "HH:mm" <-> minute-of-day conversion with midnight wraparound
//! - The backward propagation pass that turns a routine, a target arrival
//!   time and a signed offset into a full per-step schedule

mod clock;
mod compute;

pub use clock::{format_time, parse_time, MINUTES_PER_DAY};
pub use compute::compute_schedule;
