//! Rate-controlled batch generation.
//!
//! Model
//! - A configured rate `R` (points per second) is split into
//!   `F = min(R, cap)` ticks per second. Every tick produces `R / F` points;
//!   the tick at phase 0 of each cycle also produces the remainder `R % F`,
//!   so each full cycle of `F` ticks yields exactly `R` points.
//! - `BatchPlan` and `TickCounter` hold that arithmetic and are pure.
//! - `RateScheduler` runs the ticks on a dedicated producer thread and hands
//!   each batch size to a callback. Cancellation is cooperative: it is checked
//!   before every tick, and a tick already running completes.

mod plan;
mod scheduler;

pub use plan::{BatchPlan, TickCounter};
pub use scheduler::{RateScheduler, Tick, TickFn};

/// Configuration errors for the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("generation rate must be at least 1 point per second, got {0}")]
    InvalidRate(u32),
    #[error("maximum tick frequency must be at least 1 Hz, got {0}")]
    InvalidTickFrequency(u32),
    #[error("failed to spawn scheduler thread")]
    Spawn(#[source] std::io::Error),
}
