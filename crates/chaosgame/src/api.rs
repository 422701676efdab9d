//! Curated surface for front ends (CLI, renderers).
//!
//! Important
//! - Prefer these re-exports over reaching into submodules; the module layout
//!   may change while this list stays small.

// Geometry
pub use crate::geom2::{GeometryError, Polygon, Rect, Vec2};
// Engine
pub use crate::generator::{GeneratedBatch, IterativeGenerator, PointGenerator};
pub use crate::select::{VertexSelectionStrategy, VertexSelector};
pub use crate::settings::{ChaosGameSettings, SettingsError};
// Scheduling and the facade
pub use crate::buffer::ConcurrentBuffer;
pub use crate::runner::{ChaosGameRunner, RunnerCfg, RunnerError, RunnerState};
pub use crate::schedule::{BatchPlan, RateScheduler, ScheduleError, Tick, TickCounter};

/// Points per second covered by one full tick cycle of `plan`.
///
/// Pre: `plan` was built by `BatchPlan::new`.
/// Post: equals the configured rate (the remainder is folded into phase 0).
pub fn points_per_cycle(plan: &BatchPlan) -> u64 {
    plan.cycle().map(|n| n as u64).sum()
}
