//! Chaos Game point generation and scheduling engine.
//!
//! The Chaos Game picks a random polygon vertex, moves a fixed fraction of the
//! way toward it, and repeats. Plotting the visited points reveals a fractal
//! (the Sierpiński triangle for three vertices and a factor of one half).
//!
//! Layout
//! - `geom2`: rectangles and regular polygons in the plane.
//! - `select`: vertex selection strategies and the rejection-sampling selector.
//! - `generator`: the stepping function and its point history.
//! - `settings`: validated configuration snapshot used to build a generator.
//! - `buffer`: readers-writer accumulation buffer between producer and consumer.
//! - `schedule`: rate arithmetic and the timer-driven producer thread.
//! - `runner`: start/stop/reset facade composing everything above.
//!
//! API Policy
//! - Rendering is not part of this crate. Consumers drain points through
//!   `ChaosGameRunner::flush_accumulated_points` or subscribe to batches.

pub mod api;
pub mod buffer;
pub mod cfg;
pub mod generator;
pub mod geom2;
pub mod runner;
pub mod schedule;
pub mod select;
pub mod settings;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom2::Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::buffer::ConcurrentBuffer;
    pub use crate::generator::{GeneratedBatch, IterativeGenerator, PointGenerator};
    pub use crate::geom2::{GeometryError, Polygon, Rect, Vec2};
    pub use crate::runner::{ChaosGameRunner, RunnerCfg, RunnerError, RunnerState};
    pub use crate::schedule::{BatchPlan, RateScheduler, ScheduleError, Tick, TickCounter};
    pub use crate::select::{VertexSelectionStrategy, VertexSelector};
    pub use crate::settings::{ChaosGameSettings, SettingsError};
}
