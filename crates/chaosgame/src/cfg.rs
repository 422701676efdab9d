//! Fixed limits for selection and scheduling (internal defaults).
//!
//! Policy
//! - Defaults are constants; the scheduler cap can be overridden per runner
//!   through `RunnerCfg::max_tick_frequency`, the selection bound cannot.

/// Upper bound on scheduler ticks per second. Higher rates grow the batch
/// size instead of the tick frequency.
pub const DEFAULT_MAX_TICK_FREQUENCY: u32 = 60;

/// Random draws a selector makes before falling back to a full candidate scan.
///
/// The least permissive shipped case (three vertices, previous two picks
/// identical, adjacent vertices excluded) accepts one draw in three, so the
/// scan is effectively never reached.
pub const MAX_SELECTION_ATTEMPTS: usize = 1024;

/// Containment tolerance per unit of coordinate magnitude (absolute near the
/// origin).
pub const CONTAINS_EPS: f64 = 1e-9;
