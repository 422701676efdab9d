//! Start/stop/reset facade over generator, scheduler, and buffer.
//!
//! Threads
//! - The scheduler's producer thread owns the ticking. Each tick locks the
//!   generator, produces a batch, appends it to the accumulation buffer, and
//!   sends it to every subscriber.
//! - Consumers call `flush_accumulated_points` (pull) or read from a
//!   `subscribe` receiver (push). Both are safe while running.
//! - Read-only projections (`iteration`, `all_points`) lock the generator
//!   briefly, so they are consistent snapshots even while running.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::buffer::ConcurrentBuffer;
use crate::cfg::DEFAULT_MAX_TICK_FREQUENCY;
use crate::generator::{GeneratedBatch, IterativeGenerator, PointGenerator};
use crate::geom2::{Polygon, Rect, Vec2};
use crate::schedule::{BatchPlan, RateScheduler, ScheduleError, Tick, TickFn};
use crate::settings::{ChaosGameSettings, SettingsError};

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Runner parameters that survive `reset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunnerCfg {
    /// Rect the regular polygon is inscribed in.
    pub bounds: Rect,
    /// Points per second.
    pub rate: u32,
    /// Cap on scheduler ticks per second.
    pub max_tick_frequency: u32,
    /// Fixed seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            bounds: Rect::unit(),
            rate: 1,
            max_tick_frequency: DEFAULT_MAX_TICK_FREQUENCY,
            seed: None,
        }
    }
}

/// Snapshot of the runner's control state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunnerState {
    pub is_running: bool,
    pub generation_rate: u32,
    pub iteration: usize,
}

type Subscribers = Arc<Mutex<Vec<Sender<GeneratedBatch<Vec2>>>>>;

/// Controllable Chaos Game session.
pub struct ChaosGameRunner {
    settings: ChaosGameSettings,
    cfg: RunnerCfg,
    resets: u64,
    polygon: Polygon,
    initial_point: Vec2,
    generator: Arc<Mutex<PointGenerator>>,
    buffer: Arc<ConcurrentBuffer<Vec2>>,
    subscribers: Subscribers,
    scheduler: RateScheduler,
}

impl ChaosGameRunner {
    /// Stopped runner with zero iterations.
    pub fn new(settings: ChaosGameSettings, cfg: RunnerCfg) -> Result<Self, RunnerError> {
        let plan = BatchPlan::new(cfg.rate, cfg.max_tick_frequency)?;
        let generator = settings.make_generator(&cfg.bounds, session_rng(cfg.seed, 0))?;
        let subscribers: Subscribers = Arc::default();
        let session = Session::new(generator, plan, &subscribers);
        tracing::debug!(
            vertex_count = settings.polygon_vertex_count,
            distance_factor = settings.distance_factor,
            strategy = %settings.vertex_selection_strategy,
            rate = cfg.rate,
            "runner created"
        );
        Ok(Self {
            settings,
            cfg,
            resets: 0,
            polygon: session.polygon,
            initial_point: session.initial_point,
            generator: session.generator,
            buffer: session.buffer,
            subscribers,
            scheduler: session.scheduler,
        })
    }

    pub fn start(&mut self) -> Result<(), RunnerError> {
        if self.scheduler.is_running() {
            return Ok(());
        }
        tracing::debug!(rate = self.rate(), iteration = self.iteration(), "runner start");
        self.scheduler.start()?;
        Ok(())
    }

    /// Stop ticking. Accumulated points and history are kept.
    pub fn stop(&mut self) {
        if !self.scheduler.is_running() {
            return;
        }
        self.scheduler.stop();
        tracing::debug!(iteration = self.iteration(), "runner stop");
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Points per second.
    #[inline]
    pub fn rate(&self) -> u32 {
        self.scheduler.rate()
    }

    /// Change the rate; a running schedule restarts at the start of a cycle.
    pub fn set_rate(&mut self, rate: u32) -> Result<(), RunnerError> {
        self.scheduler.set_rate(rate)?;
        self.cfg.rate = rate;
        Ok(())
    }

    /// Replace polygon, selector, generator, and buffer from `settings`.
    ///
    /// The runner ends up stopped at iteration 0. Invalid settings leave the
    /// runner untouched. Subscriptions carry over to the new session.
    pub fn reset(&mut self, settings: ChaosGameSettings) -> Result<(), RunnerError> {
        let resets = self.resets + 1;
        let rng = session_rng(self.cfg.seed, resets);
        let generator = settings.make_generator(&self.cfg.bounds, rng)?;
        self.scheduler.stop();
        let session = Session::new(generator, *self.scheduler.plan(), &self.subscribers);
        self.settings = settings;
        self.resets = resets;
        self.polygon = session.polygon;
        self.initial_point = session.initial_point;
        self.generator = session.generator;
        self.buffer = session.buffer;
        self.scheduler = session.scheduler;
        tracing::debug!(
            vertex_count = settings.polygon_vertex_count,
            distance_factor = settings.distance_factor,
            strategy = %settings.vertex_selection_strategy,
            resets,
            "runner reset"
        );
        Ok(())
    }

    /// Points generated since the previous flush, in generation order.
    pub fn flush_accumulated_points(&self) -> Vec<Vec2> {
        self.buffer.drain_all()
    }

    /// Receive every future batch. The channel is unbounded; a receiver that
    /// stops reading keeps accumulating until it is dropped.
    pub fn subscribe(&self) -> Receiver<GeneratedBatch<Vec2>> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn state(&self) -> RunnerState {
        RunnerState {
            is_running: self.is_running(),
            generation_rate: self.rate(),
            iteration: self.iteration(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &ChaosGameSettings {
        &self.settings
    }

    #[inline]
    pub fn cfg(&self) -> &RunnerCfg {
        &self.cfg
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn initial_point(&self) -> Vec2 {
        self.initial_point
    }

    pub fn iteration(&self) -> usize {
        self.generator.lock().iteration()
    }

    /// Full history, starting with the initial point.
    pub fn all_points(&self) -> Vec<Vec2> {
        self.generator.lock().points().to_vec()
    }
}

impl std::fmt::Debug for ChaosGameRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaosGameRunner")
            .field("settings", &self.settings)
            .field("cfg", &self.cfg)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Per-reset state: a fresh generator, buffer, and idle scheduler.
struct Session {
    polygon: Polygon,
    initial_point: Vec2,
    generator: Arc<Mutex<PointGenerator>>,
    buffer: Arc<ConcurrentBuffer<Vec2>>,
    scheduler: RateScheduler,
}

impl Session {
    fn new(generator: PointGenerator, plan: BatchPlan, subscribers: &Subscribers) -> Self {
        let polygon = generator.polygon().clone();
        let initial_point = generator.initial_point();
        let generator = Arc::new(Mutex::new(generator));
        let buffer = Arc::new(ConcurrentBuffer::new());
        let on_tick = tick_fn(
            Arc::clone(&generator),
            Arc::clone(&buffer),
            Arc::clone(subscribers),
        );
        Self {
            polygon,
            initial_point,
            generator,
            buffer,
            scheduler: RateScheduler::new(plan, on_tick),
        }
    }
}

fn tick_fn(
    generator: Arc<Mutex<PointGenerator>>,
    buffer: Arc<ConcurrentBuffer<Vec2>>,
    subscribers: Subscribers,
) -> TickFn {
    Arc::new(move |tick: Tick| {
        let batch = {
            let mut g = generator.lock();
            let values = g.generate_batch(tick.batch_size);
            GeneratedBatch {
                values,
                iteration: g.iteration(),
            }
        };
        buffer.append_all(batch.values.iter().copied());
        publish(&subscribers, batch);
    })
}

fn publish(subscribers: &Subscribers, batch: GeneratedBatch<Vec2>) {
    let mut subs = subscribers.lock();
    if subs.is_empty() {
        return;
    }
    let before = subs.len();
    subs.retain(|tx| tx.send(batch.clone()).is_ok());
    if subs.len() < before {
        tracing::debug!(dropped = before - subs.len(), "pruned closed subscribers");
    }
}

/// RNG for the session after `resets` resets.
fn session_rng(seed: Option<u64>, resets: u64) -> StdRng {
    match seed {
        Some(seed) => {
            let salt = mix(resets.wrapping_add(0x9e3779b97f4a7c15));
            StdRng::seed_from_u64(mix(seed ^ salt))
        }
        None => StdRng::from_entropy(),
    }
}

// SplitMix64 finalizer.
fn mix(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}
