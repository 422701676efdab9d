use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{select, Receiver, Sender};

use super::{BatchPlan, ScheduleError, TickCounter};

/// One firing of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Ticks fired since the last (re)start, starting at 0.
    pub sequence: u64,
    /// Position within the current one-second cycle.
    pub phase: u32,
    /// Number of values to produce for this tick.
    pub batch_size: usize,
}

/// Callback run on the producer thread for every tick.
pub type TickFn = Arc<dyn Fn(Tick) + Send + Sync + 'static>;

/// Timer-driven producer running `on_tick` at the plan's tick frequency.
///
/// States: idle (no thread) and scheduled (one producer thread). `start` on a
/// scheduled instance and `stop` on an idle one are no-ops.
pub struct RateScheduler {
    plan: BatchPlan,
    on_tick: TickFn,
    worker: Option<Worker>,
}

struct Worker {
    cancelled: Arc<AtomicBool>,
    // Dropping the sender disconnects the channel and wakes the thread.
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl RateScheduler {
    pub fn new(plan: BatchPlan, on_tick: TickFn) -> Self {
        Self {
            plan,
            on_tick,
            worker: None,
        }
    }

    #[inline]
    pub fn plan(&self) -> &BatchPlan {
        &self.plan
    }

    #[inline]
    pub fn rate(&self) -> u32 {
        self.plan.rate()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Spawn the producer thread. The first tick fires immediately at phase 0.
    pub fn start(&mut self) -> Result<(), ScheduleError> {
        if self.worker.is_some() {
            return Ok(());
        }
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let cancelled = Arc::new(AtomicBool::new(false));
        let plan = self.plan;
        let on_tick = Arc::clone(&self.on_tick);
        let flag = Arc::clone(&cancelled);
        let handle = thread::Builder::new()
            .name("chaosgame-scheduler".into())
            .spawn(move || run_ticks(plan, on_tick, stop_rx, flag))
            .map_err(ScheduleError::Spawn)?;
        tracing::debug!(
            rate = plan.rate(),
            tick_frequency = plan.tick_frequency(),
            base_batch_size = plan.base_batch_size(),
            remainder = plan.remainder(),
            "scheduler started"
        );
        self.worker = Some(Worker {
            cancelled,
            stop_tx,
            handle,
        });
        Ok(())
    }

    /// Prevent further ticks and wait for an in-flight tick to finish.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.cancelled.store(true, Ordering::Release);
        drop(worker.stop_tx);
        // Called from inside `on_tick`: the thread exits after this tick.
        if worker.handle.thread().id() == thread::current().id() {
            return;
        }
        if worker.handle.join().is_err() {
            tracing::error!("scheduler thread panicked");
        }
        tracing::debug!(rate = self.plan.rate(), "scheduler stopped");
    }

    /// Replace the rate. A running schedule restarts at phase 0.
    pub fn set_rate(&mut self, rate: u32) -> Result<(), ScheduleError> {
        let plan = self.plan.with_rate(rate)?;
        if plan == self.plan {
            return Ok(());
        }
        let was_running = self.is_running();
        self.stop();
        self.plan = plan;
        if was_running {
            self.start()?;
        }
        Ok(())
    }
}

impl Drop for RateScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for RateScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateScheduler")
            .field("plan", &self.plan)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

fn run_ticks(plan: BatchPlan, on_tick: TickFn, stop_rx: Receiver<()>, cancelled: Arc<AtomicBool>) {
    let mut counter = TickCounter::new(plan);
    let started = Instant::now();
    loop {
        if cancelled.load(Ordering::Acquire) {
            break;
        }
        let sequence = counter.sequence();
        let phase = counter.phase();
        let batch_size = counter.advance();
        tracing::trace!(sequence, phase, batch_size, "tick");
        on_tick(Tick {
            sequence,
            phase,
            batch_size,
        });
        // Deadlines are fixed offsets from `started`; a late tick shortens the
        // next wait instead of shifting every later tick.
        let Some(deadline) = started.checked_add(plan.tick_offset(counter.sequence())) else {
            break;
        };
        select! {
            recv(stop_rx) -> _ => break,
            recv(crossbeam_channel::at(deadline)) -> _ => {}
        }
    }
}
