use std::time::Duration;

use super::ScheduleError;

/// Per-tick batch sizes for a rate under a tick-frequency cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    rate: u32,
    max_tick_frequency: u32,
    tick_frequency: u32,
    base_batch_size: u32,
    remainder: u32,
}

impl BatchPlan {
    pub fn new(rate: u32, max_tick_frequency: u32) -> Result<Self, ScheduleError> {
        if rate < 1 {
            return Err(ScheduleError::InvalidRate(rate));
        }
        if max_tick_frequency < 1 {
            return Err(ScheduleError::InvalidTickFrequency(max_tick_frequency));
        }
        let tick_frequency = rate.min(max_tick_frequency);
        Ok(Self {
            rate,
            max_tick_frequency,
            tick_frequency,
            base_batch_size: rate / tick_frequency,
            remainder: rate % tick_frequency,
        })
    }

    /// Points per second.
    #[inline]
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Same cap, different rate.
    pub fn with_rate(&self, rate: u32) -> Result<Self, ScheduleError> {
        Self::new(rate, self.max_tick_frequency)
    }

    #[inline]
    pub fn max_tick_frequency(&self) -> u32 {
        self.max_tick_frequency
    }

    /// Ticks per second.
    #[inline]
    pub fn tick_frequency(&self) -> u32 {
        self.tick_frequency
    }

    #[inline]
    pub fn base_batch_size(&self) -> u32 {
        self.base_batch_size
    }

    #[inline]
    pub fn remainder(&self) -> u32 {
        self.remainder
    }

    /// Time between tick starts.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_frequency
    }

    /// Start time of tick `sequence` relative to the first tick.
    ///
    /// Computed from the sequence number rather than by summing intervals, so
    /// tick `k * tick_frequency` lands exactly on second `k`.
    pub fn tick_offset(&self, sequence: u64) -> Duration {
        let nanos = u128::from(sequence) * 1_000_000_000 / u128::from(self.tick_frequency);
        let secs = (nanos / 1_000_000_000) as u64;
        Duration::new(secs, (nanos % 1_000_000_000) as u32)
    }

    /// Batch size for the tick at `phase` (taken modulo the tick frequency).
    #[inline]
    pub fn batch_size(&self, phase: u32) -> usize {
        let extra = if phase % self.tick_frequency == 0 {
            self.remainder
        } else {
            0
        };
        (self.base_batch_size + extra) as usize
    }

    /// Batch sizes of one full cycle (one second), starting at phase 0.
    pub fn cycle(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.tick_frequency).map(move |phase| self.batch_size(phase))
    }
}

/// Phase tracker for consecutive ticks of one plan.
///
/// A fresh counter starts at phase 0; restarting a schedule means building a
/// new counter, never resuming mid-cycle.
#[derive(Clone, Debug)]
pub struct TickCounter {
    plan: BatchPlan,
    phase: u32,
    sequence: u64,
}

impl TickCounter {
    pub fn new(plan: BatchPlan) -> Self {
        Self {
            plan,
            phase: 0,
            sequence: 0,
        }
    }

    #[inline]
    pub fn plan(&self) -> &BatchPlan {
        &self.plan
    }

    /// Phase of the next tick, in `0..tick_frequency`.
    #[inline]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Ticks advanced so far.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Batch size for the next tick; advances the phase.
    pub fn advance(&mut self) -> usize {
        let size = self.plan.batch_size(self.phase);
        self.phase = (self.phase + 1) % self.plan.tick_frequency();
        self.sequence += 1;
        size
    }
}

impl Iterator for TickCounter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        Some(self.advance())
    }
}
