//! Time management utilities

use std::time::{Duration, Instant};

/// Accumulates frame deltas and fires once per configured interval.
///
/// Drives the auto-refresh check of the scene manager: the host calls
/// [`IntervalTimer::tick`] once per frame with its delta time.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: f32,
    elapsed: f32,
}

impl IntervalTimer {
    /// Create a timer firing every `interval_secs` seconds
    pub fn new(interval_secs: f32) -> Self {
        Self {
            interval: interval_secs.max(0.0),
            elapsed: 0.0,
        }
    }
    
    /// Advance by `delta_time` seconds. Returns true (and restarts the
    /// accumulation) when the interval has been reached.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        self.elapsed += delta_time;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
    
    /// Seconds accumulated since the last firing
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Wall-clock timer started at construction.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start timing now
    pub fn start_new() -> Self {
        Self { started: Instant::now() }
    }
    
    /// Time since [`Stopwatch::start_new`]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
    
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }
}
