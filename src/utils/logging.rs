use log::{Level, log_enabled, warn};
use std::time::{Duration, Instant};

/// Scoped timer that traces the start and end of a simulation phase.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            log::trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Warns when a full timestep took longer than the real-time budget.
///
/// Returns `true` if the budget was exceeded so callers can shed iterations.
pub fn warn_if_step_budget_exceeded(duration: Duration, budget_ms: f32) -> bool {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!("Timestep exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
        true
    } else {
        false
    }
}
