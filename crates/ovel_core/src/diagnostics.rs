//! Step timing counters and logging setup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Wall-clock counters for a run. Callers measure each step and report it
/// here; the simulation itself never reads the clock.
#[derive(Debug, Default)]
pub struct StepTimer {
    steps: AtomicU64,
    living: AtomicU64,
    total_nanos: AtomicU64,
    peak_nanos: AtomicU64,
}

impl StepTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed step with its duration.
    pub fn record_step(&self, duration: Duration, tick: u64, living: usize, events: usize) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let steps = self.steps.fetch_add(1, Ordering::Relaxed) + 1;
        self.living.store(living as u64, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.peak_nanos.fetch_max(nanos, Ordering::Relaxed);

        // Log at info level every 1000 steps
        if steps.is_multiple_of(1000) {
            tracing::info!(
                tick,
                living,
                events,
                duration_us = duration.as_micros() as u64,
                mean_us = self.mean_step().as_micros() as u64,
                "Simulation step"
            );
        }
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn living(&self) -> u64 {
        self.living.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn mean_step(&self) -> Duration {
        let steps = self.steps();
        if steps == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed) / steps)
    }

    #[must_use]
    pub fn peak_step(&self) -> Duration {
        Duration::from_nanos(self.peak_nanos.load(Ordering::Relaxed))
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` picks the filter, falling
/// back to `info`. A second call keeps the first subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok();
}
