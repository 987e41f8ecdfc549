use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::Result;

use super::session::Tick;

/// Shortest interval between two activations.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Blocks the scheduler between activations.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Runs ticks back to back on the calling thread, one per interval.
pub struct LiveScheduler<S = ThreadSleeper> {
    interval: Duration,
    sleeper: S,
}

impl LiveScheduler<ThreadSleeper> {
    pub fn new(interval: Duration) -> Self {
        Self::with_sleeper(interval, ThreadSleeper)
    }
}

impl<S: Sleeper> LiveScheduler<S> {
    pub fn with_sleeper(interval: Duration, sleeper: S) -> Self {
        let interval = if interval < MIN_INTERVAL {
            warn!(
                "live interval {:?} is below the minimum, using {:?}",
                interval, MIN_INTERVAL
            );
            MIN_INTERVAL
        } else {
            interval
        };
        Self { interval, sleeper }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[cfg(test)]
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Tick until `limit` activations have run, or forever when `limit` is
    /// `None`. Returns the number of activations.
    ///
    /// A failed tick is logged and the scheduler re-arms, unless the error
    /// is fatal.
    pub fn run<T: Tick + ?Sized>(&mut self, tick: &mut T, limit: Option<u64>) -> Result<u64> {
        let mut count = 0u64;
        let mut last_started: Option<Instant> = None;

        while limit.is_none_or(|n| count < n) {
            if let Some(prev) = last_started {
                let remaining = self.interval.saturating_sub(prev.elapsed());
                if !remaining.is_zero() {
                    self.sleeper.sleep(remaining);
                }
            }

            last_started = Some(Instant::now());
            match tick.tick() {
                Ok(report) => debug!(
                    "cycle {} published {} and skipped {} tracks in {:?}",
                    count + 1,
                    report.published.len(),
                    report.skipped.len(),
                    report.finished.duration_since(report.started)
                ),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!("cycle failed: {e}"),
            }
            count += 1;
        }
        Ok(count)
    }
}
