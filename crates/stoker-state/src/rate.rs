//! Smoothed throughput estimation over a bounded sample window.

/// Default ring buffer capacity, one slot per poll.
pub const RING_CAPACITY: usize = 75;

/// Samples required before a windowed rate is reported.
pub const MIN_SAMPLES: usize = 15;

/// One (cumulative-attempted, elapsed-seconds) observation.
#[derive(Debug, Clone, Copy)]
struct RateSample {
    attempted: u64,
    elapsed_secs: u64,
}

/// Windowed packages-per-hour estimator.
///
/// Keeps a fixed-capacity ring of samples keyed by a monotonically
/// increasing tick counter; once the ring is full the oldest slot is
/// overwritten, giving a trailing window roughly one capacity wide.
/// Rides out single-poll noise that the whole-run average would not.
#[derive(Debug)]
pub struct RateEstimator {
    samples: Vec<RateSample>,
    capacity: usize,
    min_samples: usize,
    tick: usize,
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl RateEstimator {
    pub fn new() -> Self {
        Self::with_window(RING_CAPACITY, MIN_SAMPLES)
    }

    /// Build an estimator with a custom window. `capacity` must be
    /// nonzero; `min_samples` above `capacity` just delays the first
    /// report until the ring wraps.
    pub fn with_window(capacity: usize, min_samples: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            min_samples: min_samples.max(1),
            tick: 0,
        }
    }

    /// Record one observation and return the smoothed hourly rate, or
    /// None while too few samples exist or the window spans no elapsed
    /// time.
    pub fn record(&mut self, attempted: u64, elapsed_secs: u64) -> Option<u64> {
        let index = self.tick % self.capacity;
        let sample = RateSample {
            attempted,
            elapsed_secs,
        };
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[index] = sample;
        }

        let recorded = self.tick + 1;
        let rate = if recorded >= self.min_samples {
            // Oldest live sample: slot 0 while the ring is filling,
            // otherwise the slot the next write after this one lands on.
            let tail = if self.tick < self.capacity {
                0
            } else {
                (self.tick - (self.capacity - 1)) % self.capacity
            };
            let oldest = self.samples[tail];
            let d_pkgs = sample.attempted.saturating_sub(oldest.attempted);
            let d_secs = sample.elapsed_secs.saturating_sub(oldest.elapsed_secs);
            hourly_rate(d_pkgs, d_secs)
        } else {
            None
        };

        self.tick += 1;
        rate
    }

    /// Discard all history, e.g. when a new build is observed.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.tick = 0;
    }
}

/// Whole-run average rate with no windowing and no minimum-sample gate.
///
/// Returns None only when nothing has been attempted or no time has
/// elapsed.
pub fn overall_rate(attempted: u64, elapsed_secs: u64) -> Option<u64> {
    if attempted == 0 {
        return None;
    }
    hourly_rate(attempted, elapsed_secs)
}

fn hourly_rate(pkgs: u64, secs: u64) -> Option<u64> {
    if secs == 0 {
        return None;
    }
    Some((pkgs as f64 / (secs as f64 / 3600.0)).ceil() as u64)
}
