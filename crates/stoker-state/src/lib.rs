//! Client-side synchronization engine for stoker.
//!
//! Merges repeatedly-polled, monotonically-growing snapshots into
//! already-rendered dashboard state: a windowed throughput estimator,
//! a proportional bar allocator, and append-only table cursors.

pub mod bar;
pub mod rate;
pub mod sync;

pub use bar::{BarAllocator, BarSegments, BAR_BUDGET};
pub use rate::{overall_rate, RateEstimator, MIN_SAMPLES, RING_CAPACITY};
pub use sync::{AppliedRows, FormattedRow, LogRef, TableSync};
