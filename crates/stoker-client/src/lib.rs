//! Snapshot polling client for stoker.
//!
//! Owns the poll/parse/dispatch loop and the capability traits it is
//! driven through: a snapshot source, a render surface, and a poll
//! timer. Concrete implementations (HTTP source, tokio timer) live
//! alongside the traits; the terminal surface lives in stoker-monitor.

pub mod poller;
pub mod source;
pub mod surface;
pub mod timer;

pub use poller::{BarColors, CycleOutcome, Poller, PollerConfig};
pub use source::{HttpSource, SnapshotSource, SourceError};
pub use surface::{Element, RenderSurface, Rgb, StatField, WorkerRow};
pub use timer::{PollTimer, TokioTimer};
