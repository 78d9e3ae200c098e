//! Wire types for stoker.
//!
//! This crate decodes the build server's `.data.json` status document.

pub mod snapshot;
pub mod worker;

pub use snapshot::{
    BuildId, BuiltRow, Category, Counters, FailedRow, IgnoredRow, Ports, SkippedRow, Snapshot,
    SnapshotError, WorkerEntry,
};
pub use worker::{parse_worker_status, WorkerStatus, MASTER_WORKER_ID, STOPPING_SENTINEL};
