//! Worker status string parsing.
//!
//! Each entry in the snapshot's `status` array carries a colon-delimited
//! string: activity token, then the origin being processed, then a
//! timestamp with `_` separating the time components. Trailing parts may
//! be absent.

/// The aggregate/master entry, excluded from the per-worker table.
pub const MASTER_WORKER_ID: &str = "main";

/// Master activity token meaning no further changes will occur.
pub const STOPPING_SENTINEL: &str = "stopping_jobs";

/// Parsed worker status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStatus {
    pub id: String,
    /// Activity label (first token).
    pub activity: String,
    /// Origin currently being processed, empty when absent.
    pub origin: String,
    /// Raw timestamp with `_` separators, if present.
    pub time: Option<String>,
}

impl WorkerStatus {
    pub fn is_master(&self) -> bool {
        self.id == MASTER_WORKER_ID
    }

    pub fn is_stopping(&self) -> bool {
        self.activity == STOPPING_SENTINEL
    }
}

/// Parse a raw worker status string. Total: any input yields a status,
/// with missing parts degrading to empty.
pub fn parse_worker_status(id: &str, raw: &str) -> WorkerStatus {
    let mut parts = raw.splitn(3, ':');
    let activity = parts.next().unwrap_or("").to_string();
    let origin = parts.next().unwrap_or("").to_string();
    let time = parts.next().filter(|t| !t.is_empty()).map(String::from);

    WorkerStatus {
        id: id.to_string(),
        activity,
        origin,
        time,
    }
}
