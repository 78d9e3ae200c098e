//! Decoded form of one polled status document.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to decode snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result categories, in the order bar segments are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Built,
    Failed,
    Ignored,
    Skipped,
}

impl Category {
    /// All categories in draw order.
    pub const ALL: [Category; 4] = [
        Category::Built,
        Category::Failed,
        Category::Ignored,
        Category::Skipped,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Failed => "failed",
            Self::Ignored => "ignored",
            Self::Skipped => "skipped",
        }
    }
}

/// Decode a count that old servers emit as a JSON string.
fn de_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Aggregate counters for one build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    #[serde(deserialize_with = "de_count", default)]
    pub queued: u64,
    #[serde(deserialize_with = "de_count", default)]
    pub built: u64,
    #[serde(deserialize_with = "de_count", default)]
    pub failed: u64,
    #[serde(deserialize_with = "de_count", default)]
    pub skipped: u64,
    #[serde(deserialize_with = "de_count", default)]
    pub ignored: u64,

    /// Total elapsed build time as `H:M:S`.
    #[serde(default)]
    pub elapsed: String,
}

impl Counters {
    /// Packages not yet accounted for. Negative means the snapshot is
    /// internally inconsistent; callers log it and display it anyway.
    pub fn remaining(&self) -> i64 {
        self.queued as i64
            - self.built as i64
            - self.failed as i64
            - self.skipped as i64
            - self.ignored as i64
    }

    /// Packages the builders have finished attempting (success or failure).
    pub fn attempted(&self) -> u64 {
        self.built + self.failed
    }
}

/// A successfully built package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltRow {
    pub pkgname: String,
    pub origin: String,
}

/// A failed package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRow {
    pub pkgname: String,
    pub origin: String,
    /// Build phase the failure occurred in.
    #[serde(default)]
    pub phase: String,
    /// Error classification, used as the log link label.
    #[serde(default)]
    pub errortype: String,
}

/// A package skipped because a dependency failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRow {
    pub pkgname: String,
    pub origin: String,
    /// The dependency that blocked this package.
    #[serde(default)]
    pub depends: String,
}

/// A package the server refused to build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoredRow {
    pub pkgname: String,
    pub origin: String,
    #[serde(default)]
    pub reason: String,
}

/// Per-category result lists. Each list is append-only across polls
/// within one build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ports {
    #[serde(default)]
    pub built: Vec<BuiltRow>,
    #[serde(default)]
    pub failed: Vec<FailedRow>,
    #[serde(default)]
    pub skipped: Vec<SkippedRow>,
    #[serde(default)]
    pub ignored: Vec<IgnoredRow>,
}

/// One raw worker status entry from the `status` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerEntry {
    pub id: String,
    /// Colon-delimited `activity:origin:timestamp` string.
    pub status: String,
}

/// Identity of one build run. Cursors and estimators reset when this
/// changes between snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildId {
    pub mastername: String,
    pub buildname: String,
}

/// The full decoded server response for one poll.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub mastername: String,
    pub buildname: String,
    #[serde(default)]
    pub svn_url: Option<String>,
    #[serde(default)]
    pub status: Vec<WorkerEntry>,
    #[serde(default)]
    pub stats: Option<Counters>,
    #[serde(default)]
    pub ports: Option<Ports>,
    /// Map of failed/ignored package name to the number of packages
    /// skipped because of it.
    #[serde(default)]
    pub skipped: HashMap<String, u64>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn build_id(&self) -> BuildId {
        BuildId {
            mastername: self.mastername.clone(),
            buildname: self.buildname.clone(),
        }
    }
}
