//! Snapshot feed capability and its HTTP implementation.

use std::future::Future;
use std::time::Duration;

use stoker_core::Snapshot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Snapshot request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Snapshot feed unavailable: {0}")]
    Unavailable(String),
}

/// Pluggable source of status snapshots.
pub trait SnapshotSource {
    /// Fetch and decode one snapshot document.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Snapshot, SourceError>> + Send;
}

/// Fetches `.data.json` documents over HTTP.
///
/// Timeouts here only bound a single request; a failed or timed-out
/// fetch lands in the poller's ordinary retry path.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

impl SnapshotSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Snapshot, SourceError> {
        let snapshot = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?
            .error_for_status()?
            .json::<Snapshot>()
            .await?;
        Ok(snapshot)
    }
}
