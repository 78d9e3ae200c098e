//! Poll scheduling capability.

use std::future::Future;
use std::time::Duration;

/// Waits out the delay between poll cycles. Tests substitute a virtual
/// timer to run the poller deterministically.
pub trait PollTimer {
    fn wait(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Real timer backed by the tokio runtime.
pub struct TokioTimer;

impl PollTimer for TokioTimer {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
