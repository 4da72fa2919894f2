use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Re-fetches the fixture snapshot on a fixed period so results and newly drawn ties show up.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    period: Duration,
}

impl PeriodicRefresher {
    /// `None` when `secs` is 0 (refresh disabled).
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, secs: u64) -> Option<Self> {
        (secs > 0).then(|| Self { network_requests, period: Duration::from_secs(secs) })
    }

    pub async fn run(self) {
        let mut refresh_interval = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        refresh_interval.tick().await;

        loop {
            refresh_interval.tick().await;
            if self
                .network_requests
                .send(NetworkRequest::RefreshBracket)
                .await
                .is_err()
            {
                break;
            }
        }
    }
}
