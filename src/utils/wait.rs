use std::future::Future;
use std::time::Duration;

use crate::error::{HarvestError, HarvestResult};

/// Polls `condition` every `interval` until it holds, failing once `timeout`
/// has elapsed.
pub async fn wait_until<F, Fut>(
    what: &str,
    mut condition: F,
    interval: Duration,
    timeout: Duration,
) -> HarvestResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let poll = async {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if condition().await {
                return;
            }
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| HarvestError::Timeout(what.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn returns_once_condition_holds() {
        let polls = AtomicU32::new(0);
        let result = wait_until(
            "chart",
            || async { polls.fetch_add(1, Ordering::SeqCst) >= 2 },
            Duration::from_millis(5),
            Duration::from_secs(2),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn times_out() {
        let result = wait_until("chart", || async { false }, Duration::from_millis(5), Duration::from_millis(30)).await;
        assert!(matches!(result, Err(HarvestError::Timeout(what)) if what == "chart"));
    }
}
